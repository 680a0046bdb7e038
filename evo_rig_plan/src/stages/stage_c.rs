//! Stage C(i): retrieve the i-th pipe.
//!
//! Mirrors stage B with an inverted state flow (`H→C→B→I→J→D→F→H`):
//! couples onto the string, releases and re-clamps the lower clamp
//! around two successive breaks, is assisted between them by the
//! manipulator arms stowing the freed pipe, and finally backs the
//! carousel from `i` to `i-1`.

use crate::catalogue::Catalogue;
use crate::dof::Dof;
use crate::duration::DurationTable;
use crate::error::ModelError;
use crate::task::OpType;

use super::{anchor_start, Anchor};

pub(super) fn build(
    cat: &mut Catalogue,
    d: &DurationTable,
    i: u32,
    start_after: Anchor,
) -> Result<Anchor, ModelError> {
    let p = |suffix: &str| format!("C{i}_{suffix}");

    let fz_hc = cat.add_move(p("Fz_HC"), Dof::Fz, d.c_fz_hc, 'H', 'C')?;
    anchor_start(cat, fz_hc, Some(start_after));

    let couple_cb_fz = cat.add_move(p("Couple_CB_Fz"), Dof::Fz, d.c_couple_cb, 'C', 'B')?;
    cat.add_precedence(fz_hc, couple_cb_fz);
    let couple_cb_pr = cat.add_task(
        p("Couple_CB_Pr"),
        Dof::Pr,
        d.c_couple_cb,
        'B',
        'B',
        OpType::Spin,
        Some('B'.into()),
        true,
    )?;
    cat.add_synchronization(couple_cb_fz, couple_cb_pr)?;

    let dh_lock = cat.add_move(p("Dh_Lock"), Dof::Dh, d.c_dh_lock, 'A', 'B')?;
    cat.add_precedence(couple_cb_fz, dh_lock);

    let cb_release = cat.add_move(p("Cb_release"), Dof::Cb, d.c_cb_release, 'B', 'A')?;
    cat.add_precedence(dh_lock, cb_release);

    let fz_bi = cat.add_move(p("Fz_BI"), Dof::Fz, d.c_fz_bi, 'B', 'I')?;
    cat.add_precedence(couple_cb_fz, fz_bi);
    cat.add_precedence(cb_release, fz_bi);

    let cb_clamp = cat.add_move(p("Cb_clamp"), Dof::Cb, d.c_cb_clamp, 'A', 'B')?;
    cat.add_precedence(cb_release, cb_clamp);

    let break_ij_fz = cat.add_move(p("Break_IJ_Fz"), Dof::Fz, d.c_break_ij, 'I', 'J')?;
    cat.add_precedence(fz_bi, break_ij_fz);
    cat.add_precedence(cb_clamp, break_ij_fz);
    let break_ij_pr = cat.add_task(
        p("Break_IJ_Pr"),
        Dof::Pr,
        d.c_break_ij,
        'C',
        'C',
        OpType::Spin,
        Some('C'.into()),
        true,
    )?;
    cat.add_synchronization(break_ij_fz, break_ij_pr)?;

    let fz_jd = cat.add_move(p("Fz_JD"), Dof::Fz, d.c_fz_jd, 'J', 'D')?;
    cat.add_precedence(break_ij_fz, fz_jd);

    let mr_assist = cat.add_move(p("Mr_Assist"), Dof::Mr, d.c_mr_assist, 'A', 'B')?;
    cat.add_precedence(fz_jd, mr_assist);
    let me_assist = cat.add_move(p("Me_Assist"), Dof::Me, d.c_me_assist, 'A', 'B')?;
    cat.add_precedence(mr_assist, me_assist);
    let mg_grip = cat.add_move(p("Mg_Grip"), Dof::Mg, d.c_mg_grip, 'A', 'B')?;
    cat.add_precedence(me_assist, mg_grip);

    let dh_unlock = cat.add_move(p("Dh_Unlock"), Dof::Dh, d.c_dh_unlock, 'B', 'A')?;
    cat.add_precedence(fz_jd, dh_unlock);
    cat.add_precedence(dh_lock, dh_unlock);

    let break_df_fz = cat.add_move(p("Break_DF_Fz"), Dof::Fz, d.c_break_df, 'D', 'F')?;
    cat.add_precedence(fz_jd, break_df_fz);
    cat.add_precedence(dh_unlock, break_df_fz);
    cat.add_precedence(mg_grip, break_df_fz);
    let break_df_pr = cat.add_task(
        p("Break_DF_Pr"),
        Dof::Pr,
        d.c_break_df,
        'C',
        'C',
        OpType::Spin,
        Some('C'.into()),
        true,
    )?;
    cat.add_synchronization(break_df_fz, break_df_pr)?;

    let fz_fh = cat.add_move(p("Fz_FH"), Dof::Fz, d.c_fz_fh, 'F', 'H')?;
    cat.add_precedence(break_df_fz, fz_fh);

    let me_retract = cat.add_move(p("Me_Retract"), Dof::Me, d.c_me_retract, 'B', 'A')?;
    cat.add_precedence(mg_grip, me_retract);
    let mr_retract = cat.add_move(p("Mr_Retract"), Dof::Mr, d.c_mr_retract, 'B', 'A')?;
    cat.add_precedence(mr_assist, mr_retract);
    let me_store = cat.add_move(p("Me_Store"), Dof::Me, d.c_me_store, 'A', 'B')?;
    cat.add_precedence(me_retract, me_store);
    let mg_release = cat.add_move(p("Mg_Release"), Dof::Mg, d.c_mg_release, 'B', 'A')?;
    cat.add_precedence(me_store, mg_release);
    let me_back = cat.add_move(p("Me_Back"), Dof::Me, d.c_me_back, 'B', 'A')?;
    cat.add_precedence(mg_release, me_back);

    let sr_back = cat.add_task(p("Sr_Back"), Dof::Sr, d.c_sr_next, i, i - 1, OpType::Move, None, false)?;
    anchor_start(cat, sr_back, Some(start_after));
    cat.add_precedence(me_back, sr_back);
    cat.add_precedence(mr_retract, sr_back);
    cat.add_precedence(fz_fh, sr_back);

    Ok(Anchor::new(sr_back))
}
