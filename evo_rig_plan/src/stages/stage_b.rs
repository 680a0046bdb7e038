//! Stage B(i): drive and couple the i-th pipe.
//!
//! Indexes the carousel from `i-1` to `i`, repeats stage A's
//! manipulator-arm choreography to fetch the new pipe, then makes up
//! two couplings (`F→D` and `J→I`) bracketing a release/drill/clamp
//! sequence on the lower clamp, and finally breaks the temporary
//! connection before returning the feed axis home.

use crate::catalogue::Catalogue;
use crate::dof::Dof;
use crate::duration::DurationTable;
use crate::error::ModelError;
use crate::task::OpType;

use super::{anchor_start, chain, Anchor};

pub(super) fn build(
    cat: &mut Catalogue,
    d: &DurationTable,
    i: u32,
    start_after: Anchor,
) -> Result<Anchor, ModelError> {
    let p = |suffix: &str| format!("B{i}_{suffix}");

    let sr_index = cat.add_task(p("Sr_Index"), Dof::Sr, d.sr_index, i - 1, i, OpType::Move, None, false)?;
    anchor_start(cat, sr_index, Some(start_after));

    let me_store = cat.add_move(p("Me_Store"), Dof::Me, d.b_me_to_store, 'A', 'B')?;
    anchor_start(cat, me_store, Some(start_after));
    let mg_grip = cat.add_move(p("Mg_Grip"), Dof::Mg, d.b_mg_grip, 'A', 'B')?;
    let me_back = cat.add_move(p("Me_Back"), Dof::Me, d.b_me_back, 'B', 'A')?;
    let mr_to_head = cat.add_move(p("Mr_ToHead"), Dof::Mr, d.b_mr_to_head, 'A', 'B')?;
    let me_head = cat.add_move(p("Me_Head"), Dof::Me, d.b_me_to_head, 'A', 'H')?;
    chain(cat, &[me_store, mg_grip, me_back, me_head]);
    cat.add_precedence(me_back, mr_to_head);
    cat.add_precedence(mr_to_head, me_head);

    let fz_hf = cat.add_move(p("Fz_HF"), Dof::Fz, d.b_fz_hf, 'H', 'F')?;
    anchor_start(cat, fz_hf, Some(start_after));

    let couple_fd_fz = cat.add_move(p("Couple_FD_Fz"), Dof::Fz, d.b_couple_fd, 'F', 'D')?;
    cat.add_precedence(fz_hf, couple_fd_fz);
    cat.add_precedence(me_head, couple_fd_fz);
    let couple_fd_pr = cat.add_task(
        p("Couple_FD_Pr"),
        Dof::Pr,
        d.b_couple_fd,
        'B',
        'B',
        OpType::Spin,
        Some('B'.into()),
        true,
    )?;
    cat.add_synchronization(couple_fd_fz, couple_fd_pr)?;

    let dh_lock = cat.add_move(p("Dh_Lock"), Dof::Dh, d.b_dh_lock, 'A', 'B')?;
    cat.add_precedence(couple_fd_fz, dh_lock);

    let mg_release = cat.add_move(p("Mg_Release"), Dof::Mg, d.b_mg_release, 'B', 'A')?;
    let me_back_from_head = cat.add_move(p("Me_BackFromHead"), Dof::Me, d.b_me_back_from_head, 'H', 'A')?;
    let mr_back_to_store = cat.add_move(p("Mr_BackToStore"), Dof::Mr, d.b_mr_back_to_store, 'B', 'A')?;
    cat.add_precedence(dh_lock, mg_release);
    chain(cat, &[mg_release, me_back_from_head]);
    chain(cat, &[mr_to_head, mr_back_to_store]);
    cat.add_precedence(me_back_from_head, mr_back_to_store);

    let cb_release = cat.add_move(p("Cb_release"), Dof::Cb, d.b_cb_release, 'B', 'A')?;
    cat.add_precedence(dh_lock, cb_release);

    let drill_fz = cat.add_move(p("Drill_Fz"), Dof::Fz, d.b_drill, 'D', 'D')?;
    cat.add_precedence(cb_release, drill_fz);
    let drill_pr = cat.add_task(
        p("Drill_Pr"),
        Dof::Pr,
        d.b_drill,
        'D',
        'D',
        OpType::Spin,
        Some('D'.into()),
        true,
    )?;
    cat.add_synchronization(drill_fz, drill_pr)?;

    let cb_clamp = cat.add_move(p("Cb_clamp"), Dof::Cb, d.b_cb_clamp, 'A', 'B')?;
    cat.add_precedence(drill_fz, cb_clamp);

    let fz_dj = cat.add_move(p("Fz_DJ"), Dof::Fz, d.b_fz_dj, 'D', 'J')?;
    cat.add_precedence(drill_fz, fz_dj);
    cat.add_precedence(cb_clamp, fz_dj);

    let couple_ji_fz = cat.add_move(p("Couple_JI_Fz"), Dof::Fz, d.b_couple_ji, 'J', 'I')?;
    cat.add_precedence(fz_dj, couple_ji_fz);
    let couple_ji_pr = cat.add_task(
        p("Couple_JI_Pr"),
        Dof::Pr,
        d.b_couple_ji,
        'B',
        'B',
        OpType::Spin,
        Some('B'.into()),
        true,
    )?;
    cat.add_synchronization(couple_ji_fz, couple_ji_pr)?;

    let dh_unlock = cat.add_move(p("Dh_Unlock"), Dof::Dh, d.b_dh_unlock, 'B', 'A')?;
    cat.add_precedence(couple_ji_fz, dh_unlock);
    cat.add_precedence(dh_lock, dh_unlock);

    let break_fz = cat.add_move(p("Break_AC_Fz"), Dof::Fz, d.b_break_ac, 'I', 'C')?;
    cat.add_precedence(dh_unlock, break_fz);
    let break_pr = cat.add_task(
        p("Break_AC_Pr"),
        Dof::Pr,
        d.b_break_ac,
        'C',
        'C',
        OpType::Spin,
        Some('C'.into()),
        true,
    )?;
    cat.add_synchronization(break_fz, break_pr)?;

    let fz_ch = cat.add_move(p("Fz_CH"), Dof::Fz, d.b_fz_ch, 'C', 'H')?;
    cat.add_precedence(break_fz, fz_ch);
    cat.add_precedence(mr_back_to_store, fz_ch);

    Ok(Anchor::new(fz_ch))
}
