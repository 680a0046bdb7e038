//! Stage D: retrieve the tool.
//!
//! Mirrors stage A's coupling/breaking sequence in reverse: couples
//! onto the tool, releases and re-clamps the lower clamp around a
//! single break, is assisted by the manipulator arms which then stow
//! the tool, and finally resets the carousel to home position.

use crate::catalogue::Catalogue;
use crate::dof::Dof;
use crate::duration::DurationTable;
use crate::error::ModelError;
use crate::task::OpType;

use super::{anchor_start, Anchor};

pub(super) fn build(cat: &mut Catalogue, d: &DurationTable, start_after: Anchor) -> Result<Anchor, ModelError> {
    let fz_hc = cat.add_move("D_Fz_HC", Dof::Fz, d.d_fz_hc, 'H', 'C')?;
    anchor_start(cat, fz_hc, Some(start_after));

    let couple_cb_fz = cat.add_move("D_Couple_CB_Fz", Dof::Fz, d.d_couple_cb, 'C', 'B')?;
    cat.add_precedence(fz_hc, couple_cb_fz);
    let couple_cb_pr = cat.add_task(
        "D_Couple_CB_Pr",
        Dof::Pr,
        d.d_couple_cb,
        'B',
        'B',
        OpType::Spin,
        Some('B'.into()),
        true,
    )?;
    cat.add_synchronization(couple_cb_fz, couple_cb_pr)?;

    let dh_lock = cat.add_move("D_Dh_Lock", Dof::Dh, d.d_dh_lock, 'A', 'B')?;
    cat.add_precedence(couple_cb_fz, dh_lock);

    let cb_release = cat.add_move("D_Cb_release", Dof::Cb, d.d_cb_release, 'B', 'A')?;
    cat.add_precedence(dh_lock, cb_release);

    let fz_be = cat.add_move("D_Fz_BE", Dof::Fz, d.d_fz_be, 'B', 'E')?;
    cat.add_precedence(couple_cb_fz, fz_be);
    cat.add_precedence(cb_release, fz_be);

    let mr_assist = cat.add_move("D_Mr_Assist", Dof::Mr, d.d_mr_assist, 'A', 'B')?;
    cat.add_precedence(fz_be, mr_assist);
    let me_assist = cat.add_move("D_Me_Assist", Dof::Me, d.d_me_assist, 'A', 'B')?;
    cat.add_precedence(mr_assist, me_assist);
    let mg_grip = cat.add_move("D_Mg_Grip", Dof::Mg, d.d_mg_grip, 'A', 'B')?;
    cat.add_precedence(me_assist, mg_grip);

    let dh_unlock = cat.add_move("D_Dh_Unlock", Dof::Dh, d.d_dh_unlock, 'B', 'A')?;
    cat.add_precedence(fz_be, dh_unlock);
    cat.add_precedence(dh_lock, dh_unlock);

    let break_eg_fz = cat.add_move("D_Break_EG_Fz", Dof::Fz, d.d_break_eg, 'E', 'G')?;
    cat.add_precedence(fz_be, break_eg_fz);
    cat.add_precedence(dh_unlock, break_eg_fz);
    cat.add_precedence(mg_grip, break_eg_fz);
    let break_eg_pr = cat.add_task(
        "D_Break_EG_Pr",
        Dof::Pr,
        d.d_break_eg,
        'C',
        'C',
        OpType::Spin,
        Some('C'.into()),
        true,
    )?;
    cat.add_synchronization(break_eg_fz, break_eg_pr)?;

    let fz_gh = cat.add_move("D_Fz_GH", Dof::Fz, d.d_fz_gh, 'G', 'H')?;
    cat.add_precedence(break_eg_fz, fz_gh);

    let me_retract = cat.add_move("D_Me_Retract", Dof::Me, d.d_me_retract, 'B', 'A')?;
    cat.add_precedence(mg_grip, me_retract);
    let mr_retract = cat.add_move("D_Mr_Retract", Dof::Mr, d.d_mr_retract, 'B', 'A')?;
    cat.add_precedence(mr_assist, mr_retract);
    let me_store = cat.add_move("D_Me_Store", Dof::Me, d.d_me_store, 'A', 'B')?;
    cat.add_precedence(me_retract, me_store);
    let mg_release = cat.add_move("D_Mg_Release", Dof::Mg, d.d_mg_release, 'B', 'A')?;
    cat.add_precedence(me_store, mg_release);
    let me_back = cat.add_move("D_Me_Back", Dof::Me, d.d_me_back, 'B', 'A')?;
    cat.add_precedence(mg_release, me_back);

    let sr_reset = cat.add_task("D_Sr_Reset", Dof::Sr, d.d_sr_reset, 0u32, 0u32, OpType::Move, None, false)?;
    cat.add_precedence(me_back, sr_reset);
    cat.add_precedence(mr_retract, sr_reset);
    cat.add_precedence(fz_gh, sr_reset);

    Ok(Anchor::new(sr_reset))
}
