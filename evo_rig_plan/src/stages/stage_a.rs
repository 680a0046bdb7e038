//! Stage A: install the tool.
//!
//! Lifts the feed axis, ferries the tool from storage to the power head
//! via the two manipulator arms, makes up the joint (coupling, then
//! drilling, then breaking it back apart to clear the thread), and
//! returns home. Couplings, the drill itself, and the break each pair a
//! primary `Fz` motion with a synchronized `Pr` spin duplicate.

use crate::catalogue::Catalogue;
use crate::dof::Dof;
use crate::duration::DurationTable;
use crate::error::ModelError;
use crate::task::OpType;

use super::{chain, Anchor};

pub(super) fn build(cat: &mut Catalogue, d: &DurationTable) -> Result<Anchor, ModelError> {
    let fz_lift = cat.add_move("A_Fz_Lift", Dof::Fz, d.a_fz_ah, 'A', 'H')?;
    let fz_hg = cat.add_move("A_Fz_HG", Dof::Fz, d.a_fz_hg, 'H', 'G')?;
    cat.add_precedence(fz_lift, fz_hg);

    let me_store = cat.add_move("A_Me_Store", Dof::Me, d.a_me_to_store, 'A', 'B')?;
    let mg_grip = cat.add_move("A_Mg_Grip", Dof::Mg, d.a_mg_grip, 'A', 'B')?;
    let me_back = cat.add_move("A_Me_Back", Dof::Me, d.a_me_back, 'B', 'A')?;
    let mr_to_head = cat.add_move("A_Mr_ToHead", Dof::Mr, d.a_mr_to_head, 'A', 'B')?;
    let me_head = cat.add_move("A_Me_Head", Dof::Me, d.a_me_to_head, 'A', 'H')?;
    chain(cat, &[me_store, mg_grip, me_back, me_head]);
    cat.add_precedence(me_back, mr_to_head);
    cat.add_precedence(mr_to_head, me_head);
    cat.add_safety_delay(fz_lift, me_head, (3 * d.a_fz_ah) / 4);

    let couple_fz = cat.add_move("A_Couple_GE_Fz", Dof::Fz, d.a_couple_ge, 'G', 'E')?;
    cat.add_precedence(fz_hg, couple_fz);
    cat.add_precedence(me_head, couple_fz);
    let couple_pr = cat.add_task(
        "A_Couple_GE_Pr",
        Dof::Pr,
        d.a_couple_ge,
        'B',
        'B',
        OpType::Spin,
        Some('B'.into()),
        true,
    )?;
    cat.add_synchronization(couple_fz, couple_pr)?;

    let dh_lock = cat.add_move("A_Dh_Lock", Dof::Dh, d.a_dh_lock, 'A', 'B')?;
    cat.add_precedence(couple_fz, dh_lock);

    let mg_release = cat.add_move("A_Mg_Release", Dof::Mg, d.a_mg_release, 'B', 'A')?;
    let me_back_from_head = cat.add_move("A_Me_BackFromHead", Dof::Me, d.a_me_back_from_head, 'H', 'A')?;
    let mr_back_to_store = cat.add_move("A_Mr_BackToStore", Dof::Mr, d.a_mr_back_to_store, 'B', 'A')?;
    cat.add_precedence(dh_lock, mg_release);
    chain(cat, &[mg_release, me_back_from_head]);
    chain(cat, &[mr_to_head, mr_back_to_store]);
    cat.add_precedence(me_back_from_head, mr_back_to_store);

    let drill_fz = cat.add_move("A_Drill_Fz", Dof::Fz, d.a_drill, 'E', 'I')?;
    cat.add_precedence(dh_lock, drill_fz);
    let drill_pr = cat.add_task(
        "A_Drill_Pr",
        Dof::Pr,
        d.a_drill,
        'D',
        'D',
        OpType::Spin,
        Some('D'.into()),
        true,
    )?;
    cat.add_synchronization(drill_fz, drill_pr)?;

    let cb_clamp = cat.add_move("A_Cb_Clamp", Dof::Cb, d.a_cb_clamp, 'A', 'B')?;
    cat.add_precedence(drill_fz, cb_clamp);

    let dh_unlock = cat.add_move("A_Dh_Unlock", Dof::Dh, d.a_dh_unlock, 'B', 'A')?;
    cat.add_precedence(cb_clamp, dh_unlock);
    cat.add_precedence(dh_lock, dh_unlock);

    let break_fz = cat.add_move("A_Break_AC_Fz", Dof::Fz, d.a_break_ac, 'I', 'C')?;
    cat.add_precedence(dh_unlock, break_fz);
    let break_pr = cat.add_task(
        "A_Break_AC_Pr",
        Dof::Pr,
        d.a_break_ac,
        'C',
        'C',
        OpType::Spin,
        Some('C'.into()),
        true,
    )?;
    cat.add_synchronization(break_fz, break_pr)?;

    let fz_ch = cat.add_move("A_Fz_CH", Dof::Fz, d.a_fz_ch, 'C', 'H')?;
    cat.add_precedence(break_fz, fz_ch);
    cat.add_precedence(mr_back_to_store, fz_ch);

    Ok(Anchor::new(fz_ch))
}
