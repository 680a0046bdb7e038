//! Stage templates: pure functions that append tasks and constraints to
//! a [`Catalogue`] for one phase of the drilling cycle, and return an
//! [`Anchor`] the next stage can wait on.

mod stage_a;
mod stage_b;
mod stage_c;
mod stage_d;

use crate::catalogue::Catalogue;
use crate::duration::DurationTable;
use crate::error::ModelError;
use crate::task::TaskId;

/// Handle to a stage's final task, used as an inter-stage
/// "start-not-before" sequencing point and retained for Gantt cuts.
///
/// Deliberately not `Copy`-free-floating mutable state: each stage
/// builder consumes the anchor it needs and produces exactly one new
/// one for its successor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor(TaskId);

impl Anchor {
    fn new(id: TaskId) -> Self {
        Anchor(id)
    }

    /// The task whose resolved end time this anchor tracks.
    pub fn task_id(self) -> TaskId {
        self.0
    }
}

/// Constrain `task` to start no earlier than `anchor`'s end, when an
/// anchor is present (stage A has none).
fn anchor_start(cat: &mut Catalogue, task: TaskId, anchor: Option<Anchor>) {
    if let Some(anchor) = anchor {
        cat.add_precedence(anchor.task_id(), task);
    }
}

/// Chain `a ≺ b ≺ c ≺ ...`, i.e. add a precedence edge between every
/// consecutive pair. Used for the natural same-DOF ordering within a
/// stage's manipulator-arm choreography.
fn chain(cat: &mut Catalogue, ids: &[TaskId]) {
    for pair in ids.windows(2) {
        cat.add_precedence(pair[0], pair[1]);
    }
}

/// Build the full N-pipe cycle: `A; B(1..=N); C(N..=1); D`.
///
/// Returns the ordered list of stage-cut times is *not* computed here —
/// callers get the [`Anchor`] of each stage, from which [`Anchor::task_id`]
/// resolves to a concrete time only after `solve()`/`serial` runs.
pub fn compose(cat: &mut Catalogue, durations: &DurationTable, n_pipes: u32) -> Result<Vec<Anchor>, ModelError> {
    let mut cuts = Vec::with_capacity(n_pipes as usize * 2 + 2);

    let a = stage_a::build(cat, durations)?;
    cuts.push(a);

    let mut anchor = a;
    for i in 1..=n_pipes {
        anchor = stage_b::build(cat, durations, i, anchor)?;
        cuts.push(anchor);
    }
    for i in (1..=n_pipes).rev() {
        anchor = stage_c::build(cat, durations, i, anchor)?;
        cuts.push(anchor);
    }
    let d = stage_d::build(cat, durations, anchor)?;
    cuts.push(d);

    Ok(cuts)
}
