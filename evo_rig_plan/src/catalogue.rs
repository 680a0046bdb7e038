//! Task catalogue and constraint recorder.
//!
//! Stage templates (`crate::stages`) are the only callers: they build up
//! a [`Catalogue`] by adding tasks and constraint edges, then hand it to
//! [`crate::engine::solve`] or [`crate::serial`].

use std::collections::HashMap;

use crate::dof::Dof;
use crate::error::ModelError;
use crate::task::{OpType, SymbolicState, Task, TaskId};

/// Default start-domain upper bound for every task interval, in seconds.
///
/// Not a hard contract — [`Catalogue::with_horizon`] raises it for larger
/// N. A too-small horizon surfaces as [`crate::error::SolveError::Infeasible`].
pub const DEFAULT_HORIZON: u32 = 2000;

/// A precedence edge `u ≺ v`: `start(v) ≥ end(u)`.
#[derive(Debug, Clone, Copy)]
pub struct Precedence {
    pub before: TaskId,
    pub after: TaskId,
}

/// A synchronization pair `u ≡ v`: identical start and end times.
#[derive(Debug, Clone, Copy)]
pub struct Synchronization {
    pub a: TaskId,
    pub b: TaskId,
}

/// A safety-delay triple: `start(dependent) ≥ start(trigger) + delay`.
#[derive(Debug, Clone, Copy)]
pub struct SafetyDelay {
    pub trigger: TaskId,
    pub dependent: TaskId,
    pub delay: u32,
}

/// Owning collection of atomic tasks plus the constraint edges over them.
///
/// Tasks are appended once during stage assembly and never mutated.
#[derive(Debug, Clone)]
pub struct Catalogue {
    tasks: Vec<Task>,
    by_name: HashMap<String, TaskId>,
    precedence: Vec<Precedence>,
    synchronization: Vec<Synchronization>,
    safety_delay: Vec<SafetyDelay>,
    serial_duration: u64,
    horizon: u32,
}

impl Default for Catalogue {
    fn default() -> Self {
        Self::with_horizon(DEFAULT_HORIZON)
    }
}

impl Catalogue {
    /// Create an empty catalogue with an explicit horizon.
    pub fn with_horizon(horizon: u32) -> Self {
        Self {
            tasks: Vec::new(),
            by_name: HashMap::new(),
            precedence: Vec::new(),
            synchronization: Vec::new(),
            safety_delay: Vec::new(),
            serial_duration: 0,
            horizon,
        }
    }

    /// Configured horizon (upper bound of every task's start domain).
    pub fn horizon(&self) -> u32 {
        self.horizon
    }

    /// Append a new atomic task.
    ///
    /// `duration` must be `> 0` and `name` must not already be present;
    /// both are stage-template authoring invariants, so violations are
    /// reported as [`ModelError`] rather than panics.
    #[allow(clippy::too_many_arguments)]
    pub fn add_task(
        &mut self,
        name: impl Into<String>,
        dof: Dof,
        duration: u32,
        start_state: impl Into<SymbolicState>,
        end_state: impl Into<SymbolicState>,
        op_type: OpType,
        mid_state: Option<SymbolicState>,
        is_sync_duplicate: bool,
    ) -> Result<TaskId, ModelError> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(ModelError::DuplicateTask(name));
        }
        debug_assert!(duration > 0, "task {name} has zero duration");

        let start_state = start_state.into();
        let end_state = end_state.into();
        let task = Task {
            name: name.clone(),
            dof,
            duration,
            start_state,
            end_state,
            mid_state: mid_state.unwrap_or(end_state),
            op_type,
            is_sync_duplicate,
        };

        if !is_sync_duplicate {
            self.serial_duration += u64::from(duration);
        }

        let id = TaskId(self.tasks.len());
        self.tasks.push(task);
        self.by_name.insert(name, id);
        Ok(id)
    }

    /// Convenience wrapper for the common `move` op-type with no
    /// distinct mid-state.
    pub fn add_move(
        &mut self,
        name: impl Into<String>,
        dof: Dof,
        duration: u32,
        start_state: impl Into<SymbolicState>,
        end_state: impl Into<SymbolicState>,
    ) -> Result<TaskId, ModelError> {
        self.add_task(name, dof, duration, start_state, end_state, OpType::Move, None, false)
    }

    /// Record `before ≺ after`. No-ops (defensively) if either id is not
    /// present in this catalogue — never expected from correct callers.
    pub fn add_precedence(&mut self, before: TaskId, after: TaskId) {
        if self.is_valid(before) && self.is_valid(after) {
            self.precedence.push(Precedence { before, after });
        }
    }

    /// Record `a ≡ b`: equal start and equal end times.
    ///
    /// Fails if either id is not present in this catalogue, or if the
    /// two tasks do not already have equal durations — a synchronized
    /// pair is defined to run for the same span.
    pub fn add_synchronization(&mut self, a: TaskId, b: TaskId) -> Result<(), ModelError> {
        if !self.is_valid(a) {
            return Err(ModelError::UnknownTask(a));
        }
        if !self.is_valid(b) {
            return Err(ModelError::UnknownTask(b));
        }
        let (ta, tb) = (&self.tasks[a.index()], &self.tasks[b.index()]);
        if ta.duration != tb.duration {
            return Err(ModelError::SyncDurationMismatch(
                ta.name.clone(),
                tb.name.clone(),
                ta.duration,
                tb.duration,
            ));
        }
        self.synchronization.push(Synchronization { a, b });
        Ok(())
    }

    /// Record `start(dependent) ≥ start(trigger) + delay`.
    pub fn add_safety_delay(&mut self, trigger: TaskId, dependent: TaskId, delay: u32) {
        self.safety_delay.push(SafetyDelay {
            trigger,
            dependent,
            delay,
        });
    }

    fn is_valid(&self, id: TaskId) -> bool {
        id.index() < self.tasks.len()
    }

    /// All tasks, in catalogue-insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Look up a task by its stable id.
    pub fn task(&self, id: TaskId) -> &Task {
        &self.tasks[id.index()]
    }

    /// Look up a task id by name.
    pub fn id_of(&self, name: &str) -> Option<TaskId> {
        self.by_name.get(name).copied()
    }

    pub fn precedence(&self) -> &[Precedence] {
        &self.precedence
    }

    pub fn synchronization(&self) -> &[Synchronization] {
        &self.synchronization
    }

    pub fn safety_delay(&self) -> &[SafetyDelay] {
        &self.safety_delay
    }

    /// Sum of durations of every non-sync-duplicate task.
    pub fn serial_duration(&self) -> u64 {
        self.serial_duration
    }

    /// All task ids sharing a given DOF, in insertion order.
    pub fn ids_for_dof(&self, dof: Dof) -> impl Iterator<Item = TaskId> + '_ {
        self.tasks
            .iter()
            .enumerate()
            .filter(move |(_, t)| t.dof == dof)
            .map(|(i, _)| TaskId(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_name_is_rejected() {
        let mut cat = Catalogue::default();
        cat.add_move("X", Dof::Fz, 1, 'A', 'H').unwrap();
        let err = cat.add_move("X", Dof::Fz, 1, 'H', 'A').unwrap_err();
        assert_eq!(err, ModelError::DuplicateTask("X".into()));
    }

    #[test]
    fn sync_requires_matching_durations() {
        let mut cat = Catalogue::default();
        let a = cat.add_move("A", Dof::Fz, 5, 'A', 'H').unwrap();
        let b = cat.add_move("B", Dof::Pr, 3, 'A', 'B').unwrap();
        assert!(cat.add_synchronization(a, b).is_err());
    }

    #[test]
    fn sync_with_unknown_task_id_is_rejected() {
        let mut cat = Catalogue::default();
        let a = cat.add_move("A", Dof::Fz, 5, 'A', 'H').unwrap();
        let bogus = TaskId::from_index(a.index() + 1);
        assert_eq!(cat.add_synchronization(a, bogus).unwrap_err(), ModelError::UnknownTask(bogus));
    }

    #[test]
    fn serial_duration_excludes_sync_duplicates() {
        let mut cat = Catalogue::default();
        cat.add_task("A", Dof::Fz, 5, 'A', 'H', OpType::Move, None, false)
            .unwrap();
        cat.add_task("A_dup", Dof::Pr, 5, 'A', 'B', OpType::Spin, Some('B'.into()), true)
            .unwrap();
        assert_eq!(cat.serial_duration(), 5);
    }
}
