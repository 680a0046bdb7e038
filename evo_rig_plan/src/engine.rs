//! Scheduling engine: resolves the constraint graph to concrete start
//! times and minimizes the makespan.
//!
//! The stage templates already totally order every DOF's own tasks via
//! precedence edges — the per-DOF mutex is satisfied by construction,
//! never by search. That means the makespan-minimal schedule is exactly
//! the earliest-start ("ASAP") fixed point of precedence, synchronization,
//! and safety-delay constraints: there is no real choice left to
//! optimize over. We compute that fixed point by relaxation, in the
//! manner of a longest-path sweep over the constraint graph, and then
//! check per-DOF non-overlap as a postcondition.

use tracing::{debug, instrument};

use crate::catalogue::Catalogue;
use crate::dof::Dof;
use crate::error::{ModelError, SolveError};
use crate::schedule::{ResolvedTask, Schedule};
use crate::task::TaskId;

/// Resolve `catalogue` to a makespan-minimal [`Schedule`].
#[instrument(skip_all, fields(tasks = catalogue.tasks().len()))]
pub fn solve(catalogue: &Catalogue) -> Result<Schedule, SolveError> {
    let n = catalogue.tasks().len();
    let mut start = vec![0i64; n];

    // Bellman-Ford-style relaxation: every edge is `start(to) >= start(from) + weight`.
    // Precedence and safety-delay edges are one-directional; a
    // synchronization pair contributes both directions with weight 0,
    // which forces equal starts without ever needing a separate
    // equality pass. A DAG of `n` tasks reaches its longest-path fixed
    // point in at most `n` relaxation rounds; if round `n` still
    // changes a value, the graph has a positive-weight cycle, which is
    // a stage-template authoring bug (precedence loop), not a runtime
    // condition.
    let mut converged = false;
    for _round in 0..=n {
        let mut changed = false;

        for p in catalogue.precedence() {
            let candidate = start[p.before.index()] + i64::from(catalogue.task(p.before).duration);
            if candidate > start[p.after.index()] {
                start[p.after.index()] = candidate;
                changed = true;
            }
        }

        for s in catalogue.synchronization() {
            let joint = start[s.a.index()].max(start[s.b.index()]);
            if joint > start[s.a.index()] {
                start[s.a.index()] = joint;
                changed = true;
            }
            if joint > start[s.b.index()] {
                start[s.b.index()] = joint;
                changed = true;
            }
        }

        for d in catalogue.safety_delay() {
            let candidate = start[d.trigger.index()] + i64::from(d.delay);
            if candidate > start[d.dependent.index()] {
                start[d.dependent.index()] = candidate;
                changed = true;
            }
        }

        if !changed {
            converged = true;
            break;
        }
    }

    if !converged {
        return Err(SolveError::Model(ModelError::PrecedenceCycle));
    }

    let horizon = i64::from(catalogue.horizon());
    let intervals: Vec<ResolvedTask> = catalogue
        .tasks()
        .iter()
        .enumerate()
        .map(|(i, task)| {
            let s = start[i];
            ResolvedTask {
                id: TaskId::from_index(i),
                start: s.try_into().unwrap_or(u32::MAX),
                end: (s + i64::from(task.duration)).try_into().unwrap_or(u32::MAX),
            }
        })
        .collect();

    if let Some(overflow) = intervals.iter().find(|t| i64::from(t.end) > horizon) {
        return Err(SolveError::Infeasible {
            reason: format!(
                "task {} ends at {} which exceeds horizon {}",
                catalogue.task(overflow.id).name,
                overflow.end,
                catalogue.horizon()
            ),
        });
    }

    check_no_overlap(catalogue, &intervals)?;

    let schedule = Schedule::new(intervals);
    debug!(makespan = schedule.makespan(), "solved schedule");
    Ok(schedule)
}

/// Verify the per-DOF non-overlap invariant. A violation can only mean
/// a stage template failed to serialize a DOF's own tasks — the
/// relaxation never "chooses" an overlapping placement.
fn check_no_overlap(catalogue: &Catalogue, intervals: &[ResolvedTask]) -> Result<(), SolveError> {
    for dof in Dof::ALL {
        let mut on_dof: Vec<ResolvedTask> = catalogue
            .ids_for_dof(dof)
            .map(|id| intervals[id.index()])
            .collect();
        on_dof.sort_by_key(|t| t.start);

        for pair in on_dof.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if a.end > b.start {
                return Err(SolveError::Infeasible {
                    reason: format!(
                        "DOF {dof} overlap: {} [{},{}) vs {} [{},{})",
                        catalogue.task(a.id).name,
                        a.start,
                        a.end,
                        catalogue.task(b.id).name,
                        b.start,
                        b.end,
                    ),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dof::Dof;

    #[test]
    fn single_precedence_edge_is_asap() {
        let mut cat = Catalogue::default();
        let a = cat.add_move("A", Dof::Fz, 5, 'A', 'H').unwrap();
        let b = cat.add_move("B", Dof::Fz, 3, 'H', 'G').unwrap();
        cat.add_precedence(a, b);

        let schedule = solve(&cat).unwrap();
        assert_eq!(schedule.interval(a).start, 0);
        assert_eq!(schedule.interval(b).start, 5);
        assert_eq!(schedule.makespan(), 8);
    }

    #[test]
    fn independent_dofs_run_in_parallel() {
        let mut cat = Catalogue::default();
        cat.add_move("A", Dof::Fz, 5, 'A', 'H').unwrap();
        cat.add_move("B", Dof::Me, 3, 'A', 'B').unwrap();

        let schedule = solve(&cat).unwrap();
        assert_eq!(schedule.makespan(), 5);
    }

    #[test]
    fn synchronization_forces_equal_start_and_end() {
        let mut cat = Catalogue::default();
        let a = cat.add_move("A", Dof::Fz, 5, 'A', 'H').unwrap();
        let b = cat.add_task("B", Dof::Pr, 5, 'A', 'B', crate::task::OpType::Spin, Some('B'.into()), true)
            .unwrap();
        cat.add_synchronization(a, b).unwrap();

        let schedule = solve(&cat).unwrap();
        assert_eq!(schedule.interval(a).start, schedule.interval(b).start);
        assert_eq!(schedule.interval(a).end, schedule.interval(b).end);
    }

    #[test]
    fn safety_delay_is_respected() {
        let mut cat = Catalogue::default();
        let lift = cat.add_move("Fz_Lift", Dof::Fz, 8, 'A', 'H').unwrap();
        let head = cat.add_move("Me_Head", Dof::Me, 5, 'A', 'B').unwrap();
        cat.add_safety_delay(lift, head, 6);

        let schedule = solve(&cat).unwrap();
        assert!(schedule.interval(head).start >= schedule.interval(lift).start + 6);
    }

    #[test]
    fn overlapping_same_dof_tasks_without_precedence_are_infeasible() {
        let mut cat = Catalogue::default();
        cat.add_move("A", Dof::Fz, 5, 'A', 'H').unwrap();
        cat.add_move("B", Dof::Fz, 5, 'A', 'H').unwrap();

        assert!(matches!(solve(&cat), Err(SolveError::Infeasible { .. })));
    }

    #[test]
    fn precedence_cycle_is_reported_as_model_error() {
        let mut cat = Catalogue::default();
        let a = cat.add_move("A", Dof::Fz, 5, 'A', 'H').unwrap();
        let b = cat.add_move("B", Dof::Me, 5, 'A', 'H').unwrap();
        cat.add_precedence(a, b);
        cat.add_precedence(b, a);

        assert!(matches!(
            solve(&cat),
            Err(SolveError::Model(ModelError::PrecedenceCycle))
        ));
    }
}
