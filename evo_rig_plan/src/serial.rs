//! Strict-serial simulator: an independent correctness oracle.
//!
//! Ignores precedence and safety-delay edges entirely and instead
//! concatenates tasks in catalogue-insertion order, one "segment" at a
//! time. A segment is either a single task or a synchronized pair
//! (always adjacent, since every stage template inserts a sync
//! duplicate immediately after its primary); its width is the max
//! duration of the tasks it contains. The resulting makespan is the
//! strict-serial baseline that the optimized schedule must never exceed.

use std::collections::HashMap;

use crate::catalogue::Catalogue;
use crate::dof::Dof;
use crate::schedule::{ResolvedTask, Schedule};
use crate::stages::Anchor;
use crate::task::TaskId;

/// The rig's carousel has seven physical slots; pipe index wraps around
/// them. Used only to tag carousel moves for the timeline strings below
/// — it has no bearing on the numeric `Sr` states the catalogue records.
const SR_POSITIONS: [char; 7] = ['A', 'B', 'C', 'D', 'E', 'F', 'G'];

fn sr_tag(index: u32) -> char {
    SR_POSITIONS[(index % 7) as usize]
}

/// Result of running the serial simulator over a catalogue.
pub struct SerialRun {
    pub schedule: Schedule,
    /// Per-DOF, a `→`-joined string of the states visited, in order.
    pub timelines: HashMap<Dof, String>,
    /// `[start, end)` of every concatenated segment, in emission order.
    pub segments: Vec<(u32, u32)>,
}

/// Concatenate every task in `catalogue` strictly in insertion order.
pub fn run(catalogue: &Catalogue) -> SerialRun {
    let tasks = catalogue.tasks();
    let sync_partner = sync_partners(catalogue);

    let mut resolved: Vec<Option<ResolvedTask>> = vec![None; tasks.len()];
    let mut segments = Vec::new();
    let mut cursor: u32 = 0;

    for i in 0..tasks.len() {
        if resolved[i].is_some() {
            continue;
        }

        let mut group = vec![TaskId::from_index(i)];
        if let Some(&partner) = sync_partner.get(&i) {
            if partner > i {
                group.push(TaskId::from_index(partner));
            }
        }

        let width = group.iter().map(|id| tasks[id.index()].duration).max().unwrap_or(0);
        let start = cursor;
        let end = cursor + width;
        for id in &group {
            resolved[id.index()] = Some(ResolvedTask { id: *id, start, end });
        }
        segments.push((start, end));
        cursor = end;
    }

    let intervals: Vec<ResolvedTask> = resolved.into_iter().map(|r| r.expect("every task assigned a segment")).collect();

    let mut timelines: HashMap<Dof, String> = HashMap::new();
    for dof in Dof::ALL {
        let mut steps = Vec::new();
        for id in catalogue.ids_for_dof(dof) {
            let task = catalogue.task(id);
            if steps.is_empty() {
                steps.push(task.start_state.glyph());
            }
            steps.push(task.end_state.glyph());
        }
        if dof == Dof::Sr {
            // Overlay the physical 7-slot carousel tag alongside the
            // logical pipe index already captured above.
            let tags: String = catalogue
                .ids_for_dof(dof)
                .filter_map(|id| match catalogue.task(id).end_state {
                    crate::task::SymbolicState::Index(i) => Some(sr_tag(i)),
                    crate::task::SymbolicState::Letter(_) => None,
                })
                .collect();
            if !tags.is_empty() {
                steps.push('/');
                steps.extend(tags.chars());
            }
        }
        let line = steps.iter().map(|c| c.to_string()).collect::<Vec<_>>().join("→");
        timelines.insert(dof, line);
    }

    SerialRun {
        schedule: Schedule::new(intervals),
        timelines,
        segments,
    }
}

/// `task index -> synchronized partner index`, both directions.
fn sync_partners(catalogue: &Catalogue) -> HashMap<usize, usize> {
    let mut map = HashMap::new();
    for s in catalogue.synchronization() {
        map.insert(s.a.index(), s.b.index());
        map.insert(s.b.index(), s.a.index());
    }
    map
}

/// Resolve an [`Anchor`]'s end time against an already-run serial result.
pub fn anchor_offset(run: &SerialRun, anchor: Anchor) -> u32 {
    run.schedule.interval(anchor.task_id()).end
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dof::Dof;

    #[test]
    fn serial_concatenates_in_insertion_order() {
        let mut cat = Catalogue::default();
        cat.add_move("A", Dof::Fz, 5, 'A', 'H').unwrap();
        cat.add_move("B", Dof::Me, 3, 'A', 'B').unwrap();

        let run = run(&cat);
        assert_eq!(run.schedule.makespan(), 8);
        assert_eq!(run.segments, vec![(0, 5), (5, 8)]);
    }

    #[test]
    fn synchronized_pair_forms_one_segment() {
        let mut cat = Catalogue::default();
        let a = cat.add_move("A", Dof::Fz, 5, 'A', 'H').unwrap();
        let b = cat
            .add_task("B", Dof::Pr, 5, 'A', 'B', crate::task::OpType::Spin, Some('B'.into()), true)
            .unwrap();
        cat.add_synchronization(a, b).unwrap();

        let run = run(&cat);
        assert_eq!(run.segments, vec![(0, 5)]);
        assert_eq!(run.schedule.makespan(), 5);
    }

    #[test]
    fn serial_total_is_never_smaller_than_optimized() {
        let mut cat = Catalogue::default();
        let durations = crate::duration::DurationTable::default();
        crate::stages::compose(&mut cat, &durations, 2).unwrap();

        let serial = run(&cat).schedule.makespan();
        let optimized = crate::engine::solve(&cat).unwrap().makespan();
        assert!(optimized <= serial);
    }
}
