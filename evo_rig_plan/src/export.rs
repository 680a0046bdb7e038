//! JSON schedule exporter.

use serde::Serialize;

use crate::catalogue::Catalogue;
use crate::schedule::Schedule;
use crate::task::{OpType, SymbolicState};

/// One task's resolved interval, as emitted in the `tasks` array.
#[derive(Debug, Serialize)]
pub struct TaskRecord {
    pub id: usize,
    pub name: String,
    pub dof: String,
    pub start: u32,
    pub end: u32,
    pub duration: u32,
    pub start_state: String,
    pub end_state: String,
    pub op_type: &'static str,
}

/// Top-level export envelope: one schedule (optimized or serial),
/// annotated with the strict-serial baseline for comparison.
#[derive(Debug, Serialize)]
pub struct Envelope {
    pub mode: &'static str,
    pub n_pipes: u32,
    pub serial_time: u32,
    pub optimized_time: u32,
    pub saved_time: i64,
    pub stage_cuts: Vec<u32>,
    pub tasks: Vec<TaskRecord>,
}

fn op_type_name(op: OpType) -> &'static str {
    match op {
        OpType::Move => "move",
        OpType::Spin => "spin",
        OpType::Hold => "hold",
    }
}

fn state_string(state: SymbolicState) -> String {
    match state {
        SymbolicState::Letter(c) => c.to_string(),
        SymbolicState::Index(i) => i.to_string(),
    }
}

/// Build the export envelope for `mode` ("optimized" or "serial").
///
/// `schedule` supplies the intervals actually emitted as `tasks`;
/// `serial_time` is always the strict-serial baseline, regardless of
/// which schedule is being exported, so `saved_time` is meaningful in
/// both modes.
pub fn build(
    mode: &'static str,
    catalogue: &Catalogue,
    schedule: &Schedule,
    n_pipes: u32,
    serial_time: u32,
    stage_cuts: Vec<u32>,
) -> Envelope {
    let mut tasks: Vec<TaskRecord> = schedule
        .intervals()
        .iter()
        .map(|resolved| {
            let task = catalogue.task(resolved.id);
            TaskRecord {
                id: resolved.id.index(),
                name: task.name.clone(),
                dof: task.dof.name().to_string(),
                start: resolved.start,
                end: resolved.end,
                duration: task.duration,
                start_state: state_string(task.start_state),
                end_state: state_string(task.end_state),
                op_type: op_type_name(task.op_type),
            }
        })
        .collect();
    tasks.sort_by_key(|t| (t.start, t.dof.clone()));

    let optimized_time = schedule.makespan();
    Envelope {
        mode,
        n_pipes,
        serial_time,
        optimized_time,
        saved_time: i64::from(serial_time) - i64::from(optimized_time),
        stage_cuts,
        tasks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dof::Dof;
    use crate::engine;

    #[test]
    fn envelope_round_trips_through_serde_json() {
        let mut cat = Catalogue::default();
        cat.add_move("A", Dof::Fz, 5, 'A', 'H').unwrap();
        let schedule = engine::solve(&cat).unwrap();

        let envelope = build("optimized", &cat, &schedule, 0, 5, vec![5]);
        let json = serde_json::to_string(&envelope).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["mode"], "optimized");
        assert_eq!(parsed["tasks"][0]["name"], "A");
    }

    #[test]
    fn tasks_are_sorted_by_start_then_dof() {
        let mut cat = Catalogue::default();
        cat.add_move("Later", Dof::Me, 2, 'A', 'B').unwrap();
        cat.add_move("Earlier", Dof::Fz, 3, 'A', 'H').unwrap();
        let schedule = engine::solve(&cat).unwrap();

        let envelope = build("optimized", &cat, &schedule, 0, 3, vec![]);
        assert_eq!(envelope.tasks[0].name, "Earlier");
    }
}
