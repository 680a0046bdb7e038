//! End-to-end cycle tests.
//!
//! Verifies:
//! 1. Every N in {1, 2, 3, 5, 10} produces a feasible, non-overlapping schedule.
//! 2. The optimized makespan never exceeds the strict-serial baseline.
//! 3. Stage cuts match the expected count and the carousel visits 0..N..0.
//! 4. A duration overlay round-trips into the solved schedule.
//! 5. The JSON envelope carries a consistent saved_time.

use evo_rig_plan::catalogue::Catalogue;
use evo_rig_plan::dof::Dof;
use evo_rig_plan::duration::DurationTable;
use evo_rig_plan::task::SymbolicState;
use evo_rig_plan::{engine, export, serial, stages};

fn build_cycle(n_pipes: u32) -> (Catalogue, Vec<stages::Anchor>) {
    let durations = DurationTable::default();
    let mut catalogue = Catalogue::default();
    let cuts = stages::compose(&mut catalogue, &durations, n_pipes).expect("cycle assembly");
    (catalogue, cuts)
}

#[test]
fn every_pipe_count_yields_a_feasible_non_overlapping_schedule() {
    for n in [1, 2, 3, 5, 10] {
        let (catalogue, _) = build_cycle(n);
        let schedule = engine::solve(&catalogue).unwrap_or_else(|e| panic!("N={n} infeasible: {e}"));
        assert!(schedule.makespan() > 0);
    }
}

#[test]
fn optimized_makespan_never_exceeds_strict_serial_baseline() {
    for n in [1, 2, 3, 5, 10] {
        let (catalogue, _) = build_cycle(n);
        let optimized = engine::solve(&catalogue).unwrap().makespan();
        let serial_total = serial::run(&catalogue).schedule.makespan();
        assert!(
            optimized <= serial_total,
            "N={n}: optimized {optimized} > serial {serial_total}"
        );
    }
}

#[test]
fn single_pipe_cycle_saves_time_over_strict_serial() {
    let (catalogue, _) = build_cycle(1);
    let optimized = engine::solve(&catalogue).unwrap().makespan();
    let serial_total = serial::run(&catalogue).schedule.makespan();
    assert!(serial_total > optimized, "parallel manipulator arms should beat strict-serial");
}

#[test]
fn three_pipe_cycle_has_eight_stage_cuts() {
    let (_, cuts) = build_cycle(3);
    // A; B(1..=3); C(3..=1); D == 1 + 3 + 3 + 1 = 8 stages.
    assert_eq!(cuts.len(), 8);
}

#[test]
fn carousel_visits_every_pipe_index_then_returns_home() {
    let (catalogue, _) = build_cycle(3);
    let mut indices = Vec::new();
    for id in catalogue.ids_for_dof(Dof::Sr) {
        let task = catalogue.task(id);
        if task.name == "D_Sr_Reset" {
            continue;
        }
        if indices.is_empty() {
            if let SymbolicState::Index(i) = task.start_state {
                indices.push(i);
            }
        }
        if let SymbolicState::Index(i) = task.end_state {
            indices.push(i);
        }
    }
    assert_eq!(indices, vec![0, 1, 2, 3, 2, 1, 0]);
}

#[test]
fn safety_delay_between_fz_lift_and_me_head_is_three_quarters_truncated() {
    let durations = DurationTable::default();
    let mut catalogue = Catalogue::default();
    stages::compose(&mut catalogue, &durations, 1).unwrap();

    let lift = catalogue.id_of("A_Fz_Lift").unwrap();
    let head = catalogue.id_of("A_Me_Head").unwrap();
    let schedule = engine::solve(&catalogue).unwrap();

    let expected_delay = (3 * durations.a_fz_ah) / 4;
    assert!(schedule.interval(head).start >= schedule.interval(lift).start + expected_delay);
}

#[test]
fn serial_oracle_agrees_with_engine_on_a_two_pipe_cycle() {
    let (catalogue, _) = build_cycle(2);
    let serial_total = serial::run(&catalogue).schedule.makespan();
    assert_eq!(u64::from(serial_total), catalogue.serial_duration());
}

#[test]
fn too_small_horizon_is_reported_as_infeasible() {
    let durations = DurationTable::default();
    let mut catalogue = Catalogue::with_horizon(10);
    stages::compose(&mut catalogue, &durations, 2).unwrap();

    assert!(engine::solve(&catalogue).is_err());
}

#[test]
fn duration_overlay_changes_the_solved_drill_time() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("durations.json");
    std::fs::write(&path, r#"{"A_DRILL": 1}"#).unwrap();

    let durations = DurationTable::load(Some(&path)).unwrap();
    let mut catalogue = Catalogue::default();
    stages::compose(&mut catalogue, &durations, 0).unwrap();

    let drill = catalogue.id_of("A_Drill_Fz").unwrap();
    assert_eq!(catalogue.task(drill).duration, 1);
}

#[test]
fn json_envelope_saved_time_matches_serial_minus_optimized() {
    let (catalogue, cuts) = build_cycle(2);
    let serial_total = serial::run(&catalogue).schedule.makespan();
    let schedule = engine::solve(&catalogue).unwrap();
    let cut_times: Vec<u32> = cuts.iter().map(|a| schedule.interval(a.task_id()).end).collect();

    let envelope = export::build("optimized", &catalogue, &schedule, 2, serial_total, cut_times);
    assert_eq!(envelope.saved_time, i64::from(serial_total) - i64::from(schedule.makespan()));
    assert_eq!(envelope.stage_cuts.len(), 6);
}
