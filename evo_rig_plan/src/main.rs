//! Drilling-rig cycle planner CLI.
//!
//! Loads a duration table, assembles the full N-pipe cycle, solves it,
//! runs the strict-serial oracle for comparison, and prints a banner,
//! the solved Gantt chart, and optionally a JSON export.

use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use tracing::info;

use evo_rig_plan::catalogue::Catalogue;
use evo_rig_plan::duration::DurationTable;
use evo_rig_plan::{engine, export, gantt, serial, stages};

/// Plan and render an optimized multi-pipe drilling cycle.
#[derive(Debug, Parser)]
#[command(name = "evo_rig_plan", about = "Makespan-minimal drilling-cycle planner")]
struct Args {
    /// Number of pipes to drive and retrieve.
    #[arg(value_name = "N_PIPES")]
    n_pipes: u32,

    /// Gantt chart columns per second.
    #[arg(long, default_value_t = 2)]
    zoom: u32,

    /// Optional JSON duration overlay file.
    #[arg(long, value_name = "PATH")]
    durations: Option<PathBuf>,

    /// Also emit the solved schedule as a JSON envelope.
    #[arg(long)]
    json: bool,
}

fn main() {
    tracing_subscriber::fmt().compact().init();
    let args = Args::parse();

    if args.n_pipes < 1 {
        eprintln!("n_pipes must be at least 1");
        std::process::exit(1);
    }

    info!(n_pipes = args.n_pipes, zoom = args.zoom, "evo_rig_plan starting");

    let durations = match DurationTable::load(args.durations.as_deref()) {
        Ok(d) => d,
        Err(err) => {
            eprintln!("failed to load durations: {err}");
            std::process::exit(1);
        }
    };

    let mut catalogue = Catalogue::default();
    let cuts = match stages::compose(&mut catalogue, &durations, args.n_pipes) {
        Ok(cuts) => cuts,
        Err(err) => {
            eprintln!("failed to assemble drilling cycle: {err}");
            std::process::exit(1);
        }
    };

    let serial_run = serial::run(&catalogue);
    let serial_time = serial_run.schedule.makespan();

    let started = Instant::now();
    let schedule = match engine::solve(&catalogue) {
        Ok(schedule) => schedule,
        Err(err) => {
            eprintln!("no feasible schedule: {err}");
            std::process::exit(1);
        }
    };
    let elapsed = started.elapsed();

    let optimized_time = schedule.makespan();
    let gain_pct = if serial_time > 0 {
        100.0 * (f64::from(serial_time) - f64::from(optimized_time)) / f64::from(serial_time)
    } else {
        0.0
    };

    println!("evo_rig_plan — N={} zoom={}", args.n_pipes, args.zoom);
    println!("solver wall time: {:.4} ms", elapsed.as_secs_f64() * 1000.0);
    println!("strict-serial total: {serial_time} s");
    println!("optimized makespan:  {optimized_time} s");
    println!("efficiency gain:     {gain_pct:.2}%");
    println!();

    let stage_cut_times: Vec<u32> = cuts.iter().map(|anchor| schedule.interval(anchor.task_id()).end).collect();
    println!("{}", gantt::render(&catalogue, &schedule, args.zoom, &stage_cut_times));

    if args.json {
        let envelope = export::build("optimized", &catalogue, &schedule, args.n_pipes, serial_time, stage_cut_times);
        match serde_json::to_string_pretty(&envelope) {
            Ok(json) => println!("{json}"),
            Err(err) => eprintln!("failed to serialize schedule: {err}"),
        }
    }
}
