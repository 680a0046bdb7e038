//! Makespan-minimal scheduling engine for the multi-DOF drill-pipe cycle.
//!
//! # Module Structure
//!
//! - [`dof`] - Mechanical axis identifiers
//! - [`task`] - Atomic task records and symbolic-state vocabulary
//! - [`duration`] - Duration table and its optional JSON overlay
//! - [`catalogue`] - Task catalogue and constraint recorder
//! - [`stages`] - Stage templates (A, B(i), C(i), D)
//! - [`engine`] - The scheduling engine (relaxation-based solver)
//! - [`serial`] - Strict-serial baseline oracle
//! - [`schedule`] - Resolved `[start, end)` intervals, shared by both
//! - [`gantt`] - ASCII Gantt renderer
//! - [`export`] - JSON schedule exporter
//! - [`error`] - Error taxonomy
//! - [`prelude`] - Common re-exports for convenience

pub mod catalogue;
pub mod dof;
pub mod duration;
pub mod engine;
pub mod error;
pub mod export;
pub mod gantt;
pub mod prelude;
pub mod schedule;
pub mod serial;
pub mod stages;
pub mod task;
