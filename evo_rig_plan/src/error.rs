//! Error taxonomy for the scheduling engine.
//!
//! `ConfigError` never escalates to a hard failure — a malformed overlay
//! file is logged and defaults are used. `ModelError` is a programming
//! bug surfaced at catalogue-construction time. `SolveError` wraps both
//! plus the engine's own infeasibility report.

use thiserror::Error;

/// Errors from loading the duration-table overlay file.
///
/// Malformed JSON or a non-object root are not represented here — they
/// are logged via `tracing::warn!` and fall back to the default table,
/// per the overlay's soft-failure contract. Only I/O failure is fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The overlay file could not be read.
    #[error("failed to read duration overlay {path}: {source}")]
    Io {
        /// Path that was attempted.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Violated precondition at task-catalogue construction time.
///
/// These are always stage-template authoring bugs, never user-facing
/// conditions — the catalogue is built once from a fixed set of templates.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// A task name was inserted twice.
    #[error("duplicate task name: {0}")]
    DuplicateTask(String),

    /// A synchronization pair had mismatched durations.
    #[error("synchronization pair {0} / {1} has mismatched durations ({2} != {3})")]
    SyncDurationMismatch(String, String, u32, u32),

    /// A constraint referenced a task id that was never created.
    #[error("constraint referenced unknown task id {0:?}")]
    UnknownTask(crate::task::TaskId),

    /// The precedence + synchronization graph contains a cycle, so no
    /// earliest-start fixed point exists.
    #[error("precedence graph contains a cycle: relaxation did not converge")]
    PrecedenceCycle,
}

/// Failure of the scheduling engine to produce a schedule.
#[derive(Debug, Error)]
pub enum SolveError {
    /// The constraint model itself was malformed.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// The relaxation converged but a postcondition (usually per-DOF
    /// non-overlap) does not hold, or convergence required more than the
    /// configured horizon.
    #[error("no feasible schedule: {reason}")]
    Infeasible {
        /// Human-readable explanation of what failed.
        reason: String,
    },
}
