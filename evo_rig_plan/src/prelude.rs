//! Prelude module for common re-exports.
//!
//! ```rust
//! use evo_rig_plan::prelude::*;
//! ```

// ─── Domain model ───────────────────────────────────────────────────
pub use crate::catalogue::Catalogue;
pub use crate::dof::Dof;
pub use crate::task::{OpType, SymbolicState, Task, TaskId};

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::duration::DurationTable;

// ─── Scheduling ─────────────────────────────────────────────────────
pub use crate::schedule::{ResolvedTask, Schedule};
pub use crate::stages::{compose, Anchor};

// ─── Errors ─────────────────────────────────────────────────────────
pub use crate::error::{ConfigError, ModelError, SolveError};
