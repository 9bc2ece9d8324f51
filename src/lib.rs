// tasklane/src/lib.rs

//! Tasklane: a sequential task-chaining orchestrator.
//!
//! Callers assemble an ordered list of tasks, each tagged with a thread
//! affinity (the general worker lane or the single designated context), an
//! optional guard condition, and optional pause control. The chain runs
//! them strictly in submission order, feeds each task's result to the
//! next, aggregates errors, supports mid-flight cancellation of one or all
//! tasks, and fires a completion callback exactly once when the whole
//! chain has settled.
//!
//! Core pieces:
//!  - [`Task`]: the unit-of-work contract (any suitable closure works).
//!  - [`Condition`]: a guard consulted once before a task runs.
//!  - [`Pauser`]: lets a running task suspend its own completion signal.
//!  - [`Chain`]: owns the queue, the live-handle registry, the error
//!    accumulator, the previous-result slot, and the finisher.
//!  - [`DesignatedContext`]: the host hook for the one special thread
//!    designated-affinity tasks must run on.

pub mod chain;
pub mod core;
pub mod error;
pub mod exec;

// --- Re-exports for the Public API ---

pub use crate::chain::definition::{Chain, Finisher, TaskBuilder};
pub use crate::core::condition::Condition;
pub use crate::core::context::TaskContext;
pub use crate::core::pause::Pauser;
pub use crate::core::task::{Affinity, Task, TaskId};
pub use crate::error::ChainError;
pub use crate::exec::designated::{DesignatedContext, ThreadDesignatedContext};
