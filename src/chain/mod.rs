// tasklane/src/chain/mod.rs

//! Defines the `Chain<T>` orchestrator: construction, queueing,
//! execution, and cancellation.

pub mod definition;
pub mod execution;
pub(crate) mod handle;

// Re-export the main Chain types
pub use definition::{Chain, Finisher, TaskBuilder};
