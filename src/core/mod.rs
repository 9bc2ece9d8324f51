// tasklane/src/core/mod.rs

pub mod condition;
pub mod context;
pub mod pause;
pub mod task;

// Re-export key types for easier access from other modules (and lib.rs)
pub use condition::Condition;
pub use context::TaskContext;
pub use pause::Pauser;
pub use task::{Affinity, Task, TaskId};
