// tasklane/src/exec/mod.rs

//! Execution-context plumbing: the single worker lane, the designated
//! context abstraction, and the one-shot signals handles block on.

pub mod designated;
pub(crate) mod lane;
pub(crate) mod signal;

pub use designated::{DesignatedContext, ThreadDesignatedContext};
