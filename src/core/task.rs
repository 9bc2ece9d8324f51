// tasklane/src/core/task.rs

//! The unit-of-work contract: the `Task` trait, its thread-affinity tag,
//! and the identifier handed back at submission time.

use crate::core::context::TaskContext;
use std::fmt;

/// Which execution context a task's `run` executes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Affinity {
  /// The general worker lane (the default).
  #[default]
  Worker,
  /// The single designated context (e.g. a host UI/main thread).
  Designated,
}

/// Identifier for a queued task, exposed through the builder returned by
/// `Chain::add_task` and accepted by `Chain::cancel_task`. Unique per chain,
/// never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub(crate) u64);

impl fmt::Display for TaskId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// A unit of work in a chain producing values of type `T`.
///
/// `run` is called at most once per submission. Returning `Err` records the
/// error in the chain's error sequence and the chain continues; the error
/// never propagates past the execution handle.
pub trait Task<T>: Send + 'static {
  fn run(&mut self, ctx: &mut TaskContext<T>) -> anyhow::Result<T>;

  /// Consulted once after a successful `run`. `false` is a signal, not an
  /// error: the orchestrator cancels every other in-flight and queued task.
  fn should_continue(&self) -> bool {
    true
  }
}

/// Any `FnMut` closure over the task context is a task.
impl<T, F> Task<T> for F
where
  F: FnMut(&mut TaskContext<T>) -> anyhow::Result<T> + Send + 'static,
{
  fn run(&mut self, ctx: &mut TaskContext<T>) -> anyhow::Result<T> {
    (self)(ctx)
  }
}
