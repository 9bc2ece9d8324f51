// tasklane/src/core/condition.rs

//! The guard capability consulted before a task runs.

/// Guard evaluated exactly once, immediately before its task would be
/// dispatched. Returning `false` skips the task entirely: its `run` is never
/// invoked and its handle finishes without error. Expected to be a pure
/// query with no side effects.
pub trait Condition: Send + 'static {
  fn should_execute(&self) -> bool;
}

/// Any boolean closure is a condition.
impl<F> Condition for F
where
  F: Fn() -> bool + Send + 'static,
{
  fn should_execute(&self) -> bool {
    (self)()
  }
}
