// tasklane/src/core/context.rs

//! The per-execution view handed to a task's `run`.

use crate::core::pause::Pauser;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// What a running task sees of the chain: the value carried over from the
/// previous task, the pause capability, and a cancellation probe.
pub struct TaskContext<T> {
  previous: Option<T>,
  pauser: Pauser,
  cancelled: Arc<AtomicBool>,
}

impl<T> TaskContext<T> {
  pub(crate) fn new(previous: Option<T>, pauser: Pauser, cancelled: Arc<AtomicBool>) -> Self {
    TaskContext {
      previous,
      pauser,
      cancelled,
    }
  }

  /// The result the previous task in the chain produced. `None` when this is
  /// the first task, or when the previous task failed or was skipped by its
  /// condition.
  pub fn previous(&self) -> Option<&T> {
    self.previous.as_ref()
  }

  /// Takes ownership of the carried value. The slot is rewritten with this
  /// task's own outcome when it finishes, so consuming the input here is
  /// safe.
  pub fn take_previous(&mut self) -> Option<T> {
    self.previous.take()
  }

  /// A clone of the pause capability. Task logic that wants to suspend its
  /// own completion stashes the clone somewhere an external party can reach
  /// to resume it later.
  pub fn pauser(&self) -> Pauser {
    self.pauser.clone()
  }

  /// Whether this task's ticket has been cancelled. Cancellation of a task
  /// already past its blocking waits is best-effort; long-running logic
  /// polls this to honor the interrupt.
  pub fn is_cancelled(&self) -> bool {
    self.cancelled.load(Ordering::SeqCst)
  }
}
