// tasklane/src/core/pause.rs

//! The pause capability a running task can use to suspend its own
//! completion signal.

use crate::exec::signal::Signal;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Pause capability handed to a running task through its `TaskContext`.
///
/// A task that calls `set_paused(true)` during `run` keeps its handle from
/// reporting as finished even after its own logic has returned, until an
/// external `set_paused(false)` releases it. There is no timeout on that
/// wait; callers must eventually resume or cancel. The resume gate is
/// one-shot per submission: once released, pausing again has no effect for
/// that task.
#[derive(Clone)]
pub struct Pauser {
  inner: Arc<PauseState>,
}

struct PauseState {
  paused: AtomicBool,
  resume: Signal,
}

impl Pauser {
  pub(crate) fn new(resume: Signal) -> Self {
    Pauser {
      inner: Arc::new(PauseState {
        paused: AtomicBool::new(false),
        resume,
      }),
    }
  }

  pub fn is_paused(&self) -> bool {
    self.inner.paused.load(Ordering::SeqCst)
  }

  pub fn set_paused(&self, paused: bool) {
    self.inner.paused.store(paused, Ordering::SeqCst);
    if !paused {
      self.inner.resume.open();
    }
  }
}
