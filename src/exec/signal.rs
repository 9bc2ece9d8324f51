// tasklane/src/exec/signal.rs

//! One-shot synchronization primitives used by execution handles: the
//! `Signal` gate a thread can block on until it opens, and the `Ticket` a
//! registry entry holds so a live task can be cancelled mid-flight.

use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Outcome of a cancellation-aware wait on a ticket gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WaitOutcome {
  /// The gate was opened by the other side of the handshake.
  Opened,
  /// The wait was released because the owning ticket was cancelled.
  Cancelled,
}

/// A one-shot gate. Starts closed; `open` releases every current and future
/// waiter. Opening an already open gate is a no-op.
#[derive(Clone)]
pub(crate) struct Signal {
  shared: Arc<SignalShared>,
}

struct SignalShared {
  opened: Mutex<bool>,
  cond: Condvar,
}

impl Signal {
  pub(crate) fn new() -> Self {
    Signal {
      shared: Arc::new(SignalShared {
        opened: Mutex::new(false),
        cond: Condvar::new(),
      }),
    }
  }

  pub(crate) fn open(&self) {
    let mut opened = self.shared.opened.lock();
    *opened = true;
    self.shared.cond.notify_all();
  }

  /// Blocks until the gate opens. The wait itself is unbounded; cancelling
  /// the owning ticket opens the gate, which is what keeps a parked handle
  /// from being stranded.
  fn wait(&self) {
    let mut opened = self.shared.opened.lock();
    while !*opened {
      self.shared.cond.wait(&mut opened);
    }
  }
}

/// The cancellable execution ticket stored in the orchestrator registry for
/// each live handle. Owns the cancelled flag and both one-shot gates of its
/// handle so that `cancel` can release whichever wait the handle is parked
/// on: the designated-done wait or the pause-resume wait.
#[derive(Clone)]
pub(crate) struct Ticket {
  cancelled: Arc<AtomicBool>,
  done: Signal,
  resume: Signal,
}

impl Ticket {
  pub(crate) fn new() -> Self {
    Ticket {
      cancelled: Arc::new(AtomicBool::new(false)),
      done: Signal::new(),
      resume: Signal::new(),
    }
  }

  /// Best-effort interrupt: marks the ticket cancelled and opens both gates
  /// so a blocked handle observes [`WaitOutcome::Cancelled`]. Task logic
  /// already past its waits only honors the interrupt if it polls
  /// `TaskContext::is_cancelled`.
  pub(crate) fn cancel(&self) {
    self.cancelled.store(true, Ordering::SeqCst);
    self.done.open();
    self.resume.open();
  }

  pub(crate) fn is_cancelled(&self) -> bool {
    self.cancelled.load(Ordering::SeqCst)
  }

  pub(crate) fn cancelled_flag(&self) -> Arc<AtomicBool> {
    Arc::clone(&self.cancelled)
  }

  /// Releases the lane thread blocked on the designated-done wait.
  pub(crate) fn open_done(&self) {
    self.done.open();
  }

  /// The resume gate a `Pauser` opens on `set_paused(false)`.
  pub(crate) fn resume_signal(&self) -> Signal {
    self.resume.clone()
  }

  pub(crate) fn wait_done(&self) -> WaitOutcome {
    self.done.wait();
    self.outcome()
  }

  pub(crate) fn wait_resume(&self) -> WaitOutcome {
    self.resume.wait();
    self.outcome()
  }

  fn outcome(&self) -> WaitOutcome {
    if self.is_cancelled() {
      WaitOutcome::Cancelled
    } else {
      WaitOutcome::Opened
    }
  }
}
