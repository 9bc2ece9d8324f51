// tasklane/src/chain/handle.rs

//! The execution handle: drives one queued task from submitted to
//! finished, enforcing the condition, affinity, and pause contracts.

use crate::chain::definition::{QueuedTask, Shared};
use crate::core::condition::Condition;
use crate::core::context::TaskContext;
use crate::core::pause::Pauser;
use crate::core::task::{Affinity, Task, TaskId};
use crate::error::ChainError;
use crate::exec::signal::{Ticket, WaitOutcome};
use parking_lot::Mutex;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{event, span, Level};

/// Wraps one task's in-flight execution. Runs on the worker lane; for
/// designated-affinity tasks the `run` itself is posted across while the
/// lane blocks on the done signal, which preserves submission ordering.
pub(crate) struct ExecutionHandle<T: Send + 'static> {
  shared: Arc<Shared<T>>,
  id: TaskId,
  affinity: Affinity,
  condition: Option<Box<dyn Condition>>,
  /// Taken while the task is executing on the designated context.
  task: Option<Box<dyn Task<T>>>,
  ticket: Ticket,
}

impl<T: Send + 'static> ExecutionHandle<T> {
  pub(crate) fn new(shared: Arc<Shared<T>>, queued: QueuedTask<T>, ticket: Ticket) -> Self {
    ExecutionHandle {
      shared,
      id: queued.id,
      affinity: queued.affinity,
      condition: queued.condition,
      task: Some(queued.task),
      ticket,
    }
  }

  /// The handle state machine: condition check, dispatch per affinity,
  /// pause wait, report.
  pub(crate) fn drive(mut self) {
    let exec_span = span!(Level::INFO, "task_execution", task = %self.id, affinity = ?self.affinity);
    let _guard = exec_span.enter();

    if self.ticket.is_cancelled() {
      event!(Level::DEBUG, "cancelled before dispatch");
      return;
    }

    if let Some(condition) = &self.condition {
      if !condition.should_execute() {
        event!(Level::INFO, "skipped by condition");
        // A skipped task still reports, overwriting the carried value with
        // its own never-produced result: skip clears the chain.
        Shared::task_finished(&self.shared, self.id, None);
        return;
      }
    }

    let previous = self.shared.previous.lock().take();
    let pauser = Pauser::new(self.ticket.resume_signal());
    let mut ctx = TaskContext::new(previous, pauser.clone(), self.ticket.cancelled_flag());

    let outcome = match self.affinity {
      Affinity::Worker => {
        let Some(task) = self.task.as_mut() else { return };
        run_caught(task.as_mut(), &mut ctx)
      }
      Affinity::Designated => match self.dispatch_designated(ctx) {
        Some(outcome) => outcome,
        None => {
          event!(Level::DEBUG, "cancelled while waiting on designated context");
          return;
        }
      },
    };

    let mut proceed = true;
    let result = match outcome {
      Ok(value) => {
        proceed = self.task.as_ref().map_or(true, |task| task.should_continue());
        Some(value)
      }
      Err(source) => {
        // A cancelled handle reports nothing, its abort error included.
        if self.ticket.is_cancelled() {
          event!(Level::DEBUG, error = %source, "cancelled task aborted; error discarded");
        } else {
          event!(Level::WARN, error = %source, "task failed");
          self.shared.errors.lock().push(ChainError::TaskFailed {
            task: self.id,
            source,
          });
        }
        None
      }
    };

    if pauser.is_paused() {
      event!(Level::DEBUG, "task paused; waiting for external resume");
      if self.ticket.wait_resume() == WaitOutcome::Cancelled {
        event!(Level::DEBUG, "cancelled while paused");
        return;
      }
    }

    Shared::task_finished(&self.shared, self.id, result);
    if !proceed {
      event!(Level::INFO, "task requested abort of remaining work");
      self.shared.cancel_all();
    }
  }

  /// Posts the task's `run` to the designated context and blocks the lane
  /// on the done signal. The signal is released even when the task errors,
  /// so the lane is never left parked. Returns `None` if the wait was
  /// released by cancellation; the posted job's outcome, if it ever
  /// materializes, is then discarded.
  fn dispatch_designated(&mut self, mut ctx: TaskContext<T>) -> Option<anyhow::Result<T>> {
    let mut task = self.task.take()?;
    let slot: Arc<Mutex<Option<(Box<dyn Task<T>>, anyhow::Result<T>)>>> = Arc::new(Mutex::new(None));
    let job_slot = Arc::clone(&slot);
    let ticket = self.ticket.clone();
    self.shared.designated.post(Box::new(move || {
      if ticket.is_cancelled() {
        return;
      }
      let outcome = run_caught(task.as_mut(), &mut ctx);
      *job_slot.lock() = Some((task, outcome));
      ticket.open_done();
    }));
    match self.ticket.wait_done() {
      WaitOutcome::Cancelled => None,
      WaitOutcome::Opened => {
        let (task, outcome) = slot.lock().take()?;
        self.task = Some(task);
        Some(outcome)
      }
    }
  }
}

/// Runs the task body, converting a panic into an ordinary task error so
/// the handle (and anything blocked on its done signal) always gets an
/// outcome.
fn run_caught<T: Send + 'static>(task: &mut dyn Task<T>, ctx: &mut TaskContext<T>) -> anyhow::Result<T> {
  match catch_unwind(AssertUnwindSafe(|| task.run(ctx))) {
    Ok(outcome) => outcome,
    Err(panic) => Err(anyhow::anyhow!("task panicked: {}", panic_message(panic.as_ref()))),
  }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> &str {
  if let Some(message) = panic.downcast_ref::<&'static str>() {
    message
  } else if let Some(message) = panic.downcast_ref::<String>() {
    message.as_str()
  } else {
    "<non-string panic payload>"
  }
}

