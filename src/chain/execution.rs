// tasklane/src/chain/execution.rs

//! Contains `Chain::run` and the cancellation entry points, plus the
//! shared finish-of-run path every handle reports through.

use crate::chain::definition::{Chain, Shared};
use crate::chain::handle::ExecutionHandle;
use crate::core::task::TaskId;
use crate::exec::lane::WorkerLane;
use crate::exec::signal::Ticket;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{event, instrument, Level};

impl<T: Send + 'static> Chain<T> {
  /// Submits every queued task to the worker lane, in order. The whole
  /// batch is registered in the live-handle registry before anything is
  /// submitted, so the registry cannot empty (and settle the run) while
  /// later tasks are still on their way in. The lane is lazily
  /// (re)spawned if a previous cycle shut it down.
  ///
  /// Returns `false` only if submission itself fails; individual task
  /// failures are reported through the finisher instead. The queue is
  /// cleared whether or not submission succeeds.
  #[instrument(name = "Chain::run", skip_all, fields(num_tasks = self.queue.len()))]
  pub fn run(&mut self) -> bool {
    // A fresh cycle starts with a fresh error sequence.
    if self.shared.registry.lock().is_empty() {
      self.shared.errors.lock().clear();
    }

    let queued = std::mem::take(&mut self.queue);

    let mut lane_slot = self.shared.lane.lock();
    if lane_slot.is_none() {
      match WorkerLane::spawn() {
        Ok(lane) => *lane_slot = Some(lane),
        Err(err) => {
          event!(Level::ERROR, error = %err, "failed to spawn worker lane");
          return false;
        }
      }
    }
    let Some(lane) = lane_slot.as_ref() else {
      return false;
    };

    // Register every ticket up front: a fast first task finishing before
    // a later ticket lands would otherwise see an empty registry and fire
    // the finisher mid-submission.
    let mut batch = Vec::with_capacity(queued.len());
    {
      let mut registry = self.shared.registry.lock();
      for queued_task in queued {
        let ticket = Ticket::new();
        registry.insert(queued_task.id, ticket.clone());
        batch.push((queued_task, ticket));
      }
    }
    let ids: Vec<TaskId> = batch.iter().map(|(queued_task, _)| queued_task.id).collect();

    for (queued_task, ticket) in batch {
      let id = queued_task.id;
      let shared = Arc::clone(&self.shared);
      let job = Box::new(move || ExecutionHandle::new(shared, queued_task, ticket).drive());
      if let Err(err) = lane.submit(job) {
        event!(Level::ERROR, task = %id, error = %err, "worker lane rejected submission");
        // Roll the whole batch back so the dead cycle can never report.
        let mut registry = self.shared.registry.lock();
        for id in &ids {
          if let Some(ticket) = registry.remove(id) {
            ticket.cancel();
          }
        }
        return false;
      }
      event!(Level::DEBUG, task = %id, "task submitted");
    }
    true
  }

  /// Cancels the live handle wrapping the given task: best-effort
  /// interrupt of its ticket, removal from the registry. Returns whether a
  /// live match was found; a task not yet submitted, already finished, or
  /// already cancelled yields `false`.
  pub fn cancel_task(&self, task: TaskId) -> bool {
    let ticket = self.shared.registry.lock().remove(&task);
    match ticket {
      Some(ticket) => {
        ticket.cancel();
        event!(Level::INFO, task = %task, "task cancelled");
        true
      }
      None => false,
    }
  }

  /// Cancels every live handle, clears the registry, and shuts the worker
  /// lane down; the next `run` recreates it. The completion callback is not
  /// invoked for a run torn down this way.
  pub fn cancel_all(&self) {
    self.shared.cancel_all();
  }
}

impl<T: Send + 'static> Shared<T> {
  pub(crate) fn cancel_all(&self) {
    let tickets: Vec<Ticket> = self.registry.lock().drain().map(|(_, ticket)| ticket).collect();
    event!(Level::INFO, count = tickets.len(), "cancelling all live tasks");
    for ticket in &tickets {
      ticket.cancel();
    }
    // Jobs still queued in the lane see their cancelled tickets and abort;
    // dropping the lane closes the queue to anything further.
    *self.lane.lock() = None;
  }

  /// The finish path every handle reports through at most once. Cancelled
  /// handles never reach it live: their registry entry is already gone, so
  /// their outcome is discarded here.
  pub(crate) fn task_finished(this: &Arc<Self>, id: TaskId, result: Option<T>) {
    let (was_live, now_empty) = {
      let mut registry = this.registry.lock();
      let was_live = registry.remove(&id).is_some();
      (was_live, registry.is_empty())
    };
    if !was_live {
      event!(Level::DEBUG, task = %id, "finished after cancellation; outcome discarded");
      return;
    }
    *this.previous.lock() = result;
    if now_empty {
      Self::finish_run(this);
    }
  }

  /// The registry emptied: the run has settled. Shuts the idle lane down
  /// and fires the finisher on the designated context with the drained
  /// error sequence.
  fn finish_run(this: &Arc<Self>) {
    event!(Level::INFO, "chain settled; no live tasks remain");
    *this.lane.lock() = None;
    if this.finisher.lock().is_none() {
      return;
    }
    let errors = std::mem::take(&mut *this.errors.lock());
    let shared = Arc::clone(this);
    this.designated.post(Box::new(move || {
      let mut slot = shared.finisher.lock();
      let Some(finisher) = slot.as_mut() else {
        return;
      };
      // A finisher that panics must not take the reporting path down with it.
      if catch_unwind(AssertUnwindSafe(|| finisher(errors))).is_err() {
        event!(Level::ERROR, "finisher panicked; error report lost");
      }
    }));
  }
}
