// tasklane/src/chain/definition.rs

//! Contains the `Chain<T>` struct definition and the queueing API: adding
//! tasks, attaching conditions through the returned builder, and
//! registering the finisher.

use crate::core::condition::Condition;
use crate::core::task::{Affinity, Task, TaskId};
use crate::error::ChainError;
use crate::exec::designated::{DesignatedContext, ThreadDesignatedContext};
use crate::exec::lane::WorkerLane;
use crate::exec::signal::Ticket;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{event, Level};

/// Completion callback, invoked on the designated context with the error
/// sequence accumulated over the run.
pub type Finisher = Box<dyn FnMut(Vec<ChainError>) + Send + 'static>;

/// A queued unit of work waiting for `Chain::run`.
pub(crate) struct QueuedTask<T> {
  pub(crate) id: TaskId,
  pub(crate) task: Box<dyn Task<T>>,
  pub(crate) affinity: Affinity,
  pub(crate) condition: Option<Box<dyn Condition>>,
}

/// State shared between the chain, its in-flight execution handles, and any
/// thread issuing cancellations.
pub(crate) struct Shared<T> {
  /// Live-handle registry. Emptiness is the sole completion signal.
  pub(crate) registry: Mutex<HashMap<TaskId, Ticket>>,
  /// Append-only error sequence for the current run cycle.
  pub(crate) errors: Mutex<Vec<ChainError>>,
  /// The most recently produced result. Not a queue: a single slot is
  /// enough because exactly one task finishes before the next one starts
  /// on the single lane.
  pub(crate) previous: Mutex<Option<T>>,
  pub(crate) finisher: Mutex<Option<Finisher>>,
  pub(crate) lane: Mutex<Option<WorkerLane>>,
  pub(crate) designated: Arc<dyn DesignatedContext>,
}

/// The task-chaining orchestrator.
///
/// Tasks are appended in order, then `run` submits them all to a
/// single-lane worker so they execute strictly in submission order, each
/// receiving the previous task's result through its [`TaskContext`].
/// Designated-affinity tasks execute on the designated context while the
/// lane blocks, so ordering holds across affinities.
///
/// `T` is the value type carried along the chain.
///
/// [`TaskContext`]: crate::core::context::TaskContext
pub struct Chain<T: Send + 'static> {
  pub(crate) shared: Arc<Shared<T>>,
  pub(crate) queue: Vec<QueuedTask<T>>,
  next_id: u64,
}

impl<T: Send + 'static> Chain<T> {
  /// Creates a chain with a thread-backed designated context.
  pub fn new() -> Self {
    Self::with_designated_context(ThreadDesignatedContext::spawn())
  }

  /// Creates a chain that posts designated-affinity tasks (and the
  /// finisher) to the given host context.
  pub fn with_designated_context(designated: Arc<dyn DesignatedContext>) -> Self {
    Chain {
      shared: Arc::new(Shared {
        registry: Mutex::new(HashMap::new()),
        errors: Mutex::new(Vec::new()),
        previous: Mutex::new(None),
        finisher: Mutex::new(None),
        lane: Mutex::new(None),
        designated,
      }),
      queue: Vec::new(),
      next_id: 0,
    }
  }

  /// Appends a worker-affinity task. The returned builder attaches
  /// per-task options and exposes the [`TaskId`] used for cancellation.
  pub fn add_task(&mut self, task: impl Task<T>) -> TaskBuilder<'_, T> {
    self.push(Box::new(task), Affinity::Worker)
  }

  /// Appends a task whose `run` executes on the designated context.
  pub fn add_designated_task(&mut self, task: impl Task<T>) -> TaskBuilder<'_, T> {
    self.push(Box::new(task), Affinity::Designated)
  }

  fn push(&mut self, task: Box<dyn Task<T>>, affinity: Affinity) -> TaskBuilder<'_, T> {
    let id = TaskId(self.next_id);
    self.next_id += 1;
    self.queue.push(QueuedTask {
      id,
      task,
      affinity,
      condition: None,
    });
    event!(Level::DEBUG, task = %id, affinity = ?affinity, "task queued");
    let index = self.queue.len() - 1;
    TaskBuilder { chain: self, index }
  }

  /// Registers the completion callback. At most one is active; registering
  /// again replaces the previous one.
  pub fn add_finisher(&mut self, finisher: impl FnMut(Vec<ChainError>) + Send + 'static) -> &mut Self {
    *self.shared.finisher.lock() = Some(Box::new(finisher));
    self
  }
}

impl<T: Send + 'static> Default for Chain<T> {
  fn default() -> Self {
    Self::new()
  }
}

/// Builder handle for the most recently appended task, returned by
/// [`Chain::add_task`] and [`Chain::add_designated_task`].
pub struct TaskBuilder<'chain, T: Send + 'static> {
  chain: &'chain mut Chain<T>,
  index: usize,
}

impl<'chain, T: Send + 'static> TaskBuilder<'chain, T> {
  /// Attaches a guard condition; the task runs only if it returns `true`.
  pub fn with_condition(self, condition: impl Condition) -> Self {
    self.chain.queue[self.index].condition = Some(Box::new(condition));
    self
  }

  /// The identifier to pass to [`Chain::cancel_task`].
  pub fn id(&self) -> TaskId {
    self.chain.queue[self.index].id
  }
}
