// tasklane/src/exec/lane.rs

//! The worker lane: a serial executor backed by a single named thread.

use crate::error::ChainError;
use std::io;
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};
use tracing::{event, Level};

pub(crate) type Job = Box<dyn FnOnce() + Send + 'static>;

/// A single-threaded serial executor. Jobs run strictly in submission order.
/// Dropping the lane closes the queue; the worker thread drains the jobs it
/// already accepted and then exits.
pub(crate) struct WorkerLane {
  sender: Sender<Job>,
  _worker: JoinHandle<()>,
}

impl WorkerLane {
  pub(crate) fn spawn() -> io::Result<Self> {
    let (sender, receiver) = mpsc::channel::<Job>();
    let worker = thread::Builder::new()
      .name("tasklane-worker".to_string())
      .spawn(move || {
        while let Ok(job) = receiver.recv() {
          job();
        }
        event!(Level::DEBUG, "worker lane thread exiting");
      })?;
    Ok(WorkerLane {
      sender,
      _worker: worker,
    })
  }

  pub(crate) fn submit(&self, job: Job) -> Result<(), ChainError> {
    self
      .sender
      .send(job)
      .map_err(|_| ChainError::SubmissionRejected {
        reason: "worker lane has shut down".to_string(),
      })
  }
}
