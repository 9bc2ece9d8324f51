// tasklane/src/exec/designated.rs

//! The designated execution context: the one long-lived thread certain
//! tasks' logic must be posted to (a host UI/main thread, typically).

use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread;
use tracing::{event, Level};

use super::lane::Job;

/// Post-and-run-later abstraction over the host's designated thread.
///
/// Hosts with a real main/UI thread implement this by forwarding `post` to
/// their runtime's dispatch mechanism. Posted jobs must eventually run: the
/// orchestrator blocks its worker lane on them, and only cancellation can
/// release that wait otherwise.
pub trait DesignatedContext: Send + Sync {
  fn post(&self, job: Box<dyn FnOnce() + Send + 'static>);
}

/// Default designated context backed by a plain named thread, for hosts
/// without a UI runtime (and for tests). The thread lives as long as any
/// handle to the context; jobs posted after every handle is gone are
/// dropped.
pub struct ThreadDesignatedContext {
  sender: Sender<Job>,
}

impl ThreadDesignatedContext {
  /// Spawns the designated thread.
  ///
  /// # Panics
  /// Panics if the thread cannot be spawned. That is a setup failure the
  /// host cannot recover from mid-run, so it is not surfaced as a result.
  pub fn spawn() -> Arc<Self> {
    let (sender, receiver) = mpsc::channel::<Job>();
    thread::Builder::new()
      .name("tasklane-designated".to_string())
      .spawn(move || {
        while let Ok(job) = receiver.recv() {
          job();
        }
        event!(Level::DEBUG, "designated context thread exiting");
      })
      .expect("tasklane setup error: failed to spawn designated context thread");
    Arc::new(ThreadDesignatedContext { sender })
  }
}

impl DesignatedContext for ThreadDesignatedContext {
  fn post(&self, job: Box<dyn FnOnce() + Send + 'static>) {
    if self.sender.send(job).is_err() {
      event!(Level::WARN, "designated context is gone; dropping posted job");
    }
  }
}
