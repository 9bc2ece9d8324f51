// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use std::sync::{Arc, Mutex};
use tasklane::{Chain, ChainError, Pauser, Task, TaskContext};
use tracing::Level;

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

/// Generous ceiling for waits that must succeed.
pub const FINISH_WAIT: Duration = Duration::from_secs(5);
/// How long to let the chain idle before concluding nothing more happens.
pub const SETTLE_WAIT: Duration = Duration::from_millis(300);

/// Shared log the test tasks append to, so ordering can be asserted.
pub type Log = Arc<Mutex<Vec<String>>>;

pub fn new_log() -> Log {
  Arc::new(Mutex::new(Vec::new()))
}

pub fn log_entries(log: &Log) -> Vec<String> {
  log.lock().unwrap().clone()
}

/// Wires a finisher that forwards the error sequence through a channel the
/// test can block on.
pub fn channel_finisher<T: Send + 'static>(chain: &mut Chain<T>) -> Receiver<Vec<ChainError>> {
  let (tx, rx) = mpsc::channel();
  chain.add_finisher(move |errors| {
    tx.send(errors).ok();
  });
  rx
}

/// A task that records its label and the carried value it saw, then
/// produces its own value.
pub fn recording_task(
  label: &'static str,
  value: &'static str,
  log: Log,
) -> impl FnMut(&mut TaskContext<String>) -> anyhow::Result<String> + Send + 'static {
  move |ctx| {
    log.lock().unwrap().push(format!("{label} prev={:?}", ctx.previous()));
    Ok(value.to_string())
  }
}

/// A task that records its label, then fails.
pub fn failing_task(
  label: &'static str,
  message: &'static str,
  log: Log,
) -> impl FnMut(&mut TaskContext<String>) -> anyhow::Result<String> + Send + 'static {
  move |_ctx| {
    log.lock().unwrap().push(label.to_string());
    anyhow::bail!(message)
  }
}

/// A task that blocks until the test releases it, for deterministic
/// mid-flight cancellation scenarios.
pub fn gated_task(
  label: &'static str,
  gate: Receiver<()>,
  log: Log,
) -> impl FnMut(&mut TaskContext<String>) -> anyhow::Result<String> + Send + 'static {
  move |_ctx| {
    gate.recv().ok();
    log.lock().unwrap().push(label.to_string());
    Ok(label.to_string())
  }
}

/// Like [`gated_task`], but announces it has started before blocking, so
/// tests can synchronize on the task actually being mid-execution.
pub fn gated_task_with_start(
  label: &'static str,
  started: mpsc::Sender<()>,
  gate: Receiver<()>,
  log: Log,
) -> impl FnMut(&mut TaskContext<String>) -> anyhow::Result<String> + Send + 'static {
  move |_ctx| {
    started.send(()).ok();
    gate.recv().ok();
    log.lock().unwrap().push(label.to_string());
    Ok(label.to_string())
  }
}

/// A task that records the name of the thread it actually ran on.
pub fn thread_naming_task(
  label: &'static str,
  log: Log,
) -> impl FnMut(&mut TaskContext<String>) -> anyhow::Result<String> + Send + 'static {
  move |_ctx| {
    let name = std::thread::current().name().unwrap_or("<unnamed>").to_string();
    log.lock().unwrap().push(format!("{label}@{name}"));
    Ok(label.to_string())
  }
}

/// Where a pausing task publishes its pauser so the test can resume it.
pub type PauserCell = Arc<Mutex<Option<Pauser>>>;

/// A task that pauses itself before returning, handing its pauser out
/// through the cell.
pub fn pausing_task(
  label: &'static str,
  cell: PauserCell,
  log: Log,
) -> impl FnMut(&mut TaskContext<String>) -> anyhow::Result<String> + Send + 'static {
  move |ctx| {
    let pauser = ctx.pauser();
    pauser.set_paused(true);
    *cell.lock().unwrap() = Some(pauser);
    log.lock().unwrap().push(label.to_string());
    Ok(label.to_string())
  }
}

/// A task that announces it has started, then spins until its ticket is
/// cancelled, then aborts. Exercises interruption-aware unit logic.
pub fn polling_task(
  label: &'static str,
  started: mpsc::Sender<()>,
  log: Log,
) -> impl FnMut(&mut TaskContext<String>) -> anyhow::Result<String> + Send + 'static {
  move |ctx| {
    started.send(()).ok();
    let deadline = Instant::now() + FINISH_WAIT;
    while !ctx.is_cancelled() {
      assert!(Instant::now() < deadline, "cancellation flag never flipped");
      std::thread::sleep(Duration::from_millis(5));
    }
    log.lock().unwrap().push(format!("{label} aborted"));
    anyhow::bail!("{label} aborted")
  }
}

pub fn wait_for_pauser(cell: &PauserCell) -> Pauser {
  let deadline = Instant::now() + FINISH_WAIT;
  loop {
    if let Some(pauser) = cell.lock().unwrap().clone() {
      return pauser;
    }
    assert!(Instant::now() < deadline, "task never engaged its pauser");
    std::thread::sleep(Duration::from_millis(10));
  }
}

/// A task that succeeds but signals the chain to stop.
pub struct StopTask {
  pub label: &'static str,
  pub log: Log,
}

impl Task<String> for StopTask {
  fn run(&mut self, _ctx: &mut TaskContext<String>) -> anyhow::Result<String> {
    self.log.lock().unwrap().push(self.label.to_string());
    Ok(self.label.to_string())
  }

  fn should_continue(&self) -> bool {
    false
  }
}
