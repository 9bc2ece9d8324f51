// tasklane/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

use crate::core::task::TaskId;

/// Errors surfaced by a chain run. Task failures never cross back to the
/// caller synchronously; the error sequence handed to the finisher is the
/// only externally observable channel.
#[derive(Debug, Error)]
pub enum ChainError {
  /// A task's `run` returned an error. Recorded in the chain's error
  /// sequence and delivered to the finisher; the chain itself continues.
  #[error("task {task} failed: {source}")]
  TaskFailed {
    task: TaskId,
    #[source]
    source: AnyhowError,
  },

  /// The worker lane could not accept a submission. Surfaced as a `false`
  /// return from `Chain::run`; the chain does not proceed.
  #[error("submission rejected: {reason}")]
  SubmissionRejected { reason: String },
}
