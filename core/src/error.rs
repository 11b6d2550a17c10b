// korb/src/error.rs

use anyhow::Error as AnyhowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KorbError {
  #[error("Remote cart read failed. Source: {source}")]
  RemoteRead {
    #[source]
    source: AnyhowError,
  },

  #[error("Remote cart write failed during '{operation}'. Source: {source}")]
  RemoteWrite {
    operation: String,
    #[source]
    source: AnyhowError,
  },

  #[error("Guest cart merge failed after pushing {pushed} of {total} lines. Source: {source}")]
  MergeFailure {
    pushed: usize,
    total: usize,
    #[source]
    source: AnyhowError,
  },

  #[error("Error in collaborator operation. Source: {source}")]
  Collaborator {
    #[source]
    source: AnyhowError,
  },

  #[error("Configuration error: {message}")]
  Configuration { message: String },

  #[error("Internal cart engine error: {0}")]
  Internal(String),
}

// This is the key conversion korb provides for external errors. Anything a
// collaborator surfaces as anyhow gets wrapped exactly once; re-wrapping an
// already-wrapped KorbError would just nest the same context twice.
impl From<AnyhowError> for KorbError {
  fn from(err: AnyhowError) -> Self {
    KorbError::Collaborator { source: err }
  }
}

pub type KorbResult<T, E = KorbError> = std::result::Result<T, E>;
