use thiserror::Error;

/// Per-slot failure of a fan-out join.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinError<E> {
  /// Placeholder every slot starts with until its operation reports.
  #[error("operation {index} ({name}) has not completed")]
  NotCompleted { index: usize, name: String },
  #[error("operation {index} ({name}) failed: {error}")]
  Failed { index: usize, name: String, error: E },
  #[error("operation {index} ({name}) panicked")]
  Panicked { index: usize, name: String },
}

impl<E> JoinError<E> {
  pub fn index(&self) -> usize {
    match self {
      JoinError::NotCompleted { index, .. } | JoinError::Failed { index, .. } | JoinError::Panicked { index, .. } => {
        *index
      }
    }
  }

  pub fn name(&self) -> &str {
    match self {
      JoinError::NotCompleted { name, .. } | JoinError::Failed { name, .. } | JoinError::Panicked { name, .. } => name,
    }
  }

  /// The error reported by the operation itself, if that is why the slot failed.
  pub fn failure(&self) -> Option<&E> {
    match self {
      JoinError::Failed { error, .. } => Some(error),
      _ => None,
    }
  }

  pub fn into_failure(self) -> Option<E> {
    match self {
      JoinError::Failed { error, .. } => Some(error),
      _ => None,
    }
  }
}
