use tokio_util::sync::CancellationToken;

/// Cancel handle for a runnable registered with a [`Scheduler`](crate::scheduler::Scheduler).
///
/// Cancelling only prevents a runnable that has not started yet; once it is
/// running or has finished, `cancel` is a no-op.
#[derive(Debug, Clone, Default)]
pub struct ScheduledHandle {
  token: CancellationToken,
}

impl ScheduledHandle {
  pub fn new() -> Self {
    Self {
      token: CancellationToken::new(),
    }
  }

  pub fn cancel(&self) {
    self.token.cancel();
  }

  pub fn is_cancelled(&self) -> bool {
    self.token.is_cancelled()
  }

  pub(crate) fn token(&self) -> &CancellationToken {
    &self.token
  }
}
