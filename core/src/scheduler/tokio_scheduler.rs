use std::time::Duration;

use once_cell::sync::Lazy;
use tokio::runtime::{Builder, Handle, Runtime};

use crate::dispatch::Runnable;
use crate::scheduler::{ScheduledHandle, Scheduler};

#[cfg(test)]
mod tests;

/// Name of the worker threads used when no Tokio runtime is reachable.
pub const SCHEDULER_THREAD_NAME: &str = "tether-scheduler";

static FALLBACK_RUNTIME: Lazy<Option<Runtime>> = Lazy::new(|| {
  match Builder::new_multi_thread()
    .worker_threads(1)
    .thread_name(SCHEDULER_THREAD_NAME)
    .enable_all()
    .build()
  {
    Ok(runtime) => Some(runtime),
    Err(error) => {
      tracing::error!(%error, "failed to start the fallback scheduler runtime");
      None
    }
  }
});

/// Scheduler backed by Tokio.
///
/// Work goes to the runtime captured at construction. Without one it goes to
/// the runtime of the calling context, and failing that to a process-wide
/// background runtime, so producers on plain threads may use it too.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
  handle: Option<Handle>,
}

impl TokioScheduler {
  /// Captures the runtime of the calling context, if there is one.
  pub fn new() -> Self {
    Self {
      handle: Handle::try_current().ok(),
    }
  }

  pub fn with_handle(handle: Handle) -> Self {
    Self { handle: Some(handle) }
  }

  fn runtime(&self) -> Option<Handle> {
    self
      .handle
      .clone()
      .or_else(|| Handle::try_current().ok())
      .or_else(|| FALLBACK_RUNTIME.as_ref().map(|runtime| runtime.handle().clone()))
  }
}

impl Default for TokioScheduler {
  fn default() -> Self {
    Self::new()
  }
}

impl Scheduler for TokioScheduler {
  fn schedule_once(&self, delay: Duration, runner: Runnable) -> ScheduledHandle {
    let handle = ScheduledHandle::new();
    let Some(runtime) = self.runtime() else {
      tracing::error!("no runtime available, scheduled runnable dropped");
      handle.cancel();
      return handle;
    };
    let token = handle.token().clone();
    runtime.spawn(async move {
      tokio::select! {
        biased;
        _ = token.cancelled() => {
          tracing::trace!("scheduled runnable cancelled before firing");
          return;
        }
        _ = tokio::time::sleep(delay) => {}
      }
      if token.is_cancelled() {
        return;
      }
      runner.run().await;
    });
    handle
  }

  fn spawn(&self, runner: Runnable) {
    match self.runtime() {
      Some(runtime) => {
        runtime.spawn(runner.run());
      }
      None => tracing::error!("no runtime available, runnable dropped"),
    }
  }
}
