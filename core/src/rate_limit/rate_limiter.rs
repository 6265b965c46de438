use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tether_utils_rs::SharedValue;

use crate::config::Config;
use crate::dispatch::Runnable;
use crate::scheduler::{ScheduledHandle, Scheduler, SchedulerHandle};

#[cfg(test)]
mod tests;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateLimitPolicy {
  /// Wait for a quiet period of `duration`, then run the most recent work once.
  Debounce,
  /// Run the first work immediately, then drop further calls until `duration` has elapsed.
  Throttle,
}

#[derive(Debug, Default)]
struct PendingState {
  generation: u64,
  pending: Option<u64>,
  handle: Option<ScheduledHandle>,
}

impl PendingState {
  fn begin(&mut self) -> u64 {
    self.generation += 1;
    self.pending = Some(self.generation);
    self.generation
  }

  fn finish(&mut self, generation: u64) -> bool {
    if self.pending == Some(generation) {
      self.pending = None;
      self.handle = None;
      true
    } else {
      false
    }
  }
}

#[derive(Debug)]
struct Inner {
  policy: RateLimitPolicy,
  duration: Duration,
  scheduler: SchedulerHandle,
  state: SharedValue<PendingState>,
}

/// Debounce/throttle gate with at most one pending handle.
///
/// Every pending handle carries a generation number. A handle only acts if its
/// generation is still the pending one, so a handle that fires after being
/// superseded or reset does nothing even if its cancellation lost the race.
///
/// A debounced run stays pending until its work has finished; a call made
/// while it runs starts a new quiet period instead of being merged into it.
///
/// `execute` never blocks and never awaits, and may be called from threads
/// outside any Tokio runtime.
#[derive(Debug, Clone)]
pub struct RateLimiter {
  inner: Arc<Inner>,
}

impl RateLimiter {
  pub fn new(policy: RateLimitPolicy, duration: Duration) -> Self {
    Self::with_scheduler(policy, duration, SchedulerHandle::default())
  }

  pub fn debounce(duration: Duration) -> Self {
    Self::new(RateLimitPolicy::Debounce, duration)
  }

  pub fn throttle(duration: Duration) -> Self {
    Self::new(RateLimitPolicy::Throttle, duration)
  }

  pub fn with_scheduler(policy: RateLimitPolicy, duration: Duration, scheduler: SchedulerHandle) -> Self {
    Self {
      inner: Arc::new(Inner {
        policy,
        duration,
        scheduler,
        state: SharedValue::default(),
      }),
    }
  }

  pub fn from_config(policy: RateLimitPolicy, config: &Config) -> Self {
    let duration = match policy {
      RateLimitPolicy::Debounce => config.debounce_interval,
      RateLimitPolicy::Throttle => config.throttle_interval,
    };
    Self::with_scheduler(policy, duration, config.scheduler.clone())
  }

  pub fn policy(&self) -> RateLimitPolicy {
    self.inner.policy
  }

  pub fn duration(&self) -> Duration {
    self.inner.duration
  }

  pub fn is_pending(&self) -> bool {
    self.inner.state.read_with(|state| state.pending.is_some())
  }

  pub fn execute<F, Fut>(&self, work: F)
  where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static, {
    match self.inner.policy {
      RateLimitPolicy::Debounce => self.debounce_call(Runnable::new(work)),
      RateLimitPolicy::Throttle => self.throttle_call(Runnable::new(work)),
    }
  }

  /// Cancels the pending handle, if any, and returns to idle.
  pub fn reset(&self) {
    let handle = self.inner.state.mutate(|state| {
      state.pending = None;
      state.handle.take()
    });
    if let Some(handle) = handle {
      tracing::trace!(policy = ?self.inner.policy, "rate limiter reset");
      handle.cancel();
    }
  }

  fn debounce_call(&self, work: Runnable) {
    let (generation, superseded) = self.inner.state.mutate(|state| {
      let superseded = state.handle.take();
      (state.begin(), superseded)
    });
    if let Some(superseded) = superseded {
      tracing::trace!(generation, "debounce superseded pending work");
      superseded.cancel();
    }

    let inner = Arc::clone(&self.inner);
    let handle = self.inner.scheduler.schedule_once(
      self.inner.duration,
      Runnable::new(move || async move {
        if !inner.state.read_with(|state| state.pending == Some(generation)) {
          return;
        }
        work.run_isolated().await;
        inner.state.mutate(|state| state.finish(generation));
      }),
    );
    self.attach(generation, handle);
  }

  fn throttle_call(&self, work: Runnable) {
    let admitted = self.inner.state.mutate(|state| match state.pending {
      Some(_) => None,
      None => Some(state.begin()),
    });
    let Some(generation) = admitted else {
      tracing::trace!("throttle window open, call dropped");
      return;
    };

    self.inner.scheduler.spawn(work);

    let inner = Arc::clone(&self.inner);
    let handle = self.inner.scheduler.schedule_once(
      self.inner.duration,
      Runnable::new(move || async move {
        inner.state.mutate(|state| state.finish(generation));
      }),
    );
    self.attach(generation, handle);
  }

  fn attach(&self, generation: u64, handle: ScheduledHandle) {
    let stale = self.inner.state.mutate(|state| {
      if state.pending == Some(generation) {
        state.handle = Some(handle);
        None
      } else {
        Some(handle)
      }
    });
    // Superseded or reset before the handle could be stored.
    if let Some(stale) = stale {
      stale.cancel();
    }
  }
}
