//! Timer services: "run this callback after a duration, return a cancel handle".

mod scheduled_handle;
mod tokio_scheduler;

pub use self::{scheduled_handle::*, tokio_scheduler::*};

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use crate::dispatch::Runnable;

pub trait Scheduler: Debug + Send + Sync + 'static {
  /// Runs `runner` once after `delay` unless the returned handle is cancelled first.
  fn schedule_once(&self, delay: Duration, runner: Runnable) -> ScheduledHandle;

  /// Launches `runner` as an independent concurrent task.
  fn spawn(&self, runner: Runnable);
}

#[derive(Debug, Clone)]
pub struct SchedulerHandle(Arc<dyn Scheduler>);

impl SchedulerHandle {
  pub fn new_arc(scheduler: Arc<dyn Scheduler>) -> Self {
    Self(scheduler)
  }

  pub fn new(scheduler: impl Scheduler + 'static) -> Self {
    Self(Arc::new(scheduler))
  }
}

impl Default for SchedulerHandle {
  fn default() -> Self {
    Self::new(TokioScheduler::new())
  }
}

impl Scheduler for SchedulerHandle {
  fn schedule_once(&self, delay: Duration, runner: Runnable) -> ScheduledHandle {
    self.0.schedule_once(delay, runner)
  }

  fn spawn(&self, runner: Runnable) {
    self.0.spawn(runner)
  }
}
