use std::time::Duration;

use crate::config::Config;
use crate::dispatch::DispatcherHandle;
use crate::log::Level;
use crate::scheduler::SchedulerHandle;

#[derive(Debug, Clone)]
pub enum ConfigOption {
  SetDeliveryDispatcher(DispatcherHandle),
  SetScheduler(SchedulerHandle),
  SetDebounceInterval(Duration),
  SetThrottleInterval(Duration),
  SetLogPrefix(String),
  SetLogLevel(Level),
}

impl ConfigOption {
  pub(crate) fn apply(&self, config: &mut Config) {
    match self {
      ConfigOption::SetDeliveryDispatcher(dispatcher) => {
        config.delivery_dispatcher = dispatcher.clone();
      }
      ConfigOption::SetScheduler(scheduler) => {
        config.scheduler = scheduler.clone();
      }
      ConfigOption::SetDebounceInterval(interval) => {
        config.debounce_interval = *interval;
      }
      ConfigOption::SetThrottleInterval(interval) => {
        config.throttle_interval = *interval;
      }
      ConfigOption::SetLogPrefix(prefix) => {
        config.log_prefix = prefix.clone();
      }
      ConfigOption::SetLogLevel(level) => {
        config.log_level = *level;
      }
    }
  }

  pub fn with_delivery_dispatcher(dispatcher: DispatcherHandle) -> ConfigOption {
    ConfigOption::SetDeliveryDispatcher(dispatcher)
  }

  pub fn with_scheduler(scheduler: SchedulerHandle) -> ConfigOption {
    ConfigOption::SetScheduler(scheduler)
  }

  pub fn with_debounce_interval(interval: Duration) -> ConfigOption {
    ConfigOption::SetDebounceInterval(interval)
  }

  pub fn with_throttle_interval(interval: Duration) -> ConfigOption {
    ConfigOption::SetThrottleInterval(interval)
  }

  pub fn with_log_prefix(prefix: impl Into<String>) -> ConfigOption {
    ConfigOption::SetLogPrefix(prefix.into())
  }

  pub fn with_log_level(level: Level) -> ConfigOption {
    ConfigOption::SetLogLevel(level)
  }
}
