use crate::config::Config;
use crate::dispatch::DispatcherHandle;
use crate::event_hub::EventHub;
use crate::log::{Level, LogEvent};
use crate::subscriber::SubscriberId;

/// Sink registry for [`LogEvent`]s. Each sink has its own minimum level.
///
/// Like [`EventHub`], sinks run on the shared delivery thread unless a
/// dispatcher is given.
#[derive(Debug, Clone, Default)]
pub struct LogHub {
  hub: EventHub<LogEvent>,
}

impl LogHub {
  pub fn new() -> Self {
    Self::default()
  }

  /// Sinks run in the task that publishes.
  pub fn inline() -> Self {
    Self { hub: EventHub::inline() }
  }

  pub fn with_dispatcher(dispatcher: DispatcherHandle) -> Self {
    Self {
      hub: EventHub::with_dispatcher(dispatcher),
    }
  }

  pub fn from_config(config: &Config) -> Self {
    Self {
      hub: EventHub::from_config(config),
    }
  }

  pub fn subscribe<F>(&self, id: impl Into<SubscriberId>, min_level: Level, sink: F)
  where
    F: Fn(LogEvent) + Send + Sync + 'static, {
    self.hub.subscribe_fn(id, move |event: LogEvent| {
      if event.level >= min_level {
        sink(event);
      }
    });
  }

  pub fn unsubscribe(&self, id: &SubscriberId) -> usize {
    self.hub.unsubscribe(id)
  }

  pub fn unsubscribe_owner(&self, owner: &str) -> usize {
    self.hub.unsubscribe_owner(owner)
  }

  pub fn sink_count(&self) -> usize {
    self.hub.subscriber_count()
  }

  pub async fn publish(&self, event: LogEvent) {
    self.hub.notify(event).await;
  }
}
