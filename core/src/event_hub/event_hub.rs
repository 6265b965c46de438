use std::fmt::{Debug, Formatter};
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::FutureExt;
use tether_utils_rs::SharedValue;
use tokio::sync::oneshot;

use crate::config::Config;
use crate::dispatch::{Dispatcher, DispatcherHandle, Runnable};
use crate::event_hub::EventHandler;
use crate::subscriber::{SubscriberId, SubscriberRegistry};


const NEXT_EVENT_OWNER: &str = "tether.event_hub.next";

/// A subscriber registry plus a notify operation.
///
/// This is the shape every multi-observer source in the toolkit takes: one
/// adapter receives events from the platform and calls [`EventHub::notify`],
/// and any number of subscribers register against the hub.
///
/// Unless a dispatcher is given, handlers run on the shared
/// [`SerialDispatcher`](crate::dispatch::SerialDispatcher), so the handlers
/// for one event never interleave with those of another.
///
/// Handlers are always invoked on the hub's dispatcher, after the registry
/// lock has been released, so a handler may subscribe or unsubscribe freely.
/// Each `notify` submits one runnable that calls recurring handlers and then
/// one-shot handlers in registration order. A panicking handler is logged and
/// the rest of the handlers for that event still run.
pub struct EventHub<E> {
  registry: Arc<SubscriberRegistry<EventHandler<E>>>,
  dispatcher: DispatcherHandle,
  next_id: Arc<AtomicU64>,
}

impl<E> Clone for EventHub<E> {
  fn clone(&self) -> Self {
    Self {
      registry: Arc::clone(&self.registry),
      dispatcher: self.dispatcher.clone(),
      next_id: Arc::clone(&self.next_id),
    }
  }
}

impl<E> Debug for EventHub<E> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("EventHub")
      .field("registry", &self.registry)
      .field("dispatcher", &self.dispatcher)
      .finish()
  }
}

impl<E> EventHub<E>
where
  E: Clone + Send + Sync + 'static,
{
  /// Hub that delivers on the shared delivery thread.
  pub fn new() -> Self {
    Self::with_dispatcher(DispatcherHandle::delivery())
  }

  /// Hub that runs handlers inline in the task calling `notify`.
  ///
  /// Concurrent `notify` calls on an inline hub may interleave their handlers.
  pub fn inline() -> Self {
    Self::with_dispatcher(DispatcherHandle::inline())
  }

  pub fn with_dispatcher(dispatcher: DispatcherHandle) -> Self {
    Self {
      registry: Arc::new(SubscriberRegistry::new()),
      dispatcher,
      next_id: Arc::new(AtomicU64::new(0)),
    }
  }

  pub fn from_config(config: &Config) -> Self {
    Self::with_dispatcher(config.delivery_dispatcher.clone())
  }

  pub fn subscribe_handler(&self, id: impl Into<SubscriberId>, handler: EventHandler<E>) {
    self.registry.add(id, handler);
  }

  pub fn subscribe<F, Fut>(&self, id: impl Into<SubscriberId>, f: F)
  where
    F: Fn(E) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static, {
    self.subscribe_handler(id, EventHandler::new(f));
  }

  pub fn subscribe_fn<F>(&self, id: impl Into<SubscriberId>, f: F)
  where
    F: Fn(E) + Send + Sync + 'static, {
    self.subscribe_handler(id, EventHandler::from_fn(f));
  }

  /// Registers a handler for the next event only. Its identity is the caller's declaration site.
  #[track_caller]
  pub fn subscribe_once<F, Fut>(&self, f: F) -> SubscriberId
  where
    F: Fn(E) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static, {
    self.registry.add_one_shot(EventHandler::new(f))
  }

  pub fn subscribe_once_with_id<F, Fut>(&self, id: impl Into<SubscriberId>, f: F)
  where
    F: Fn(E) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static, {
    self.registry.add_one_shot_with_id(id, EventHandler::new(f));
  }

  pub fn unsubscribe(&self, id: &SubscriberId) -> usize {
    self.registry.remove(id)
  }

  /// Removes everything registered under `owner.*`.
  pub fn unsubscribe_owner(&self, owner: &str) -> usize {
    self.registry.remove_by_prefix(owner)
  }

  pub fn subscriber_count(&self) -> usize {
    self.registry.len()
  }

  pub fn clear(&self) {
    self.registry.clear();
  }

  pub async fn notify(&self, event: E) {
    let delivery = self.registry.snapshot();
    if delivery.is_empty() {
      tracing::trace!("notify without subscribers");
      return;
    }
    tracing::trace!(handlers = delivery.len(), "notify");
    self
      .dispatcher
      .schedule(Runnable::new(move || async move {
        for handler in delivery {
          if AssertUnwindSafe(handler.run(event.clone())).catch_unwind().await.is_err() {
            tracing::error!("event handler panicked");
          }
        }
      }))
      .await;
  }

  /// Waits for the next notified event.
  ///
  /// Returns `None` if the registration is removed (for example by `clear`)
  /// before an event arrives. Dropping the future unregisters it.
  pub async fn next(&self) -> Option<E> {
    let (sender, receiver) = oneshot::channel();
    let sender = SharedValue::new(Some(sender));
    let id = SubscriberId::new(NEXT_EVENT_OWNER, self.next_id.fetch_add(1, Ordering::Relaxed));
    self.registry.add_one_shot_with_id(
      id.clone(),
      EventHandler::from_fn(move |evt| {
        if let Some(sender) = sender.take() {
          let _ = sender.send(evt);
        }
      }),
    );
    let _guard = NextRegistration {
      registry: &self.registry,
      id,
    };
    receiver.await.ok()
  }
}

impl<E> Default for EventHub<E>
where
  E: Clone + Send + Sync + 'static,
{
  fn default() -> Self {
    Self::new()
  }
}

struct NextRegistration<'a, E> {
  registry: &'a SubscriberRegistry<EventHandler<E>>,
  id: SubscriberId,
}

impl<E> Drop for NextRegistration<'_, E> {
  fn drop(&mut self) {
    self.registry.remove(&self.id);
  }
}
