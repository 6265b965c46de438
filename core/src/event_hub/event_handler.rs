use futures::future::BoxFuture;
use std::fmt::{Debug, Formatter};
use std::future::Future;
use std::sync::Arc;

// EventHandler is the callback stored for each subscriber of an EventHub.
pub struct EventHandler<E>(Arc<dyn Fn(E) -> BoxFuture<'static, ()> + Send + Sync + 'static>);

impl<E: Send + 'static> EventHandler<E> {
  pub fn new<F, Fut>(f: F) -> Self
  where
    F: Fn(E) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static, {
    Self(Arc::new(move |evt| Box::pin(f(evt)) as BoxFuture<'static, ()>))
  }

  pub fn from_fn<F>(f: F) -> Self
  where
    F: Fn(E) + Send + Sync + 'static, {
    Self(Arc::new(move |evt| {
      f(evt);
      Box::pin(async {}) as BoxFuture<'static, ()>
    }))
  }

  pub async fn run(&self, evt: E) {
    (self.0)(evt).await
  }
}

impl<E> Clone for EventHandler<E> {
  fn clone(&self) -> Self {
    Self(Arc::clone(&self.0))
  }
}

impl<E> Debug for EventHandler<E> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "EventHandler")
  }
}

impl<E> PartialEq for EventHandler<E> {
  fn eq(&self, other: &Self) -> bool {
    Arc::ptr_eq(&self.0, &other.0)
  }
}

impl<E> Eq for EventHandler<E> {}
