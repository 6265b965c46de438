use std::fmt::{Debug, Formatter};
use std::future::Future;

use futures::future::BoxFuture;

/// One unit of work handed to a [`FanOutJoiner`](crate::fan_out::FanOutJoiner).
///
/// The name is carried into placeholder and failure values so an unfinished
/// or failed slot still says which operation it belongs to.
pub struct Operation<T, E> {
  pub(crate) name: String,
  pub(crate) future: BoxFuture<'static, Result<T, E>>,
}

impl<T, E> Operation<T, E> {
  pub fn new<Fut>(name: impl Into<String>, future: Fut) -> Self
  where
    Fut: Future<Output = Result<T, E>> + Send + 'static, {
    Self {
      name: name.into(),
      future: Box::pin(future),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }
}

impl<T, E> Debug for Operation<T, E> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Operation").field("name", &self.name).finish()
  }
}
