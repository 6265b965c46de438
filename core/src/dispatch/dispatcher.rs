use std::fmt::{Debug, Formatter};
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use futures::FutureExt;
use once_cell::sync::Lazy;
use tokio::runtime::{Builder, Runtime};
use tokio::sync::mpsc;

#[cfg(test)]
mod tests;

/// Name of the worker thread owned by [`SerialDispatcher`].
pub const DELIVERY_THREAD_NAME: &str = "tether-delivery";

static SHARED_DELIVERY: Lazy<Option<SerialDispatcher>> = Lazy::new(|| match SerialDispatcher::new() {
  Ok(dispatcher) => Some(dispatcher),
  Err(error) => {
    tracing::error!(%error, "failed to start the shared delivery thread");
    None
  }
});

pub struct Runnable(Box<dyn FnOnce() -> BoxFuture<'static, ()> + Send + 'static>);

impl Runnable {
  pub fn new<F, Fut>(f: F) -> Self
  where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static, {
    Self(Box::new(move || Box::pin(f()) as BoxFuture<'static, ()>))
  }

  pub async fn run(self) {
    (self.0)().await;
  }

  /// Runs the callback, reporting a panic as `false` instead of unwinding into the caller.
  pub async fn run_isolated(self) -> bool {
    match AssertUnwindSafe(self.run()).catch_unwind().await {
      Ok(()) => true,
      Err(_) => {
        tracing::error!("runnable panicked");
        false
      }
    }
  }
}

impl Debug for Runnable {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "Runnable")
  }
}

#[async_trait]
pub trait Dispatcher: Debug + Send + Sync + 'static {
  async fn schedule(&self, runner: Runnable);
}

#[derive(Debug, Clone)]
pub struct DispatcherHandle(Arc<dyn Dispatcher>);

impl DispatcherHandle {
  pub fn new_arc(dispatcher: Arc<dyn Dispatcher>) -> Self {
    Self(dispatcher)
  }

  pub fn new(dispatcher: impl Dispatcher + 'static) -> Self {
    Self(Arc::new(dispatcher))
  }

  /// The process-wide delivery context, see [`SerialDispatcher::shared`].
  ///
  /// Falls back to inline delivery only if the delivery thread could not be started.
  pub fn delivery() -> Self {
    match SerialDispatcher::shared() {
      Some(dispatcher) => Self::new(dispatcher),
      None => Self::inline(),
    }
  }

  /// Runs handlers in the task that schedules them.
  pub fn inline() -> Self {
    Self::new(CurrentThreadDispatcher::new())
  }
}

impl Default for DispatcherHandle {
  fn default() -> Self {
    Self::delivery()
  }
}

#[async_trait]
impl Dispatcher for DispatcherHandle {
  async fn schedule(&self, runner: Runnable) {
    self.0.schedule(runner).await;
  }
}

// --- CurrentThreadDispatcher implementation

/// Runs every runnable inline, in the task that scheduled it.
#[derive(Debug, Clone, Default)]
pub struct CurrentThreadDispatcher;

impl CurrentThreadDispatcher {
  pub fn new() -> Self {
    Self
  }
}

#[async_trait]
impl Dispatcher for CurrentThreadDispatcher {
  async fn schedule(&self, runner: Runnable) {
    runner.run().await
  }
}

// --- TokioRuntimeContextDispatcher implementation

/// Spawns each runnable onto the ambient Tokio runtime. No ordering between runnables.
#[derive(Debug, Clone, Default)]
pub struct TokioRuntimeContextDispatcher;

impl TokioRuntimeContextDispatcher {
  pub fn new() -> Self {
    Self
  }
}

#[async_trait]
impl Dispatcher for TokioRuntimeContextDispatcher {
  async fn schedule(&self, runner: Runnable) {
    tokio::spawn(runner.run());
  }
}

// --- SerialDispatcher implementation

/// The designated delivery context.
///
/// Owns a runtime with a single worker thread named [`DELIVERY_THREAD_NAME`]
/// and a loop on it that executes runnables one after another, in the order
/// they were scheduled. A runnable that panics is logged and the loop moves on
/// to the next one.
///
/// When the last clone is dropped the runtime is shut down in the background,
/// so it is safe to drop from inside another runtime.
#[derive(Debug, Clone)]
pub struct SerialDispatcher {
  sender: mpsc::UnboundedSender<Runnable>,
  runtime: Option<Arc<Runtime>>,
}

impl SerialDispatcher {
  pub fn new() -> Result<Self, std::io::Error> {
    let runtime = Builder::new_multi_thread()
      .worker_threads(1)
      .thread_name(DELIVERY_THREAD_NAME)
      .enable_all()
      .build()?;
    let (sender, mut receiver) = mpsc::unbounded_channel::<Runnable>();
    runtime.spawn(async move {
      while let Some(runner) = receiver.recv().await {
        runner.run_isolated().await;
      }
      tracing::debug!("delivery loop stopped");
    });
    Ok(Self {
      sender,
      runtime: Some(Arc::new(runtime)),
    })
  }

  /// Delivery context shared by every hub that does not name its own.
  /// Started on first use and kept for the life of the process.
  pub fn shared() -> Option<Self> {
    SHARED_DELIVERY.clone()
  }

  /// Returns `true` when called from the delivery thread.
  pub fn is_delivery_thread() -> bool {
    std::thread::current().name() == Some(DELIVERY_THREAD_NAME)
  }
}

#[async_trait]
impl Dispatcher for SerialDispatcher {
  async fn schedule(&self, runner: Runnable) {
    if self.sender.send(runner).is_err() {
      tracing::warn!("SerialDispatcher loop already stopped, runnable dropped");
    }
  }
}

impl Drop for SerialDispatcher {
  fn drop(&mut self) {
    if let Some(runtime_arc) = self.runtime.take() {
      if let Ok(runtime) = Arc::try_unwrap(runtime_arc) {
        tracing::debug!("shutting down delivery runtime");
        runtime.shutdown_background();
      }
    }
  }
}
