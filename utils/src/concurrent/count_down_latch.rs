use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio_condvar::Condvar;

/// Async latch released once `count_down` has been called `count` times.
///
/// Extra `count_down` calls after the latch opened are ignored.
#[derive(Clone)]
pub struct CountDownLatch {
  count: Arc<Mutex<usize>>,
  condvar: Arc<Condvar>,
}

impl Debug for CountDownLatch {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("CountDownLatch").field("count", &self.count).finish()
  }
}

impl PartialEq for CountDownLatch {
  fn eq(&self, other: &Self) -> bool {
    Arc::ptr_eq(&self.count, &other.count)
  }
}

impl Eq for CountDownLatch {}

impl Default for CountDownLatch {
  fn default() -> Self {
    Self::new(0)
  }
}

impl CountDownLatch {
  pub fn new(count: usize) -> Self {
    Self {
      count: Arc::new(Mutex::new(count)),
      condvar: Arc::new(Condvar::new()),
    }
  }

  pub async fn count_down(&self) {
    let mut count = self.count.lock().await;
    if *count == 0 {
      return;
    }
    *count -= 1;
    if *count == 0 {
      tracing::trace!("latch released");
      self.condvar.notify_all();
    }
  }

  pub async fn count(&self) -> usize {
    *self.count.lock().await
  }

  pub async fn wait(&self) {
    let mut count = self.count.lock().await;
    while *count > 0 {
      count = self.condvar.wait(count).await;
    }
  }

  /// Waits for the latch, giving up after `timeout`. Returns `true` if the latch opened.
  pub async fn wait_timeout(&self, timeout: Duration) -> bool {
    tokio::time::timeout(timeout, self.wait()).await.is_ok()
  }
}

#[cfg(test)]
mod tests {
  use super::CountDownLatch;
  use std::time::Duration;

  #[tokio::test]
  async fn opens_after_all_count_downs() {
    let latch = CountDownLatch::new(3);
    for _ in 0..3 {
      let latch = latch.clone();
      tokio::spawn(async move { latch.count_down().await });
    }
    assert!(latch.wait_timeout(Duration::from_secs(1)).await);
    assert_eq!(latch.count().await, 0);
  }

  #[tokio::test]
  async fn stays_closed_until_released() {
    let latch = CountDownLatch::new(2);
    latch.count_down().await;
    assert!(!latch.wait_timeout(Duration::from_millis(20)).await);
    latch.count_down().await;
    latch.count_down().await;
    assert!(latch.wait_timeout(Duration::from_millis(20)).await);
  }
}
