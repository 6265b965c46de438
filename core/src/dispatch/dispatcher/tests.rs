use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use tether_utils_rs::{CountDownLatch, SharedValue};
use tokio::time::Duration;

#[tokio::test]
async fn current_thread_dispatcher_runs_inline() {
  let counter = Arc::new(AtomicUsize::new(0));
  let dispatcher = CurrentThreadDispatcher::new();
  let cloned = Arc::clone(&counter);
  dispatcher
    .schedule(Runnable::new(move || async move {
      cloned.fetch_add(1, Ordering::SeqCst);
    }))
    .await;
  assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn context_dispatcher_spawns_onto_runtime() {
  let latch = CountDownLatch::new(1);
  let dispatcher = DispatcherHandle::new(TokioRuntimeContextDispatcher::new());
  let cloned = latch.clone();
  dispatcher
    .schedule(Runnable::new(move || async move { cloned.count_down().await }))
    .await;
  assert!(latch.wait_timeout(Duration::from_secs(1)).await);
}

#[tokio::test]
async fn serial_dispatcher_preserves_submission_order_on_its_thread() {
  let dispatcher = SerialDispatcher::new().unwrap();
  let seen = Arc::new(SharedValue::new(Vec::new()));
  let latch = CountDownLatch::new(50);

  for i in 0..50 {
    let seen = Arc::clone(&seen);
    let latch = latch.clone();
    dispatcher
      .schedule(Runnable::new(move || async move {
        if i % 7 == 0 {
          tokio::task::yield_now().await;
        }
        seen.mutate(|v| v.push((i, SerialDispatcher::is_delivery_thread())));
        latch.count_down().await;
      }))
      .await;
  }

  assert!(latch.wait_timeout(Duration::from_secs(5)).await);
  let seen = seen.read();
  assert_eq!(seen.iter().map(|(i, _)| *i).collect::<Vec<_>>(), (0..50).collect::<Vec<_>>());
  assert!(seen.iter().all(|(_, on_delivery)| *on_delivery));
  assert!(!SerialDispatcher::is_delivery_thread());
}

#[tokio::test]
async fn serial_dispatcher_survives_panicking_runnable() {
  let dispatcher = SerialDispatcher::new().unwrap();
  let latch = CountDownLatch::new(1);
  dispatcher
    .schedule(Runnable::new(|| async move { panic!("handler failure") }))
    .await;
  let cloned = latch.clone();
  dispatcher
    .schedule(Runnable::new(move || async move { cloned.count_down().await }))
    .await;
  assert!(latch.wait_timeout(Duration::from_secs(5)).await);
}

#[tokio::test]
async fn run_isolated_reports_panics() {
  assert!(Runnable::new(|| async {}).run_isolated().await);
  assert!(!Runnable::new(|| async { panic!("boom") }).run_isolated().await);
}

#[tokio::test]
async fn default_handle_delivers_on_the_shared_delivery_thread() {
  let latch = CountDownLatch::new(2);
  let on_delivery = Arc::new(AtomicUsize::new(0));
  for dispatcher in [DispatcherHandle::default(), DispatcherHandle::delivery()] {
    let (latch, on_delivery) = (latch.clone(), Arc::clone(&on_delivery));
    dispatcher
      .schedule(Runnable::new(move || async move {
        if SerialDispatcher::is_delivery_thread() {
          on_delivery.fetch_add(1, Ordering::SeqCst);
        }
        latch.count_down().await;
      }))
      .await;
  }
  assert!(latch.wait_timeout(Duration::from_secs(5)).await);
  assert_eq!(on_delivery.load(Ordering::SeqCst), 2);
  assert!(format!("{:?}", DispatcherHandle::inline()).contains("CurrentThreadDispatcher"));
}
