use super::*;
use crate::scheduler::SchedulerHandle;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn counting_runnable(counter: &Arc<AtomicUsize>) -> Runnable {
  let counter = Arc::clone(counter);
  Runnable::new(move || async move {
    counter.fetch_add(1, Ordering::SeqCst);
  })
}

#[tokio::test(start_paused = true)]
async fn fires_after_delay() {
  let counter = Arc::new(AtomicUsize::new(0));
  let scheduler = SchedulerHandle::default();
  let _handle = scheduler.schedule_once(Duration::from_millis(100), counting_runnable(&counter));

  tokio::time::sleep(Duration::from_millis(99)).await;
  assert_eq!(counter.load(Ordering::SeqCst), 0);

  tokio::time::sleep(Duration::from_millis(2)).await;
  assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn cancelled_handle_never_fires() {
  let counter = Arc::new(AtomicUsize::new(0));
  let scheduler = TokioScheduler::new();
  let handle = scheduler.schedule_once(Duration::from_millis(100), counting_runnable(&counter));
  handle.cancel();
  assert!(handle.is_cancelled());

  tokio::time::sleep(Duration::from_millis(500)).await;
  assert_eq!(counter.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn cancel_after_firing_is_a_no_op() {
  let counter = Arc::new(AtomicUsize::new(0));
  let scheduler = TokioScheduler::new();
  let handle = scheduler.schedule_once(Duration::from_millis(10), counting_runnable(&counter));
  tokio::time::sleep(Duration::from_millis(20)).await;
  handle.cancel();
  assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn zero_delay_fires_promptly() {
  let counter = Arc::new(AtomicUsize::new(0));
  let scheduler = TokioScheduler::new();
  let _handle = scheduler.schedule_once(Duration::ZERO, counting_runnable(&counter));
  tokio::time::timeout(Duration::from_secs(1), async {
    while counter.load(Ordering::SeqCst) == 0 {
      tokio::task::yield_now().await;
    }
  })
  .await
  .expect("zero-delay runnable did not fire");
}

#[tokio::test]
async fn spawn_runs_concurrently() {
  let counter = Arc::new(AtomicUsize::new(0));
  let scheduler = TokioScheduler::new();
  for _ in 0..10 {
    scheduler.spawn(counting_runnable(&counter));
  }
  tokio::time::timeout(Duration::from_secs(1), async {
    while counter.load(Ordering::SeqCst) < 10 {
      tokio::task::yield_now().await;
    }
  })
  .await
  .expect("spawned runnables did not finish");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn captured_runtime_serves_plain_threads() {
  let counter = Arc::new(AtomicUsize::new(0));
  let scheduler = TokioScheduler::new();
  let cloned = scheduler.clone();
  let runnables = (counting_runnable(&counter), counting_runnable(&counter));
  std::thread::spawn(move || {
    let _handle = cloned.schedule_once(Duration::from_millis(5), runnables.0);
    cloned.spawn(runnables.1);
  })
  .join()
  .unwrap();

  tokio::time::timeout(Duration::from_secs(1), async {
    while counter.load(Ordering::SeqCst) < 2 {
      tokio::time::sleep(Duration::from_millis(1)).await;
    }
  })
  .await
  .expect("runnables from a plain thread did not run");
}

#[test]
fn without_any_runtime_work_runs_on_background_threads() {
  let scheduler = TokioScheduler::new();
  let (sender, receiver) = std::sync::mpsc::channel();
  let _handle = scheduler.schedule_once(
    Duration::from_millis(5),
    Runnable::new(move || async move {
      let name = std::thread::current().name().map(str::to_string);
      sender.send(name).unwrap();
    }),
  );
  let name = receiver.recv_timeout(Duration::from_secs(5)).unwrap();
  assert_eq!(name.as_deref(), Some(SCHEDULER_THREAD_NAME));
}
