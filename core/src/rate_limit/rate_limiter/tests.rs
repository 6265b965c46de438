use super::*;
use rstest::rstest;
use std::sync::atomic::{AtomicUsize, Ordering};

fn recorder() -> Arc<SharedValue<Vec<String>>> {
  Arc::new(SharedValue::new(Vec::new()))
}

fn record(limiter: &RateLimiter, log: &Arc<SharedValue<Vec<String>>>, entry: impl Into<String>) {
  let log = Arc::clone(log);
  let entry = entry.into();
  limiter.execute(move || async move { log.mutate(|v| v.push(entry)) });
}

#[tokio::test(start_paused = true)]
async fn debounce_collapses_typing_burst_into_last_call() {
  let limiter = RateLimiter::debounce(Duration::from_secs(5));
  let log = recorder();
  let mut text = String::new();

  for ch in "hello".chars() {
    text.push(ch);
    record(&limiter, &log, text.clone());
    assert!(limiter.is_pending());
    tokio::time::sleep(Duration::from_secs(1)).await;
  }

  // Last call was at t=4s, so nothing may fire before t=9s.
  tokio::time::sleep(Duration::from_millis(3_900)).await;
  assert!(log.read().is_empty());

  tokio::time::sleep(Duration::from_millis(200)).await;
  assert_eq!(log.read(), vec!["hello".to_string()]);
  assert!(!limiter.is_pending());
}

#[tokio::test(start_paused = true)]
async fn debounce_runs_again_after_quiet_period() {
  let limiter = RateLimiter::debounce(Duration::from_millis(100));
  let log = recorder();

  record(&limiter, &log, "first");
  tokio::time::sleep(Duration::from_millis(150)).await;
  record(&limiter, &log, "second");
  tokio::time::sleep(Duration::from_millis(150)).await;

  assert_eq!(log.read(), vec!["first".to_string(), "second".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn throttle_admits_first_then_suppresses_window() {
  let limiter = RateLimiter::throttle(Duration::from_secs(2));
  let log = recorder();

  record(&limiter, &log, "t0");
  tokio::time::sleep(Duration::from_millis(100)).await;
  assert_eq!(log.read(), vec!["t0".to_string()]);

  record(&limiter, &log, "t0.1");
  assert!(limiter.is_pending());
  tokio::time::sleep(Duration::from_millis(2_400)).await;
  assert_eq!(log.read(), vec!["t0".to_string()]);
  assert!(!limiter.is_pending());

  record(&limiter, &log, "t2.5");
  tokio::time::sleep(Duration::from_millis(10)).await;
  assert_eq!(log.read(), vec!["t0".to_string(), "t2.5".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn reset_cancels_pending_debounce() {
  let limiter = RateLimiter::debounce(Duration::from_millis(100));
  let log = recorder();

  record(&limiter, &log, "never");
  limiter.reset();
  assert!(!limiter.is_pending());

  tokio::time::sleep(Duration::from_millis(500)).await;
  assert!(log.read().is_empty());
}

#[tokio::test(start_paused = true)]
async fn reset_reopens_throttle_window() {
  let limiter = RateLimiter::throttle(Duration::from_secs(10));
  let log = recorder();

  record(&limiter, &log, "a");
  limiter.reset();
  record(&limiter, &log, "b");
  tokio::time::sleep(Duration::from_millis(10)).await;

  let mut seen = log.read();
  seen.sort();
  assert_eq!(seen, vec!["a".to_string(), "b".to_string()]);
}

#[tokio::test]
async fn reset_on_idle_limiter_is_a_no_op() {
  let limiter = RateLimiter::debounce(Duration::from_millis(10));
  limiter.reset();
  limiter.reset();
  assert!(!limiter.is_pending());
}

#[rstest]
#[case::zero(Duration::ZERO)]
#[case::short(Duration::from_millis(5))]
#[tokio::test]
async fn debounce_eventually_fires(#[case] duration: Duration) {
  let limiter = RateLimiter::debounce(duration);
  let fired = Arc::new(AtomicUsize::new(0));
  let cloned = Arc::clone(&fired);
  limiter.execute(move || async move {
    cloned.fetch_add(1, Ordering::SeqCst);
  });

  tokio::time::timeout(Duration::from_secs(1), async {
    while fired.load(Ordering::SeqCst) == 0 {
      tokio::time::sleep(Duration::from_millis(1)).await;
    }
  })
  .await
  .expect("debounced work never fired");
  assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_debounce_burst_runs_once() {
  let limiter = RateLimiter::debounce(Duration::from_millis(50));
  let fired = Arc::new(AtomicUsize::new(0));

  let callers = (0..100)
    .map(|_| {
      let limiter = limiter.clone();
      let fired = Arc::clone(&fired);
      tokio::spawn(async move {
        limiter.execute(move || async move {
          fired.fetch_add(1, Ordering::SeqCst);
        });
      })
    })
    .collect::<Vec<_>>();
  for caller in callers {
    caller.await.unwrap();
  }

  tokio::time::sleep(Duration::from_millis(300)).await;
  assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_throttle_burst_admits_once() {
  let limiter = RateLimiter::throttle(Duration::from_secs(5));
  let fired = Arc::new(AtomicUsize::new(0));

  let callers = (0..100)
    .map(|_| {
      let limiter = limiter.clone();
      let fired = Arc::clone(&fired);
      tokio::spawn(async move {
        limiter.execute(move || async move {
          fired.fetch_add(1, Ordering::SeqCst);
        });
      })
    })
    .collect::<Vec<_>>();
  for caller in callers {
    caller.await.unwrap();
  }

  tokio::time::sleep(Duration::from_millis(50)).await;
  assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[test]
fn from_config_picks_interval_by_policy() {
  let config = Config::from([
    crate::config::ConfigOption::with_debounce_interval(Duration::from_millis(250)),
    crate::config::ConfigOption::with_throttle_interval(Duration::from_secs(3)),
  ]);
  let debounce = RateLimiter::from_config(RateLimitPolicy::Debounce, &config);
  let throttle = RateLimiter::from_config(RateLimitPolicy::Throttle, &config);
  assert_eq!(debounce.duration(), Duration::from_millis(250));
  assert_eq!(debounce.policy(), RateLimitPolicy::Debounce);
  assert_eq!(throttle.duration(), Duration::from_secs(3));
  assert_eq!(throttle.policy(), RateLimitPolicy::Throttle);
}

#[tokio::test(start_paused = true)]
async fn debounce_stays_pending_until_work_finishes() {
  let limiter = RateLimiter::debounce(Duration::from_millis(100));
  let done = Arc::new(AtomicUsize::new(0));
  let cloned = Arc::clone(&done);
  limiter.execute(move || async move {
    tokio::time::sleep(Duration::from_millis(200)).await;
    cloned.fetch_add(1, Ordering::SeqCst);
  });

  tokio::time::sleep(Duration::from_millis(150)).await;
  assert!(limiter.is_pending());
  assert_eq!(done.load(Ordering::SeqCst), 0);

  tokio::time::sleep(Duration::from_millis(200)).await;
  assert_eq!(done.load(Ordering::SeqCst), 1);
  assert!(!limiter.is_pending());
}

#[tokio::test(start_paused = true)]
async fn panicking_debounced_work_returns_to_idle() {
  let limiter = RateLimiter::debounce(Duration::from_millis(10));
  limiter.execute(|| async { panic!("work failed") });
  tokio::time::sleep(Duration::from_millis(50)).await;
  assert!(!limiter.is_pending());
}

#[rstest]
#[case::debounce(RateLimitPolicy::Debounce)]
#[case::throttle(RateLimitPolicy::Throttle)]
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn execute_from_thread_without_runtime(#[case] policy: RateLimitPolicy) {
  let limiter = RateLimiter::new(policy, Duration::from_millis(10));
  let fired = Arc::new(AtomicUsize::new(0));

  let (cloned_limiter, cloned) = (limiter.clone(), Arc::clone(&fired));
  std::thread::spawn(move || {
    cloned_limiter.execute(move || async move {
      cloned.fetch_add(1, Ordering::SeqCst);
    });
  })
  .join()
  .unwrap();

  tokio::time::timeout(Duration::from_secs(1), async {
    while fired.load(Ordering::SeqCst) == 0 {
      tokio::time::sleep(Duration::from_millis(1)).await;
    }
  })
  .await
  .expect("work from a plain thread never ran");
  assert_eq!(fired.load(Ordering::SeqCst), 1);
}
