use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tether_utils_rs::SharedValue;
use tokio::sync::oneshot;

use crate::config::Config;
use crate::dispatch::Runnable;
use crate::fan_out::{JoinError, Operation};
use crate::scheduler::{Scheduler, SchedulerHandle};


pub type JoinResults<T, E> = Vec<Result<T, JoinError<E>>>;

type Completion<T, E> = Box<dyn FnOnce(JoinResults<T, E>) + Send + Sync + 'static>;

struct JoinState<T, E> {
  slots: JoinResults<T, E>,
  completed: usize,
  completion: Option<Completion<T, E>>,
}

/// Runs independent operations concurrently and collects their results in input order.
///
/// Every operation always runs to completion; a failure or panic is recorded
/// in its own slot and never affects its siblings. There is no fail-fast mode
/// and no cancellation: callers that need a deadline put it on each operation.
///
/// Results live in a [`SharedValue`] until the join completes, so result,
/// error and completion types must be `Sync` as well as `Send`.
#[derive(Debug, Clone, Default)]
pub struct FanOutJoiner {
  scheduler: SchedulerHandle,
}

impl FanOutJoiner {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_scheduler(scheduler: SchedulerHandle) -> Self {
    Self { scheduler }
  }

  pub fn from_config(config: &Config) -> Self {
    Self::with_scheduler(config.scheduler.clone())
  }

  /// Launches every operation and calls `completion` exactly once, from the
  /// task that fills the last slot, with results indexed like `operations`.
  ///
  /// An empty input completes immediately on the calling thread.
  pub fn join_all_with<T, E, C>(&self, operations: impl IntoIterator<Item = Operation<T, E>>, completion: C)
  where
    T: Send + Sync + 'static,
    E: Send + Sync + 'static,
    C: FnOnce(JoinResults<T, E>) + Send + Sync + 'static, {
    let operations = operations.into_iter().collect::<Vec<_>>();
    let total = operations.len();
    if total == 0 {
      completion(Vec::new());
      return;
    }

    let slots = operations
      .iter()
      .enumerate()
      .map(|(index, operation)| {
        Err(JoinError::NotCompleted {
          index,
          name: operation.name.clone(),
        })
      })
      .collect();
    let state = Arc::new(SharedValue::new(JoinState {
      slots,
      completed: 0,
      completion: Some(Box::new(completion) as Completion<T, E>),
    }));

    tracing::debug!(total, "fan-out started");
    for (index, operation) in operations.into_iter().enumerate() {
      let state = Arc::clone(&state);
      self.scheduler.spawn(Runnable::new(move || async move {
        let Operation { name, future } = operation;
        let result = match AssertUnwindSafe(future).catch_unwind().await {
          Ok(Ok(value)) => Ok(value),
          Ok(Err(error)) => Err(JoinError::Failed { index, name, error }),
          Err(_) => {
            tracing::error!(index, operation = %name, "fan-out operation panicked");
            Err(JoinError::Panicked { index, name })
          }
        };

        let finished = state.mutate(|state| {
          debug_assert!(matches!(state.slots[index], Err(JoinError::NotCompleted { .. })));
          state.slots[index] = result;
          state.completed += 1;
          if state.completed == total {
            state
              .completion
              .take()
              .map(|completion| (completion, std::mem::take(&mut state.slots)))
          } else {
            None
          }
        });

        if let Some((completion, results)) = finished {
          tracing::debug!(total, "fan-out joined");
          completion(results);
        }
      }));
    }
  }

  /// Awaiting form of [`FanOutJoiner::join_all_with`].
  ///
  /// If the runtime drops the operations before they report, the slots come
  /// back as [`JoinError::NotCompleted`].
  pub async fn join_all<T, E>(&self, operations: impl IntoIterator<Item = Operation<T, E>>) -> JoinResults<T, E>
  where
    T: Send + Sync + 'static,
    E: Send + Sync + 'static, {
    let operations = operations.into_iter().collect::<Vec<_>>();
    let names = operations
      .iter()
      .map(|operation| operation.name.clone())
      .collect::<Vec<_>>();
    let (sender, receiver) = oneshot::channel();
    self.join_all_with(operations, move |results| {
      let _ = sender.send(results);
    });
    receiver.await.unwrap_or_else(|_| {
      tracing::warn!("fan-out dropped before completion");
      names
        .into_iter()
        .enumerate()
        .map(|(index, name)| Err(JoinError::NotCompleted { index, name }))
        .collect()
    })
  }
}
