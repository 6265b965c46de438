use std::fmt::{Debug, Formatter};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A value guarded by a multiple-reader/single-writer lock.
///
/// Readers proceed in parallel; `mutate` has exclusive access for the
/// duration of its closure. The lock is never held across an `.await` or a
/// user callback that could re-enter the container, so blocking on it is
/// always short.
///
/// Calling `read`/`mutate` on the same container from inside a `mutate`
/// closure deadlocks. That is a caller error and is not detected.
///
/// A panic inside an earlier `mutate` does not poison the value: later
/// callers observe whatever state the panicking closure left behind.
pub struct SharedValue<T> {
  inner: RwLock<T>,
}

impl<T> SharedValue<T> {
  pub fn new(value: T) -> Self {
    Self {
      inner: RwLock::new(value),
    }
  }

  fn read_guard(&self) -> RwLockReadGuard<'_, T> {
    self.inner.read().unwrap_or_else(PoisonError::into_inner)
  }

  fn write_guard(&self) -> RwLockWriteGuard<'_, T> {
    self.inner.write().unwrap_or_else(PoisonError::into_inner)
  }

  /// Returns a copy of the current value.
  pub fn read(&self) -> T
  where
    T: Clone, {
    self.read_guard().clone()
  }

  /// Runs `f` against a shared view of the value.
  ///
  /// Prefer this over [`SharedValue::read`] when `T` is expensive to clone.
  pub fn read_with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
    let guard = self.read_guard();
    f(&guard)
  }

  /// Runs `f` with exclusive access to the value and returns its result.
  pub fn mutate<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
    let mut guard = self.write_guard();
    f(&mut guard)
  }

  pub fn replace(&self, value: T) -> T {
    self.mutate(|current| std::mem::replace(current, value))
  }

  pub fn take(&self) -> T
  where
    T: Default, {
    self.mutate(std::mem::take)
  }

  pub fn into_inner(self) -> T {
    self.inner.into_inner().unwrap_or_else(PoisonError::into_inner)
  }
}

impl<T: Default> Default for SharedValue<T> {
  fn default() -> Self {
    Self::new(T::default())
  }
}

impl<T> From<T> for SharedValue<T> {
  fn from(value: T) -> Self {
    Self::new(value)
  }
}

impl<T: Debug> Debug for SharedValue<T> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    self.read_with(|value| f.debug_struct("SharedValue").field("value", value).finish())
  }
}
