use std::any::{Any, TypeId};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use dashmap::DashMap;
use tether_utils_rs::DashMapExtension;


type InstanceKey = (TypeId, String);
type Instance = Arc<dyn Any + Send + Sync>;

/// Lazily constructed shared instances, keyed by type and name.
///
/// Replaces process-wide singletons with a value the application owns and
/// passes around. Clones share storage.
#[derive(Clone, Default)]
pub struct InstanceCache {
  instances: Arc<DashMap<InstanceKey, Instance>>,
}

impl InstanceCache {
  pub fn new() -> Self {
    Self::default()
  }

  /// Returns the instance stored for `(T, key)`, building it with `factory` on first use.
  ///
  /// Concurrent first calls construct at most one instance; every caller gets the stored one.
  /// `factory` must not use this cache.
  pub fn get_or_init<T, F>(&self, key: &str, factory: F) -> Arc<T>
  where
    T: Send + Sync + 'static,
    F: FnOnce() -> T, {
    let (instance, loaded) = self
      .instances
      .load_or_insert_with((TypeId::of::<T>(), key.to_string()), || Arc::new(factory()) as Instance);
    if !loaded {
      tracing::debug!(key, type_name = std::any::type_name::<T>(), "instance created");
    }
    instance
      .downcast::<T>()
      .unwrap_or_else(|_| unreachable!("instance keyed by a different TypeId"))
  }

  pub fn get<T>(&self, key: &str) -> Option<Arc<T>>
  where
    T: Send + Sync + 'static, {
    let instance = self.instances.get(&(TypeId::of::<T>(), key.to_string()))?.clone();
    instance.downcast::<T>().ok()
  }

  pub fn remove<T>(&self, key: &str) -> Option<Arc<T>>
  where
    T: Send + Sync + 'static, {
    let (_, instance) = self.instances.remove(&(TypeId::of::<T>(), key.to_string()))?;
    instance.downcast::<T>().ok()
  }

  pub fn len(&self) -> usize {
    self.instances.len()
  }

  pub fn is_empty(&self) -> bool {
    self.instances.is_empty()
  }

  /// Drops every cached instance. Handles already given out stay valid.
  pub fn reset(&self) {
    self.instances.clear();
  }
}

impl Debug for InstanceCache {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("InstanceCache").field("len", &self.len()).finish()
  }
}
