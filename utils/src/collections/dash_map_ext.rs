use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::hash::Hash;

pub trait DashMapExtension<K: Eq + Hash, V: Clone> {
  /// Returns the stored value for `key`, building and storing one with `init` if absent.
  ///
  /// The boolean is `true` when the value was already present. `init` runs
  /// while the shard is locked and must not touch the same map.
  fn load_or_insert_with(&self, key: K, init: impl FnOnce() -> V) -> (V, bool);
}

impl<K: Eq + Hash, V: Clone> DashMapExtension<K, V> for DashMap<K, V> {
  fn load_or_insert_with(&self, key: K, init: impl FnOnce() -> V) -> (V, bool) {
    match self.entry(key) {
      Entry::Occupied(entry) => (entry.get().clone(), true),
      Entry::Vacant(entry) => (entry.insert(init()).clone(), false),
    }
  }
}
