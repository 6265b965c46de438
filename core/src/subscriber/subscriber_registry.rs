use std::fmt::{Debug, Formatter};

use tether_utils_rs::SharedValue;

use crate::subscriber::SubscriberId;


#[derive(Clone)]
struct Entry<H> {
  id: SubscriberId,
  handler: H,
}

struct Entries<H> {
  recurring: Vec<Entry<H>>,
  one_shot: Vec<Entry<H>>,
}

impl<H> Entries<H> {
  fn retain(&mut self, keep: impl Fn(&SubscriberId) -> bool) -> usize {
    let before = self.recurring.len() + self.one_shot.len();
    self.recurring.retain(|entry| keep(&entry.id));
    self.one_shot.retain(|entry| keep(&entry.id));
    before - (self.recurring.len() + self.one_shot.len())
  }
}

/// Handlers taken out of a registry for one notification.
///
/// Recurring handlers come first, then the drained one-shot handlers, each
/// group in registration order.
#[derive(Debug, Clone)]
pub struct Delivery<H> {
  pub recurring: Vec<H>,
  pub one_shot: Vec<H>,
}

impl<H> Delivery<H> {
  pub fn len(&self) -> usize {
    self.recurring.len() + self.one_shot.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

impl<H> IntoIterator for Delivery<H> {
  type IntoIter = std::iter::Chain<std::vec::IntoIter<H>, std::vec::IntoIter<H>>;
  type Item = H;

  fn into_iter(self) -> Self::IntoIter {
    self.recurring.into_iter().chain(self.one_shot)
  }
}

/// Ordered collection of `(identity, handler)` pairs.
///
/// The registry never invokes handlers itself: [`SubscriberRegistry::snapshot`]
/// copies them out so callers can run them after the lock is released.
pub struct SubscriberRegistry<H> {
  entries: SharedValue<Entries<H>>,
}

impl<H: Clone> SubscriberRegistry<H> {
  pub fn new() -> Self {
    Self {
      entries: SharedValue::new(Entries {
        recurring: Vec::new(),
        one_shot: Vec::new(),
      }),
    }
  }

  /// Registers a handler that stays until removed.
  pub fn add(&self, id: impl Into<SubscriberId>, handler: H) {
    let id = id.into();
    tracing::debug!(subscriber = %id, "subscriber added");
    self.entries.mutate(|entries| entries.recurring.push(Entry { id, handler }));
  }

  /// Registers a handler that is removed the first time it is delivered.
  /// The identity is the caller's declaration site.
  #[track_caller]
  pub fn add_one_shot(&self, handler: H) -> SubscriberId {
    let id = SubscriberId::caller();
    self.add_one_shot_with_id(id.clone(), handler);
    id
  }

  pub fn add_one_shot_with_id(&self, id: impl Into<SubscriberId>, handler: H) {
    let id = id.into();
    tracing::debug!(subscriber = %id, "one-shot subscriber added");
    self.entries.mutate(|entries| entries.one_shot.push(Entry { id, handler }));
  }

  /// Removes every entry registered under `id`. Returns how many were removed.
  pub fn remove(&self, id: &SubscriberId) -> usize {
    let removed = self.entries.mutate(|entries| entries.retain(|entry| entry != id));
    if removed > 0 {
      tracing::debug!(subscriber = %id, removed, "subscriber removed");
    }
    removed
  }

  /// Removes every entry whose identity is `prefix` followed by the separator.
  pub fn remove_by_prefix(&self, prefix: &str) -> usize {
    let removed = self
      .entries
      .mutate(|entries| entries.retain(|entry| !entry.has_owner(prefix)));
    if removed > 0 {
      tracing::debug!(prefix, removed, "subscribers removed by prefix");
    }
    removed
  }

  /// Copies the recurring handlers, then atomically drains the one-shot ones.
  ///
  /// The drain is a single exclusive operation, so when several snapshots
  /// race each one-shot handler ends up in exactly one of them.
  pub fn snapshot(&self) -> Delivery<H> {
    let recurring = self.entries.read_with(|entries| {
      entries
        .recurring
        .iter()
        .map(|entry| entry.handler.clone())
        .collect::<Vec<_>>()
    });
    let one_shot = self
      .entries
      .mutate(|entries| std::mem::take(&mut entries.one_shot))
      .into_iter()
      .map(|entry| entry.handler)
      .collect();
    Delivery { recurring, one_shot }
  }

  pub fn clear(&self) {
    self.entries.mutate(|entries| {
      entries.recurring.clear();
      entries.one_shot.clear();
    });
  }

  pub fn contains(&self, id: &SubscriberId) -> bool {
    self.entries.read_with(|entries| {
      entries
        .recurring
        .iter()
        .chain(entries.one_shot.iter())
        .any(|entry| &entry.id == id)
    })
  }

  /// Identities in registration order, recurring first.
  pub fn ids(&self) -> Vec<SubscriberId> {
    self.entries.read_with(|entries| {
      entries
        .recurring
        .iter()
        .chain(entries.one_shot.iter())
        .map(|entry| entry.id.clone())
        .collect()
    })
  }

  pub fn len(&self) -> usize {
    self
      .entries
      .read_with(|entries| entries.recurring.len() + entries.one_shot.len())
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

impl<H: Clone> Default for SubscriberRegistry<H> {
  fn default() -> Self {
    Self::new()
  }
}

impl<H: Clone> Debug for SubscriberRegistry<H> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("SubscriberRegistry").field("ids", &self.ids()).finish()
  }
}
