use std::fmt::{Display, Formatter};
use std::panic::Location;

/// Separator between an owner prefix and the rest of an identity.
pub const SUBSCRIBER_ID_SEPARATOR: char = '.';

/// Identity of a registered handler.
///
/// Two subscribers are the same for removal purposes when their ids are equal,
/// whatever their handlers are. Ids only need to be unique within one registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(String);

impl SubscriberId {
  /// Builds `owner.tag`, so the subscriber can later be removed with
  /// `remove_by_prefix(owner)`.
  pub fn new(owner: impl AsRef<str>, tag: impl Display) -> Self {
    Self(format!("{}{}{}", owner.as_ref(), SUBSCRIBER_ID_SEPARATOR, tag))
  }

  /// Identity derived from the declaration site of the caller: `file.line`.
  #[track_caller]
  pub fn caller() -> Self {
    Self::from_location(Location::caller())
  }

  pub fn from_location(location: &Location<'_>) -> Self {
    Self::new(location.file(), location.line())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// `true` when this id was built with `owner` as its prefix.
  pub fn has_owner(&self, owner: &str) -> bool {
    self
      .0
      .strip_prefix(owner)
      .is_some_and(|rest| rest.starts_with(SUBSCRIBER_ID_SEPARATOR))
  }
}

impl Display for SubscriberId {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for SubscriberId {
  fn from(value: &str) -> Self {
    Self(value.to_string())
  }
}

impl From<String> for SubscriberId {
  fn from(value: String) -> Self {
    Self(value)
  }
}
