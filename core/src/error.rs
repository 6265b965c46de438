use std::num::ParseIntError;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
  #[error("Unknown environment: {0}")]
  UnknownEnvironment(String),
  #[error("Invalid duration for {key}: {value:?}")]
  InvalidDuration {
    key: String,
    value: String,
    #[source]
    source: ParseIntError,
  },
}

static_assertions::assert_impl_all!(ConfigError: Send, Sync);
