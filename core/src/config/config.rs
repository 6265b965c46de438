use std::time::Duration;

use crate::config::ConfigOption;
use crate::dispatch::DispatcherHandle;
use crate::error::ConfigError;
use crate::log::Level;
use crate::scheduler::SchedulerHandle;

#[cfg(test)]
mod tests;

pub const ENV_ENVIRONMENT: &str = "TETHER_ENV";
pub const ENV_DEBOUNCE_MS: &str = "TETHER_DEBOUNCE_MS";
pub const ENV_THROTTLE_MS: &str = "TETHER_THROTTLE_MS";
pub const ENV_LOG_PREFIX: &str = "TETHER_LOG_PREFIX";

#[derive(Debug, Clone)]
pub struct Config {
  pub delivery_dispatcher: DispatcherHandle,
  pub scheduler: SchedulerHandle,
  pub debounce_interval: Duration,
  pub throttle_interval: Duration,
  pub log_prefix: String,
  pub log_level: Level,
}

impl Default for Config {
  fn default() -> Self {
    Config {
      delivery_dispatcher: DispatcherHandle::delivery(),
      scheduler: SchedulerHandle::default(),
      debounce_interval: Duration::from_millis(300),
      throttle_interval: Duration::from_secs(1),
      log_prefix: "".to_string(),
      log_level: Level::Info,
    }
  }
}

impl Config {
  pub fn from(options: impl IntoIterator<Item = ConfigOption>) -> Config {
    let mut config = Config::default();
    for option in options {
      option.apply(&mut config);
    }
    config
  }

  /// Reads `TETHER_*` variables from the process environment.
  pub fn from_env() -> Result<Config, ConfigError> {
    Self::from_vars(std::env::vars())
  }

  /// `TETHER_ENV` selects the preset (`dev` logs at debug, `prod` or unset at
  /// info); the other variables override single fields.
  pub fn from_vars<K, V>(vars: impl IntoIterator<Item = (K, V)>) -> Result<Config, ConfigError>
  where
    K: AsRef<str>,
    V: AsRef<str>, {
    let mut options = Vec::new();
    for (key, value) in vars {
      let (key, value) = (key.as_ref(), value.as_ref());
      match key {
        ENV_ENVIRONMENT => {
          let level = match value {
            "dev" => Level::Debug,
            "prod" | "" => Level::Info,
            other => return Err(ConfigError::UnknownEnvironment(other.to_string())),
          };
          options.push(ConfigOption::with_log_level(level));
        }
        ENV_DEBOUNCE_MS => options.push(ConfigOption::with_debounce_interval(parse_millis(key, value)?)),
        ENV_THROTTLE_MS => options.push(ConfigOption::with_throttle_interval(parse_millis(key, value)?)),
        ENV_LOG_PREFIX => options.push(ConfigOption::with_log_prefix(value)),
        _ => {}
      }
    }
    Ok(Config::from(options))
  }
}

fn parse_millis(key: &str, value: &str) -> Result<Duration, ConfigError> {
  value
    .trim()
    .parse::<u64>()
    .map(Duration::from_millis)
    .map_err(|source| ConfigError::InvalidDuration {
      key: key.to_string(),
      value: value.to_string(),
      source,
    })
}
