use super::*;
use crate::dispatch::TokioRuntimeContextDispatcher;

#[test]
fn defaults() {
  let config = Config::default();
  assert_eq!(config.debounce_interval, Duration::from_millis(300));
  assert_eq!(config.throttle_interval, Duration::from_secs(1));
  assert_eq!(config.log_prefix, "");
  assert_eq!(config.log_level, Level::Info);
  assert!(format!("{:?}", config.delivery_dispatcher).contains("SerialDispatcher"));
}

#[test]
fn options_are_applied_in_order() {
  let config = Config::from([
    ConfigOption::with_log_prefix("first"),
    ConfigOption::with_debounce_interval(Duration::from_millis(50)),
    ConfigOption::with_log_prefix("second"),
    ConfigOption::with_delivery_dispatcher(DispatcherHandle::new(TokioRuntimeContextDispatcher::new())),
  ]);
  assert_eq!(config.log_prefix, "second");
  assert_eq!(config.debounce_interval, Duration::from_millis(50));
  assert!(format!("{:?}", config.delivery_dispatcher).contains("TokioRuntimeContextDispatcher"));
}

#[test]
fn from_vars_reads_known_keys() {
  let config = Config::from_vars([
    (ENV_ENVIRONMENT, "dev"),
    (ENV_DEBOUNCE_MS, "120"),
    (ENV_THROTTLE_MS, " 2000 "),
    (ENV_LOG_PREFIX, "[app]"),
    ("UNRELATED", "ignored"),
  ])
  .unwrap();
  assert_eq!(config.log_level, Level::Debug);
  assert_eq!(config.debounce_interval, Duration::from_millis(120));
  assert_eq!(config.throttle_interval, Duration::from_secs(2));
  assert_eq!(config.log_prefix, "[app]");
}

#[test]
fn from_vars_rejects_bad_values() {
  let error = Config::from_vars([(ENV_DEBOUNCE_MS, "soon")]).unwrap_err();
  assert!(matches!(error, ConfigError::InvalidDuration { ref key, .. } if key == ENV_DEBOUNCE_MS));

  let error = Config::from_vars([(ENV_ENVIRONMENT, "staging")]).unwrap_err();
  assert_eq!(error, ConfigError::UnknownEnvironment("staging".to_string()));
}
