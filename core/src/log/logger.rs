use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

use crate::config::Config;
use crate::log::{Level, LogEvent, LogField, LogHub};


/// Leveled logger that publishes to a [`LogHub`] and mirrors every enabled
/// record to `tracing`.
///
/// Loggers derived with [`Logger::with`] share the level of their parent.
#[derive(Debug, Clone)]
pub struct Logger {
  hub: LogHub,
  level: Arc<AtomicI32>,
  prefix: String,
  context: Vec<LogField>,
}

impl Logger {
  pub fn new(hub: LogHub, level: Level, prefix: &str, context: Vec<LogField>) -> Self {
    Logger {
      hub,
      level: Arc::new(AtomicI32::new(level as i32)),
      prefix: prefix.to_string(),
      context,
    }
  }

  pub fn from_config(hub: LogHub, config: &Config) -> Self {
    Self::new(hub, config.log_level, &config.log_prefix, Vec::new())
  }

  pub fn with(&self, fields: Vec<LogField>) -> Self {
    let mut context = self.context.clone();
    context.extend(fields);
    Logger {
      hub: self.hub.clone(),
      level: Arc::clone(&self.level),
      prefix: self.prefix.clone(),
      context,
    }
  }

  pub fn level(&self) -> Level {
    Level::try_from(self.level.load(Ordering::Relaxed)).unwrap_or(Level::Info)
  }

  pub fn set_level(&self, level: Level) {
    self.level.store(level as i32, Ordering::Relaxed);
  }

  pub fn context(&self) -> &[LogField] {
    &self.context
  }

  pub fn is_enabled(&self, level: Level) -> bool {
    level != Level::Off && self.level() <= level
  }

  pub async fn debug(&self, msg: &str, fields: Vec<LogField>) {
    self.log(Level::Debug, msg, fields).await
  }

  pub async fn info(&self, msg: &str, fields: Vec<LogField>) {
    self.log(Level::Info, msg, fields).await
  }

  pub async fn warn(&self, msg: &str, fields: Vec<LogField>) {
    self.log(Level::Warn, msg, fields).await
  }

  pub async fn error(&self, msg: &str, fields: Vec<LogField>) {
    self.log(Level::Error, msg, fields).await
  }

  pub async fn log(&self, level: Level, msg: &str, fields: Vec<LogField>) {
    if !self.is_enabled(level) {
      return;
    }
    let event = LogEvent {
      prefix: self.prefix.clone(),
      context: self.context.clone(),
      fields,
      ..LogEvent::new(level, msg)
    };
    match level {
      Level::Min | Level::Debug => tracing::debug!("{}", event),
      Level::Info => tracing::info!("{}", event),
      Level::Warn => tracing::warn!("{}", event),
      Level::Error => tracing::error!("{}", event),
      Level::Off => {}
    }
    self.hub.publish(event).await;
  }
}
