use std::fmt::{Display, Formatter};

use time::OffsetDateTime;

use crate::log::{Level, LogField};

#[derive(Debug, Clone)]
pub struct LogEvent {
  pub time: OffsetDateTime,
  pub level: Level,
  pub prefix: String,
  pub message: String,
  pub context: Vec<LogField>,
  pub fields: Vec<LogField>,
}

impl LogEvent {
  pub fn new(level: Level, message: impl Into<String>) -> Self {
    LogEvent {
      time: OffsetDateTime::now_utc(),
      level,
      prefix: String::new(),
      message: message.into(),
      context: Vec::new(),
      fields: Vec::new(),
    }
  }

  /// Context fields followed by the event's own fields.
  pub fn all_fields(&self) -> impl Iterator<Item = &LogField> {
    self.context.iter().chain(self.fields.iter())
  }
}

// Renders as `LEVEL prefix message key=value ...`, without the timestamp.
impl Display for LogEvent {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.level)?;
    if !self.prefix.is_empty() {
      write!(f, " {}", self.prefix)?;
    }
    write!(f, " {}", self.message)?;
    for field in self.all_fields() {
      write!(f, " {}", field)?;
    }
    Ok(())
  }
}
