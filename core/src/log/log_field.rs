use std::fmt::{Display, Formatter};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum LogValue {
  Bool(bool),
  Int(i64),
  Float(f64),
  String(String),
  Duration(Duration),
}

impl Display for LogValue {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      LogValue::Bool(v) => write!(f, "{}", v),
      LogValue::Int(v) => write!(f, "{}", v),
      LogValue::Float(v) => write!(f, "{}", v),
      LogValue::String(v) => write!(f, "{:?}", v),
      LogValue::Duration(v) => write!(f, "{:?}", v),
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogField {
  pub key: String,
  pub value: LogValue,
}

impl LogField {
  pub fn new(key: impl Into<String>, value: LogValue) -> Self {
    Self { key: key.into(), value }
  }

  pub fn bool(key: impl Into<String>, value: bool) -> Self {
    Self::new(key, LogValue::Bool(value))
  }

  pub fn int(key: impl Into<String>, value: i64) -> Self {
    Self::new(key, LogValue::Int(value))
  }

  pub fn float(key: impl Into<String>, value: f64) -> Self {
    Self::new(key, LogValue::Float(value))
  }

  pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
    Self::new(key, LogValue::String(value.into()))
  }

  pub fn duration(key: impl Into<String>, value: Duration) -> Self {
    Self::new(key, LogValue::Duration(value))
  }
}

impl Display for LogField {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}={}", self.key, self.value)
  }
}
