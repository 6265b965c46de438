use num_enum::TryFromPrimitive;

#[derive(Debug, Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash, TryFromPrimitive)]
#[repr(i32)]
pub enum Level {
  Min = 0,
  Debug = 1,
  Info = 2,
  Warn = 3,
  Error = 4,
  Off = 5,
}

impl std::fmt::Display for Level {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let str = match self {
      Level::Min => "-    ",
      Level::Debug => "DEBUG",
      Level::Info => "INFO ",
      Level::Warn => "WARN ",
      Level::Error => "ERROR",
      Level::Off => "-    ",
    };
    write!(f, "{}", str)
  }
}
