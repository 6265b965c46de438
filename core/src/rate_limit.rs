mod rate_limiter;

pub use self::rate_limiter::*;
