//! Concurrency coordination core for the Tether client toolkit.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod event_hub;
pub mod fan_out;
pub mod instance_cache;
pub mod log;
pub mod rate_limit;
pub mod scheduler;
pub mod subscriber;

pub use config::*;
pub use dispatch::*;
pub use error::*;
pub use event_hub::*;
pub use fan_out::*;
pub use instance_cache::*;
pub use rate_limit::*;
pub use scheduler::*;
pub use subscriber::*;

pub use tether_utils_rs::SharedValue;
