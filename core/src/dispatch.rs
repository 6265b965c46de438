//! Delivery executors: "run this callback on the designated context".

mod dispatcher;

pub use self::dispatcher::*;
