//! Fan-out of events to many independent subscribers.

mod event_handler;
#[allow(clippy::module_inception)]
mod event_hub;

pub use self::{event_handler::*, event_hub::*};
