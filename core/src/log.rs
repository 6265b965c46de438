//! Logging façade whose sinks are subscribers of an [`EventHub`](crate::event_hub::EventHub).

mod level;
mod log_event;
mod log_field;
mod log_hub;
mod logger;

pub use self::{level::*, log_event::*, log_field::*, log_hub::*, logger::*};
