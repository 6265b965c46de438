mod subscriber_id;
mod subscriber_registry;

pub use self::{subscriber_id::*, subscriber_registry::*};
