mod config_option;
#[allow(clippy::module_inception)]
mod config;

pub use self::{config::*, config_option::*};
