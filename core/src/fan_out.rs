mod fan_out_joiner;
mod join_error;
mod operation;

pub use self::{fan_out_joiner::*, join_error::*, operation::*};
