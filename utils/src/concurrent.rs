mod count_down_latch;
mod shared_value;

pub use self::{count_down_latch::*, shared_value::*};
