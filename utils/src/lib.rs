//! Leaf synchronization primitives shared by every other part of the toolkit.

pub mod collections;
pub mod concurrent;

pub use collections::*;
pub use concurrent::*;
