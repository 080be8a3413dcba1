//! Allocation Module
//!
//! Hands out free TCP ports, device minors and node-ids from bounded ranges.
//! [`allocate`] is the stateless hole-finding algorithm; [`NumberPool`]
//! wraps it with a lock and remembers every number it issued.

pub mod allocator;
pub mod pool;

pub use allocator::*;
pub use pool::*;
