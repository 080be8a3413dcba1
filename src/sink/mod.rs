//! Config Sinks
//!
//! Implementations of the config sink ports.

mod file;
mod memory;

pub use file::{FileSink, DEFAULT_FILE_MODE};
pub use memory::MemorySink;
