//! Config Rendering
//!
//! Turns a [`ResourceSnapshot`](crate::ResourceSnapshot) into the text
//! format understood by drbd-utils.

pub mod renderer;

pub use renderer::*;
