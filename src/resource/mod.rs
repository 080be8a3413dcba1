//! Resource Module
//!
//! The DRBD resource entity model: a named group of hosts sharing one TCP
//! port, each host carrying its own volumes. Volumes live under the host
//! they belong to, so volume ids, backing devices and minors only have to
//! be unique per host.

pub mod model;
pub mod spec;

pub use model::*;
pub use spec::*;
