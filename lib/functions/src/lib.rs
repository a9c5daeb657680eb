//! Functions over binding sets that are shared by the processors of a streaming query.
//!
//! Everything in this crate is pure: the functions neither keep state across calls nor know about
//! the topology they are executed in.

pub mod join;
pub mod pattern;
pub mod projection;
mod visibility;

pub use visibility::combine_visibilities;
