//! Executes [RDF Streams](../../rdf-streams) topologies within the current process.
//!
//! The [LocalDriver] is the reference engine of the workspace. It processes one record at a time
//! and keeps all state in memory, which makes it suitable for tests and for evaluating queries
//! over finite inputs.

mod driver;
pub mod error;

pub use driver::LocalDriver;
