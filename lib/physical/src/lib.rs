//! Contains the processors, the state stores, and the topology model of [RDF Streams](../../rdf-streams).
//!
//! The [assembler](assemble) turns a [CompiledQuery](rdf_streams_logical::CompiledQuery) into a
//! [Topology](topology::Topology) whose processor nodes can be instantiated by an engine.

mod assembler;
mod error;
pub mod join;
mod output;
mod processor;
mod projection;
mod record;
mod statement_pattern;
pub mod store;
pub mod topology;

pub use assembler::*;
pub use error::*;
pub use output::OutputFormatterProcessor;
pub use processor::*;
pub use projection::ProjectionProcessor;
pub use record::*;
pub use statement_pattern::StatementPatternProcessor;
