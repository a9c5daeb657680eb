//! Compiles a SPARQL algebra tree into the processor descriptors of a streaming topology.
//!
//! The compilation works in two steps. First, the [spargebra](rdf_streams_model::GraphPattern)
//! algebra is lowered into an [AlgebraTree], an arena in which every operator node has a stable
//! identity and knows its parent. Second, the [compiler](compile) walks the tree and creates one
//! [ProcessorEntry] for every node that becomes a stage of the topology.

mod algebra;
mod compiler;
mod error;
mod ids;
mod join_keys;
mod side;

pub use algebra::*;
pub use compiler::*;
pub use error::*;
pub use ids::*;
pub use join_keys::*;
pub use side::side_of;
