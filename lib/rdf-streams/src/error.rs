use rdf_streams_logical::CompileError;
use rdf_streams_model::SparqlSyntaxError;
use rdf_streams_physical::TopologyBuilderError;

/// An error raised while turning a query into a [Topology](crate::physical::topology::Topology).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TopologyFactoryError {
    /// The query is malformed.
    #[error(transparent)]
    Parsing(#[from] SparqlSyntaxError),
    /// The query is well-formed, but it cannot be evaluated over a stream.
    #[error("Only SELECT queries without a dataset clause can be evaluated over a stream, found {0}")]
    UnsupportedQueryForm(&'static str),
    /// The query uses an operator that has no stream processor.
    #[error(transparent)]
    Compile(#[from] CompileError),
    /// The compiled stages could not be wired into a topology.
    #[error(transparent)]
    Topology(#[from] TopologyBuilderError),
}
