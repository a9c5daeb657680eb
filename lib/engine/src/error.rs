use rdf_streams_physical::ProcessorError;

/// An error raised while the [LocalDriver](crate::LocalDriver) pushes a record through a topology.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum DriverError {
    #[error(transparent)]
    Processor(#[from] ProcessorError),
    #[error("The topology does not contain a node with the name '{0}'")]
    UnknownNode(String),
    #[error("The node '{node}' cannot receive a {record} record")]
    UnexpectedRecord { node: String, record: &'static str },
}
