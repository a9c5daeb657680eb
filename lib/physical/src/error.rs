use rdf_streams_logical::AlgebraNodeId;

/// An error raised while wiring a [Topology](crate::topology::Topology).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum TopologyBuilderError {
    #[error("A node with the name '{0}' has already been added to the topology")]
    DuplicateNode(String),
    #[error("The node '{node}' refers to the unknown parent '{parent}'")]
    UnknownParent { node: String, parent: String },
    #[error("The state store '{store}' is attached to '{processor}', which is not a processor of the topology")]
    UnknownProcessor { store: String, processor: String },
    #[error("A state store with the name '{0}' has already been added to the topology")]
    DuplicateStore(String),
    /// An upstream node of a compiled stage has not been assigned a stage id. This indicates an
    /// inconsistency between the compiled entries and their id map.
    #[error("The stage '{stage}' depends on the node {node}, which has no stage")]
    UnknownUpstream { stage: String, node: AlgebraNodeId },
    #[error("The compiled query does not contain any stage")]
    EmptyQuery,
}

/// An error raised while a processor handles a record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ProcessorError {
    #[error("The processor '{processor}' requires the state store '{store}', which is not available")]
    MissingStateStore { processor: String, store: String },
    #[error("The processor '{processor}' cannot handle a {record} record")]
    UnexpectedRecord {
        processor: String,
        record: &'static str,
    },
}
