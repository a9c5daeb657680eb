use crate::AlgebraNodeId;

/// An error raised while compiling an [AlgebraTree](crate::AlgebraTree) into processor entries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum CompileError {
    /// The tree contains an operator that cannot be evaluated by a stream processor.
    #[error("The operator {operator} (node {node}) is not supported by the streaming engine")]
    UnsupportedOperator {
        /// The offending node.
        node: AlgebraNodeId,
        /// The name of the operator of the offending node.
        operator: &'static str,
    },
    /// There is nothing to compile.
    #[error("Cannot compile an empty algebra tree")]
    EmptyAlgebraTree,
    /// The id generator returned an id that was already assigned to another processor.
    #[error("The processor id '{0}' has been generated twice")]
    DuplicateProcessorId(String),
}

/// An error raised while building an [AlgebraTree](crate::AlgebraTree) by hand.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum AlgebraTreeError {
    #[error("The node {0} does not exist in this algebra tree")]
    UnknownNode(AlgebraNodeId),
    #[error("The node {0} already is an operand of another node")]
    OperandAlreadyAttached(AlgebraNodeId),
}
