use rdf_streams_model::{Side, VisibilityBindingSet, VisibilityStatement};
use std::fmt;
use std::fmt::{Display, Formatter};

/// The output of a stage that evaluates an algebra node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProcessorResult {
    /// A result of a stage that does not feed a binary stage.
    Unary(VisibilityBindingSet),
    /// A result of a stage that feeds the `side` input of a binary stage.
    Binary {
        side: Side,
        result: VisibilityBindingSet,
    },
}

impl ProcessorResult {
    /// Creates a [ProcessorResult::Binary] if `side` is present and a [ProcessorResult::Unary]
    /// otherwise.
    pub fn new(side: Option<Side>, result: VisibilityBindingSet) -> Self {
        match side {
            Some(side) => ProcessorResult::Binary { side, result },
            None => ProcessorResult::Unary(result),
        }
    }

    pub fn side(&self) -> Option<Side> {
        match self {
            ProcessorResult::Unary(_) => None,
            ProcessorResult::Binary { side, .. } => Some(*side),
        }
    }

    pub fn result(&self) -> &VisibilityBindingSet {
        match self {
            ProcessorResult::Unary(result) | ProcessorResult::Binary { result, .. } => result,
        }
    }

    pub fn into_result(self) -> VisibilityBindingSet {
        match self {
            ProcessorResult::Unary(result) | ProcessorResult::Binary { result, .. } => result,
        }
    }
}

impl Display for ProcessorResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ProcessorResult::Unary(result) => write!(f, "{result}"),
            ProcessorResult::Binary { side, result } => write!(f, "{side}: {result}"),
        }
    }
}

/// A record that flows along the edges of a topology.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Record {
    /// An input statement, as read from the statement topic.
    Statement(VisibilityStatement),
    /// An intermediate result.
    Result(ProcessorResult),
    /// A final result, as written to the result topic.
    Binding(VisibilityBindingSet),
}

impl Record {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Record::Statement(_) => "statement",
            Record::Result(_) => "processor result",
            Record::Binding(_) => "binding set",
        }
    }
}

impl Display for Record {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Record::Statement(statement) => write!(f, "{statement}"),
            Record::Result(result) => write!(f, "{result}"),
            Record::Binding(binding) => write!(f, "{binding}"),
        }
    }
}
