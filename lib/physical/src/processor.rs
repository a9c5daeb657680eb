use crate::join::{JoinProcessor, JoinStateLayout};
use crate::output::OutputFormatterProcessor;
use crate::projection::ProjectionProcessor;
use crate::statement_pattern::StatementPatternProcessor;
use crate::store::KeyValueStore;
use crate::{ProcessorError, Record};
use rdf_streams_functions::join::JoinType;
use rdf_streams_functions::pattern::StatementPatternMatcher;
use rdf_streams_functions::projection::ProjectionFunction;
use rdf_streams_logical::{ProcessorCapability, ProcessorEntry};
use rdf_streams_model::Side;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};

/// Gives a [Processor] access to its surroundings while it handles a record.
pub trait ProcessorContext {
    /// Sends `record` to all children of the current processor.
    fn forward(&mut self, record: Record);

    /// Returns the state store with the given name if it is attached to the current processor.
    fn state_store(&mut self, name: &str) -> Option<&mut dyn KeyValueStore>;
}

/// Handles the records of a single node of a topology.
pub trait Processor: Debug + Send {
    fn process(
        &mut self,
        context: &mut dyn ProcessorContext,
        record: Record,
    ) -> Result<(), ProcessorError>;
}

/// Describes how to create the [Processor] of a topology node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProcessorSupplier {
    StatementPattern {
        id: String,
        matcher: StatementPatternMatcher,
        side: Option<Side>,
    },
    Join {
        id: String,
        join_type: JoinType,
        layout: JoinStateLayout,
        side: Option<Side>,
        store: String,
    },
    Projection {
        id: String,
        function: ProjectionFunction,
        side: Option<Side>,
    },
    OutputFormatter {
        id: String,
    },
}

impl ProcessorSupplier {
    /// Creates the supplier of the stage described by `entry`. Join stages use a state store with
    /// the name of the stage.
    pub fn from_entry(entry: &ProcessorEntry) -> Self {
        let id = entry.id().to_owned();
        let side = entry.side();
        match entry.capability() {
            ProcessorCapability::StatementPattern(matcher) => ProcessorSupplier::StatementPattern {
                id,
                matcher: matcher.clone(),
                side,
            },
            ProcessorCapability::Join { join_type, keys } => ProcessorSupplier::Join {
                store: id.clone(),
                id,
                join_type: *join_type,
                layout: JoinStateLayout::new(keys.clone()),
                side,
            },
            ProcessorCapability::Projection(function) => ProcessorSupplier::Projection {
                id,
                function: function.clone(),
                side,
            },
        }
    }

    /// Creates a new instance of the processor.
    pub fn get(&self) -> Box<dyn Processor> {
        match self {
            ProcessorSupplier::StatementPattern { id, matcher, side } => Box::new(
                StatementPatternProcessor::new(id.clone(), matcher.clone(), *side),
            ),
            ProcessorSupplier::Join {
                id,
                join_type,
                layout,
                side,
                store,
            } => Box::new(JoinProcessor::new(
                id.clone(),
                join_type.iterative_join(),
                layout.clone(),
                *side,
                store.clone(),
            )),
            ProcessorSupplier::Projection { id, function, side } => Box::new(
                ProjectionProcessor::new(id.clone(), function.clone(), *side),
            ),
            ProcessorSupplier::OutputFormatter { id } => {
                Box::new(OutputFormatterProcessor::new(id.clone()))
            }
        }
    }
}

impl Display for ProcessorSupplier {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ProcessorSupplier::StatementPattern { matcher, side, .. } => {
                write!(f, "StatementPattern{}: {matcher}", SideSuffix(*side))
            }
            ProcessorSupplier::Join {
                join_type,
                layout,
                side,
                ..
            } => write!(
                f,
                "Join{} ({join_type}): join_vars=[{}] all_vars=[{}]",
                SideSuffix(*side),
                layout.keys().join_vars().join(", "),
                layout.keys().all_vars().join(", ")
            ),
            ProcessorSupplier::Projection { function, side, .. } => {
                write!(f, "Projection{}: {function}", SideSuffix(*side))
            }
            ProcessorSupplier::OutputFormatter { .. } => write!(f, "OutputFormatter"),
        }
    }
}

struct SideSuffix(Option<Side>);

impl Display for SideSuffix {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(side) => write!(f, "[{side}]"),
            None => Ok(()),
        }
    }
}
