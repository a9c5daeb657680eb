use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use uuid::Uuid;

/// The id prefix of statement pattern stages.
pub const STATEMENT_PATTERN_PREFIX: &str = "SP_";
/// The id prefix of join stages.
pub const JOIN_PREFIX: &str = "JOIN_";
/// The id prefix of projection stages.
pub const PROJECTION_PREFIX: &str = "PROJECTION_";

/// The kinds of stages that the compiler creates for algebra nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StageKind {
    StatementPattern,
    Join,
    Projection,
}

impl StageKind {
    pub fn prefix(self) -> &'static str {
        match self {
            StageKind::StatementPattern => STATEMENT_PATTERN_PREFIX,
            StageKind::Join => JOIN_PREFIX,
            StageKind::Projection => PROJECTION_PREFIX,
        }
    }
}

impl Display for StageKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            StageKind::StatementPattern => write!(f, "statement pattern"),
            StageKind::Join => write!(f, "join"),
            StageKind::Projection => write!(f, "projection"),
        }
    }
}

/// Allocates the ids of the stages of a compiled query.
///
/// Every call must return a fresh id that starts with [StageKind::prefix].
pub trait ProcessorIdGenerator: Debug {
    fn next_id(&mut self, kind: StageKind) -> String;
}

/// Generates ids that are unique across compilations by appending a random UUID to the prefix.
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidIdGenerator;

impl ProcessorIdGenerator for UuidIdGenerator {
    fn next_id(&mut self, kind: StageKind) -> String {
        format!("{}{}", kind.prefix(), Uuid::new_v4())
    }
}

/// Generates deterministic ids by appending a counter to the prefix.
///
/// The counter is shared by all stage kinds, hence the ids reflect the order in which the
/// compiler visited the nodes.
#[derive(Clone, Debug, Default)]
pub struct SequentialIdGenerator {
    next: usize,
}

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProcessorIdGenerator for SequentialIdGenerator {
    fn next_id(&mut self, kind: StageKind) -> String {
        let id = format!("{}{}", kind.prefix(), self.next);
        self.next += 1;
        id
    }
}
