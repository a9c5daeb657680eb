use oxrdf::Triple;
use std::fmt;
use std::fmt::{Display, Formatter};

/// A statement that arrives on the input stream of a query, guarded by a visibility expression.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct VisibilityStatement {
    triple: Triple,
    visibility: String,
}

impl VisibilityStatement {
    pub fn new(triple: impl Into<Triple>, visibility: impl Into<String>) -> Self {
        Self {
            triple: triple.into(),
            visibility: visibility.into(),
        }
    }

    /// Creates a statement that is visible to everyone.
    pub fn unrestricted(triple: impl Into<Triple>) -> Self {
        Self::new(triple, String::new())
    }

    pub fn triple(&self) -> &Triple {
        &self.triple
    }

    pub fn visibility(&self) -> &str {
        &self.visibility
    }
}

impl Display for VisibilityStatement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.visibility.is_empty() {
            write!(f, "{}", self.triple)
        } else {
            write!(f, "{} [{}]", self.triple, self.visibility)
        }
    }
}
