mod binding;
mod side;
mod statement;

pub use binding::*;
pub use side::*;
pub use statement::*;

// Re-export some oxrdf types.
pub use oxrdf::{
    BlankNode, BlankNodeRef, Literal, LiteralRef, NamedNode, NamedNodeRef, Quad, Subject,
    SubjectRef, Term, TermRef, Triple, TripleRef, Variable, VariableRef,
};

// Re-export the parts of the SPARQL algebra that are shared between the crates.
pub use spargebra::algebra::{Expression, GraphPattern};
pub use spargebra::term::{NamedNodePattern, TermPattern, TriplePattern};
pub use spargebra::{Query, SparqlSyntaxError};
