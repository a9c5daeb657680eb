use rdf_streams_model::{
    BindingSet, BlankNode, NamedNodePattern, Term, TermPattern, TriplePattern,
    VisibilityBindingSet, VisibilityStatement,
};
use std::fmt;
use std::fmt::{Display, Formatter};

/// The binding name under which a blank node of a query pattern is bound.
///
/// Blank nodes in a graph pattern behave like variables that can never be projected.
pub fn anonymous_variable_name(node: &BlankNode) -> String {
    format!("_anon_{}", node.as_str())
}

/// Returns the binding names a triple pattern produces, in order of appearance and without
/// duplicates.
pub fn pattern_binding_names(pattern: &TriplePattern) -> Vec<String> {
    let mut names = Vec::with_capacity(3);
    let mut push = |name: String| {
        if !names.contains(&name) {
            names.push(name);
        }
    };

    if let Some(name) = term_pattern_binding_name(&pattern.subject) {
        push(name);
    }
    if let NamedNodePattern::Variable(variable) = &pattern.predicate {
        push(variable.as_str().to_owned());
    }
    if let Some(name) = term_pattern_binding_name(&pattern.object) {
        push(name);
    }
    names
}

fn term_pattern_binding_name(pattern: &TermPattern) -> Option<String> {
    match pattern {
        TermPattern::Variable(variable) => Some(variable.as_str().to_owned()),
        TermPattern::BlankNode(node) => Some(anonymous_variable_name(node)),
        TermPattern::NamedNode(_) | TermPattern::Literal(_) => None,
    }
}

/// Matches statements against a single triple pattern.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StatementPatternMatcher {
    pattern: TriplePattern,
}

impl StatementPatternMatcher {
    pub fn new(pattern: TriplePattern) -> Self {
        Self { pattern }
    }

    pub fn pattern(&self) -> &TriplePattern {
        &self.pattern
    }

    /// Returns the bindings produced by `statement` or [None] if the statement does not match.
    ///
    /// The result inherits the visibility of the statement.
    pub fn match_statement(&self, statement: &VisibilityStatement) -> Option<VisibilityBindingSet> {
        let triple = statement.triple();
        let mut bindings = BindingSet::new();

        let subject = Term::from(triple.subject.clone());
        if !match_term(&self.pattern.subject, &subject, &mut bindings) {
            return None;
        }

        let predicate_matches = match &self.pattern.predicate {
            NamedNodePattern::NamedNode(node) => *node == triple.predicate,
            NamedNodePattern::Variable(variable) => bind(
                &mut bindings,
                variable.as_str(),
                &Term::from(triple.predicate.clone()),
            ),
        };
        if !predicate_matches {
            return None;
        }

        if !match_term(&self.pattern.object, &triple.object, &mut bindings) {
            return None;
        }

        Some(VisibilityBindingSet::new(bindings, statement.visibility()))
    }
}

impl Display for StatementPatternMatcher {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.pattern.subject, self.pattern.predicate, self.pattern.object
        )
    }
}

fn match_term(pattern: &TermPattern, term: &Term, bindings: &mut BindingSet) -> bool {
    match pattern {
        TermPattern::NamedNode(node) => matches!(term, Term::NamedNode(t) if t == node),
        TermPattern::Literal(literal) => matches!(term, Term::Literal(t) if t == literal),
        TermPattern::BlankNode(node) => bind(bindings, &anonymous_variable_name(node), term),
        TermPattern::Variable(variable) => bind(bindings, variable.as_str(), term),
    }
}

/// Binds `name` to `term` unless `name` is already bound to a different term.
fn bind(bindings: &mut BindingSet, name: &str, term: &Term) -> bool {
    match bindings.get(name) {
        Some(existing) => existing == term,
        None => {
            bindings.insert(name, term.clone());
            true
        }
    }
}
