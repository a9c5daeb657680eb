use oxrdf::Term;
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;
use std::fmt::{Display, Formatter};

/// A mapping from binding names (query variables without the leading `?`) to RDF terms.
///
/// Bindings are kept ordered by name such that two binding sets with the same content always
/// iterate, print, and compare identically.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct BindingSet {
    bindings: BTreeMap<String, Term>,
}

impl BindingSet {
    /// Creates an empty binding set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` to `term`, returning the previously bound term.
    pub fn insert(&mut self, name: impl Into<String>, term: Term) -> Option<Term> {
        self.bindings.insert(name.into(), term)
    }

    /// Returns the term bound to `name`.
    pub fn get(&self, name: &str) -> Option<&Term> {
        self.bindings.get(name)
    }

    /// Returns whether `name` is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// The bound names in ascending order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Term> {
        self.bindings.iter()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl<N: Into<String>> FromIterator<(N, Term)> for BindingSet {
    fn from_iter<T: IntoIterator<Item = (N, Term)>>(iter: T) -> Self {
        Self {
            bindings: iter
                .into_iter()
                .map(|(name, term)| (name.into(), term))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a BindingSet {
    type Item = (&'a String, &'a Term);
    type IntoIter = btree_map::Iter<'a, String, Term>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Display for BindingSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, term)) in self.bindings.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "?{name}={term}")?;
        }
        f.write_str("}")
    }
}

/// A [BindingSet] together with the visibility expression that guards it.
///
/// The visibility is an opaque boolean expression over authorizations (e.g., `a&(b|c)`). An empty
/// visibility means that the binding set is visible to everyone.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct VisibilityBindingSet {
    bindings: BindingSet,
    visibility: String,
}

impl VisibilityBindingSet {
    pub fn new(bindings: BindingSet, visibility: impl Into<String>) -> Self {
        Self {
            bindings,
            visibility: visibility.into(),
        }
    }

    /// Creates a binding set that is visible to everyone.
    pub fn unrestricted(bindings: BindingSet) -> Self {
        Self::new(bindings, String::new())
    }

    pub fn bindings(&self) -> &BindingSet {
        &self.bindings
    }

    pub fn visibility(&self) -> &str {
        &self.visibility
    }

    pub fn into_bindings(self) -> BindingSet {
        self.bindings
    }
}

impl Display for VisibilityBindingSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.visibility.is_empty() {
            write!(f, "{}", self.bindings)
        } else {
            write!(f, "{} [{}]", self.bindings, self.visibility)
        }
    }
}
