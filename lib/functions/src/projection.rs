use rdf_streams_model::{BindingSet, Term, VisibilityBindingSet};
use std::fmt;
use std::fmt::{Display, Formatter};

/// Where the value of a projected binding comes from.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ProjectionSource {
    /// The value bound to the given name in the input binding set.
    Binding(String),
    /// A constant term.
    Constant(Term),
}

impl Display for ProjectionSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ProjectionSource::Binding(name) => write!(f, "?{name}"),
            ProjectionSource::Constant(term) => write!(f, "{term}"),
        }
    }
}

/// Binds the value of `source` to the binding name `target`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ProjectionElement {
    source: ProjectionSource,
    target: String,
}

impl ProjectionElement {
    pub fn new(source: ProjectionSource, target: impl Into<String>) -> Self {
        Self {
            source,
            target: target.into(),
        }
    }

    /// Creates an element that keeps the binding `name` as is.
    pub fn identity(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::new(ProjectionSource::Binding(name.clone()), name)
    }

    pub fn source(&self) -> &ProjectionSource {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }
}

impl Display for ProjectionElement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.source {
            ProjectionSource::Binding(name) if *name == self.target => write!(f, "?{name}"),
            source => write!(f, "{source} AS ?{}", self.target),
        }
    }
}

/// Projects binding sets onto a list of [ProjectionElement]s.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ProjectionFunction {
    elements: Vec<ProjectionElement>,
}

impl ProjectionFunction {
    pub fn new(elements: Vec<ProjectionElement>) -> Self {
        Self { elements }
    }

    pub fn elements(&self) -> &[ProjectionElement] {
        &self.elements
    }

    /// Projects `input`. Elements whose source name is unbound are left unbound in the result.
    pub fn project(&self, input: &VisibilityBindingSet) -> VisibilityBindingSet {
        let mut bindings = BindingSet::new();
        for element in &self.elements {
            let value = match &element.source {
                ProjectionSource::Binding(name) => input.bindings().get(name).cloned(),
                ProjectionSource::Constant(term) => Some(term.clone()),
            };
            if let Some(value) = value {
                bindings.insert(element.target.as_str(), value);
            }
        }
        VisibilityBindingSet::new(bindings, input.visibility())
    }
}

impl Display for ProjectionFunction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, element) in self.elements.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{element}")?;
        }
        Ok(())
    }
}
