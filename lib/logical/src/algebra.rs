use crate::AlgebraTreeError;
use itertools::Itertools;
use rdf_streams_functions::pattern::pattern_binding_names;
use rdf_streams_functions::projection::{ProjectionElement, ProjectionSource};
use rdf_streams_model::{Expression, GraphPattern, TriplePattern};
use rustc_hash::FxHashSet;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::ops::Index;

/// Identifies a node within an [AlgebraTree].
///
/// Two structurally identical sub-trees (e.g., the same triple pattern used twice) are still two
/// different nodes with different ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AlgebraNodeId(usize);

impl AlgebraNodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl Display for AlgebraNodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The operator of an [AlgebraNode].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AlgebraNodeKind {
    /// Matches a single triple pattern against the input statements.
    Pattern(TriplePattern),
    /// The SPARQL inner join.
    NaturalJoin {
        left: AlgebraNodeId,
        right: AlgebraNodeId,
    },
    /// The SPARQL left join (`OPTIONAL`).
    LeftOuterJoin {
        left: AlgebraNodeId,
        right: AlgebraNodeId,
        filter: Option<Expression>,
    },
    /// Restricts the solutions to the given binding names.
    Projection {
        inner: AlgebraNodeId,
        variables: Vec<String>,
    },
    /// Binds new names to existing bindings or constants (`BIND` / `SELECT (... AS ?x)`).
    ///
    /// The elements are ordered by evaluation order. An element may refer to the target of an
    /// earlier element.
    Rebinding {
        inner: AlgebraNodeId,
        elements: Vec<ProjectionElement>,
    },
    Filter {
        inner: AlgebraNodeId,
        expression: Expression,
    },
    Union {
        left: AlgebraNodeId,
        right: AlgebraNodeId,
    },
    Minus {
        left: AlgebraNodeId,
        right: AlgebraNodeId,
    },
    /// A SPARQL operator that has no counterpart in this algebra. Its operands are not lowered.
    Unsupported { operator: &'static str },
}

impl AlgebraNodeKind {
    /// A short name of the operator, used in diagnostics.
    pub fn operator_name(&self) -> &'static str {
        match self {
            AlgebraNodeKind::Pattern(_) => "Pattern",
            AlgebraNodeKind::NaturalJoin { .. } => "NaturalJoin",
            AlgebraNodeKind::LeftOuterJoin { filter: None, .. } => "LeftOuterJoin",
            AlgebraNodeKind::LeftOuterJoin {
                filter: Some(_), ..
            } => "LeftOuterJoin with filter",
            AlgebraNodeKind::Projection { .. } => "Projection",
            AlgebraNodeKind::Rebinding { .. } => "Rebinding",
            AlgebraNodeKind::Filter { .. } => "Filter",
            AlgebraNodeKind::Union { .. } => "Union",
            AlgebraNodeKind::Minus { .. } => "Minus",
            AlgebraNodeKind::Unsupported { operator } => operator,
        }
    }

    /// Returns the operands of this operator, the left one first.
    pub fn operands(&self) -> Vec<AlgebraNodeId> {
        match self {
            AlgebraNodeKind::Pattern(_) | AlgebraNodeKind::Unsupported { .. } => Vec::new(),
            AlgebraNodeKind::Projection { inner, .. }
            | AlgebraNodeKind::Rebinding { inner, .. }
            | AlgebraNodeKind::Filter { inner, .. } => vec![*inner],
            AlgebraNodeKind::NaturalJoin { left, right }
            | AlgebraNodeKind::LeftOuterJoin { left, right, .. }
            | AlgebraNodeKind::Union { left, right }
            | AlgebraNodeKind::Minus { left, right } => vec![*left, *right],
        }
    }

    /// Returns the operands if this is a binary operator.
    pub fn binary_operands(&self) -> Option<(AlgebraNodeId, AlgebraNodeId)> {
        match self {
            AlgebraNodeKind::NaturalJoin { left, right }
            | AlgebraNodeKind::LeftOuterJoin { left, right, .. }
            | AlgebraNodeKind::Union { left, right }
            | AlgebraNodeKind::Minus { left, right } => Some((*left, *right)),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlgebraNode {
    kind: AlgebraNodeKind,
    parent: Option<AlgebraNodeId>,
    binding_names: FxHashSet<String>,
}

impl AlgebraNode {
    pub fn kind(&self) -> &AlgebraNodeKind {
        &self.kind
    }

    pub fn parent(&self) -> Option<AlgebraNodeId> {
        self.parent
    }

    /// The names of all bindings that the solutions of this node may contain.
    pub fn binding_names(&self) -> &FxHashSet<String> {
        &self.binding_names
    }
}

/// An immutable tree of query operators, stored as an arena.
///
/// Nodes are added bottom-up: the operands of a node must be added before the node itself. Hence,
/// the root of the tree is the last node that has been added.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AlgebraTree {
    nodes: Vec<AlgebraNode>,
}

impl AlgebraTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lowers a SPARQL graph pattern into an [AlgebraTree].
    ///
    /// Basic graph patterns become left-deep chains of [AlgebraNodeKind::NaturalJoin]s over their
    /// triple patterns and consecutive `Extend`s are collapsed into a single
    /// [AlgebraNodeKind::Rebinding]. Operators without a counterpart become
    /// [AlgebraNodeKind::Unsupported] such that the compiler can report them.
    pub fn from_graph_pattern(pattern: &GraphPattern) -> Self {
        let mut tree = Self::new();
        tree.lower(pattern);
        tree
    }

    /// Adds a node whose operands must already be part of this tree and must not have a parent.
    pub fn add(&mut self, kind: AlgebraNodeKind) -> Result<AlgebraNodeId, AlgebraTreeError> {
        let operands = kind.operands();
        for (i, operand) in operands.iter().enumerate() {
            let node = self
                .nodes
                .get(operand.0)
                .ok_or(AlgebraTreeError::UnknownNode(*operand))?;
            if node.parent.is_some() || operands[..i].contains(operand) {
                return Err(AlgebraTreeError::OperandAlreadyAttached(*operand));
            }
        }
        Ok(self.push(kind))
    }

    /// Returns the root of the tree, if there is one.
    pub fn root(&self) -> Option<AlgebraNodeId> {
        let last = self.nodes.len().checked_sub(1)?;
        self.nodes[last]
            .parent
            .is_none()
            .then_some(AlgebraNodeId(last))
    }

    pub fn get(&self, id: AlgebraNodeId) -> Option<&AlgebraNode> {
        self.nodes.get(id.0)
    }

    pub fn parent(&self, id: AlgebraNodeId) -> Option<AlgebraNodeId> {
        self.get(id).and_then(AlgebraNode::parent)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the names of all bindings that the solutions of `id` may contain.
    pub fn binding_names(&self, id: AlgebraNodeId) -> Option<&FxHashSet<String>> {
        self.get(id).map(AlgebraNode::binding_names)
    }

    /// Returns the binding names of `id` in the order in which they should be presented to a user.
    ///
    /// Projections keep the order of their variables, all other nodes are ordered by name.
    pub fn output_variables(&self, id: AlgebraNodeId) -> Vec<String> {
        match self.get(id).map(AlgebraNode::kind) {
            Some(AlgebraNodeKind::Projection { variables, .. }) => variables.clone(),
            _ => self
                .binding_names(id)
                .into_iter()
                .flatten()
                .sorted()
                .cloned()
                .collect(),
        }
    }

    /// Appends a node whose operands are valid and unattached. The binding names are derived from
    /// the names of the operands, which have been computed when the operands were pushed.
    fn push(&mut self, kind: AlgebraNodeKind) -> AlgebraNodeId {
        let id = AlgebraNodeId(self.nodes.len());
        let binding_names = self.derive_binding_names(&kind);
        for operand in kind.operands() {
            self.nodes[operand.0].parent = Some(id);
        }
        self.nodes.push(AlgebraNode {
            kind,
            parent: None,
            binding_names,
        });
        id
    }

    fn derive_binding_names(&self, kind: &AlgebraNodeKind) -> FxHashSet<String> {
        let names_of = |id: &AlgebraNodeId| self.nodes[id.0].binding_names.iter().cloned();
        match kind {
            AlgebraNodeKind::Pattern(pattern) => {
                pattern_binding_names(pattern).into_iter().collect()
            }
            AlgebraNodeKind::NaturalJoin { left, right }
            | AlgebraNodeKind::LeftOuterJoin { left, right, .. }
            | AlgebraNodeKind::Union { left, right } => {
                names_of(left).chain(names_of(right)).collect()
            }
            AlgebraNodeKind::Minus { left, .. } => names_of(left).collect(),
            AlgebraNodeKind::Projection { variables, .. } => variables.iter().cloned().collect(),
            AlgebraNodeKind::Rebinding { inner, elements } => names_of(inner)
                .chain(elements.iter().map(|e| e.target().to_owned()))
                .collect(),
            AlgebraNodeKind::Filter { inner, .. } => names_of(inner).collect(),
            AlgebraNodeKind::Unsupported { .. } => FxHashSet::default(),
        }
    }

    fn lower(&mut self, pattern: &GraphPattern) -> AlgebraNodeId {
        match pattern {
            GraphPattern::Bgp { patterns } => self.lower_bgp(patterns),
            GraphPattern::Join { left, right } => {
                let left = self.lower(left);
                let right = self.lower(right);
                self.push(AlgebraNodeKind::NaturalJoin { left, right })
            }
            GraphPattern::LeftJoin {
                left,
                right,
                expression,
            } => {
                let left = self.lower(left);
                let right = self.lower(right);
                self.push(AlgebraNodeKind::LeftOuterJoin {
                    left,
                    right,
                    filter: expression.clone(),
                })
            }
            GraphPattern::Project { inner, variables } => {
                let inner = self.lower(inner);
                let variables = variables.iter().map(|v| v.as_str().to_owned()).collect();
                self.push(AlgebraNodeKind::Projection { inner, variables })
            }
            GraphPattern::Extend { .. } => self.lower_extend(pattern),
            GraphPattern::Filter { expr, inner } => {
                let inner = self.lower(inner);
                self.push(AlgebraNodeKind::Filter {
                    inner,
                    expression: expr.clone(),
                })
            }
            GraphPattern::Union { left, right } => {
                let left = self.lower(left);
                let right = self.lower(right);
                self.push(AlgebraNodeKind::Union { left, right })
            }
            GraphPattern::Minus { left, right } => {
                let left = self.lower(left);
                let right = self.lower(right);
                self.push(AlgebraNodeKind::Minus { left, right })
            }
            _ => self.push(AlgebraNodeKind::Unsupported {
                operator: graph_pattern_name(pattern),
            }),
        }
    }

    fn lower_bgp(&mut self, patterns: &[TriplePattern]) -> AlgebraNodeId {
        let Some((first, rest)) = patterns.split_first() else {
            return self.push(AlgebraNodeKind::Unsupported {
                operator: "EmptyBgp",
            });
        };

        let first = self.push(AlgebraNodeKind::Pattern(first.clone()));
        rest.iter().fold(first, |left, pattern| {
            let right = self.push(AlgebraNodeKind::Pattern(pattern.clone()));
            self.push(AlgebraNodeKind::NaturalJoin { left, right })
        })
    }

    fn lower_extend(&mut self, pattern: &GraphPattern) -> AlgebraNodeId {
        let mut elements = Vec::new();
        let mut current = pattern;
        while let GraphPattern::Extend {
            inner,
            variable,
            expression,
        } = current
        {
            let source = match expression {
                Expression::Variable(source) => {
                    ProjectionSource::Binding(source.as_str().to_owned())
                }
                Expression::NamedNode(node) => ProjectionSource::Constant(node.clone().into()),
                Expression::Literal(literal) => {
                    ProjectionSource::Constant(literal.clone().into())
                }
                _ => {
                    return self.push(AlgebraNodeKind::Unsupported {
                        operator: "Extend with a computed expression",
                    })
                }
            };
            elements.push(ProjectionElement::new(source, variable.as_str()));
            current = inner;
        }

        // The outermost Extend is evaluated last.
        elements.reverse();
        let inner = self.lower(current);
        self.push(AlgebraNodeKind::Rebinding { inner, elements })
    }

    fn fmt_node(&self, f: &mut Formatter<'_>, id: AlgebraNodeId, depth: usize) -> fmt::Result {
        let Some(node) = self.get(id) else {
            return Ok(());
        };

        write!(f, "{:indent$}", "", indent = depth * 2)?;
        match &node.kind {
            AlgebraNodeKind::Pattern(pattern) => writeln!(f, "Pattern {pattern}")?,
            AlgebraNodeKind::Projection { variables, .. } => writeln!(
                f,
                "Projection [{}]",
                variables.iter().map(|v| format!("?{v}")).join(", ")
            )?,
            AlgebraNodeKind::Rebinding { elements, .. } => {
                writeln!(f, "Rebinding [{}]", elements.iter().join(", "))?;
            }
            kind => writeln!(f, "{}", kind.operator_name())?,
        }

        for operand in node.kind.operands() {
            self.fmt_node(f, operand, depth + 1)?;
        }
        Ok(())
    }
}

impl Index<AlgebraNodeId> for AlgebraTree {
    type Output = AlgebraNode;

    fn index(&self, id: AlgebraNodeId) -> &Self::Output {
        &self.nodes[id.0]
    }
}

impl Display for AlgebraTree {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.root() {
            Some(root) => self.fmt_node(f, root, 0),
            None => writeln!(f, "<empty>"),
        }
    }
}

fn graph_pattern_name(pattern: &GraphPattern) -> &'static str {
    match pattern {
        GraphPattern::Path { .. } => "Path",
        GraphPattern::Graph { .. } => "Graph",
        GraphPattern::Values { .. } => "Values",
        GraphPattern::OrderBy { .. } => "OrderBy",
        GraphPattern::Distinct { .. } => "Distinct",
        GraphPattern::Reduced { .. } => "Reduced",
        GraphPattern::Slice { .. } => "Slice",
        GraphPattern::Group { .. } => "Group",
        GraphPattern::Service { .. } => "Service",
        _ => "GraphPattern",
    }
}
