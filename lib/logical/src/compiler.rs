use crate::{
    plan_join_keys, side_of, AlgebraNodeId, AlgebraNodeKind, AlgebraTree, CompileError, JoinKeys,
    ProcessorIdGenerator, StageKind,
};
use rdf_streams_functions::join::JoinType;
use rdf_streams_functions::pattern::StatementPatternMatcher;
use rdf_streams_functions::projection::{ProjectionElement, ProjectionFunction, ProjectionSource};
use rdf_streams_model::Side;
use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt;
use std::fmt::{Display, Formatter};
use tracing::debug;

/// What a stage of the topology does with the records it receives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProcessorCapability {
    /// Matches statements against a triple pattern.
    StatementPattern(StatementPatternMatcher),
    /// Joins the binding sets of two upstream stages.
    Join { join_type: JoinType, keys: JoinKeys },
    /// Projects binding sets.
    Projection(ProjectionFunction),
}

impl ProcessorCapability {
    pub fn stage_kind(&self) -> StageKind {
        match self {
            ProcessorCapability::StatementPattern(_) => StageKind::StatementPattern,
            ProcessorCapability::Join { .. } => StageKind::Join,
            ProcessorCapability::Projection(_) => StageKind::Projection,
        }
    }
}

impl Display for ProcessorCapability {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ProcessorCapability::StatementPattern(matcher) => {
                write!(f, "StatementPattern: {matcher}")
            }
            ProcessorCapability::Join { join_type, keys } => write!(
                f,
                "Join ({join_type}): join_vars=[{}] all_vars=[{}]",
                keys.join_vars().join(", "),
                keys.all_vars().join(", ")
            ),
            ProcessorCapability::Projection(projection) => write!(f, "Projection: {projection}"),
        }
    }
}

/// Describes a single stage of the topology that evaluates an algebra node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessorEntry {
    node: AlgebraNodeId,
    id: String,
    side: Option<Side>,
    capability: ProcessorCapability,
    upstream_nodes: Vec<AlgebraNodeId>,
}

impl ProcessorEntry {
    /// The algebra node evaluated by this stage.
    pub fn node(&self) -> AlgebraNodeId {
        self.node
    }

    /// The unique name of the stage.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The side on which the results of this stage enter the downstream join, if any.
    pub fn side(&self) -> Option<Side> {
        self.side
    }

    pub fn capability(&self) -> &ProcessorCapability {
        &self.capability
    }

    /// The algebra nodes whose stages feed this stage. Joins list the left node first.
    pub fn upstream_nodes(&self) -> &[AlgebraNodeId] {
        &self.upstream_nodes
    }
}

/// The result of compiling an [AlgebraTree].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompiledQuery {
    entries: Vec<ProcessorEntry>,
    ids: FxHashMap<AlgebraNodeId, String>,
}

impl CompiledQuery {
    /// Creates a compiled query from its parts without checking that they are consistent.
    ///
    /// Use [compile] to obtain a compiled query from an algebra tree.
    #[doc(hidden)]
    pub fn from_parts(
        entries: Vec<ProcessorEntry>,
        ids: FxHashMap<AlgebraNodeId, String>,
    ) -> Self {
        Self { entries, ids }
    }

    /// The compiled stages in the order in which they have been visited. The first entry is the
    /// stage of the root node.
    pub fn entries(&self) -> &[ProcessorEntry] {
        &self.entries
    }

    pub fn ids(&self) -> &FxHashMap<AlgebraNodeId, String> {
        &self.ids
    }

    /// Returns the id of the stage that evaluates `node`.
    pub fn id_of(&self, node: AlgebraNodeId) -> Option<&str> {
        self.ids.get(&node).map(String::as_str)
    }

    /// Returns the stage whose results are the results of the query.
    pub fn root(&self) -> Option<&ProcessorEntry> {
        self.entries.first()
    }
}

/// Compiles `tree` into a list of [ProcessorEntry]s.
///
/// The tree is traversed depth-first and every entry is recorded before its operands are visited.
/// A [AlgebraNodeKind::Rebinding] that is the direct operand of a projection is folded into the
/// projection. Every other operator without a stage counterpart results in
/// [CompileError::UnsupportedOperator].
pub fn compile(
    tree: &AlgebraTree,
    id_generator: &mut dyn ProcessorIdGenerator,
) -> Result<CompiledQuery, CompileError> {
    let root = tree.root().ok_or(CompileError::EmptyAlgebraTree)?;
    let mut compiler = TreeCompiler {
        tree,
        id_generator,
        entries: Vec::new(),
        ids: FxHashMap::default(),
        used_ids: FxHashSet::default(),
    };
    compiler.visit(root)?;

    Ok(CompiledQuery {
        entries: compiler.entries,
        ids: compiler.ids,
    })
}

struct TreeCompiler<'tree, 'generator> {
    tree: &'tree AlgebraTree,
    id_generator: &'generator mut dyn ProcessorIdGenerator,
    entries: Vec<ProcessorEntry>,
    ids: FxHashMap<AlgebraNodeId, String>,
    used_ids: FxHashSet<String>,
}

impl TreeCompiler<'_, '_> {
    fn visit(&mut self, node: AlgebraNodeId) -> Result<(), CompileError> {
        match self.tree[node].kind() {
            AlgebraNodeKind::Pattern(pattern) => {
                let matcher = StatementPatternMatcher::new(pattern.clone());
                self.record(
                    node,
                    ProcessorCapability::StatementPattern(matcher),
                    Vec::new(),
                )
            }
            AlgebraNodeKind::Projection { inner, variables } => {
                let (upstream, elements) = self.projection_elements(*inner, variables);
                let capability =
                    ProcessorCapability::Projection(ProjectionFunction::new(elements));
                self.record(node, capability, vec![upstream])?;
                self.visit(upstream)
            }
            AlgebraNodeKind::NaturalJoin { left, right } => {
                self.visit_join(node, JoinType::Natural, *left, *right)
            }
            AlgebraNodeKind::LeftOuterJoin {
                left,
                right,
                filter: None,
            } => self.visit_join(node, JoinType::LeftOuter, *left, *right),
            kind => Err(CompileError::UnsupportedOperator {
                node,
                operator: kind.operator_name(),
            }),
        }
    }

    fn visit_join(
        &mut self,
        node: AlgebraNodeId,
        join_type: JoinType,
        left: AlgebraNodeId,
        right: AlgebraNodeId,
    ) -> Result<(), CompileError> {
        let keys = plan_join_keys(
            self.tree[left].binding_names(),
            self.tree[right].binding_names(),
        );
        self.record(
            node,
            ProcessorCapability::Join { join_type, keys },
            vec![left, right],
        )?;
        self.visit(left)?;
        self.visit(right)
    }

    /// Returns the effective operand of a projection together with its elements.
    ///
    /// If the operand is a rebinding, the rebinding is skipped and its elements are resolved into
    /// the projection.
    fn projection_elements(
        &self,
        inner: AlgebraNodeId,
        variables: &[String],
    ) -> (AlgebraNodeId, Vec<ProjectionElement>) {
        match self.tree[inner].kind() {
            AlgebraNodeKind::Rebinding {
                inner: operand,
                elements: rebindings,
            } => {
                let elements = variables
                    .iter()
                    .map(|variable| {
                        let source = resolve_source(rebindings, rebindings.len(), variable)
                            .unwrap_or_else(|| ProjectionSource::Binding(variable.clone()));
                        ProjectionElement::new(source, variable.as_str())
                    })
                    .collect();
                (*operand, elements)
            }
            _ => (
                inner,
                variables
                    .iter()
                    .map(|v| ProjectionElement::identity(v.as_str()))
                    .collect(),
            ),
        }
    }

    fn record(
        &mut self,
        node: AlgebraNodeId,
        capability: ProcessorCapability,
        upstream_nodes: Vec<AlgebraNodeId>,
    ) -> Result<(), CompileError> {
        let id = self.id_generator.next_id(capability.stage_kind());
        if !self.used_ids.insert(id.clone()) {
            return Err(CompileError::DuplicateProcessorId(id));
        }

        let side = side_of(self.tree, node);
        debug!(
            id = %id,
            node = %node,
            side = ?side,
            capability = %capability,
            "compiler.record_stage"
        );

        self.ids.insert(node, id.clone());
        self.entries.push(ProcessorEntry {
            node,
            id,
            side,
            capability,
            upstream_nodes,
        });
        Ok(())
    }
}

/// Resolves the source of `target` considering only the first `len` rebinding elements.
///
/// Sources that refer to the target of an earlier element are replaced by that element's source.
fn resolve_source(
    elements: &[ProjectionElement],
    len: usize,
    target: &str,
) -> Option<ProjectionSource> {
    let position = elements[..len]
        .iter()
        .rposition(|element| element.target() == target)?;

    let source = elements[position].source();
    Some(match source {
        ProjectionSource::Binding(name) => resolve_source(elements, position, name)
            .unwrap_or_else(|| source.clone()),
        ProjectionSource::Constant(_) => source.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SequentialIdGenerator;
    use rdf_streams_model::{NamedNode, NamedNodePattern, TermPattern, TriplePattern, Variable};

    fn pattern(subject: &str, object: &str) -> AlgebraNodeKind {
        AlgebraNodeKind::Pattern(TriplePattern {
            subject: TermPattern::Variable(Variable::new_unchecked(subject)),
            predicate: NamedNodePattern::NamedNode(NamedNode::new_unchecked(
                "http://example.com/knows",
            )),
            object: TermPattern::Variable(Variable::new_unchecked(object)),
        })
    }

    #[test]
    fn entries_are_recorded_in_pre_order() {
        let mut tree = AlgebraTree::new();
        let left = tree.add(pattern("a", "b")).unwrap();
        let right = tree.add(pattern("b", "c")).unwrap();
        let join = tree
            .add(AlgebraNodeKind::NaturalJoin { left, right })
            .unwrap();

        let compiled = compile(&tree, &mut SequentialIdGenerator::new()).unwrap();

        let ids: Vec<_> = compiled.entries().iter().map(ProcessorEntry::id).collect();
        assert_eq!(ids, vec!["JOIN_0", "SP_1", "SP_2"]);
        assert_eq!(compiled.root().map(ProcessorEntry::node), Some(join));
        assert_eq!(compiled.id_of(right), Some("SP_2"));
    }

    #[test]
    fn empty_tree() {
        let result = compile(&AlgebraTree::new(), &mut SequentialIdGenerator::new());

        assert_eq!(result, Err(CompileError::EmptyAlgebraTree));
    }

    #[test]
    fn chained_rebinding_is_resolved() {
        let elements = vec![
            ProjectionElement::new(ProjectionSource::Binding("a".to_owned()), "x"),
            ProjectionElement::new(ProjectionSource::Binding("x".to_owned()), "y"),
        ];

        assert_eq!(
            resolve_source(&elements, elements.len(), "y"),
            Some(ProjectionSource::Binding("a".to_owned()))
        );
        assert_eq!(resolve_source(&elements, elements.len(), "z"), None);
    }

    #[derive(Debug)]
    struct ConstantIdGenerator;

    impl ProcessorIdGenerator for ConstantIdGenerator {
        fn next_id(&mut self, kind: StageKind) -> String {
            format!("{}X", kind.prefix())
        }
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut tree = AlgebraTree::new();
        let left = tree.add(pattern("a", "b")).unwrap();
        let right = tree.add(pattern("b", "c")).unwrap();
        tree.add(AlgebraNodeKind::NaturalJoin { left, right })
            .unwrap();

        let result = compile(&tree, &mut ConstantIdGenerator);

        assert_eq!(
            result,
            Err(CompileError::DuplicateProcessorId("SP_X".to_owned()))
        );
    }
}
