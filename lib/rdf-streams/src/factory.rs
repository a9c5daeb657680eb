use crate::error::TopologyFactoryError;
use rdf_streams_logical::{
    compile, AlgebraTree, CompiledQuery, ProcessorIdGenerator, SequentialIdGenerator,
    UuidIdGenerator,
};
use rdf_streams_model::Query;
use rdf_streams_physical::assemble;
use rdf_streams_physical::topology::Topology;
use tracing::debug;

/// How the ids of the stages of a topology are generated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum IdGeneration {
    /// Random UUIDs, such that the stages of different queries never share a name.
    #[default]
    Random,
    /// A counter that starts at zero for every query. Produces reproducible topologies.
    Sequential,
}

impl IdGeneration {
    fn generator(self) -> Box<dyn ProcessorIdGenerator> {
        match self {
            IdGeneration::Random => Box::new(UuidIdGenerator),
            IdGeneration::Sequential => Box::new(SequentialIdGenerator::new()),
        }
    }
}

/// The configuration of a [TopologyFactory].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TopologyFactoryConfig {
    id_generation: IdGeneration,
}

impl TopologyFactoryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_id_generation(mut self, id_generation: IdGeneration) -> Self {
        self.id_generation = id_generation;
        self
    }

    pub fn id_generation(&self) -> IdGeneration {
        self.id_generation
    }
}

/// A compiled query together with the intermediate representations it has been compiled from.
#[derive(Clone, Debug)]
pub struct QueryPlan {
    variables: Vec<String>,
    tree: AlgebraTree,
    compiled: CompiledQuery,
}

impl QueryPlan {
    /// The names of the bindings of the query results, in the order of the query's projection.
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn tree(&self) -> &AlgebraTree {
        &self.tree
    }

    pub fn compiled(&self) -> &CompiledQuery {
        &self.compiled
    }

    /// Wires the compiled stages into a topology that reads `statement_topic` and writes
    /// `result_topic`.
    pub fn assemble(
        &self,
        statement_topic: &str,
        result_topic: &str,
    ) -> Result<Topology, TopologyFactoryError> {
        Ok(assemble(&self.compiled, statement_topic, result_topic)?)
    }
}

/// Creates topologies that incrementally evaluate SPARQL queries.
///
/// ```
/// use rdf_streams::{IdGeneration, TopologyFactory, TopologyFactoryConfig};
///
/// let config = TopologyFactoryConfig::new().with_id_generation(IdGeneration::Sequential);
/// let factory = TopologyFactory::new(config);
/// let topology = factory.build(
///     "SELECT ?s WHERE { ?s <http://example.com/p> ?o }",
///     "statements",
///     "results",
/// )?;
///
/// assert!(topology.node("PROJECTION_0").is_some());
/// assert!(topology.node("SP_1").is_some());
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct TopologyFactory {
    config: TopologyFactoryConfig,
}

impl TopologyFactory {
    pub fn new(config: TopologyFactoryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TopologyFactoryConfig {
        &self.config
    }

    /// Parses `query` and compiles it into a [QueryPlan].
    pub fn compile(&self, query: &str) -> Result<QueryPlan, TopologyFactoryError> {
        let pattern = match Query::parse(query, None)? {
            Query::Select {
                dataset: None,
                pattern,
                ..
            } => pattern,
            Query::Select { .. } => {
                return Err(TopologyFactoryError::UnsupportedQueryForm(
                    "a SELECT query with a dataset clause",
                ))
            }
            Query::Construct { .. } => {
                return Err(TopologyFactoryError::UnsupportedQueryForm(
                    "a CONSTRUCT query",
                ))
            }
            Query::Describe { .. } => {
                return Err(TopologyFactoryError::UnsupportedQueryForm(
                    "a DESCRIBE query",
                ))
            }
            Query::Ask { .. } => {
                return Err(TopologyFactoryError::UnsupportedQueryForm("an ASK query"))
            }
        };

        let tree = AlgebraTree::from_graph_pattern(&pattern);
        let mut id_generator = self.config.id_generation.generator();
        let compiled = compile(&tree, &mut *id_generator)?;
        let variables = tree
            .root()
            .map(|root| tree.output_variables(root))
            .unwrap_or_default();
        debug!(
            stages = compiled.entries().len(),
            variables = ?variables,
            "factory.compile"
        );

        Ok(QueryPlan {
            variables,
            tree,
            compiled,
        })
    }

    /// Creates the topology that evaluates `query` over the statements of `statement_topic` and
    /// writes the results to `result_topic`.
    pub fn build(
        &self,
        query: &str,
        statement_topic: &str,
        result_topic: &str,
    ) -> Result<Topology, TopologyFactoryError> {
        self.compile(query)?
            .assemble(statement_topic, result_topic)
    }
}
