use crate::topology::{RecordFormat, StateStoreSpec, Topology, TopologyNode, TopologyNodeKind};
use crate::{ProcessorSupplier, TopologyBuilderError};
use rustc_hash::FxHashMap;

/// Builds a [Topology] and validates the wiring of every node while it is added.
///
/// Parents must be added before their children. Hence, the resulting topology is always acyclic.
#[derive(Debug, Default)]
pub struct TopologyBuilder {
    nodes: Vec<TopologyNode>,
    index: FxHashMap<String, usize>,
    stores: Vec<StateStoreSpec>,
}

impl TopologyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_source(
        &mut self,
        name: impl Into<String>,
        topic: impl Into<String>,
        key_format: RecordFormat,
        value_format: RecordFormat,
    ) -> Result<&mut Self, TopologyBuilderError> {
        let kind = TopologyNodeKind::Source {
            topic: topic.into(),
            key_format,
            value_format,
        };
        self.add_node(name.into(), kind, &[])
    }

    pub fn add_processor(
        &mut self,
        name: impl Into<String>,
        supplier: ProcessorSupplier,
        parents: &[&str],
    ) -> Result<&mut Self, TopologyBuilderError> {
        self.add_node(name.into(), TopologyNodeKind::Processor(supplier), parents)
    }

    pub fn add_sink(
        &mut self,
        name: impl Into<String>,
        topic: impl Into<String>,
        key_format: RecordFormat,
        value_format: RecordFormat,
        parents: &[&str],
    ) -> Result<&mut Self, TopologyBuilderError> {
        let kind = TopologyNodeKind::Sink {
            topic: topic.into(),
            key_format,
            value_format,
        };
        self.add_node(name.into(), kind, parents)
    }

    /// Adds a state store and attaches it to the given processors.
    pub fn add_state_store(
        &mut self,
        spec: StateStoreSpec,
        processors: &[&str],
    ) -> Result<&mut Self, TopologyBuilderError> {
        if self.stores.iter().any(|store| store.name == spec.name) {
            return Err(TopologyBuilderError::DuplicateStore(spec.name));
        }

        let mut indices = Vec::with_capacity(processors.len());
        for processor in processors {
            let index = self
                .index
                .get(*processor)
                .copied()
                .filter(|idx| {
                    matches!(self.nodes[*idx].kind, TopologyNodeKind::Processor(_))
                })
                .ok_or_else(|| TopologyBuilderError::UnknownProcessor {
                    store: spec.name.clone(),
                    processor: (*processor).to_owned(),
                })?;
            indices.push(index);
        }

        for index in indices {
            self.nodes[index].stores.push(spec.name.clone());
        }
        self.stores.push(spec);
        Ok(self)
    }

    pub fn build(self) -> Topology {
        Topology {
            nodes: self.nodes,
            index: self.index,
            stores: self.stores,
        }
    }

    fn add_node(
        &mut self,
        name: String,
        kind: TopologyNodeKind,
        parents: &[&str],
    ) -> Result<&mut Self, TopologyBuilderError> {
        if self.index.contains_key(&name) {
            return Err(TopologyBuilderError::DuplicateNode(name));
        }

        let mut parent_indices = Vec::with_capacity(parents.len());
        for parent in parents {
            let index = self.index.get(*parent).copied().ok_or_else(|| {
                TopologyBuilderError::UnknownParent {
                    node: name.clone(),
                    parent: (*parent).to_owned(),
                }
            })?;
            parent_indices.push(index);
        }

        for index in parent_indices {
            self.nodes[index].children.push(name.clone());
        }
        self.index.insert(name.clone(), self.nodes.len());
        self.nodes.push(TopologyNode {
            name,
            kind,
            parents: parents.iter().map(|p| (*p).to_owned()).collect(),
            children: Vec::new(),
            stores: Vec::new(),
        });
        Ok(self)
    }
}
