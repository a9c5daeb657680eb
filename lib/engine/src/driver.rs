use crate::error::DriverError;
use rdf_streams_model::{VisibilityBindingSet, VisibilityStatement};
use rdf_streams_physical::store::{KeyValueStore, MemoryKeyValueStore};
use rdf_streams_physical::topology::{Topology, TopologyNodeKind};
use rdf_streams_physical::{Processor, ProcessorContext, Record};
use rustc_hash::FxHashMap;
use std::sync::Arc;
use tracing::trace;

/// Runs a [Topology] synchronously.
///
/// Statements that are piped into the driver are delivered to the children of every source. Each
/// record is forwarded depth-first: a record that a processor emits reaches all descendants
/// before the processor's next record is delivered.
#[derive(Debug)]
pub struct LocalDriver {
    topology: Arc<Topology>,
    processors: FxHashMap<String, Box<dyn Processor>>,
    stores: FxHashMap<String, MemoryKeyValueStore>,
    results: Vec<VisibilityBindingSet>,
}

impl LocalDriver {
    /// Instantiates one processor per processor node and one in-memory store per state store.
    pub fn new(topology: &Topology) -> Self {
        let processors = topology
            .nodes()
            .iter()
            .filter_map(|node| match node.kind() {
                TopologyNodeKind::Processor(supplier) => {
                    Some((node.name().to_owned(), supplier.get()))
                }
                _ => None,
            })
            .collect();
        let stores = topology
            .state_stores()
            .iter()
            .map(|spec| (spec.name().to_owned(), MemoryKeyValueStore::new()))
            .collect();

        Self {
            topology: Arc::new(topology.clone()),
            processors,
            stores,
            results: Vec::new(),
        }
    }

    /// Pushes `statement` through the topology.
    pub fn pipe_statement(&mut self, statement: VisibilityStatement) -> Result<(), DriverError> {
        let topology = Arc::clone(&self.topology);
        for source in topology.sources() {
            for child in source.children() {
                self.deliver(child, Record::Statement(statement.clone()))?;
            }
        }
        Ok(())
    }

    /// Returns the binding sets that have reached a sink since the last call.
    pub fn read_results(&mut self) -> Vec<VisibilityBindingSet> {
        std::mem::take(&mut self.results)
    }

    /// Returns the state store with the given name.
    pub fn state_store(&self, name: &str) -> Option<&dyn KeyValueStore> {
        self.stores
            .get(name)
            .map(|store| -> &dyn KeyValueStore { store })
    }

    fn deliver(&mut self, name: &str, record: Record) -> Result<(), DriverError> {
        let topology = Arc::clone(&self.topology);
        let node = topology
            .node(name)
            .ok_or_else(|| DriverError::UnknownNode(name.to_owned()))?;
        trace!(node = name, record = %record, "driver.deliver");

        match (node.kind(), record) {
            (TopologyNodeKind::Processor(_), record) => {
                let processor = self
                    .processors
                    .get_mut(name)
                    .ok_or_else(|| DriverError::UnknownNode(name.to_owned()))?;
                let mut context = DriverContext {
                    stores: &mut self.stores,
                    attached: node.stores(),
                    forwarded: Vec::new(),
                };
                processor.process(&mut context, record)?;

                for record in context.forwarded {
                    for child in node.children() {
                        self.deliver(child, record.clone())?;
                    }
                }
                Ok(())
            }
            (TopologyNodeKind::Sink { .. }, Record::Binding(binding_set)) => {
                self.results.push(binding_set);
                Ok(())
            }
            (_, record) => Err(DriverError::UnexpectedRecord {
                node: name.to_owned(),
                record: record.kind_name(),
            }),
        }
    }
}

struct DriverContext<'driver> {
    stores: &'driver mut FxHashMap<String, MemoryKeyValueStore>,
    attached: &'driver [String],
    forwarded: Vec<Record>,
}

impl ProcessorContext for DriverContext<'_> {
    fn forward(&mut self, record: Record) {
        self.forwarded.push(record);
    }

    fn state_store(&mut self, name: &str) -> Option<&mut dyn KeyValueStore> {
        if !self.attached.iter().any(|store| store == name) {
            return None;
        }
        self.stores
            .get_mut(name)
            .map(|store| -> &mut dyn KeyValueStore { store })
    }
}
