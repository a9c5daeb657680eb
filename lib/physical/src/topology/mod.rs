//! A typed description of a streaming topology.
//!
//! A topology is a directed acyclic graph of sources, processors and sinks. It does not execute
//! anything by itself. An engine (e.g., the local driver) instantiates the processors and state
//! stores and forwards the records along the edges.

mod builder;

pub use builder::TopologyBuilder;

use crate::ProcessorSupplier;
use itertools::Itertools;
use rustc_hash::FxHashMap;
use std::fmt;
use std::fmt::{Display, Formatter};

/// The serialization of the keys or values of a topic or a state store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RecordFormat {
    String,
    VisibilityStatement,
    VisibilityBindingSet,
}

impl Display for RecordFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            RecordFormat::String => write!(f, "String"),
            RecordFormat::VisibilityStatement => write!(f, "VisibilityStatement"),
            RecordFormat::VisibilityBindingSet => write!(f, "VisibilityBindingSet"),
        }
    }
}

/// Declares a key/value state store of a topology.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateStoreSpec {
    name: String,
    persistent: bool,
    key_format: RecordFormat,
    value_format: RecordFormat,
}

impl StateStoreSpec {
    pub fn new(
        name: impl Into<String>,
        persistent: bool,
        key_format: RecordFormat,
        value_format: RecordFormat,
    ) -> Self {
        Self {
            name: name.into(),
            persistent,
            key_format,
            value_format,
        }
    }

    /// A persistent store with string keys and binding set values, as used by join stages.
    pub fn join_state(name: impl Into<String>) -> Self {
        Self::new(
            name,
            true,
            RecordFormat::String,
            RecordFormat::VisibilityBindingSet,
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    pub fn key_format(&self) -> RecordFormat {
        self.key_format
    }

    pub fn value_format(&self) -> RecordFormat {
        self.value_format
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TopologyNodeKind {
    /// Reads records from a topic.
    Source {
        topic: String,
        key_format: RecordFormat,
        value_format: RecordFormat,
    },
    Processor(ProcessorSupplier),
    /// Writes records to a topic.
    Sink {
        topic: String,
        key_format: RecordFormat,
        value_format: RecordFormat,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TopologyNode {
    name: String,
    kind: TopologyNodeKind,
    parents: Vec<String>,
    children: Vec<String>,
    stores: Vec<String>,
}

impl TopologyNode {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &TopologyNodeKind {
        &self.kind
    }

    /// The names of the nodes that send records to this node.
    pub fn parents(&self) -> &[String] {
        &self.parents
    }

    /// The names of the nodes that receive the records of this node, in the order in which they
    /// have been added.
    pub fn children(&self) -> &[String] {
        &self.children
    }

    /// The names of the state stores that are attached to this node.
    pub fn stores(&self) -> &[String] {
        &self.stores
    }
}

/// An immutable topology created by a [TopologyBuilder].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Topology {
    nodes: Vec<TopologyNode>,
    index: FxHashMap<String, usize>,
    stores: Vec<StateStoreSpec>,
}

impl Topology {
    /// The nodes of the topology in the order in which they have been added.
    pub fn nodes(&self) -> &[TopologyNode] {
        &self.nodes
    }

    pub fn node(&self, name: &str) -> Option<&TopologyNode> {
        self.index.get(name).and_then(|idx| self.nodes.get(*idx))
    }

    pub fn sources(&self) -> impl Iterator<Item = &TopologyNode> {
        self.nodes
            .iter()
            .filter(|node| matches!(node.kind, TopologyNodeKind::Source { .. }))
    }

    pub fn state_stores(&self) -> &[StateStoreSpec] {
        &self.stores
    }
}

impl Display for Topology {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Topology:")?;
        for node in &self.nodes {
            match &node.kind {
                TopologyNodeKind::Source {
                    topic,
                    key_format,
                    value_format,
                } => writeln!(
                    f,
                    "  Source: {} (topic: {topic}, key: {key_format}, value: {value_format})",
                    node.name
                )?,
                TopologyNodeKind::Processor(supplier) => {
                    writeln!(f, "  Processor: {} ({supplier})", node.name)?;
                }
                TopologyNodeKind::Sink {
                    topic,
                    key_format,
                    value_format,
                } => writeln!(
                    f,
                    "  Sink: {} (topic: {topic}, key: {key_format}, value: {value_format})",
                    node.name
                )?,
            }

            if !node.stores.is_empty() {
                writeln!(f, "    stores: {}", node.stores.iter().join(", "))?;
            }
            if !node.children.is_empty() {
                writeln!(f, "    --> {}", node.children.iter().join(", "))?;
            }
            if !node.parents.is_empty() {
                writeln!(f, "    <-- {}", node.parents.iter().join(", "))?;
            }
        }

        for store in &self.stores {
            let persistence = if store.persistent {
                "persistent"
            } else {
                "in-memory"
            };
            writeln!(
                f,
                "  State store: {} ({persistence}, key: {}, value: {})",
                store.name, store.key_format, store.value_format
            )?;
        }
        Ok(())
    }
}
