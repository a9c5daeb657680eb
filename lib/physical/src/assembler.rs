use crate::topology::{RecordFormat, StateStoreSpec, Topology, TopologyBuilder};
use crate::{ProcessorSupplier, TopologyBuilderError};
use rdf_streams_logical::{CompiledQuery, ProcessorCapability, ProcessorEntry};
use tracing::debug;

/// The name of the node that reads the statement topic.
pub const SOURCE_NAME: &str = "SOURCE";
/// The name of the node that converts the results of the root stage.
pub const OUTPUT_FORMATTER_NAME: &str = "OUTPUT_FORMATTER";
/// The name of the node that writes the result topic.
pub const SINK_NAME: &str = "SINK";

/// Wires the stages of `compiled` into a [Topology].
///
/// The stages are added leaf-first such that every stage is added after its parents. Statement
/// patterns read from the source; every other stage reads from the stages of its upstream nodes.
/// Each join stage gets a persistent state store named after the stage.
pub fn assemble(
    compiled: &CompiledQuery,
    statement_topic: &str,
    result_topic: &str,
) -> Result<Topology, TopologyBuilderError> {
    let root = compiled.root().ok_or(TopologyBuilderError::EmptyQuery)?;

    let mut builder = TopologyBuilder::new();
    builder.add_source(
        SOURCE_NAME,
        statement_topic,
        RecordFormat::String,
        RecordFormat::VisibilityStatement,
    )?;

    for entry in compiled.entries().iter().rev() {
        let parents = parents_of(compiled, entry)?;
        debug!(
            id = entry.id(),
            parents = ?parents,
            "assembler.add_stage"
        );
        builder.add_processor(entry.id(), ProcessorSupplier::from_entry(entry), &parents)?;

        if let ProcessorCapability::Join { .. } = entry.capability() {
            builder.add_state_store(StateStoreSpec::join_state(entry.id()), &[entry.id()])?;
        }
    }

    builder
        .add_processor(
            OUTPUT_FORMATTER_NAME,
            ProcessorSupplier::OutputFormatter {
                id: OUTPUT_FORMATTER_NAME.to_owned(),
            },
            &[root.id()],
        )?
        .add_sink(
            SINK_NAME,
            result_topic,
            RecordFormat::String,
            RecordFormat::VisibilityBindingSet,
            &[OUTPUT_FORMATTER_NAME],
        )?;

    Ok(builder.build())
}

fn parents_of<'query>(
    compiled: &'query CompiledQuery,
    entry: &ProcessorEntry,
) -> Result<Vec<&'query str>, TopologyBuilderError> {
    if let ProcessorCapability::StatementPattern(_) = entry.capability() {
        return Ok(vec![SOURCE_NAME]);
    }

    entry
        .upstream_nodes()
        .iter()
        .map(|node| {
            compiled
                .id_of(*node)
                .ok_or_else(|| TopologyBuilderError::UnknownUpstream {
                    stage: entry.id().to_owned(),
                    node: *node,
                })
        })
        .collect()
}
