use itertools::Itertools;
use rdf_streams_logical::{AlgebraTree, CompiledQuery};
use rdf_streams_model::Query;

pub fn lower_select(query: &str) -> AlgebraTree {
    let Query::Select { pattern, .. } = Query::parse(query, None).unwrap() else {
        panic!("Expected a SELECT query: {query}");
    };
    AlgebraTree::from_graph_pattern(&pattern)
}

/// Renders one line per compiled stage: id, side, upstream stage ids and capability.
pub fn render(compiled: &CompiledQuery) -> String {
    compiled
        .entries()
        .iter()
        .map(|entry| {
            let side = entry
                .side()
                .map_or_else(|| "-".to_owned(), |side| side.to_string());
            let upstream = entry
                .upstream_nodes()
                .iter()
                .map(|node| compiled.id_of(*node).unwrap_or("?"))
                .join(", ");
            format!(
                "{} ({side}) <- [{upstream}]: {}",
                entry.id(),
                entry.capability()
            )
        })
        .join("\n")
}
