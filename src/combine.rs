//! Multi-source combination.
//!
//! Unions independently built graphs (one per language, time window or
//! feed) into one graph where every node and edge records which sources
//! contributed it. Sources are visited in tag order, so the result does not
//! depend on how the caller assembled the map.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::graph::KnowledgeGraph;
use crate::model::{EdgeAttrs, NodeAttrs, SourceTag};

/// Combine per-source graphs into one provenance-tagged graph.
///
/// A node seen for the first time copies its attributes (minus any
/// provenance it already carried); later sources only add their tag.
/// Edges between the same ordered pair fold their relation and source sets.
/// Empty graphs contribute nothing.
pub fn combine(graphs: &BTreeMap<SourceTag, KnowledgeGraph>) -> KnowledgeGraph {
    let mut combined = KnowledgeGraph::new();

    for (tag, graph) in graphs {
        if graph.is_empty() {
            debug!(source = %tag, "skipping empty source graph");
            continue;
        }

        for node in graph.nodes() {
            if !combined.contains(&node.key) {
                let attrs = NodeAttrs { sources: Default::default(), ..node.attrs.clone() };
                combined.add_node(&node.key, attrs);
            }
            if let Some(existing) = combined.node_mut(&node.key) {
                existing.attrs.sources.insert(tag.clone());
            }
        }

        for e in graph.edges() {
            let attrs = EdgeAttrs {
                relations: e.attrs().relations.clone(),
                dependency_role: e.attrs().dependency_role.clone(),
                sentence_text: e.attrs().sentence_text.clone(),
                sources: Default::default(),
            }
            .with_source(tag.clone());
            combined.add_edge(e.from, e.to, attrs);
        }

        combined.extend_triples(graph.triples());
        debug!(source = %tag, nodes = graph.node_count(), edges = graph.edge_count(), "combined source");
    }

    info!(
        sources = graphs.len(),
        nodes = combined.node_count(),
        edges = combined.edge_count(),
        "combined source graphs"
    );
    combined
}
