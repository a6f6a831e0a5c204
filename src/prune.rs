//! Graph pruning.
//!
//! Three passes, always in this order:
//!
//! 1. **Denylist**: drop nodes whose key matches a configured pattern.
//! 2. **Minimum degree**: drop nodes whose in+out degree is below the
//!    threshold, repeating until every survivor meets it.
//! 3. **Largest component** (optional): keep only the largest weakly
//!    connected component.
//!
//! Removal cascades: edges go with their node and the triple log loses
//! every triple naming a removed key. Pruning never fails; an empty graph
//! is a valid result.

use regex::Regex;
use tracing::{debug, warn};

use crate::config::PruneConfig;
use crate::graph::{largest_component, KnowledgeGraph};
use crate::Result;

/// What each pass removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PruneReport {
    pub denylisted: usize,
    pub below_degree: usize,
    pub outside_component: usize,
    pub triples_dropped: usize,
}

impl PruneReport {
    pub fn nodes_removed(&self) -> usize {
        self.denylisted + self.below_degree + self.outside_component
    }
}

fn remove_all(graph: &mut KnowledgeGraph, keys: Vec<String>) -> usize {
    let mut removed = 0;
    for key in keys {
        match graph.remove_node(&key) {
            Ok(_) => removed += 1,
            Err(e) => warn!(key = %key, error = %e, "prune: node vanished before removal"),
        }
    }
    removed
}

/// Remove every node whose key matches one of `patterns`.
pub fn remove_denylisted(graph: &mut KnowledgeGraph, patterns: &[Regex]) -> usize {
    if patterns.is_empty() {
        return 0;
    }
    let doomed: Vec<String> = graph
        .keys()
        .filter(|k| patterns.iter().any(|p| p.is_match(k)))
        .map(str::to_string)
        .collect();
    remove_all(graph, doomed)
}

/// Remove nodes with total degree below `min_degree` until none remain.
pub fn remove_below_degree(graph: &mut KnowledgeGraph, min_degree: usize) -> usize {
    let mut removed = 0;
    loop {
        let doomed: Vec<String> = graph
            .keys()
            .filter(|k| graph.degree(k) < min_degree)
            .map(str::to_string)
            .collect();
        if doomed.is_empty() {
            return removed;
        }
        removed += remove_all(graph, doomed);
    }
}

/// Keep only the largest weakly connected component.
pub fn keep_largest_component(graph: &mut KnowledgeGraph) -> usize {
    let Some(largest) = largest_component(graph) else {
        return 0;
    };
    if largest.len() == graph.node_count() {
        return 0;
    }
    let keep: hashbrown::HashSet<&str> = largest.iter().map(String::as_str).collect();
    let doomed: Vec<String> = graph
        .keys()
        .filter(|k| !keep.contains(k))
        .map(str::to_string)
        .collect();
    remove_all(graph, doomed)
}

/// Compiled pruning passes.
#[derive(Debug, Clone)]
pub struct Pruner {
    denylist: Vec<Regex>,
    min_degree: Option<usize>,
    largest_component: bool,
}

impl Pruner {
    pub fn new(config: &PruneConfig) -> Result<Self> {
        Ok(Self {
            denylist: config.compile_denylist()?,
            min_degree: config.min_degree,
            largest_component: config.largest_component,
        })
    }

    /// Run the configured passes in order.
    pub fn prune(&self, graph: &mut KnowledgeGraph) -> PruneReport {
        let mut report = PruneReport::default();

        report.denylisted = remove_denylisted(graph, &self.denylist);
        report.triples_dropped += graph.retain_triples_with_live_endpoints();

        if let Some(min) = self.min_degree {
            report.below_degree = remove_below_degree(graph, min);
            report.triples_dropped += graph.retain_triples_with_live_endpoints();
        }

        if self.largest_component {
            report.outside_component = keep_largest_component(graph);
            report.triples_dropped += graph.retain_triples_with_live_endpoints();
        }

        debug!(
            denylisted = report.denylisted,
            below_degree = report.below_degree,
            outside_component = report.outside_component,
            triples_dropped = report.triples_dropped,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "pruned graph"
        );
        report
    }
}
