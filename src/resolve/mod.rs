//! # Entity resolution
//!
//! Collapses near-duplicate node keys ("Garda" / "Gardaí") into one
//! canonical node. Keys are visited longest first; each live key is
//! compared with every live key no longer than itself, and a pair at or
//! above the similarity threshold is merged immediately, the longer key
//! surviving. The scan is a single greedy pass: a key consumed early is
//! never compared again, so a chain A≈B≈C with A≉C can leave C standalone.

pub mod similarity;

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::ResolveConfig;
use crate::graph::KnowledgeGraph;

pub use similarity::similarity_ratio;

/// Where a merged-away key went.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalEntry {
    pub merged_into: String,
    pub similarity: f64,
}

/// Merged-away key → canonical entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalMap {
    entries: BTreeMap<String, CanonicalEntry>,
}

impl CanonicalMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&CanonicalEntry> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CanonicalEntry)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn record(&mut self, removed: &str, merged_into: &str, similarity: f64) {
        self.entries.insert(
            removed.to_string(),
            CanonicalEntry { merged_into: merged_into.to_string(), similarity },
        );
    }

    /// Follow `merged_into` links from `key` to the key that survived.
    /// Keys never merged map to themselves.
    pub fn canonical<'a>(&'a self, key: &'a str) -> &'a str {
        let mut current = key;
        // A well-formed map has no cycles; the bound keeps a corrupt one finite.
        for _ in 0..=self.entries.len() {
            match self.entries.get(current) {
                Some(entry) => current = &entry.merged_into,
                None => break,
            }
        }
        current
    }
}

/// A merge the graph refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeFailure {
    pub keep: String,
    pub remove: String,
    pub reason: String,
}

/// Outcome of one resolution pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolutionReport {
    pub canonical_map: CanonicalMap,
    /// Surviving canonical key → keys merged into it during this pass.
    pub aliases: BTreeMap<String, BTreeSet<String>>,
    pub comparisons: usize,
    pub merges: usize,
    pub failures: Vec<MergeFailure>,
}

/// Similarity-driven merge engine.
#[derive(Debug, Clone, Copy)]
pub struct EntityResolver {
    threshold: f64,
}

impl Default for EntityResolver {
    fn default() -> Self {
        Self::from_config(&ResolveConfig::default())
    }
}

impl EntityResolver {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn from_config(config: &ResolveConfig) -> Self {
        Self::new(config.threshold)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Run one pass over `graph`, merging in place.
    pub fn resolve(&self, graph: &mut KnowledgeGraph) -> ResolutionReport {
        let mut keys: Vec<(usize, String)> = graph
            .keys()
            .map(|k| (k.chars().count(), k.to_string()))
            .collect();
        keys.sort_by(|(la, a), (lb, b)| Reverse(*la).cmp(&Reverse(*lb)).then_with(|| a.cmp(b)));

        let mut report = ResolutionReport::default();

        for (outer_len, outer) in &keys {
            if !graph.contains(outer) {
                continue;
            }
            for (inner_len, inner) in &keys {
                if inner == outer || inner_len > outer_len || !graph.contains(inner) {
                    continue;
                }
                report.comparisons += 1;
                let ratio = similarity_ratio(outer, inner);
                if ratio < self.threshold {
                    continue;
                }
                match graph.merge_nodes(outer, inner) {
                    Ok(outcome) => {
                        debug!(keep = %outer, remove = %inner, ratio, redirected = outcome.redirected, "resolved duplicate");
                        report.canonical_map.record(inner, outer, ratio);
                        report.merges += 1;
                    }
                    Err(e) => {
                        warn!(keep = %outer, remove = %inner, error = %e, "merge failed, skipping pair");
                        report.failures.push(MergeFailure {
                            keep: outer.clone(),
                            remove: inner.clone(),
                            reason: e.to_string(),
                        });
                    }
                }
            }
        }

        for (removed, _) in report.canonical_map.iter() {
            let survivor = report.canonical_map.canonical(removed);
            if graph.contains(survivor) {
                report
                    .aliases
                    .entry(survivor.to_string())
                    .or_default()
                    .insert(removed.to_string());
            }
        }

        info!(
            nodes = graph.node_count(),
            comparisons = report.comparisons,
            merges = report.merges,
            failures = report.failures.len(),
            "entity resolution finished"
        );
        report
    }
}
