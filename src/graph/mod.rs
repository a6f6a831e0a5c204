//! In-memory knowledge graph store.
//!
//! This is the single owned graph value every stage works on. Nodes are
//! addressed by their phrase key; internally they carry a `NodeId` so that
//! iteration follows insertion order.
//!
//! ## Guarantees
//!
//! - **No dangling endpoints**: every mutation that removes a node detaches
//!   its edges first. `check_integrity()` verifies this.
//! - **One edge per ordered pair**: adding a second relation between the
//!   same pair folds it into the existing edge's relation set.
//! - **Exclusive ownership**: there is no interior mutability; stages take
//!   `&mut KnowledgeGraph` and callers serialize access.

pub mod components;

use std::collections::BTreeMap;

use hashbrown::HashMap;
use smallvec::SmallVec;
use tracing::debug;

use crate::model::*;
use crate::{Error, Result};

pub use components::{largest_component, weakly_connected_components};

type Adjacency = HashMap<NodeId, SmallVec<[NodeId; 4]>>;

/// Collapse runs of whitespace and trim, so `"New  York "` and
/// `"New York"` address the same node.
pub fn normalize_key(key: &str) -> String {
    key.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Borrowed view of an edge with its endpoint keys resolved.
#[derive(Debug, Clone, Copy)]
pub struct EdgeRef<'g> {
    pub from: &'g str,
    pub to: &'g str,
    pub edge: &'g GraphEdge,
}

impl EdgeRef<'_> {
    pub fn attrs(&self) -> &EdgeAttrs {
        &self.edge.attrs
    }
}

/// What a merge did to the edges of the removed node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Edges re-pointed at the surviving node (new or folded into existing).
    pub redirected: usize,
    /// Edges between the two merged nodes, dropped instead of becoming self-loops.
    pub dropped: usize,
}

// ============================================================================
// KnowledgeGraph
// ============================================================================

/// Directed knowledge graph keyed by canonical phrase.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeGraph {
    nodes: BTreeMap<NodeId, GraphNode>,
    /// phrase key → node id
    index: HashMap<String, NodeId>,
    edges: BTreeMap<(NodeId, NodeId), GraphEdge>,
    outgoing: Adjacency,
    incoming: Adjacency,
    /// Accepted triples, in extraction order.
    triples: Vec<Triple>,
    next_node_id: u64,
}

impl KnowledgeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Size
    // ========================================================================

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ========================================================================
    // Node access
    // ========================================================================

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn node(&self, key: &str) -> Option<&GraphNode> {
        self.index.get(key).and_then(|id| self.nodes.get(id))
    }

    pub fn node_mut(&mut self, key: &str) -> Option<&mut GraphNode> {
        let id = *self.index.get(key)?;
        self.nodes.get_mut(&id)
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> + '_ {
        self.nodes.values()
    }

    /// Node keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.nodes.values().map(|n| n.key.as_str())
    }

    // ========================================================================
    // Edge access
    // ========================================================================

    pub fn edge(&self, from: &str, to: &str) -> Option<&GraphEdge> {
        let src = self.index.get(from)?;
        let dst = self.index.get(to)?;
        self.edges.get(&(*src, *dst))
    }

    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        self.edge(from, to).is_some()
    }

    /// All edges, ordered by (source id, target id).
    pub fn edges(&self) -> impl Iterator<Item = EdgeRef<'_>> + '_ {
        self.edges.values().filter_map(move |edge| {
            let from = self.nodes.get(&edge.src)?;
            let to = self.nodes.get(&edge.dst)?;
            Some(EdgeRef { from: &from.key, to: &to.key, edge })
        })
    }

    pub fn successors(&self, key: &str) -> Vec<&str> {
        self.neighbours(&self.outgoing, key)
    }

    pub fn predecessors(&self, key: &str) -> Vec<&str> {
        self.neighbours(&self.incoming, key)
    }

    fn neighbours(&self, adjacency: &Adjacency, key: &str) -> Vec<&str> {
        let Some(id) = self.index.get(key) else {
            return Vec::new();
        };
        adjacency
            .get(id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|n| self.nodes.get(n).map(|node| node.key.as_str()))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn out_degree(&self, key: &str) -> usize {
        self.index.get(key).map_or(0, |id| self.outgoing.get(id).map_or(0, |v| v.len()))
    }

    pub fn in_degree(&self, key: &str) -> usize {
        self.index.get(key).map_or(0, |id| self.incoming.get(id).map_or(0, |v| v.len()))
    }

    /// Total degree. A self-loop counts twice.
    pub fn degree(&self, key: &str) -> usize {
        self.out_degree(key) + self.in_degree(key)
    }

    // ========================================================================
    // Accumulation
    // ========================================================================

    /// Insert a node, or fold `attrs` into the existing node with the same
    /// (whitespace-normalized) key. Attributes already set win.
    pub fn add_node(&mut self, key: &str, attrs: NodeAttrs) -> NodeId {
        let key = normalize_key(key);
        if let Some(id) = self.index.get(&key).copied() {
            if let Some(node) = self.nodes.get_mut(&id) {
                node.attrs.absorb(&attrs);
            }
            return id;
        }

        self.next_node_id += 1;
        let id = NodeId(self.next_node_id);
        self.index.insert(key.clone(), id);
        self.nodes.insert(id, GraphNode::new(id, key).with_attrs(attrs));
        self.outgoing.insert(id, SmallVec::new());
        self.incoming.insert(id, SmallVec::new());
        id
    }

    /// Insert an edge, creating missing endpoints. An existing edge between
    /// the same ordered pair absorbs the new relations instead.
    pub fn add_edge(&mut self, from: &str, to: &str, attrs: EdgeAttrs) {
        let src = self.add_node(from, NodeAttrs::new());
        let dst = self.add_node(to, NodeAttrs::new());
        self.upsert_edge(src, dst, attrs);
    }

    /// Apply one extracted triple: both endpoint nodes, the edge carrying
    /// the triple's relation, and a triple-log entry.
    pub fn apply_triple(
        &mut self,
        triple: &Triple,
        subject: NodeAttrs,
        object: NodeAttrs,
        edge: EdgeAttrs,
    ) {
        let triple = Triple::new(
            normalize_key(&triple.subject),
            triple.relation.clone(),
            normalize_key(&triple.object),
        );
        let src = self.add_node(&triple.subject, subject);
        let dst = self.add_node(&triple.object, object);
        let mut attrs = EdgeAttrs::relation(triple.relation.clone());
        attrs.absorb(&edge);
        self.upsert_edge(src, dst, attrs);
        self.triples.push(triple);
    }

    fn upsert_edge(&mut self, src: NodeId, dst: NodeId, attrs: EdgeAttrs) {
        if let Some(existing) = self.edges.get_mut(&(src, dst)) {
            existing.attrs.absorb(&attrs);
            return;
        }
        self.edges.insert((src, dst), GraphEdge::new(src, dst, attrs));
        self.outgoing.entry(src).or_default().push(dst);
        self.incoming.entry(dst).or_default().push(src);
    }

    /// Add `source` to every node's and edge's provenance set.
    pub fn tag_source(&mut self, source: &SourceTag) {
        for node in self.nodes.values_mut() {
            node.attrs.sources.insert(source.clone());
        }
        for edge in self.edges.values_mut() {
            edge.attrs.sources.insert(source.clone());
        }
    }

    // ========================================================================
    // Removal
    // ========================================================================

    fn lookup(&self, key: &str) -> Result<NodeId> {
        self.index
            .get(key)
            .copied()
            .ok_or_else(|| Error::NodeNotFound(key.to_string()))
    }

    fn detach_edge(&mut self, src: NodeId, dst: NodeId) -> Option<GraphEdge> {
        let edge = self.edges.remove(&(src, dst))?;
        if let Some(out) = self.outgoing.get_mut(&src) {
            out.retain(|n| *n != dst);
        }
        if let Some(inc) = self.incoming.get_mut(&dst) {
            inc.retain(|n| *n != src);
        }
        Some(edge)
    }

    /// Remove a node together with every edge touching it.
    pub fn remove_node(&mut self, key: &str) -> Result<GraphNode> {
        let id = self.lookup(key)?;

        let succs = self.outgoing.get(&id).cloned().unwrap_or_default();
        for succ in succs {
            self.detach_edge(id, succ);
        }
        let preds = self.incoming.get(&id).cloned().unwrap_or_default();
        for pred in preds {
            self.detach_edge(pred, id);
        }

        self.outgoing.remove(&id);
        self.incoming.remove(&id);
        self.index.remove(key);
        self.nodes
            .remove(&id)
            .ok_or_else(|| Error::Integrity(format!("index pointed at missing node {id} ('{key}')")))
    }

    /// Merge `remove` into `keep`.
    ///
    /// Edges of `remove` are re-pointed at `keep` (folding relation sets into
    /// edges `keep` already has), attributes are absorbed with `keep`
    /// winning on scalar conflicts, `remove` becomes an alias of `keep`, and
    /// the triple log is rewritten to the surviving key. Edges between the
    /// two nodes are dropped rather than turned into self-loops.
    ///
    /// Both keys are validated before anything is touched, so a failed merge
    /// leaves the graph unchanged.
    pub fn merge_nodes(&mut self, keep: &str, remove: &str) -> Result<MergeOutcome> {
        let keep_id = self.lookup(keep)?;
        let remove_id = self.lookup(remove)?;
        if keep_id == remove_id {
            return Err(Error::InvalidMerge(format!("cannot merge '{keep}' into itself")));
        }

        let mut outcome = MergeOutcome::default();

        let mut attached: Vec<(NodeId, NodeId)> = Vec::new();
        if let Some(preds) = self.incoming.get(&remove_id) {
            attached.extend(preds.iter().map(|&pred| (pred, remove_id)));
        }
        if let Some(succs) = self.outgoing.get(&remove_id) {
            attached.extend(succs.iter().map(|&succ| (remove_id, succ)));
        }

        let rewire = |n: NodeId| if n == remove_id { keep_id } else { n };
        for (src, dst) in attached {
            // a self-loop on `remove` shows up in both lists
            let Some(edge) = self.detach_edge(src, dst) else { continue };
            let rewired = GraphEdge::new(rewire(src), rewire(dst), edge.attrs);
            if rewired.is_self_loop() {
                outcome.dropped += 1;
                continue;
            }
            self.upsert_edge(rewired.src, rewired.dst, rewired.attrs);
            outcome.redirected += 1;
        }

        self.outgoing.remove(&remove_id);
        self.incoming.remove(&remove_id);
        self.index.remove(remove);
        let removed = self
            .nodes
            .remove(&remove_id)
            .ok_or_else(|| Error::Integrity(format!("index pointed at missing node {remove_id}")))?;

        if let Some(survivor) = self.nodes.get_mut(&keep_id) {
            survivor.attrs.absorb(&removed.attrs);
            survivor.attrs.aliases.insert(removed.key.clone());
        }

        for triple in &mut self.triples {
            if triple.subject == removed.key {
                triple.subject = keep.to_string();
            }
            if triple.object == removed.key {
                triple.object = keep.to_string();
            }
        }

        debug!(keep, remove, redirected = outcome.redirected, dropped = outcome.dropped, "merged nodes");
        Ok(outcome)
    }

    // ========================================================================
    // Triple log
    // ========================================================================

    pub fn triples(&self) -> &[Triple] {
        &self.triples
    }

    /// Append logged triples from another graph whose endpoints are live here.
    pub(crate) fn extend_triples<'t>(&mut self, triples: impl IntoIterator<Item = &'t Triple>) {
        for t in triples {
            if self.index.contains_key(&t.subject) && self.index.contains_key(&t.object) {
                self.triples.push(t.clone());
            }
        }
    }

    /// Drop logged triples whose subject or object is no longer a node.
    /// Returns how many were dropped.
    pub fn retain_triples_with_live_endpoints(&mut self) -> usize {
        let before = self.triples.len();
        let index = &self.index;
        self.triples
            .retain(|t| index.contains_key(&t.subject) && index.contains_key(&t.object));
        before - self.triples.len()
    }

    // ========================================================================
    // Integrity
    // ========================================================================

    /// Verify that every edge endpoint and every adjacency entry refers to a
    /// live node, and that the key index matches the node table.
    pub fn check_integrity(&self) -> Result<()> {
        if self.index.len() != self.nodes.len() {
            return Err(Error::Integrity(format!(
                "{} indexed keys for {} nodes", self.index.len(), self.nodes.len()
            )));
        }
        for (key, id) in &self.index {
            match self.nodes.get(id) {
                Some(node) if node.key == *key => {}
                _ => return Err(Error::Integrity(format!("key '{key}' points at node {id}"))),
            }
        }
        for ((src, dst), edge) in &self.edges {
            if edge.src != *src || edge.dst != *dst {
                return Err(Error::Integrity(format!("edge stored under ({src}, {dst}) is ({}, {})", edge.src, edge.dst)));
            }
            if !self.nodes.contains_key(src) || !self.nodes.contains_key(dst) {
                return Err(Error::Integrity(format!("edge ({src}, {dst}) has a dangling endpoint")));
            }
            let listed_out = self.outgoing.get(src).is_some_and(|v| v.contains(dst));
            let listed_in = self.incoming.get(dst).is_some_and(|v| v.contains(src));
            if !listed_out || !listed_in {
                return Err(Error::Integrity(format!("edge ({src}, {dst}) missing from adjacency")));
            }
        }
        let adjacency_entries: usize = self.outgoing.values().map(|v| v.len()).sum();
        if adjacency_entries != self.edges.len() {
            return Err(Error::Integrity(format!(
                "{adjacency_entries} adjacency entries for {} edges", self.edges.len()
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn rel(r: &str) -> EdgeAttrs {
        EdgeAttrs::relation(r)
    }

    #[test]
    fn test_add_node_is_idempotent() {
        let mut g = KnowledgeGraph::new();
        let a = g.add_node("Dublin", NodeAttrs::new().with_lemma("Dublin"));
        let b = g.add_node("Dublin", NodeAttrs::new().with_lemma("dublin").with_entity_type("GPE"));

        assert_eq!(a, b);
        assert_eq!(g.node_count(), 1);
        let node = g.node("Dublin").unwrap();
        assert_eq!(node.attrs.lemma.as_deref(), Some("Dublin"));
        assert!(node.attrs.entity_types.contains("GPE"));
    }

    #[test]
    fn test_keys_are_whitespace_normalized() {
        let mut g = KnowledgeGraph::new();
        g.add_node("New   York ", NodeAttrs::new());
        assert!(g.contains("New York"));
        assert_eq!(g.node_count(), 1);
    }

    #[test]
    fn test_parallel_relations_fold_into_one_edge() {
        let mut g = KnowledgeGraph::new();
        g.add_edge("Gardaí", "boys", rel("arrest"));
        g.add_edge("Gardaí", "boys", rel("question"));
        g.add_edge("Gardaí", "boys", rel("arrest"));

        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.edge("Gardaí", "boys").unwrap().attrs.relation_label(), "arrest, question");
        assert_eq!(g.degree("Gardaí"), 1);
    }

    #[test]
    fn test_apply_triple_logs_and_links() {
        let mut g = KnowledgeGraph::new();
        let t = Triple::new("cyclone", "damage", "homes");
        g.apply_triple(&t, NodeAttrs::new(), NodeAttrs::new(), EdgeAttrs::new().with_dependency_role("ROOT"));

        assert_eq!(g.triples(), &[t]);
        let edge = g.edge("cyclone", "homes").unwrap();
        assert!(edge.attrs.relations.contains("damage"));
        assert_eq!(edge.attrs.dependency_role.as_deref(), Some("ROOT"));
    }

    #[test]
    fn test_remove_node_detaches_edges() {
        let mut g = KnowledgeGraph::new();
        g.add_edge("a", "b", rel("r"));
        g.add_edge("b", "c", rel("r"));
        g.add_edge("c", "b", rel("r"));

        let removed = g.remove_node("b").unwrap();
        assert_eq!(removed.key, "b");
        assert_eq!(g.edge_count(), 0);
        assert_eq!(g.degree("a"), 0);
        g.check_integrity().unwrap();
    }

    #[test]
    fn test_remove_missing_node_fails() {
        let mut g = KnowledgeGraph::new();
        assert!(matches!(g.remove_node("ghost"), Err(Error::NodeNotFound(_))));
    }

    #[test]
    fn test_self_loop_counts_twice() {
        let mut g = KnowledgeGraph::new();
        g.add_edge("a", "a", rel("r"));
        assert_eq!(g.degree("a"), 2);
        g.remove_node("a").unwrap();
        assert_eq!(g.edge_count(), 0);
        g.check_integrity().unwrap();
    }

    #[test]
    fn test_merge_rewires_and_folds() {
        let mut g = KnowledgeGraph::new();
        g.add_node("Gardaí", NodeAttrs::new().with_entity_type("ORG"));
        g.add_node("Garda", NodeAttrs::new().with_lemma("Garda").with_entity_type("PERSON"));
        g.add_edge("Garda", "boys", rel("arrest"));
        g.add_edge("Gardaí", "boys", rel("question"));
        g.add_edge("Saggart", "Garda", rel("call"));
        g.add_edge("Garda", "Gardaí", rel("join"));

        let outcome = g.merge_nodes("Gardaí", "Garda").unwrap();

        assert_eq!(outcome, MergeOutcome { redirected: 2, dropped: 1 });
        assert!(!g.contains("Garda"));
        assert_eq!(g.edge("Gardaí", "boys").unwrap().attrs.relation_label(), "arrest, question");
        assert!(g.has_edge("Saggart", "Gardaí"));
        assert!(!g.has_edge("Gardaí", "Gardaí"));

        let keep = g.node("Gardaí").unwrap();
        assert_eq!(keep.attrs.lemma.as_deref(), Some("Garda"));
        assert_eq!(keep.attrs.entity_type_label().as_deref(), Some("ORG|PERSON"));
        assert!(keep.attrs.aliases.contains("Garda"));
        g.check_integrity().unwrap();
    }

    #[test]
    fn test_merge_drops_edges_that_would_loop() {
        let mut g = KnowledgeGraph::new();
        g.add_edge("Gardaí", "Garda", rel("lead"));
        g.add_edge("Garda", "Gardaí", rel("join"));
        g.add_edge("Garda", "Garda", rel("cite"));
        g.add_edge("Garda", "boys", rel("arrest"));

        let outcome = g.merge_nodes("Gardaí", "Garda").unwrap();

        assert_eq!(outcome, MergeOutcome { redirected: 1, dropped: 3 });
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.degree("Gardaí"), 1);
        assert!(g.edges().all(|e| !e.edge.is_self_loop()));
        g.check_integrity().unwrap();
    }

    #[test]
    fn test_merge_rewrites_triple_log() {
        let mut g = KnowledgeGraph::new();
        let t = Triple::new("Garda", "arrest", "boys");
        g.apply_triple(&t, NodeAttrs::new(), NodeAttrs::new(), EdgeAttrs::new());
        g.add_node("Gardaí", NodeAttrs::new());

        g.merge_nodes("Gardaí", "Garda").unwrap();
        assert_eq!(g.triples(), &[Triple::new("Gardaí", "arrest", "boys")]);
    }

    #[test]
    fn test_failed_merge_leaves_graph_untouched() {
        let mut g = KnowledgeGraph::new();
        g.add_edge("a", "b", rel("r"));

        assert!(matches!(g.merge_nodes("a", "ghost"), Err(Error::NodeNotFound(_))));
        assert!(matches!(g.merge_nodes("a", "a"), Err(Error::InvalidMerge(_))));
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn test_tag_source_marks_everything() {
        let mut g = KnowledgeGraph::new();
        g.add_edge("a", "b", rel("r"));
        let en = SourceTag::language("en");
        g.tag_source(&en);

        assert!(g.nodes().all(|n| n.has_source(&en)));
        assert!(g.edges().all(|e| e.attrs().sources.contains(&en)));
    }

    #[test]
    fn test_iteration_follows_insertion_order() {
        let mut g = KnowledgeGraph::new();
        for key in ["zeta", "alpha", "mu"] {
            g.add_node(key, NodeAttrs::new());
        }
        assert_eq!(g.keys().collect::<Vec<_>>(), vec!["zeta", "alpha", "mu"]);
    }

    #[test]
    fn test_retain_triples() {
        let mut g = KnowledgeGraph::new();
        g.apply_triple(&Triple::new("a", "r", "b"), NodeAttrs::new(), NodeAttrs::new(), EdgeAttrs::new());
        g.apply_triple(&Triple::new("b", "r", "c"), NodeAttrs::new(), NodeAttrs::new(), EdgeAttrs::new());
        g.remove_node("c").unwrap();

        assert_eq!(g.retain_triples_with_live_endpoints(), 1);
        assert_eq!(g.triples(), &[Triple::new("a", "r", "b")]);
    }
}
