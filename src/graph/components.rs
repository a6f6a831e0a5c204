//! Weakly connected components.
//!
//! Nodes are connected if there is a path between them ignoring edge
//! direction. Components are reported in first-found order: the component
//! containing the earliest-inserted node comes first, and nodes inside a
//! component keep insertion order.

use std::cmp::Ordering;

use hashbrown::HashMap;

use crate::model::NodeId;
use super::KnowledgeGraph;

fn uf_find(parent: &mut [usize], i: usize) -> usize {
    if parent[i] != i {
        parent[i] = uf_find(parent, parent[i]);
    }
    parent[i]
}

fn uf_union(parent: &mut [usize], rank: &mut [usize], x: usize, y: usize) {
    let px = uf_find(parent, x);
    let py = uf_find(parent, y);
    if px == py {
        return;
    }
    match rank[px].cmp(&rank[py]) {
        Ordering::Less => parent[px] = py,
        Ordering::Greater => parent[py] = px,
        Ordering::Equal => {
            parent[py] = px;
            rank[px] += 1;
        }
    }
}

/// Compute weakly connected components as lists of node keys.
#[must_use]
pub fn weakly_connected_components(graph: &KnowledgeGraph) -> Vec<Vec<String>> {
    let ids: Vec<NodeId> = graph.nodes().map(|n| n.id).collect();
    let n = ids.len();
    if n == 0 {
        return vec![];
    }
    let position: HashMap<NodeId, usize> = ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();

    let mut parent: Vec<usize> = (0..n).collect();
    let mut rank: Vec<usize> = vec![0; n];
    for edge in graph.edges() {
        if let (Some(&s), Some(&d)) = (position.get(&edge.edge.src), position.get(&edge.edge.dst)) {
            uf_union(&mut parent, &mut rank, s, d);
        }
    }

    // Group by representative, ordering groups by their first member.
    let mut slot_of_root: HashMap<usize, usize> = HashMap::new();
    let mut components: Vec<Vec<String>> = Vec::new();
    for (i, node) in graph.nodes().enumerate() {
        let root = uf_find(&mut parent, i);
        let slot = *slot_of_root.entry(root).or_insert_with(|| {
            components.push(Vec::new());
            components.len() - 1
        });
        components[slot].push(node.key.clone());
    }
    components
}

/// The largest weakly connected component. Ties go to the component found
/// first. `None` for an empty graph.
#[must_use]
pub fn largest_component(graph: &KnowledgeGraph) -> Option<Vec<String>> {
    let mut best: Option<Vec<String>> = None;
    for component in weakly_connected_components(graph) {
        if best.as_ref().is_none_or(|b| component.len() > b.len()) {
            best = Some(component);
        }
    }
    best
}
