//! Edge (directed relation) in the knowledge graph.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use super::{NodeId, SourceTag};

/// Attributes attached to an edge.
///
/// One edge exists per ordered node pair; every relation observed between
/// the pair is folded into `relations`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeAttrs {
    pub relations: BTreeSet<String>,
    /// Dependency label of the predicate that produced the edge.
    pub dependency_role: Option<String>,
    pub sentence_text: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub sources: BTreeSet<SourceTag>,
}

impl EdgeAttrs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attributes carrying a single relation label. An empty label
    /// produces an edge without relations.
    pub fn relation(relation: impl Into<String>) -> Self {
        let relation = relation.into();
        let mut attrs = Self::new();
        if !relation.is_empty() {
            attrs.relations.insert(relation);
        }
        attrs
    }

    pub fn with_dependency_role(mut self, dep: impl Into<String>) -> Self {
        self.dependency_role = Some(dep.into());
        self
    }

    pub fn with_sentence(mut self, text: impl Into<String>) -> Self {
        self.sentence_text = Some(text.into());
        self
    }

    pub fn with_source(mut self, source: SourceTag) -> Self {
        self.sources.insert(source);
        self
    }

    /// Fold `other` into `self`: relation and source sets are unioned,
    /// scalar attributes already present on `self` are kept.
    pub fn absorb(&mut self, other: &EdgeAttrs) {
        self.relations.extend(other.relations.iter().cloned());
        self.sources.extend(other.sources.iter().cloned());
        if self.dependency_role.is_none() {
            self.dependency_role.clone_from(&other.dependency_role);
        }
        if self.sentence_text.is_none() {
            self.sentence_text.clone_from(&other.sentence_text);
        }
    }

    /// Relations in sorted order joined by `", "`.
    pub fn relation_label(&self) -> String {
        self.relations.iter().cloned().collect::<Vec<_>>().join(", ")
    }
}

/// A directed edge between two live nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub src: NodeId,
    pub dst: NodeId,
    pub attrs: EdgeAttrs,
}

impl GraphEdge {
    pub fn new(src: NodeId, dst: NodeId, attrs: EdgeAttrs) -> Self {
        Self { src, dst, attrs }
    }

    pub fn is_self_loop(&self) -> bool {
        self.src == self.dst
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relation_label_is_sorted() {
        let mut attrs = EdgeAttrs::relation("visit");
        attrs.absorb(&EdgeAttrs::relation("attack_in"));
        assert_eq!(attrs.relation_label(), "attack_in, visit");
    }

    #[test]
    fn empty_relation_is_not_recorded() {
        assert!(EdgeAttrs::relation("").relations.is_empty());
    }

    #[test]
    fn self_loop() {
        assert!(GraphEdge::new(NodeId(1), NodeId(1), EdgeAttrs::new()).is_self_loop());
        assert!(!GraphEdge::new(NodeId(1), NodeId(2), EdgeAttrs::new()).is_self_loop());
    }
}
