//! Node in the knowledge graph.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use super::{PartOfSpeech, SourceTag};

/// Opaque node identifier. Allocated monotonically, so ascending ids
/// follow insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Attributes attached to a node.
///
/// Entity types are kept as a set; the `A|B` form only exists when the
/// node is rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeAttrs {
    pub lemma: Option<String>,
    pub pos: Option<PartOfSpeech>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub entity_types: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub aliases: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub sources: BTreeSet<SourceTag>,
}

impl NodeAttrs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lemma(mut self, lemma: impl Into<String>) -> Self {
        self.lemma = Some(lemma.into());
        self
    }

    pub fn with_pos(mut self, pos: PartOfSpeech) -> Self {
        self.pos = Some(pos);
        self
    }

    pub fn with_entity_type(mut self, entity_type: impl Into<String>) -> Self {
        let entity_type = entity_type.into();
        if !entity_type.is_empty() {
            self.entity_types.insert(entity_type);
        }
        self
    }

    pub fn with_source(mut self, source: SourceTag) -> Self {
        self.sources.insert(source);
        self
    }

    /// Fold `other` into `self`. Scalar attributes already set on `self`
    /// win; set-valued attributes are unioned.
    pub fn absorb(&mut self, other: &NodeAttrs) {
        if self.lemma.is_none() {
            self.lemma.clone_from(&other.lemma);
        }
        if self.pos.is_none() {
            self.pos = other.pos;
        }
        self.entity_types.extend(other.entity_types.iter().cloned());
        self.aliases.extend(other.aliases.iter().cloned());
        self.sources.extend(other.sources.iter().cloned());
    }

    /// Entity types joined for display, e.g. `"GPE|ORG"`.
    pub fn entity_type_label(&self) -> Option<String> {
        if self.entity_types.is_empty() {
            None
        } else {
            Some(self.entity_types.iter().cloned().collect::<Vec<_>>().join("|"))
        }
    }
}

/// A node in the knowledge graph. Its identity is the phrase `key`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: NodeId,
    pub key: String,
    pub attrs: NodeAttrs,
}

impl GraphNode {
    pub fn new(id: NodeId, key: impl Into<String>) -> Self {
        Self {
            id,
            key: key.into(),
            attrs: NodeAttrs::new(),
        }
    }

    pub fn with_attrs(mut self, attrs: NodeAttrs) -> Self {
        self.attrs = attrs;
        self
    }

    pub fn has_source(&self, source: &SourceTag) -> bool {
        self.attrs.sources.contains(source)
    }
}
