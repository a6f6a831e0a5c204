//! Source tags: which language, time window or feed contributed an element.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Tag identifying one independently built graph.
///
/// The derived ordering (language < window < named, then by value) fixes
/// the order in which sources are combined and reported.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SourceTag {
    /// ISO language code of the original text (`"en"`, `"de"`).
    Language(String),
    /// Publication window, inclusive on both ends.
    Window { from: NaiveDate, to: NaiveDate },
    /// Free-form label (feed name, bucket name).
    Named(String),
}

impl SourceTag {
    pub fn language(code: impl Into<String>) -> Self {
        SourceTag::Language(code.into())
    }

    pub fn named(label: impl Into<String>) -> Self {
        SourceTag::Named(label.into())
    }

    /// Window tag; the bounds are swapped if given in reverse.
    pub fn window(from: NaiveDate, to: NaiveDate) -> Self {
        if from <= to {
            SourceTag::Window { from, to }
        } else {
            SourceTag::Window { from: to, to: from }
        }
    }
}

impl std::fmt::Display for SourceTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceTag::Language(code) => f.write_str(code),
            SourceTag::Window { from, to } => write!(f, "{from}..{to}"),
            SourceTag::Named(label) => f.write_str(label),
        }
    }
}

/// How many sources contributed a node or edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Provenance {
    /// No source recorded (graph was never combined or tagged).
    Untagged,
    Single(SourceTag),
    Multi(usize),
}

impl Provenance {
    pub fn of(sources: &BTreeSet<SourceTag>) -> Self {
        match sources.len() {
            0 => Provenance::Untagged,
            1 => sources
                .iter()
                .next()
                .cloned()
                .map_or(Provenance::Untagged, Provenance::Single),
            n => Provenance::Multi(n),
        }
    }

    pub fn is_multi_source(&self) -> bool {
        matches!(self, Provenance::Multi(_))
    }
}
