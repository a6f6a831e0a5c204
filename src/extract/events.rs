//! Keyword event detection over short news texts.
//!
//! A small keyword → label table ("explosion" → "Disaster") is matched on
//! whole words, case-insensitively. Named entities of the annotated text
//! (places, people, organisations) are reported alongside.

use std::collections::{BTreeMap, BTreeSet};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::model::{PartOfSpeech, Sentence};
use crate::Result;

/// Entity types reported next to detected events.
pub const EVENT_ENTITY_TYPES: &[&str] = &["GPE", "PERSON", "ORG"];

/// Built-in keyword table.
pub fn default_event_keywords() -> BTreeMap<String, String> {
    [
        ("explosion", "Disaster"),
        ("blast", "Disaster"),
        ("protest", "Civil Unrest"),
        ("demonstration", "Civil Unrest"),
        ("earthquake", "Natural Disaster"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// Events and entities found in one text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedEvents {
    pub text: String,
    pub events: BTreeSet<String>,
    pub entities: BTreeSet<String>,
}

#[derive(Debug, Clone)]
struct KeywordPattern {
    label: String,
    pattern: Regex,
}

/// Whole-word keyword matcher.
#[derive(Debug, Clone)]
pub struct EventDetector {
    patterns: Vec<KeywordPattern>,
}

impl EventDetector {
    pub fn new<K, V>(keywords: impl IntoIterator<Item = (K, V)>) -> Result<Self>
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut patterns = Vec::new();
        for (keyword, label) in keywords {
            let keyword = keyword.as_ref().to_lowercase();
            let pattern = Regex::new(&format!(r"\b{}\b", regex::escape(&keyword)))?;
            patterns.push(KeywordPattern { label: label.into(), pattern });
        }
        Ok(Self { patterns })
    }

    pub fn with_defaults() -> Result<Self> {
        Self::new(default_event_keywords())
    }

    /// Labels of every keyword occurring in `text`, sorted and deduplicated.
    pub fn events(&self, text: &str) -> BTreeSet<String> {
        let lowered = text.to_lowercase();
        self.patterns
            .iter()
            .filter(|p| p.pattern.is_match(&lowered))
            .map(|p| p.label.clone())
            .collect()
    }

    /// Detect events in `text` and collect entities from its annotation.
    pub fn detect(&self, text: &str, sentences: &[Sentence]) -> DetectedEvents {
        DetectedEvents {
            text: text.to_string(),
            events: self.events(text),
            entities: entities(sentences),
        }
    }
}

/// Entity mentions of the reportable types. Adjacent tokens sharing an
/// entity type form one mention.
///
/// Annotations without any entity labels fall back to proper-noun tokens.
pub fn entities(sentences: &[Sentence]) -> BTreeSet<String> {
    let labelled = sentences
        .iter()
        .flat_map(|s| s.tokens.iter())
        .any(|t| t.ent_type.is_some());
    if !labelled {
        return sentences
            .iter()
            .flat_map(|s| s.tokens.iter())
            .filter(|t| t.pos == PartOfSpeech::Propn)
            .map(|t| t.text.clone())
            .collect();
    }

    let mut found = BTreeSet::new();
    for sentence in sentences {
        let mut i = 0;
        while i < sentence.len() {
            let Some(ent) = sentence.token(i).ent_type.as_deref() else {
                i += 1;
                continue;
            };
            let mut end = i;
            while end + 1 < sentence.len() && sentence.token(end + 1).ent_type.as_deref() == Some(ent) {
                end += 1;
            }
            if EVENT_ENTITY_TYPES.contains(&ent) {
                found.insert(sentence.span_text(i, end));
            }
            i = end + 1;
        }
    }
    found
}
