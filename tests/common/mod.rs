//! Shared fixtures: hand-annotated sentences and fake collaborators.

#![allow(dead_code)]

use std::collections::HashMap;

use async_trait::async_trait;
use storygraph::model::PartOfSpeech::*;
use storygraph::{Annotator, Error, Fetcher, NounChunk, Result, Sentence, SourceQuery, Token, Translator};

pub const CYCLONE: &str = "A cyclone damaged homes in Mozambique.";
pub const RESIDENTS: &str = "Residents fled in Mozambique.";
pub const GARDAI: &str = "Gardaí arrested boys in Tuam.";
pub const GARDA: &str = "Garda questioned boys in Tuam.";
pub const PROTEST: &str = "Protesters gathered on Tuesday.";

/// "A cyclone damaged homes in Mozambique."
pub fn cyclone_damaged() -> Sentence {
    Sentence::new(
        vec![
            Token::new(0, "A", "a", Det, "det", 1),
            Token::new(1, "cyclone", "cyclone", Noun, "nsubj", 2),
            Token::new(2, "damaged", "damage", Verb, "ROOT", 2),
            Token::new(3, "homes", "home", Noun, "dobj", 2),
            Token::new(4, "in", "in", Adp, "prep", 2),
            Token::new(5, "Mozambique", "Mozambique", Propn, "pobj", 4).with_entity("GPE").no_space(),
            Token::new(6, ".", ".", Punct, "punct", 2),
        ],
        vec![NounChunk::new(0, 2, 1), NounChunk::new(3, 4, 3), NounChunk::new(5, 6, 5)],
    )
    .unwrap()
}

/// "Residents fled in Mozambique."
pub fn residents_fled() -> Sentence {
    Sentence::new(
        vec![
            Token::new(0, "Residents", "resident", Noun, "nsubj", 1),
            Token::new(1, "fled", "flee", Verb, "ROOT", 1),
            Token::new(2, "in", "in", Adp, "prep", 1),
            Token::new(3, "Mozambique", "Mozambique", Propn, "pobj", 2).with_entity("GPE").no_space(),
            Token::new(4, ".", ".", Punct, "punct", 1),
        ],
        vec![NounChunk::new(0, 1, 0), NounChunk::new(3, 4, 3)],
    )
    .unwrap()
}

/// "<subject> <verb> boys in Tuam." with an ORG subject.
fn police_sentence(subject: &str, verb: &str, lemma: &str) -> Sentence {
    Sentence::new(
        vec![
            Token::new(0, subject, subject, Propn, "nsubj", 1).with_entity("ORG"),
            Token::new(1, verb, lemma, Verb, "ROOT", 1),
            Token::new(2, "boys", "boy", Noun, "dobj", 1),
            Token::new(3, "in", "in", Adp, "prep", 1),
            Token::new(4, "Tuam", "Tuam", Propn, "pobj", 3).with_entity("GPE").no_space(),
            Token::new(5, ".", ".", Punct, "punct", 1),
        ],
        vec![NounChunk::new(0, 1, 0), NounChunk::new(2, 3, 2), NounChunk::new(4, 5, 4)],
    )
    .unwrap()
}

/// "Gardaí arrested boys in Tuam."
pub fn gardai_arrested() -> Sentence {
    police_sentence("Gardaí", "arrested", "arrest")
}

/// "Garda questioned boys in Tuam."
pub fn garda_questioned() -> Sentence {
    police_sentence("Garda", "questioned", "question")
}

/// "Protesters gathered on Tuesday."
pub fn protesters_gathered() -> Sentence {
    Sentence::new(
        vec![
            Token::new(0, "Protesters", "protester", Noun, "nsubj", 1),
            Token::new(1, "gathered", "gather", Verb, "ROOT", 1),
            Token::new(2, "on", "on", Adp, "prep", 1),
            Token::new(3, "Tuesday", "Tuesday", Propn, "pobj", 2).with_entity("DATE").no_space(),
            Token::new(4, ".", ".", Punct, "punct", 1),
        ],
        vec![NounChunk::new(0, 1, 0), NounChunk::new(3, 4, 3)],
    )
    .unwrap()
}

// ============================================================================
// Fake collaborators
// ============================================================================

/// Annotates only the texts it was built with.
pub struct FakeAnnotator {
    known: HashMap<String, Vec<Sentence>>,
}

impl FakeAnnotator {
    pub fn new() -> Self {
        let mut known = HashMap::new();
        known.insert(CYCLONE.to_string(), vec![cyclone_damaged()]);
        known.insert(RESIDENTS.to_string(), vec![residents_fled()]);
        known.insert(GARDAI.to_string(), vec![gardai_arrested()]);
        known.insert(GARDA.to_string(), vec![garda_questioned()]);
        known.insert(PROTEST.to_string(), vec![protesters_gathered()]);
        Self { known }
    }
}

#[async_trait]
impl Annotator for FakeAnnotator {
    async fn annotate(&self, text: &str) -> Result<Vec<Sentence>> {
        self.known
            .get(text)
            .cloned()
            .ok_or_else(|| Error::Annotation(format!("unknown text: {text}")))
    }
}

/// Serves canned texts per query string.
pub struct FakeFetcher {
    pub responses: HashMap<String, Vec<String>>,
}

#[async_trait]
impl Fetcher for FakeFetcher {
    async fn fetch(&self, query: &SourceQuery) -> Result<Vec<String>> {
        self.responses
            .get(&query.query)
            .cloned()
            .ok_or_else(|| Error::Fetch(format!("no results for {}", query.query)))
    }
}

/// Translates by dictionary lookup; fails for unknown source languages.
pub struct FakeTranslator {
    pub language: String,
    pub dictionary: HashMap<String, String>,
}

#[async_trait]
impl Translator for FakeTranslator {
    async fn translate(&self, texts: &[String], from_lang: &str) -> Result<Vec<String>> {
        if from_lang != self.language {
            return Err(Error::Translation(format!("unsupported language {from_lang}")));
        }
        Ok(texts
            .iter()
            .map(|t| self.dictionary.get(t).cloned().unwrap_or_else(|| t.clone()))
            .collect())
    }
}
