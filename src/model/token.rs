//! Annotated sentences as delivered by the linguistic annotator.
//!
//! The core never re-derives any of this: part-of-speech tags, dependency
//! labels, parent links, entity types and noun-chunk spans all come from
//! the external annotator. This module only adds navigation helpers
//! (children, left children, coordination conjuncts, span text).

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::{Error, Result};

/// Dependency label of a coordinated conjunct.
const CONJ: &str = "conj";

/// Universal part-of-speech tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PartOfSpeech {
    Adj,
    Adp,
    Adv,
    Aux,
    Cconj,
    Det,
    Intj,
    Noun,
    Num,
    Part,
    Pron,
    Propn,
    Punct,
    Sconj,
    Sym,
    Verb,
    #[serde(other)]
    X,
}

impl PartOfSpeech {
    pub fn as_str(&self) -> &'static str {
        match self {
            PartOfSpeech::Adj => "ADJ",
            PartOfSpeech::Adp => "ADP",
            PartOfSpeech::Adv => "ADV",
            PartOfSpeech::Aux => "AUX",
            PartOfSpeech::Cconj => "CCONJ",
            PartOfSpeech::Det => "DET",
            PartOfSpeech::Intj => "INTJ",
            PartOfSpeech::Noun => "NOUN",
            PartOfSpeech::Num => "NUM",
            PartOfSpeech::Part => "PART",
            PartOfSpeech::Pron => "PRON",
            PartOfSpeech::Propn => "PROPN",
            PartOfSpeech::Punct => "PUNCT",
            PartOfSpeech::Sconj => "SCONJ",
            PartOfSpeech::Sym => "SYM",
            PartOfSpeech::Verb => "VERB",
            PartOfSpeech::X => "X",
        }
    }

    pub fn is_nominal(&self) -> bool {
        matches!(self, PartOfSpeech::Noun | PartOfSpeech::Propn)
    }
}

impl std::fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_whitespace() -> bool {
    true
}

/// A single annotated token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Position within the sentence.
    pub i: usize,
    pub text: String,
    #[serde(default)]
    pub lemma: String,
    pub pos: PartOfSpeech,
    /// Dependency label (`nsubj`, `dobj`, `prep`, `ROOT`, ...).
    pub dep: String,
    /// Index of the dependency parent. The root points at itself.
    pub head: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ent_type: Option<String>,
    /// Whether the token is followed by a space in the original text.
    #[serde(default = "default_whitespace")]
    pub whitespace: bool,
}

impl Token {
    pub fn new(
        i: usize,
        text: impl Into<String>,
        lemma: impl Into<String>,
        pos: PartOfSpeech,
        dep: impl Into<String>,
        head: usize,
    ) -> Self {
        Self {
            i,
            text: text.into(),
            lemma: lemma.into(),
            pos,
            dep: dep.into(),
            head,
            ent_type: None,
            whitespace: true,
        }
    }

    pub fn with_entity(mut self, ent_type: impl Into<String>) -> Self {
        self.ent_type = Some(ent_type.into());
        self
    }

    /// Mark the token as not followed by whitespace (e.g. before punctuation).
    pub fn no_space(mut self) -> Self {
        self.whitespace = false;
        self
    }

    pub fn has_entity_type(&self) -> bool {
        self.ent_type.as_deref().is_some_and(|t| !t.is_empty())
    }

    pub fn is_root(&self) -> bool {
        self.head == self.i || self.dep.eq_ignore_ascii_case("ROOT")
    }
}

/// A base noun phrase: tokens `start..end` with syntactic head `root`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NounChunk {
    pub start: usize,
    pub end: usize,
    pub root: usize,
}

impl NounChunk {
    pub fn new(start: usize, end: usize, root: usize) -> Self {
        Self { start, end, root }
    }

    pub fn contains(&self, i: usize) -> bool {
        i >= self.start && i < self.end
    }
}

/// One annotated sentence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentence {
    pub text: String,
    pub tokens: Vec<Token>,
    #[serde(default)]
    pub noun_chunks: Vec<NounChunk>,
}

impl Sentence {
    /// Build a sentence from tokens, reconstructing its text from token
    /// text and trailing whitespace.
    pub fn new(tokens: Vec<Token>, noun_chunks: Vec<NounChunk>) -> Result<Self> {
        let mut text = String::new();
        for tok in &tokens {
            text.push_str(&tok.text);
            if tok.whitespace {
                text.push(' ');
            }
        }
        let sentence = Self {
            text: text.trim_end().to_string(),
            tokens,
            noun_chunks,
        };
        sentence.validate()?;
        Ok(sentence)
    }

    /// Check that every index the annotator handed us is in range.
    pub fn validate(&self) -> Result<()> {
        let n = self.tokens.len();
        for (pos, tok) in self.tokens.iter().enumerate() {
            if tok.i != pos {
                return Err(Error::InvalidSentence(format!(
                    "token at position {pos} has index {}", tok.i
                )));
            }
            if tok.head >= n {
                return Err(Error::InvalidSentence(format!(
                    "token {pos} ('{}') has head {} outside 0..{n}", tok.text, tok.head
                )));
            }
        }
        for chunk in &self.noun_chunks {
            if chunk.start >= chunk.end || chunk.end > n || !chunk.contains(chunk.root) {
                return Err(Error::InvalidSentence(format!(
                    "noun chunk {}..{} (root {}) is malformed", chunk.start, chunk.end, chunk.root
                )));
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn token(&self, i: usize) -> &Token {
        &self.tokens[i]
    }

    /// Direct dependents of token `i`, in sentence order.
    pub fn children(&self, i: usize) -> impl Iterator<Item = &Token> + '_ {
        self.tokens.iter().filter(move |t| t.head == i && t.i != i)
    }

    /// Dependents of token `i` that precede it.
    pub fn lefts(&self, i: usize) -> impl Iterator<Item = &Token> + '_ {
        self.children(i).filter(move |t| t.i < i)
    }

    /// First noun chunk covering token `i`.
    pub fn chunk_of(&self, i: usize) -> Option<&NounChunk> {
        self.noun_chunks.iter().find(|nc| nc.contains(i))
    }

    /// Tokens coordinated with `i` ("A and B and C"), excluding `i` itself,
    /// in discovery order.
    pub fn conjuncts(&self, i: usize) -> SmallVec<[usize; 4]> {
        let n = self.tokens.len();
        let mut start = i;
        let mut steps = 0;
        while self.tokens[start].dep == CONJ && self.tokens[start].head != start && steps < n {
            start = self.tokens[start].head;
            steps += 1;
        }

        let mut seen = vec![false; n];
        let mut queue: SmallVec<[usize; 4]> = SmallVec::new();
        let mut out = SmallVec::new();
        queue.push(start);
        seen[start] = true;
        let mut cursor = 0;
        while cursor < queue.len() {
            let word = queue[cursor];
            cursor += 1;
            if word != i {
                out.push(word);
            }
            for child in self.children(word) {
                if child.dep == CONJ && !seen[child.i] {
                    seen[child.i] = true;
                    queue.push(child.i);
                }
            }
        }
        out
    }

    /// Surface text of tokens `start..=end`, with original spacing.
    pub fn span_text(&self, start: usize, end: usize) -> String {
        let mut text = String::new();
        for tok in &self.tokens[start..=end] {
            text.push_str(&tok.text);
            if tok.i != end && tok.whitespace {
                text.push(' ');
            }
        }
        text
    }
}
