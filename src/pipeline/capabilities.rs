//! Collaborators the pipeline depends on but does not implement.
//!
//! Hosts construct these once (an NLP service client, a news API client, a
//! translation client) and hand them to `Pipeline` as shared trait objects.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::model::{Sentence, SourceTag};
use crate::Result;

/// Linguistic annotation: tokenization, tagging, dependency parsing,
/// entity recognition and noun chunking of one text.
#[async_trait]
pub trait Annotator: Send + Sync {
    async fn annotate(&self, text: &str) -> Result<Vec<Sentence>>;
}

/// Retrieval of raw texts (headlines, article snippets) for one source.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, query: &SourceQuery) -> Result<Vec<String>>;
}

/// Machine translation into the pipeline's primary language.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, texts: &[String], from_lang: &str) -> Result<Vec<String>>;
}

/// One source to fetch and build a graph for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceQuery {
    /// Tag recorded on every node and edge the source contributes.
    pub tag: SourceTag,
    /// Search terms passed to the fetcher.
    pub query: String,
    /// Language of the fetched texts; `None` means the primary language.
    #[serde(default)]
    pub language: Option<String>,
}

impl SourceQuery {
    pub fn new(tag: SourceTag, query: impl Into<String>) -> Self {
        Self { tag, query: query.into(), language: None }
    }

    /// Query for texts in `code`, tagged with that language.
    pub fn for_language(code: impl Into<String>, query: impl Into<String>) -> Self {
        let code = code.into();
        Self {
            tag: SourceTag::language(code.clone()),
            query: query.into(),
            language: Some(code),
        }
    }

    pub fn with_language(mut self, code: impl Into<String>) -> Self {
        self.language = Some(code.into());
        self
    }
}
