//! # storygraph: Knowledge Graphs from News Text
//!
//! Builds a directed knowledge graph from short news-style texts: triples
//! are extracted from dependency-parsed sentences, accumulated into a
//! graph, pruned, optionally resolved into canonical entities, and graphs
//! from several sources (languages, time windows) are combined into one
//! provenance-tagged graph.
//!
//! ## Design Principles
//!
//! 1. **Parsing is external**: sentences arrive annotated; the core only walks them
//! 2. **One owned graph per stage**: each stage takes `&mut KnowledgeGraph`, no shared state
//! 3. **Atomic merges**: a node is removed only after its edges are re-pointed
//! 4. **Sets, not strings**: relations, entity types and sources are sets until rendered
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use storygraph::{accumulate, EntityResolver, KnowledgeGraph, PruneConfig, Pruner, Sentence};
//!
//! # fn example(sentences: Vec<Sentence>) -> storygraph::Result<()> {
//! let mut graph = KnowledgeGraph::new();
//! accumulate(&mut graph, &sentences);
//!
//! Pruner::new(&PruneConfig::default())?.prune(&mut graph);
//! let report = EntityResolver::new(0.8).resolve(&mut graph);
//!
//! storygraph::write_summary(&graph, &mut std::io::stdout())?;
//! println!("{} keys merged", report.merges);
//! # Ok(())
//! # }
//! ```
//!
//! ## Stages
//!
//! | Stage | Module | Description |
//! |-------|--------|-------------|
//! | Phrase resolution | `extract::phrase` | Canonical phrase and argument validity per token |
//! | Triple extraction | `extract::triples` | Predicate walk, coordination fan-out |
//! | Accumulation | `graph` | Keyed node/edge store with a triple log |
//! | Pruning | `prune` | Denylist, minimum degree, largest component |
//! | Entity resolution | `resolve` | Similarity-driven single-pass merge |
//! | Combination | `combine` | Union of per-source graphs with provenance |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod graph;
pub mod extract;
pub mod prune;
pub mod resolve;
pub mod combine;
pub mod export;
pub mod config;
pub mod pipeline;

// ============================================================================
// Re-exports: Model
// ============================================================================

pub use model::{
    EdgeAttrs, GraphEdge, GraphNode, NodeAttrs, NodeId, NounChunk, PartOfSpeech,
    Provenance, Sentence, SourceTag, Token, Triple,
};

// ============================================================================
// Re-exports: Stages
// ============================================================================

pub use graph::{KnowledgeGraph, MergeOutcome};
pub use extract::{accumulate, extract_triples, resolve_phrase, DetectedEvents, EventDetector};
pub use prune::{PruneReport, Pruner};
pub use resolve::{similarity_ratio, CanonicalMap, EntityResolver, ResolutionReport};
pub use combine::combine;
pub use export::{write_summary, GraphView};
pub use config::{PipelineConfig, PruneConfig, ResolveConfig};

// ============================================================================
// Re-exports: Pipeline
// ============================================================================

pub use pipeline::{Annotator, Fetcher, GraphBuild, Pipeline, SourceQuery, Translator};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Invalid merge: {0}")]
    InvalidMerge(String),

    #[error("Graph integrity violated: {0}")]
    Integrity(String),

    #[error("Invalid sentence: {0}")]
    InvalidSentence(String),

    #[error("Annotation error: {0}")]
    Annotation(String),

    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Translation error: {0}")]
    Translation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Task error: {0}")]
    Task(String),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
