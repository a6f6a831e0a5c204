//! # Knowledge Graph Model
//!
//! Clean DTOs that cross every boundary of the pipeline:
//! annotator → extractor → graph store → resolver/combiner → renderer.
//!
//! Design rule: no I/O, no state, no async in this module.
//! The annotator's output (`Sentence`, `Token`) is read-only input; the
//! graph types (`GraphNode`, `GraphEdge`) carry fixed attribute records
//! instead of open-ended property bags.

pub mod node;
pub mod edge;
pub mod token;
pub mod triple;
pub mod source;

pub use node::{GraphNode, NodeAttrs, NodeId};
pub use edge::{EdgeAttrs, GraphEdge};
pub use token::{NounChunk, PartOfSpeech, Sentence, Token};
pub use triple::Triple;
pub use source::{Provenance, SourceTag};
