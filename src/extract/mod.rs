//! # Extraction
//!
//! Turns annotated sentences into graph facts.
//!
//! | Module | Role |
//! |--------|------|
//! | `phrase` | Canonical phrase for a token; argument validity |
//! | `triples` | Predicate/argument walk producing triples; accumulation |
//! | `events` | Keyword event labels and entity mentions per text |

pub mod phrase;
pub mod triples;
pub mod events;

pub use phrase::{is_valid_argument, normalize_argument, resolve_phrase};
pub use triples::{accumulate, extract_triples, ExtractedTriple, OBJECT_DEPS, SUBJECT_DEPS};
pub use events::{default_event_keywords, DetectedEvents, EventDetector};
