//! Triple extraction from dependency-parsed sentences.
//!
//! Every main predicate (a verb that is not an auxiliary, or the sentence
//! root) is inspected for subject-role and object-role dependents:
//!
//! ```text
//!   nsubj ──► PREDICATE ──► dobj            (S, lemma, O)
//!                 │
//!                 └── prep ──► pobj         (S, lemma, P)      when a direct object exists
//!                                           (S, lemma_prep, P) when none does
//! ```
//!
//! Coordinated arguments fan out: "A and B closed X" yields one triple per
//! subject conjunct.

use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::graph::KnowledgeGraph;
use crate::model::*;
use super::phrase::{normalize_argument, resolve_phrase};

/// Dependency labels that mark a subject.
pub const SUBJECT_DEPS: &[&str] = &["nsubj", "nsubjpass", "csubj", "agent", "expl"];

/// Dependency labels that mark an object attached directly to the predicate.
pub const OBJECT_DEPS: &[&str] = &["dobj", "dative", "attr", "oprd", "pobj", "obj"];

const PREP: &str = "prep";
const POBJ: &str = "pobj";

type Args = SmallVec<[usize; 4]>;

/// A triple together with the attributes its nodes and edge receive.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedTriple {
    pub triple: Triple,
    pub subject: NodeAttrs,
    pub object: NodeAttrs,
    pub edge: EdgeAttrs,
}

fn node_attrs(tok: &Token) -> NodeAttrs {
    let mut attrs = NodeAttrs::new().with_lemma(tok.lemma.clone()).with_pos(tok.pos);
    if let Some(ent) = tok.ent_type.as_deref() {
        attrs = attrs.with_entity_type(ent);
    }
    attrs
}

fn is_predicate(tok: &Token) -> bool {
    tok.pos != PartOfSpeech::Aux && (tok.pos == PartOfSpeech::Verb || tok.is_root())
}

/// Validate candidates, map each to its argument token and drop repeats,
/// keeping first-seen order.
fn filter_and_dedupe(sentence: &Sentence, candidates: impl IntoIterator<Item = usize>) -> Args {
    let mut out = Args::new();
    for c in candidates {
        if let Some(n) = normalize_argument(sentence, c) {
            if !out.contains(&n) {
                out.push(n);
            }
        }
    }
    out
}

/// `i` followed by its coordination conjuncts.
fn with_conjuncts(sentence: &Sentence, i: usize) -> Args {
    let mut group = Args::new();
    group.push(i);
    group.extend(sentence.conjuncts(i));
    group
}

/// `(preposition token, pobj token)` pairs hanging off the predicate.
fn prepositional_objects(sentence: &Sentence, pred: usize) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    for prep in sentence.children(pred).filter(|c| c.dep == PREP) {
        for pobj in sentence.children(prep.i).filter(|c| c.dep == POBJ) {
            out.push((prep.i, pobj.i));
        }
    }
    out
}

/// Extract every triple of one sentence, in emission order.
///
/// A sentence whose indices are out of range yields nothing.
pub fn extract_triples(sentence: &Sentence) -> Vec<ExtractedTriple> {
    let mut out = Vec::new();
    if let Err(e) = sentence.validate() {
        warn!(sentence = %sentence.text, error = %e, "skipping malformed sentence");
        return out;
    }

    for pred in sentence.tokens.iter().filter(|t| is_predicate(t)) {
        let subjects = filter_and_dedupe(
            sentence,
            sentence.children(pred.i).filter(|c| SUBJECT_DEPS.contains(&c.dep.as_str())).map(|c| c.i),
        );
        if subjects.is_empty() {
            continue;
        }

        let direct = filter_and_dedupe(
            sentence,
            sentence.children(pred.i).filter(|c| OBJECT_DEPS.contains(&c.dep.as_str())).map(|c| c.i),
        );
        let via_prep = prepositional_objects(sentence, pred.i);
        let relation = pred.lemma.to_lowercase();
        let edge = EdgeAttrs::new()
            .with_dependency_role(pred.dep.clone())
            .with_sentence(sentence.text.clone());

        let emit = |out: &mut Vec<ExtractedTriple>, s: usize, o: usize, relation: &str| {
            let s_tok = sentence.token(s);
            let o_tok = sentence.token(o);
            out.push(ExtractedTriple {
                triple: Triple::new(resolve_phrase(sentence, s), relation, resolve_phrase(sentence, o)),
                subject: node_attrs(s_tok),
                object: node_attrs(o_tok),
                edge: edge.clone(),
            });
        };

        if !direct.is_empty() {
            let mut objects = direct;
            for arg in filter_and_dedupe(sentence, via_prep.iter().map(|(_, pobj)| *pobj)) {
                if !objects.contains(&arg) {
                    objects.push(arg);
                }
            }
            for &subj in &subjects {
                for s_tok in with_conjuncts(sentence, subj) {
                    let Some(s) = normalize_argument(sentence, s_tok) else { continue };
                    for &obj in &objects {
                        for o_tok in with_conjuncts(sentence, obj) {
                            let Some(o) = normalize_argument(sentence, o_tok) else { continue };
                            emit(&mut out, s, o, &relation);
                        }
                    }
                }
            }
        } else {
            for &subj in &subjects {
                for s_tok in with_conjuncts(sentence, subj) {
                    let Some(s) = normalize_argument(sentence, s_tok) else { continue };
                    for &(prep, pobj) in &via_prep {
                        let Some(o_norm) = normalize_argument(sentence, pobj) else { continue };
                        let relation = format!("{relation}_{}", sentence.token(prep).text.to_lowercase());
                        for o_tok in with_conjuncts(sentence, o_norm) {
                            let Some(o) = normalize_argument(sentence, o_tok) else { continue };
                            emit(&mut out, s, o, &relation);
                        }
                    }
                }
            }
        }
    }

    out
}

/// Extract triples from `sentences` in order and accumulate them into
/// `graph`. Sentences with out-of-range indices are skipped. Returns the
/// number of triples applied.
pub fn accumulate(graph: &mut KnowledgeGraph, sentences: &[Sentence]) -> usize {
    let mut applied = 0;
    for sentence in sentences {
        let extracted = extract_triples(sentence);
        debug!(sentence = %sentence.text, triples = extracted.len(), "extracted");
        for t in extracted {
            graph.apply_triple(&t.triple, t.subject, t.object, t.edge);
            applied += 1;
        }
    }
    applied
}
