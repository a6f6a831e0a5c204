//! Phrase resolution: which surface text names a token in the graph, and
//! whether a token may be a graph argument at all.

use crate::model::{PartOfSpeech, Sentence};

/// Dependency labels of left modifiers folded into a common-noun phrase.
const PHRASE_MODIFIERS: &[&str] = &["compound", "amod"];

fn is_excluded(pos: PartOfSpeech) -> bool {
    matches!(pos, PartOfSpeech::Pron | PartOfSpeech::Aux)
}

/// Canonical surface phrase for token `i`.
///
/// Inside a noun chunk the chunk's head is used. A proper-noun head grows
/// over adjacent proper nouns ("New York Times"); a common-noun head gets
/// its left compound/adjectival modifiers ("customs control facility").
/// Anything else falls back to the head's own text.
pub fn resolve_phrase(sentence: &Sentence, i: usize) -> String {
    let root = sentence.chunk_of(i).map_or(i, |nc| nc.root);
    let head = sentence.token(root);

    if head.pos == PartOfSpeech::Propn {
        let is_propn = |j: usize| sentence.token(j).pos == PartOfSpeech::Propn;
        let mut start = root;
        let mut end = root;
        while start > 0 && is_propn(start - 1) {
            start -= 1;
        }
        while end + 1 < sentence.len() && is_propn(end + 1) {
            end += 1;
        }
        return sentence.span_text(start, end);
    }

    if head.pos == PartOfSpeech::Noun {
        let mut parts: Vec<&str> = sentence
            .lefts(root)
            .filter(|t| PHRASE_MODIFIERS.contains(&t.dep.as_str()))
            .map(|t| t.text.as_str())
            .collect();
        parts.push(&head.text);
        return parts.join(" ");
    }

    head.text.clone()
}

/// The token that stands for `i` as a graph argument, if any.
///
/// Pronouns and auxiliaries never qualify. Inside a noun chunk the chunk
/// head stands in, and must itself be a named entity or a (proper) noun.
/// Outside a chunk the token qualifies on the same test.
pub fn normalize_argument(sentence: &Sentence, i: usize) -> Option<usize> {
    let tok = sentence.token(i);
    if is_excluded(tok.pos) {
        return None;
    }
    let candidate = sentence.chunk_of(i).map_or(i, |nc| nc.root);
    let cand = sentence.token(candidate);
    if is_excluded(cand.pos) {
        return None;
    }
    if cand.has_entity_type() || cand.pos.is_nominal() {
        Some(candidate)
    } else {
        None
    }
}

/// Whether token `i` may be accepted as a subject or object.
pub fn is_valid_argument(sentence: &Sentence, i: usize) -> bool {
    normalize_argument(sentence, i).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NounChunk, Token};
    use PartOfSpeech::*;

    /// "The New York Times praised the new customs control facility ."
    fn sentence() -> Sentence {
        Sentence::new(
            vec![
                Token::new(0, "The", "the", Det, "det", 3),
                Token::new(1, "New", "New", Propn, "compound", 3),
                Token::new(2, "York", "York", Propn, "compound", 3),
                Token::new(3, "Times", "Times", Propn, "nsubj", 4).with_entity("ORG"),
                Token::new(4, "praised", "praise", Verb, "ROOT", 4),
                Token::new(5, "the", "the", Det, "det", 9),
                Token::new(6, "new", "new", Adj, "amod", 9),
                Token::new(7, "customs", "customs", Noun, "compound", 8),
                Token::new(8, "control", "control", Noun, "compound", 9),
                Token::new(9, "facility", "facility", Noun, "dobj", 4).no_space(),
                Token::new(10, ".", ".", Punct, "punct", 4),
            ],
            vec![NounChunk::new(0, 4, 3), NounChunk::new(5, 10, 9)],
        )
        .unwrap()
    }

    #[test]
    fn proper_noun_span_is_contiguous() {
        let s = sentence();
        assert_eq!(resolve_phrase(&s, 3), "New York Times");
        // any token of the chunk resolves through the chunk head
        assert_eq!(resolve_phrase(&s, 0), "New York Times");
    }

    #[test]
    fn common_noun_keeps_direct_left_modifiers() {
        let s = sentence();
        // "customs" hangs off "control", so only direct children of the head count
        assert_eq!(resolve_phrase(&s, 9), "new control facility");
    }

    #[test]
    fn fallback_is_token_text() {
        let s = sentence();
        assert_eq!(resolve_phrase(&s, 4), "praised");
    }

    #[test]
    fn validity() {
        let s = sentence();
        assert!(is_valid_argument(&s, 3));
        assert_eq!(normalize_argument(&s, 0), Some(3));
        assert_eq!(normalize_argument(&s, 6), Some(9));
        assert!(!is_valid_argument(&s, 4));
        assert!(!is_valid_argument(&s, 10));
    }

    #[test]
    fn pronouns_and_auxiliaries_are_rejected() {
        let s = Sentence::new(
            vec![
                Token::new(0, "She", "she", Pron, "nsubj", 2).with_entity("PERSON"),
                Token::new(1, "has", "have", Aux, "aux", 2),
                Token::new(2, "left", "leave", Verb, "ROOT", 2),
            ],
            vec![NounChunk::new(0, 1, 0)],
        )
        .unwrap();
        assert!(!is_valid_argument(&s, 0));
        assert!(!is_valid_argument(&s, 1));
    }

    #[test]
    fn entity_outside_chunk_qualifies() {
        let s = Sentence::new(
            vec![
                Token::new(0, "2019", "2019", Num, "pobj", 0).with_entity("DATE"),
            ],
            vec![],
        )
        .unwrap();
        assert!(is_valid_argument(&s, 0));
    }
}
