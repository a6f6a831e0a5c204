//! Case-insensitive string similarity.
//!
//! Ratio = 2·M / (|a| + |b|), where M is the number of characters left
//! unchanged by a character-level diff of the lowercased inputs.
//! Two empty strings are identical (1.0).

use similar::TextDiff;

/// Similarity of `a` and `b` in `[0, 1]`, ignoring case.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    TextDiff::from_chars(a.as_str(), b.as_str()).ratio() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    // ratios are computed in f32
    fn close(x: f64, y: f64) -> bool {
        (x - y).abs() < 1e-6
    }

    #[test]
    fn identical_and_empty() {
        assert!(close(similarity_ratio("Tuam", "Tuam"), 1.0));
        assert!(close(similarity_ratio("", ""), 1.0));
        assert!(close(similarity_ratio("abc", ""), 0.0));
    }

    #[test]
    fn case_is_ignored() {
        assert!(close(similarity_ratio("GARDA", "garda"), 1.0));
    }

    #[test]
    fn accented_suffix() {
        // 5 shared characters out of 5 + 6
        assert!(close(similarity_ratio("Garda", "Gardaí"), 10.0 / 11.0));
    }

    #[test]
    fn blocks_on_both_sides_of_a_gap() {
        // "abxcd" vs "abcd": "ab" then "cd" => 2*4/9
        assert!(close(similarity_ratio("abxcd", "abcd"), 8.0 / 9.0));
    }

    #[test]
    fn substring_of_longer_phrase() {
        // "tuam" inside "the tuam site": 2*4/17
        assert!(close(similarity_ratio("Tuam", "the Tuam site"), 8.0 / 17.0));
    }

    #[test]
    fn symmetric_on_simple_inputs() {
        let x = similarity_ratio("Mozambique", "Mozambican");
        let y = similarity_ratio("Mozambican", "Mozambique");
        assert!(close(x, y));
        // "mozambi" shared, "que" and "can" have nothing in common
        assert!(close(x, 14.0 / 20.0));
    }

    #[test]
    fn ratios_around_the_default_threshold() {
        // one dropped letter stays above 0.8
        assert!(close(similarity_ratio("Mozambique", "Mozambiqe"), 18.0 / 19.0));
        assert!(similarity_ratio("Mozambique", "Mozambiqe") >= 0.8);
        // two substituted letters in eight fall below it
        assert!(close(similarity_ratio("abcdefgh", "abcdefXY"), 0.75));
        assert!(close(similarity_ratio("abcdefgX", "abcdefXY"), 0.875));
    }

    #[test]
    fn long_inputs_with_repeated_characters() {
        let a = "a".repeat(250);
        assert!(close(similarity_ratio(&a, &a), 1.0));
        assert!(close(similarity_ratio(&a, &"a".repeat(200)), 400.0 / 450.0));
    }
}
