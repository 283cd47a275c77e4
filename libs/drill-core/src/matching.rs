//! Answer matching for typed answers.

use crate::types::MatchingMode;
use serde::{Deserialize, Serialize};

/// Result of comparing a typed answer to the correct answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    /// Whether the answer is considered correct.
    pub is_correct: bool,
    /// Similarity score between 0.0 and 1.0.
    pub similarity: f64,
    /// The matching mode used.
    pub matching_mode: MatchingMode,
    /// Typed answer as compared (trimmed, case-folded when the mode ignores case).
    pub typed_normalized: String,
    /// Correct answer as compared.
    pub correct_normalized: String,
}

/// Compare a typed answer to the correct answer.
pub fn compare_answers(
    typed: &str,
    correct: &str,
    mode: MatchingMode,
    fuzzy_threshold: f64,
) -> MatchResult {
    let typed_normalized = normalize(typed, mode);
    let correct_normalized = normalize(correct, mode);

    let (is_correct, similarity) = match mode {
        MatchingMode::Exact | MatchingMode::CaseInsensitive => {
            let is_correct = typed_normalized == correct_normalized;
            (is_correct, if is_correct { 1.0 } else { 0.0 })
        }
        MatchingMode::Fuzzy => {
            let similarity = normalized_similarity(&typed_normalized, &correct_normalized);
            (similarity >= fuzzy_threshold, similarity)
        }
    };

    MatchResult {
        is_correct,
        similarity,
        matching_mode: mode,
        typed_normalized,
        correct_normalized,
    }
}

/// Trim surrounding whitespace and fold case when the mode ignores it.
///
/// The result has as many chars as the trimmed input.
pub fn normalize(s: &str, mode: MatchingMode) -> String {
    let trimmed = s.trim();
    if mode.folds_case() {
        fold_case(trimmed)
    } else {
        trimmed.to_string()
    }
}

/// Lowercase char by char. A char whose lowercase form expands (`'İ'` to
/// `"i\u{307}"`) keeps only the first char of it.
fn fold_case(s: &str) -> String {
    s.chars()
        .map(|c| c.to_lowercase().next().unwrap_or(c))
        .collect()
}

/// Calculate Levenshtein distance between two strings.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    // Two rows instead of the full matrix
    let mut prev = (0..=n).collect::<Vec<_>>();
    let mut curr = vec![0; n + 1];

    for i in 1..=m {
        curr[0] = i;

        for j in 1..=n {
            let cost = if a_chars[i - 1] == b_chars[j - 1] {
                0
            } else {
                1
            };

            curr[j] = (prev[j] + 1) // deletion
                .min(curr[j - 1] + 1) // insertion
                .min(prev[j - 1] + cost); // substitution
        }

        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

/// Calculate normalized similarity (0.0 to 1.0) based on Levenshtein distance.
///
/// Lengths are counted in characters so CJK input is not penalized by its
/// UTF-8 width.
pub fn normalized_similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }

    let distance = levenshtein_distance(a, b);
    1.0 - (distance as f64 / max_len as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_distance() {
        assert_eq!(levenshtein_distance("", ""), 0);
        assert_eq!(levenshtein_distance("abc", "abc"), 0);
        assert_eq!(levenshtein_distance("abc", ""), 3);
        assert_eq!(levenshtein_distance("", "abc"), 3);
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("saturday", "sunday"), 3);
        assert_eq!(levenshtein_distance("冬天", "冬大"), 1);
    }

    #[test]
    fn test_normalized_similarity() {
        assert_eq!(normalized_similarity("abc", "abc"), 1.0);
        assert_eq!(normalized_similarity("", ""), 1.0);
        assert!(normalized_similarity("kitten", "sitting") > 0.5);
        assert!(normalized_similarity("abc", "xyz") < 0.5);
        assert_eq!(normalized_similarity("季節", "季"), 0.5);
    }

    #[test]
    fn test_compare_exact() {
        let result = compare_answers("冬天", "冬天", MatchingMode::Exact, 0.8);
        assert!(result.is_correct);
        assert_eq!(result.similarity, 1.0);

        let result = compare_answers("Hello", "hello", MatchingMode::Exact, 0.8);
        assert!(!result.is_correct);
    }

    #[test]
    fn test_compare_case_insensitive() {
        let result = compare_answers("Agency", "agency", MatchingMode::CaseInsensitive, 0.8);
        assert!(result.is_correct);
        assert_eq!(result.typed_normalized, "agency");
    }

    #[test]
    fn test_compare_fuzzy() {
        let result = compare_answers("helo", "hello", MatchingMode::Fuzzy, 0.8);
        assert!(result.is_correct);

        let result = compare_answers("xyz", "hello", MatchingMode::Fuzzy, 0.8);
        assert!(!result.is_correct);
    }

    #[test]
    fn test_input_is_trimmed() {
        let result = compare_answers("  eagerly \n", "eagerly", MatchingMode::Exact, 0.8);
        assert!(result.is_correct);
    }

    #[test]
    fn test_case_folding_keeps_char_count() {
        let folded = normalize(" İzmir ", MatchingMode::CaseInsensitive);
        assert_eq!(folded, "izmir");
        assert_eq!(folded.chars().count(), "İzmir".chars().count());

        let result = compare_answers("izmir", "İzmir", MatchingMode::CaseInsensitive, 0.8);
        assert!(result.is_correct);
    }

    #[test]
    fn test_inner_whitespace_is_kept() {
        let result = compare_answers("ice  cream", "ice cream", MatchingMode::Exact, 0.8);
        assert!(!result.is_correct);
    }
}
