//! Example sentences with the quiz word blanked out.

use serde::{Deserialize, Serialize};

const TRAILING_PUNCTUATION: &[char] = &['.', ',', '!', '?', ';', ':'];

/// A sentence split around its blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cloze {
    /// Words before the blank, joined by single spaces.
    pub before: String,
    /// Words after the blank.
    pub after: String,
    /// Punctuation that trailed the blanked word; stays visible.
    pub punctuation: String,
}

impl Cloze {
    /// Render with `blank` in place of the hidden word.
    pub fn render(&self, blank: &str) -> String {
        let mut out = String::new();
        if !self.before.is_empty() {
            out.push_str(&self.before);
            out.push(' ');
        }
        out.push_str(blank);
        out.push_str(&self.punctuation);
        if !self.after.is_empty() {
            out.push(' ');
            out.push_str(&self.after);
        }
        out
    }
}

/// Blank the word at `blank_index` (0-based, words split on spaces).
///
/// Returns `None` when the index is past the last word.
pub fn blank_sentence(sentence: &str, blank_index: usize) -> Option<Cloze> {
    let words: Vec<&str> = sentence.split(' ').filter(|w| !w.is_empty()).collect();
    let word = words.get(blank_index)?;

    let stem = word.trim_end_matches(TRAILING_PUNCTUATION);
    let punctuation = word[stem.len()..].chars().last().map(String::from).unwrap_or_default();

    Some(Cloze {
        before: words[..blank_index].join(" "),
        after: words[blank_index + 1..].join(" "),
        punctuation,
    })
}

/// Find the word index of `answer` in `sentence`, ignoring case and
/// trailing punctuation.
pub fn find_blank(sentence: &str, answer: &str) -> Option<usize> {
    let target = answer.trim().to_lowercase();
    if target.is_empty() {
        return None;
    }
    sentence
        .split(' ')
        .filter(|w| !w.is_empty())
        .position(|w| w.trim_end_matches(TRAILING_PUNCTUATION).to_lowercase() == target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn blank_in_the_middle() {
        let cloze = blank_sentence("Tia confidently stood up to give her report.", 1).unwrap();
        assert_eq!(cloze.before, "Tia");
        assert_eq!(cloze.after, "stood up to give her report.");
        assert_eq!(cloze.punctuation, "");
        assert_eq!(cloze.render("____"), "Tia ____ stood up to give her report.");
    }

    #[test]
    fn blank_keeps_trailing_punctuation() {
        let cloze = blank_sentence("Many people worked at the agency.", 5).unwrap();
        assert_eq!(cloze.punctuation, ".");
        assert_eq!(cloze.after, "");
        assert_eq!(cloze.render("___"), "Many people worked at the ___.");
    }

    #[test]
    fn blank_out_of_range() {
        assert!(blank_sentence("He is an ace athlete.", 9).is_none());
    }

    #[test]
    fn find_blank_ignores_case_and_punctuation() {
        assert_eq!(find_blank("The contents of the box are a mystery.", "mystery"), Some(7));
        assert_eq!(find_blank("Seeps slowly.", "seeps"), Some(0));
        assert_eq!(find_blank("Nothing here.", "agency"), None);
        assert_eq!(find_blank("Anything.", " "), None);
    }
}
