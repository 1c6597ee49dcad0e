//! Whole-word phrase matching.
//!
//! A [`PhraseSet`] compiles a fixed list of phrases into a single
//! [`aho_corasick`] automaton and answers one question: does the input
//! contain any of the phrases as a whole word (or whole multi-word phrase)?
//!
//! Plain substring membership is too eager for short entries (`"hi"` inside
//! `"this"`, `"wo"` inside `"world"`), so every overlapping hit is checked
//! against the surrounding characters and only accepted when it is not glued
//! to other letters or digits.
//!
//! Callers are expected to lower-case the haystack; the phrases themselves
//! are lower-cased at build time.

use aho_corasick::AhoCorasick;

use crate::error::{IntentError, Result};

/// A compiled, immutable set of phrases.
#[derive(Debug, Clone)]
pub struct PhraseSet {
    name: &'static str,
    phrases: Vec<String>,
    automaton: AhoCorasick,
}

impl PhraseSet {
    /// Compile `phrases` into a matcher.  `name` only shows up in logs and
    /// errors.
    pub fn new(name: &'static str, phrases: &[&str]) -> Result<Self> {
        let phrases: Vec<String> = phrases.iter().map(|p| p.to_lowercase()).collect();

        let automaton = AhoCorasick::new(&phrases).map_err(|e| IntentError::MatcherBuild {
            name,
            reason: e.to_string(),
        })?;

        tracing::trace!(name, count = phrases.len(), "phrase automaton built");

        Ok(Self {
            name,
            phrases,
            automaton,
        })
    }

    /// Name given at construction time.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of phrases in the set.
    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    /// Whether the set has no phrases (and therefore never matches).
    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    /// Return the first phrase found in `lowered` on word boundaries.
    pub fn find<'a>(&'a self, lowered: &str) -> Option<&'a str> {
        self.automaton
            .find_overlapping_iter(lowered)
            .find(|m| on_word_boundary(lowered, m.start(), m.end()))
            .map(|m| self.phrases[m.pattern().as_usize()].as_str())
    }

    /// Whether `lowered` contains any phrase of the set on word boundaries.
    pub fn matches(&self, lowered: &str) -> bool {
        self.find(lowered).is_some()
    }
}

/// True when `text[start..end]` is not preceded or followed by an
/// alphanumeric character.
fn on_word_boundary(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(phrases: &[&str]) -> PhraseSet {
        PhraseSet::new("test", phrases).expect("build")
    }

    #[test]
    fn matches_whole_words_only() {
        let s = set(&["hi", "wo"]);
        assert!(s.matches("hi there"));
        assert!(s.matches("oh, hi!"));
        assert!(!s.matches("this is it"));
        assert!(!s.matches("hello world"));
    }

    #[test]
    fn matches_multi_word_phrases() {
        let s = set(&["good morning", "see you"]);
        assert!(s.matches("well, good morning to you"));
        assert!(s.matches("see you later"));
        assert!(!s.matches("good mornings"));
    }

    #[test]
    fn accented_neighbours_count_as_letters() {
        let s = set(&["como"]);
        assert!(s.matches("¿como estas?"));
        assert!(!s.matches("cómodo"));
        assert!(!s.matches("comoé"));
    }

    #[test]
    fn overlapping_candidates_fall_through_to_a_valid_one() {
        // "thanks" is not on a boundary inside "thanksgiving" but the later
        // standalone occurrence is.
        let s = set(&["thanks"]);
        assert!(s.matches("thanksgiving, thanks"));
        assert_eq!(s.find("thanksgiving, thanks"), Some("thanks"));
    }

    #[test]
    fn phrases_are_lowercased_at_build() {
        let s = set(&["Hola"]);
        assert!(s.matches("hola amigo"));
        assert_eq!(s.len(), 1);
        assert!(!s.is_empty());
        assert_eq!(s.name(), "test");
    }

    #[test]
    fn empty_set_never_matches() {
        let s = set(&[]);
        assert!(s.is_empty());
        assert!(!s.matches("anything at all"));
    }
}
