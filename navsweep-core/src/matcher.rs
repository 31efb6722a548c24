//! Fuzzy title matching.
//!
//! Decides whether a page heading plausibly belongs to the label of the link
//! that led to it. Strategies run from strictest to most lenient and the first
//! success wins:
//!
//! 1. the whole normalized label appears in the heading
//! 2. any significant label word appears in the heading
//! 3. every label word (split on whitespace and hyphens) appears somewhere

use serde::{Deserialize, Serialize};
use std::fmt;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

pub const DEFAULT_STOPWORDS: [&str; 11] = [
    "the", "and", "for", "from", "with", "to", "of", "in", "on", "at", "by",
];

/// Words shorter than this never count as significant.
pub const SIGNIFICANT_WORD_MIN_LEN: usize = 4;

/// Words shorter than this are ignored by the all-words check.
pub const ALL_WORDS_MIN_LEN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    FullContainment,
    SignificantWord,
    AllWords,
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MatchStrategy::FullContainment => "full containment",
            MatchStrategy::SignificantWord => "significant word",
            MatchStrategy::AllWords => "all words",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TitleMatchResult {
    pub strategy: Option<MatchStrategy>,
    /// The normalized text that satisfied the strategy.
    pub snippet: Option<String>,
}

impl TitleMatchResult {
    fn hit(strategy: MatchStrategy, snippet: impl Into<String>) -> Self {
        Self {
            strategy: Some(strategy),
            snippet: Some(snippet.into()),
        }
    }

    pub fn matched(&self) -> bool {
        self.strategy.is_some()
    }
}

/// Lowercase, strip diacritics and every punctuation mark except hyphens,
/// and collapse whitespace.
pub fn normalize_text(text: &str) -> String {
    let stripped: String = text
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .filter(|c| *c == ' ' || *c == '-' || c.is_alphanumeric())
        .collect();

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleMatcher {
    pub significant_word_min_len: usize,
    pub all_words_min_len: usize,
    pub stopwords: Vec<String>,
}

impl Default for TitleMatcher {
    fn default() -> Self {
        Self {
            significant_word_min_len: SIGNIFICANT_WORD_MIN_LEN,
            all_words_min_len: ALL_WORDS_MIN_LEN,
            stopwords: DEFAULT_STOPWORDS.iter().map(|w| w.to_string()).collect(),
        }
    }
}

impl TitleMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_significant_word_min_len(mut self, len: usize) -> Self {
        self.significant_word_min_len = len;
        self
    }

    pub fn with_all_words_min_len(mut self, len: usize) -> Self {
        self.all_words_min_len = len;
        self
    }

    pub fn with_stopwords<I, S>(mut self, stopwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stopwords = stopwords.into_iter().map(Into::into).collect();
        self
    }

    fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.iter().any(|s| s == word)
    }

    pub fn check(&self, heading: &str, expected_label: &str) -> TitleMatchResult {
        let heading = normalize_text(heading);
        let label = normalize_text(expected_label);

        if label.is_empty() {
            return TitleMatchResult::default();
        }

        if heading.contains(&label) {
            return TitleMatchResult::hit(MatchStrategy::FullContainment, label);
        }

        let significant = label
            .split(' ')
            .filter(|w| !self.is_stopword(w))
            .filter(|w| w.chars().count() >= self.significant_word_min_len);
        for word in significant {
            if heading.contains(word) {
                return TitleMatchResult::hit(MatchStrategy::SignificantWord, word);
            }
        }

        let words: Vec<&str> = label
            .split(|c: char| c == ' ' || c == '-')
            .filter(|w| w.chars().count() >= self.all_words_min_len)
            .collect();
        if !words.is_empty() && words.iter().all(|w| heading.contains(w)) {
            return TitleMatchResult::hit(MatchStrategy::AllWords, words.join(" "));
        }

        TitleMatchResult::default()
    }

    pub fn matches(&self, heading: &str, expected_label: &str) -> bool {
        self.check(heading, expected_label).matched()
    }
}

/// [`TitleMatcher::matches`] with the default thresholds.
pub fn matches(heading: &str, expected_label: &str) -> bool {
    TitleMatcher::default().matches(heading, expected_label)
}
