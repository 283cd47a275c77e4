//! Core types for the vocabulary drill.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Language of the words being drilled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    Chinese,
    English,
}

impl Default for Language {
    fn default() -> Self {
        Self::English
    }
}

impl Language {
    /// Language tag handed to the speech capability.
    pub fn speech_tag(&self) -> &'static str {
        match self {
            Self::Chinese => "zh-TW",
            Self::English => "en-US",
        }
    }

    /// Matching mode used when none is configured.
    ///
    /// Chinese answers must match exactly; English answers ignore case.
    pub fn default_matching_mode(&self) -> MatchingMode {
        match self {
            Self::Chinese => MatchingMode::Exact,
            Self::English => MatchingMode::CaseInsensitive,
        }
    }
}

/// Matching mode for typed answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchingMode {
    Exact,
    CaseInsensitive,
    Fuzzy,
}

impl Default for MatchingMode {
    fn default() -> Self {
        Self::CaseInsensitive
    }
}

impl MatchingMode {
    /// Whether case is folded before comparing and diffing.
    pub fn folds_case(self) -> bool {
        !matches!(self, Self::Exact)
    }
}

/// What happens to the head of the wrong queue when it is missed again
/// during review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequeuePolicy {
    /// Move the failed item to the back so the other pending items get a turn.
    Rotate,
    /// Leave the failed item at the front; it is asked again right away.
    Hold,
}

impl Default for RequeuePolicy {
    fn default() -> Self {
        Self::Rotate
    }
}

/// Study phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudyMode {
    /// Sequential pass over every item in list order.
    Learning,
    /// Only the items answered wrong, until all of them are answered right.
    Review,
}

impl Default for StudyMode {
    fn default() -> Self {
        Self::Learning
    }
}

/// A single word to drill.
///
/// Only `answer` matters to the scheduler; everything else is display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizItem {
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentence: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentence_translation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition_translation: Option<String>,
    /// Word position of the answer inside `sentence`, for cloze display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blank_index: Option<usize>,
}

impl QuizItem {
    /// Create an item with only an answer.
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            translation: None,
            sentence: None,
            sentence_translation: None,
            definition: None,
            definition_translation: None,
            blank_index: None,
        }
    }

    pub fn with_translation(mut self, translation: impl Into<String>) -> Self {
        self.translation = Some(translation.into());
        self
    }

    pub fn with_sentence(mut self, sentence: impl Into<String>) -> Self {
        self.sentence = Some(sentence.into());
        self
    }

    pub fn with_definition(mut self, definition: impl Into<String>) -> Self {
        self.definition = Some(definition.into());
        self
    }
}

/// Per-item answer counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStats {
    pub correct: u32,
    pub wrong: u32,
}

impl ItemStats {
    pub fn attempts(&self) -> u32 {
        self.correct + self.wrong
    }

    /// Success rate as `correct/attempts`, `0/0` when never attempted.
    pub fn rate(&self) -> String {
        format!("{}/{}", self.correct, self.attempts())
    }

    /// Derive the item's status light.
    ///
    /// Pending review wins over everything else; an item counts as mastered
    /// once it has been answered correctly at least once.
    pub fn status(&self, pending_review: bool) -> ItemStatus {
        if pending_review {
            ItemStatus::Pending
        } else if self.correct > 0 {
            ItemStatus::Mastered
        } else if self.wrong > 0 {
            ItemStatus::Struggling
        } else {
            ItemStatus::Unseen
        }
    }
}

/// Status light shown next to each item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Unseen,
    Mastered,
    Struggling,
    Pending,
}

/// One row of the per-item statistics table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemReport {
    pub index: usize,
    pub answer: String,
    pub status: ItemStatus,
    pub correct: u32,
    pub wrong: u32,
    pub rate: String,
}

/// Outcome recorded for a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerResult {
    Correct,
    Wrong,
    /// Submitted with no input; counts as wrong.
    Skipped,
}

impl AnswerResult {
    pub fn is_correct(self) -> bool {
        matches!(self, Self::Correct)
    }
}

/// Append-only log entry for a submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Mode the item was asked in.
    pub mode: StudyMode,
    pub item_index: usize,
    pub answer: String,
    /// Raw input as typed, before trimming.
    pub input: String,
    pub result: AnswerResult,
    pub timestamp: DateTime<Utc>,
}

/// Snapshot of where the session is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub mode: StudyMode,
    pub sequence_cursor: usize,
    pub current_index: usize,
    pub total: usize,
    pub pending_review: usize,
    pub round: u32,
}

/// Per-session configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    pub language: Language,
    pub matching_mode: MatchingMode,
    pub fuzzy_threshold: f64,
    pub requeue_policy: RequeuePolicy,
    /// Emit a speak signal for the next item on every advance.
    pub auto_speak: bool,
    pub speech_rate: f32,
}

impl SessionSettings {
    /// Settings with the language's default matching mode.
    pub fn for_language(language: Language) -> Self {
        Self {
            language,
            matching_mode: language.default_matching_mode(),
            ..Self::default()
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        let language = Language::default();
        Self {
            language,
            matching_mode: language.default_matching_mode(),
            fuzzy_threshold: 0.8,
            requeue_policy: RequeuePolicy::default(),
            auto_speak: false,
            speech_rate: 0.9,
        }
    }
}
