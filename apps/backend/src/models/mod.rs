//! API request and response types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Re-export shared types from drill-core
pub use drill_core::types::{
    HistoryEntry, ItemReport, Language, MatchingMode, Progress, QuizItem, RequeuePolicy,
    SessionSettings, StudyMode,
};
pub use drill_core::{Feedback, Signal, Utterance};

/// Where a session's items come from. Exactly one field must be set.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ItemSource {
    /// Items given inline.
    #[serde(default)]
    pub items: Option<Vec<QuizItem>>,
    /// Word list markdown (`W:` / `T:` / `S:` ... format).
    #[serde(default)]
    pub content: Option<String>,
    /// Name of a bundled word list.
    #[serde(default)]
    pub word_list: Option<String>,
}

// Session types
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    #[serde(flatten)]
    pub source: ItemSource,
    pub language: Option<Language>,
    pub matching_mode: Option<MatchingMode>,
    pub fuzzy_threshold: Option<f64>,
    pub requeue_policy: Option<RequeuePolicy>,
    pub auto_speak: Option<bool>,
    pub speech_rate: Option<f32>,
}

impl CreateSessionRequest {
    /// Merge the request's overrides onto the language defaults.
    pub fn settings(&self, auto_speak_default: bool) -> SessionSettings {
        let base = SessionSettings::for_language(self.language.unwrap_or_default());
        SessionSettings {
            matching_mode: self.matching_mode.unwrap_or(base.matching_mode),
            fuzzy_threshold: self.fuzzy_threshold.unwrap_or(base.fuzzy_threshold),
            requeue_policy: self.requeue_policy.unwrap_or(base.requeue_policy),
            auto_speak: self.auto_speak.unwrap_or(auto_speak_default),
            speech_rate: self.speech_rate.unwrap_or(base.speech_rate),
            ..base
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub index: usize,
    pub item: QuizItem,
    /// Example sentence with the answer blanked, when the item has one.
    pub cloze: Option<String>,
    pub progress: Progress,
    /// An answer was submitted and `advance` has not been called yet.
    pub awaiting_advance: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitAnswerRequest {
    #[serde(default)]
    pub input: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FeedbackResponse {
    pub message: String,
    #[serde(flatten)]
    pub feedback: Feedback,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SignalView {
    pub message: String,
    #[serde(flatten)]
    pub signal: Signal,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AdvanceResponse {
    pub signals: Vec<SignalView>,
    pub current: SessionView,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoadItemsResponse {
    /// Whether the session restarted because the answers changed.
    pub reset: bool,
    pub current: SessionView,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub progress: Progress,
    pub wrong_queue: Vec<usize>,
    pub items: Vec<ItemReport>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    /// Newest first.
    pub entries: Vec<HistoryEntry>,
    pub total: usize,
}

// Word list types
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordListInfo {
    pub name: String,
    pub item_count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WordListsResponse {
    pub word_lists: Vec<WordListInfo>,
}
