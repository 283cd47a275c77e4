//! Core vocabulary drill library shared by the backend and any other front end.
//!
//! Provides:
//! - Two-phase scheduler (sequential learning, then review of missed items)
//! - Character-level answer diff for feedback display
//! - Answer matching (exact, case-insensitive, Levenshtein fuzzy)
//! - Word list parser and cloze helper
//! - Speech request descriptions for an external text-to-speech capability

pub mod cloze;
pub mod diff;
pub mod error;
pub mod matching;
pub mod parser;
pub mod scheduler;
pub mod session;
pub mod speech;
pub mod types;

pub use cloze::{blank_sentence, find_blank, Cloze};
pub use diff::{diff, opcodes, ratio, Alignment, Cell, OpTag, Opcode, Tag};
pub use error::{ConfigError, ParseError, Result};
pub use matching::{compare_answers, levenshtein_distance, normalized_similarity, MatchResult};
pub use parser::{parse, parse_plain};
pub use scheduler::{SessionState, Signal};
pub use session::{Feedback, Session, SoundCue};
pub use speech::{SpeechField, Speaker, Utterance};
pub use types::{
    AnswerResult, HistoryEntry, ItemReport, ItemStats, ItemStatus, Language, MatchingMode,
    Progress, QuizItem, RequeuePolicy, SessionSettings, StudyMode,
};
