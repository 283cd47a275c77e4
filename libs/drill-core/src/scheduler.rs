//! Two-phase question scheduler.
//!
//! A session walks the item list in order (learning). Items answered wrong
//! are queued; once the walk runs off the end, the queue is drilled (review)
//! until every queued item has been answered right, then a new round starts.
//!
//! All state lives in [`SessionState`]; it is only changed by [`submit`] and
//! [`advance`].

use crate::speech::Utterance;
use crate::types::{AnswerResult, HistoryEntry, ItemStats, RequeuePolicy, StudyMode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Something the presentation layer should show or play.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Signal {
    /// The wrong queue is empty; learning restarts from the first item.
    ReviewComplete,
    /// The learning pass ended with mistakes; review begins.
    EnteringReview { pending: usize },
    /// The learning pass ended without a single mistake.
    PerfectRound,
    /// Speak the newly current item.
    Speak(Utterance),
}

impl Signal {
    /// Short banner text for the signal.
    pub fn message(&self) -> String {
        match self {
            Self::ReviewComplete => "Review finished! Starting a new round.".to_string(),
            Self::EnteringReview { pending } => {
                format!("Round over, entering review mode ({pending} to review).")
            }
            Self::PerfectRound => "All correct! Starting a new round right away.".to_string(),
            Self::Speak(utterance) => utterance.text.clone(),
        }
    }
}

/// Mutable state of one drill session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub mode: StudyMode,
    /// Position of the learning walk. Only moves in learning mode.
    pub sequence_cursor: usize,
    /// Item currently shown.
    pub current_index: usize,
    /// Items waiting for review, front first. Never holds duplicates.
    pub wrong_queue: VecDeque<usize>,
    pub stats: Vec<ItemStats>,
    pub history: Vec<HistoryEntry>,
    /// 1-based count of learning passes started.
    pub round: u32,
}

impl SessionState {
    /// Fresh state for `item_count` items.
    ///
    /// # Panics
    /// Panics if `item_count` is zero; callers validate the item list first.
    pub fn new(item_count: usize) -> Self {
        assert!(item_count > 0, "session state needs at least one item");
        Self {
            mode: StudyMode::Learning,
            sequence_cursor: 0,
            current_index: 0,
            wrong_queue: VecDeque::new(),
            stats: vec![ItemStats::default(); item_count],
            history: Vec::new(),
            round: 1,
        }
    }

    pub fn item_count(&self) -> usize {
        self.stats.len()
    }

    /// Whether `index` is waiting in the wrong queue.
    pub fn is_pending(&self, index: usize) -> bool {
        self.wrong_queue.contains(&index)
    }

    fn start_round(&mut self) {
        self.mode = StudyMode::Learning;
        self.sequence_cursor = 0;
        self.current_index = 0;
        self.round += 1;
    }

    fn check_invariants(&self) {
        debug_assert!(self.current_index < self.item_count());
        debug_assert!(self.sequence_cursor < self.item_count());
        debug_assert!(
            self.wrong_queue
                .iter()
                .enumerate()
                .all(|(pos, idx)| !self.wrong_queue.iter().skip(pos + 1).any(|other| other == idx)),
            "wrong queue holds a duplicate: {:?}",
            self.wrong_queue
        );
        if self.mode == StudyMode::Review {
            debug_assert_eq!(self.wrong_queue.front(), Some(&self.current_index));
        }
    }
}

/// An answer to the current item, already judged.
#[derive(Debug, Clone)]
pub struct Submission<'a> {
    pub answer: &'a str,
    pub input: &'a str,
    pub result: AnswerResult,
    pub timestamp: DateTime<Utc>,
}

/// Record a judged answer for the current item.
///
/// Bumps the item's counter, appends to the history and updates the wrong
/// queue. Does not move to another item; call [`advance`] for that.
pub fn submit(state: &mut SessionState, submission: Submission<'_>, policy: RequeuePolicy) {
    let index = state.current_index;
    let correct = submission.result.is_correct();

    let stats = &mut state.stats[index];
    if correct {
        stats.correct += 1;
    } else {
        stats.wrong += 1;
    }

    state.history.push(HistoryEntry {
        mode: state.mode,
        item_index: index,
        answer: submission.answer.to_string(),
        input: submission.input.to_string(),
        result: submission.result,
        timestamp: submission.timestamp,
    });

    if correct {
        state.wrong_queue.retain(|&queued| queued != index);
        return;
    }

    match state.mode {
        StudyMode::Learning => {
            if !state.is_pending(index) {
                state.wrong_queue.push_back(index);
            }
        }
        StudyMode::Review => {
            if state.wrong_queue.front() == Some(&index) {
                if policy == RequeuePolicy::Rotate {
                    state.wrong_queue.rotate_left(1);
                }
            } else if !state.is_pending(index) {
                state.wrong_queue.push_back(index);
            }
        }
    }
}

/// Move to the next item, switching mode when a phase ends.
pub fn advance(state: &mut SessionState) -> Vec<Signal> {
    let mut signals = Vec::new();

    match state.mode {
        StudyMode::Review => match state.wrong_queue.front() {
            Some(&head) => state.current_index = head,
            None => {
                state.start_round();
                signals.push(Signal::ReviewComplete);
            }
        },
        StudyMode::Learning => {
            let next = state.sequence_cursor + 1;
            if next < state.item_count() {
                state.sequence_cursor = next;
                state.current_index = next;
            } else if !state.wrong_queue.is_empty() {
                state.mode = StudyMode::Review;
                state.sequence_cursor = 0;
                signals.push(Signal::EnteringReview {
                    pending: state.wrong_queue.len(),
                });
                signals.extend(advance(state));
            } else {
                state.start_round();
                signals.push(Signal::PerfectRound);
            }
        }
    }

    state.check_invariants();
    signals
}
