//! A drill session: an item list, its settings and its scheduler state.

use crate::cloze::{blank_sentence, find_blank, Cloze};
use crate::diff::{diff, Alignment};
use crate::error::ConfigError;
use crate::matching::compare_answers;
use crate::scheduler::{self, SessionState, Signal, Submission};
use crate::speech::{SpeechField, Speaker, Utterance};
use crate::types::{
    AnswerResult, HistoryEntry, ItemReport, ItemStats, Progress, QuizItem, SessionSettings,
    StudyMode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sound the presentation layer should play after an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundCue {
    Correct,
    Wrong,
}

/// What the learner sees after submitting an answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    pub result: AnswerResult,
    pub is_correct: bool,
    /// The item's answer as written in the list.
    pub expected: String,
    /// The submitted text, trimmed.
    pub actual: String,
    pub similarity: f64,
    pub diff: Alignment,
    pub sound: SoundCue,
    /// Items still waiting for review after this answer.
    pub pending_review: usize,
}

impl Feedback {
    /// Banner text for the answer.
    pub fn message(&self) -> String {
        match self.result {
            AnswerResult::Correct => "Correct!".to_string(),
            AnswerResult::Wrong => format!(
                "Wrong! The answer is: {} (you typed: {})",
                self.expected, self.actual
            ),
            AnswerResult::Skipped => format!("Skipped! The answer is: {}", self.expected),
        }
    }
}

/// One learner working through one item list.
///
/// Sessions share nothing; embed one per learner.
#[derive(Debug, Clone)]
pub struct Session {
    items: Vec<QuizItem>,
    settings: SessionSettings,
    state: SessionState,
}

impl Session {
    /// Start a session at the first item in learning mode.
    pub fn new(items: Vec<QuizItem>, settings: SessionSettings) -> Result<Self, ConfigError> {
        validate(&items)?;
        let state = SessionState::new(items.len());
        Ok(Self {
            items,
            settings,
            state,
        })
    }

    pub fn items(&self) -> &[QuizItem] {
        &self.items
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn mode(&self) -> StudyMode {
        self.state.mode
    }

    pub fn current_index(&self) -> usize {
        self.state.current_index
    }

    pub fn current_item(&self) -> &QuizItem {
        &self.items[self.state.current_index]
    }

    pub fn stats(&self) -> &[ItemStats] {
        &self.state.stats
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.state.history
    }

    /// Pending review items, front first.
    pub fn wrong_queue(&self) -> Vec<usize> {
        self.state.wrong_queue.iter().copied().collect()
    }

    pub fn progress(&self) -> Progress {
        Progress {
            mode: self.state.mode,
            sequence_cursor: self.state.sequence_cursor,
            current_index: self.state.current_index,
            total: self.items.len(),
            pending_review: self.state.wrong_queue.len(),
            round: self.state.round,
        }
    }

    /// Statistics table, one row per item in list order.
    pub fn item_reports(&self) -> Vec<ItemReport> {
        self.items
            .iter()
            .zip(&self.state.stats)
            .enumerate()
            .map(|(index, (item, stats))| ItemReport {
                index,
                answer: item.answer.clone(),
                status: stats.status(self.state.is_pending(index)),
                correct: stats.correct,
                wrong: stats.wrong,
                rate: stats.rate(),
            })
            .collect()
    }

    /// Judge `input` against the current item, stamped with the wall clock.
    pub fn submit_answer(&mut self, input: &str) -> Feedback {
        self.submit_answer_at(input, Utc::now())
    }

    /// Judge `input` against the current item.
    ///
    /// Empty input counts as a skip. The session stays on the same item until
    /// [`Session::advance`] is called.
    pub fn submit_answer_at(&mut self, input: &str, now: DateTime<Utc>) -> Feedback {
        let expected = self.current_item().answer.clone();
        let matched = compare_answers(
            input,
            &expected,
            self.settings.matching_mode,
            self.settings.fuzzy_threshold,
        );

        let result = if matched.is_correct {
            AnswerResult::Correct
        } else if matched.typed_normalized.is_empty() {
            AnswerResult::Skipped
        } else {
            AnswerResult::Wrong
        };

        scheduler::submit(
            &mut self.state,
            Submission {
                answer: &expected,
                input,
                result,
                timestamp: now,
            },
            self.settings.requeue_policy,
        );

        Feedback {
            result,
            is_correct: matched.is_correct,
            actual: input.trim().to_string(),
            similarity: matched.similarity,
            diff: diff(&matched.correct_normalized, &matched.typed_normalized),
            sound: if matched.is_correct {
                SoundCue::Correct
            } else {
                SoundCue::Wrong
            },
            pending_review: self.state.wrong_queue.len(),
            expected,
        }
    }

    /// Give up on the current item. Same as submitting empty input.
    pub fn skip(&mut self) -> Feedback {
        self.submit_answer("")
    }

    /// Move to the next item.
    pub fn advance(&mut self) -> Vec<Signal> {
        let mut signals = scheduler::advance(&mut self.state);
        if self.settings.auto_speak {
            if let Some(utterance) = self.utterance(SpeechField::Word) {
                signals.push(Signal::Speak(utterance));
            }
        }
        signals
    }

    /// Replace the item list.
    ///
    /// Progress is kept when the answers are unchanged (display data may
    /// still be updated); otherwise the session restarts. Returns whether it
    /// restarted.
    pub fn load_items(&mut self, items: Vec<QuizItem>) -> Result<bool, ConfigError> {
        validate(&items)?;

        let unchanged = items.len() == self.items.len()
            && items.iter().zip(&self.items).all(|(new, old)| new.answer == old.answer);

        self.items = items;
        if unchanged {
            return Ok(false);
        }

        self.state = SessionState::new(self.items.len());
        Ok(true)
    }

    /// Speech request for a field of the current item.
    pub fn utterance(&self, field: SpeechField) -> Option<Utterance> {
        Utterance::for_item(
            self.current_item(),
            field,
            self.settings.language,
            self.settings.speech_rate,
        )
    }

    /// Hand a field of the current item to `speaker`. Returns whether there
    /// was anything to say.
    pub fn speak(&self, field: SpeechField, speaker: &dyn Speaker) -> bool {
        match self.utterance(field) {
            Some(utterance) => {
                speaker.speak(&utterance);
                true
            }
            None => false,
        }
    }

    /// Example sentence of the current item with the answer blanked out.
    pub fn cloze(&self) -> Option<Cloze> {
        let item = self.current_item();
        let sentence = item.sentence.as_deref()?;
        let index = item
            .blank_index
            .or_else(|| find_blank(sentence, &item.answer))?;
        blank_sentence(sentence, index)
    }
}

fn validate(items: &[QuizItem]) -> Result<(), ConfigError> {
    if items.is_empty() {
        return Err(ConfigError::EmptyItemList);
    }
    if let Some(index) = items.iter().position(|item| item.answer.trim().is_empty()) {
        return Err(ConfigError::MissingAnswer { index });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::Tag;
    use crate::types::{ItemStatus, Language, MatchingMode};
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    fn items(answers: &[&str]) -> Vec<QuizItem> {
        answers.iter().map(|a| QuizItem::new(*a)).collect()
    }

    fn english(answers: &[&str]) -> Session {
        Session::new(items(answers), SessionSettings::for_language(Language::English)).unwrap()
    }

    fn chinese(answers: &[&str]) -> Session {
        Session::new(items(answers), SessionSettings::for_language(Language::Chinese)).unwrap()
    }

    #[derive(Default)]
    struct Recorder(Mutex<Vec<Utterance>>);

    impl Speaker for Recorder {
        fn speak(&self, utterance: &Utterance) {
            self.0.lock().unwrap().push(utterance.clone());
        }
    }

    #[test]
    fn rejects_empty_item_list() {
        let result = Session::new(vec![], SessionSettings::default());
        assert_eq!(result.unwrap_err(), ConfigError::EmptyItemList);
    }

    #[test]
    fn rejects_blank_answer() {
        let result = Session::new(items(&["cat", "  "]), SessionSettings::default());
        assert_eq!(result.unwrap_err(), ConfigError::MissingAnswer { index: 1 });
    }

    #[test]
    fn apple_banana_walkthrough() {
        let mut session = english(&["apple", "banana"]);

        let feedback = session.submit_answer("apple");
        assert!(feedback.is_correct);
        assert!(session.advance().is_empty());

        let feedback = session.submit_answer("xyz");
        assert!(!feedback.is_correct);
        assert_eq!(feedback.result, AnswerResult::Wrong);
        assert_eq!(session.wrong_queue(), vec![1]);
        assert_eq!(session.stats()[1], ItemStats { correct: 0, wrong: 1 });
        assert_eq!(session.mode(), StudyMode::Learning);

        let signals = session.advance();
        assert_eq!(signals, vec![Signal::EnteringReview { pending: 1 }]);
        assert_eq!(session.mode(), StudyMode::Review);
        assert_eq!(session.progress().sequence_cursor, 0);
        assert_eq!(session.current_item().answer, "banana");
    }

    #[test]
    fn single_item_perfect_round() {
        let mut session = english(&["cat"]);
        session.submit_answer("cat");
        assert_eq!(session.advance(), vec![Signal::PerfectRound]);
        assert_eq!(session.mode(), StudyMode::Learning);
        assert_eq!(session.progress().round, 2);
    }

    #[test]
    fn english_ignores_case_and_whitespace() {
        let mut session = english(&["Agency"]);
        let feedback = session.submit_answer("  agency ");
        assert!(feedback.is_correct);
        assert_eq!(feedback.actual, "agency");
        assert_eq!(feedback.expected, "Agency");
        assert!(feedback.diff.is_exact());
        assert_eq!(feedback.sound, SoundCue::Correct);
    }

    #[test]
    fn chinese_requires_exact_match() {
        let mut session = chinese(&["冬天"]);
        let feedback = session.submit_answer("冬大");
        assert!(!feedback.is_correct);
        assert_eq!(feedback.diff.expected[1].tag, Tag::Mismatch);
        assert_eq!(feedback.message(), "Wrong! The answer is: 冬天 (you typed: 冬大)");
    }

    #[test]
    fn agency_diff_through_session() {
        let mut session = english(&["agency"]);
        let feedback = session.submit_answer("AGENCI");
        assert_eq!(feedback.diff.input_text(), "agenci");
        assert_eq!(feedback.diff.edit_count(), 1);
    }

    #[test]
    fn skip_counts_as_wrong() {
        let mut session = english(&["ace", "mystery"]);
        let feedback = session.skip();
        assert_eq!(feedback.result, AnswerResult::Skipped);
        assert_eq!(feedback.sound, SoundCue::Wrong);
        assert_eq!(feedback.message(), "Skipped! The answer is: ace");
        assert_eq!(session.stats()[0].wrong, 1);
        assert_eq!(session.wrong_queue(), vec![0]);
        assert_eq!(session.history()[0].result, AnswerResult::Skipped);
    }

    #[test]
    fn history_keeps_raw_input_and_time() {
        let mut session = english(&["seeps"]);
        let now = Utc::now();
        session.submit_answer_at(" Seeps ", now);
        let entry = &session.history()[0];
        assert_eq!(entry.input, " Seeps ");
        assert_eq!(entry.answer, "seeps");
        assert_eq!(entry.timestamp, now);
        assert_eq!(entry.mode, StudyMode::Learning);
    }

    #[test]
    fn fuzzy_mode_accepts_near_misses() {
        let settings = SessionSettings {
            matching_mode: MatchingMode::Fuzzy,
            ..SessionSettings::default()
        };
        let mut session = Session::new(items(&["hello"]), settings).unwrap();
        assert!(session.submit_answer("helo").is_correct);
    }

    #[test]
    fn diff_tracks_line_up_with_the_answer() {
        let mut session = english(&["İzmir"]);
        let feedback = session.submit_answer("Izmar");
        assert_eq!(feedback.diff.len(), 5);
        assert_eq!(feedback.diff.expected_text(), "izmir");
        assert_eq!(feedback.diff.edit_count(), 1);
    }

    #[test]
    fn empty_submission_is_a_timestamped_skip() {
        let mut session = english(&["apple", "banana"]);
        let at = Utc::now() - chrono::Duration::minutes(5);
        let feedback = session.submit_answer_at("  ", at);

        assert_eq!(feedback.result, AnswerResult::Skipped);
        assert_eq!(feedback.message(), "Skipped! The answer is: apple");
        assert_eq!(session.history()[0].timestamp, at);
        assert_eq!(session.wrong_queue(), vec![0]);
    }

    #[test]
    fn item_reports_reflect_queue() {
        let mut session = english(&["a", "b", "c"]);
        session.submit_answer("a");
        session.advance();
        session.submit_answer("x");
        session.advance();

        let reports = session.item_reports();
        let statuses: Vec<_> = reports.iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![ItemStatus::Mastered, ItemStatus::Pending, ItemStatus::Unseen]
        );
        assert_eq!(reports[1].rate, "0/1");
    }

    #[test]
    fn reload_same_answers_keeps_progress() {
        let mut session = english(&["a", "b"]);
        session.submit_answer("x");
        session.advance();

        let mut updated = items(&["a", "b"]);
        updated[0].translation = Some("first letter".to_string());
        assert_eq!(session.load_items(updated), Ok(false));
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.wrong_queue(), vec![0]);
        assert_eq!(session.items()[0].translation.as_deref(), Some("first letter"));
    }

    #[test]
    fn reload_new_answers_resets() {
        let mut session = english(&["a", "b"]);
        session.submit_answer("x");
        session.advance();

        assert_eq!(session.load_items(items(&["c"])), Ok(true));
        assert_eq!(session.current_index(), 0);
        assert!(session.wrong_queue().is_empty());
        assert!(session.history().is_empty());
        assert_eq!(session.stats().len(), 1);

        assert_eq!(session.load_items(vec![]), Err(ConfigError::EmptyItemList));
        assert_eq!(session.items()[0].answer, "c");
    }

    #[test]
    fn auto_speak_announces_next_item() {
        let settings = SessionSettings {
            auto_speak: true,
            ..SessionSettings::for_language(Language::Chinese)
        };
        let mut session = Session::new(items(&["冬天", "季節"]), settings).unwrap();
        session.submit_answer("冬天");
        let signals = session.advance();
        match signals.as_slice() {
            [Signal::Speak(utterance)] => {
                assert_eq!(utterance.text, "季節");
                assert_eq!(utterance.lang, "zh-TW");
            }
            other => panic!("unexpected signals: {other:?}"),
        }
    }

    #[test]
    fn speaker_receives_requests() {
        let session = english(&["agency"]);
        let recorder = Recorder::default();
        assert!(session.speak(SpeechField::Word, &recorder));
        assert!(!session.speak(SpeechField::Sentence, &recorder));
        let spoken = recorder.0.lock().unwrap();
        assert_eq!(spoken.len(), 1);
        assert_eq!(spoken[0].lang, "en-US");
    }

    #[test]
    fn cloze_uses_explicit_or_found_blank() {
        let mut item = QuizItem::new("agency").with_sentence("Many people worked at the agency.");
        let session = Session::new(vec![item.clone()], SessionSettings::default()).unwrap();
        assert_eq!(
            session.cloze().map(|c| c.render("___")),
            Some("Many people worked at the ___.".to_string())
        );

        item.blank_index = Some(0);
        let session = Session::new(vec![item], SessionSettings::default()).unwrap();
        assert_eq!(session.cloze().unwrap().after, "people worked at the agency.");
    }
}
