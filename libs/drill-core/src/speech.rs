//! Speech requests handed to an external text-to-speech capability.
//!
//! Nothing here synthesizes audio. The drill only describes what should be
//! spoken; whether it actually plays never affects scheduling.

use crate::types::{Language, QuizItem};
use serde::{Deserialize, Serialize};

/// Language tag used for the Chinese translation fields.
pub const TRANSLATION_TAG: &str = "zh-TW";

/// Which part of an item to speak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeechField {
    Word,
    Translation,
    Sentence,
    SentenceTranslation,
    Definition,
    DefinitionTranslation,
}

impl SpeechField {
    /// Parse from the snake_case name.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "word" => Some(Self::Word),
            "translation" => Some(Self::Translation),
            "sentence" => Some(Self::Sentence),
            "sentence_translation" => Some(Self::SentenceTranslation),
            "definition" => Some(Self::Definition),
            "definition_translation" => Some(Self::DefinitionTranslation),
            _ => None,
        }
    }
}

/// A request to speak some text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    pub text: String,
    /// BCP 47 language tag.
    pub lang: String,
    pub rate: f32,
}

impl Utterance {
    /// Build the utterance for `field` of `item`, if the item has that field.
    pub fn for_item(
        item: &QuizItem,
        field: SpeechField,
        language: Language,
        rate: f32,
    ) -> Option<Self> {
        let (text, lang) = match field {
            SpeechField::Word => (Some(&item.answer), language.speech_tag()),
            SpeechField::Sentence => (item.sentence.as_ref(), language.speech_tag()),
            SpeechField::Definition => (item.definition.as_ref(), language.speech_tag()),
            SpeechField::Translation => (item.translation.as_ref(), TRANSLATION_TAG),
            SpeechField::SentenceTranslation => {
                (item.sentence_translation.as_ref(), TRANSLATION_TAG)
            }
            SpeechField::DefinitionTranslation => {
                (item.definition_translation.as_ref(), TRANSLATION_TAG)
            }
        };

        let text = text?.trim();
        if text.is_empty() {
            return None;
        }

        Some(Self {
            text: text.to_string(),
            lang: lang.to_string(),
            rate,
        })
    }
}

/// Text-to-speech capability. Fire and forget.
pub trait Speaker: Send + Sync {
    fn speak(&self, utterance: &Utterance);
}
