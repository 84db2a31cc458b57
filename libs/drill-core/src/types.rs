//! Core types for the drill engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Duration;

/// Position of a pair in the session's list.
pub type PairIndex = usize;

/// One word and its translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordPair {
    pub value: String,
    pub translation: String,
}

impl WordPair {
    pub fn new(value: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            translation: translation.into(),
        }
    }

    /// Get the text of one side of the pair.
    pub fn field(&self, field: AnswerField) -> &str {
        match field {
            AnswerField::Value => &self.value,
            AnswerField::Translation => &self.translation,
        }
    }
}

/// Which side of a pair an answer is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerField {
    Value,
    Translation,
}

impl AnswerField {
    /// The opposite side, shown as the prompt.
    pub fn opposite(self) -> Self {
        match self {
            Self::Value => Self::Translation,
            Self::Translation => Self::Value,
        }
    }
}

/// Mastery stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Pick the word for a translation.
    WordChoice,
    /// Pick the translation for a word.
    TranslationChoice,
    /// Assemble the word letter by letter.
    LetterAssembly,
    /// Type the word from memory.
    FreeText,
}

impl Stage {
    pub const ALL: [Stage; 4] = [
        Self::WordChoice,
        Self::TranslationChoice,
        Self::LetterAssembly,
        Self::FreeText,
    ];

    /// 1-based stage number.
    pub fn number(self) -> u8 {
        match self {
            Self::WordChoice => 1,
            Self::TranslationChoice => 2,
            Self::LetterAssembly => 3,
            Self::FreeText => 4,
        }
    }

    /// Create from 1-based stage number.
    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Self::WordChoice),
            2 => Some(Self::TranslationChoice),
            3 => Some(Self::LetterAssembly),
            4 => Some(Self::FreeText),
            _ => None,
        }
    }

    /// Slot in per-stage arrays.
    pub fn index(self) -> usize {
        usize::from(self.number() - 1)
    }

    /// The following stage, or None after the last one.
    pub fn next(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    /// Side of the pair shown to the learner.
    pub fn prompt_field(self) -> AnswerField {
        self.answer_field().opposite()
    }

    /// Side of the pair the learner must produce.
    pub fn answer_field(self) -> AnswerField {
        match self {
            Self::TranslationChoice => AnswerField::Translation,
            _ => AnswerField::Value,
        }
    }
}

/// One multiple-choice option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameAnswer {
    pub text: String,
    pub is_correct: bool,
}

/// Fixed delays the host applies between answer and next presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timing {
    /// Auto-advance after an answer in stages 1-3.
    pub answer_feedback_ms: u64,
    /// Positive pulse after a correct stage-4 answer.
    pub text_success_ms: u64,
    /// Pause after the last pair of a stage.
    pub stage_transition_ms: u64,
    /// Lifetime of a wrong-letter marker.
    pub letter_error_ms: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            answer_feedback_ms: 1000,
            text_success_ms: 700,
            stage_transition_ms: 1500,
            letter_error_ms: 500,
        }
    }
}

impl Timing {
    /// No delays at all; useful for scripted hosts.
    pub fn immediate() -> Self {
        Self {
            answer_feedback_ms: 0,
            text_success_ms: 0,
            stage_transition_ms: 0,
            letter_error_ms: 0,
        }
    }

    pub fn answer_feedback(&self) -> Duration {
        Duration::from_millis(self.answer_feedback_ms)
    }

    pub fn text_success(&self) -> Duration {
        Duration::from_millis(self.text_success_ms)
    }

    pub fn stage_transition(&self) -> Duration {
        Duration::from_millis(self.stage_transition_ms)
    }

    pub fn letter_error(&self) -> Duration {
        Duration::from_millis(self.letter_error_ms)
    }
}

/// Snapshot of the session handed to hosts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub active_stage: Stage,
    pub current_pair_index: PairIndex,
    pub studied_sets: [BTreeSet<PairIndex>; 4],
    pub completed: bool,
}

impl SessionState {
    /// Studied set of one stage.
    pub fn studied(&self, stage: Stage) -> &BTreeSet<PairIndex> {
        &self.studied_sets[stage.index()]
    }
}

/// A finished session, as handed to the completion sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionEvent {
    pub user_id: String,
    pub pair_count: usize,
    pub completed_at: DateTime<Utc>,
}
