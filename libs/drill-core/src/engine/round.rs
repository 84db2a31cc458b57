//! Stage-specific presentation state.

use crate::assembly::LetterAssembly;
use crate::types::{GameAnswer, Stage};

/// Multiple-choice round of stages 1 and 2.
#[derive(Debug, Clone)]
pub(crate) struct ChoiceRound {
    pub answers: Vec<GameAnswer>,
    pub picked: Option<usize>,
}

/// Typed-answer round of stage 4.
#[derive(Debug, Clone, Default)]
pub(crate) struct TextRound {
    pub revealed: Option<String>,
}

/// Active stage together with the state of the pair being presented.
#[derive(Debug, Clone)]
pub(crate) enum Phase {
    WordChoice(ChoiceRound),
    TranslationChoice(ChoiceRound),
    LetterAssembly(LetterAssembly),
    FreeText(TextRound),
    Completed,
}

impl Phase {
    /// Stage the phase belongs to; the last stage once completed.
    pub fn stage(&self) -> Stage {
        match self {
            Self::WordChoice(_) => Stage::WordChoice,
            Self::TranslationChoice(_) => Stage::TranslationChoice,
            Self::LetterAssembly(_) => Stage::LetterAssembly,
            Self::FreeText(_) | Self::Completed => Stage::FreeText,
        }
    }
}

/// What the host should render for the current pair.
#[derive(Debug, Clone, Copy)]
pub enum Presentation<'a> {
    Choice {
        stage: Stage,
        prompt: &'a str,
        answers: &'a [GameAnswer],
        picked: Option<usize>,
    },
    Assembly {
        prompt: &'a str,
        assembly: &'a LetterAssembly,
    },
    FreeText {
        prompt: &'a str,
        revealed: Option<&'a str>,
    },
    Completed,
}
