//! Error types for drill-core.

use crate::types::Stage;
use thiserror::Error;

/// Result type alias using ParseError.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Errors that can occur while parsing a word list file.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("missing word at line {line}")]
    MissingWord { line: usize },

    #[error("missing translation at line {line}")]
    MissingTranslation { line: usize },

    #[error("empty value at line {line}")]
    EmptyValue { line: usize },

    #[error("unexpected text at line {line}")]
    UnexpectedLine { line: usize },

    #[error("duplicate word at line {line}")]
    DuplicateWord { line: usize },

    #[error("list has {found} pairs, at least {min} required")]
    TooFewPairs { found: usize, min: usize },
}

/// Errors raised when a session cannot be created.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("word list is empty")]
    EmptyList,

    #[error("pair {index} has no letters to assemble")]
    NoLetters { index: usize },
}

/// Learner input that does not apply to the current session state.
///
/// Returning one of these never mutates the session.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("input not accepted in {stage:?}")]
    NotAccepted { stage: Stage },

    #[error("a transition is already pending")]
    TransitionPending,

    #[error("nothing to acknowledge")]
    NothingToAcknowledge,

    #[error("empty answer")]
    EmptyAnswer,

    #[error("letter not available: {0}")]
    LetterUnavailable(char),

    #[error("session already completed")]
    SessionCompleted,
}

/// Errors from recording a completed session.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("sink error: {0}")]
    Sink(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialize error: {0}")]
    Serialize(String),
}

/// Errors from loading a word list.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("word list not found: {0}")]
    NotFound(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}
