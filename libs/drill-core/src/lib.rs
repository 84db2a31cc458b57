//! Core vocabulary drill library.
//!
//! Provides:
//! - Four-stage drill engine (word choice, translation choice, letter assembly, free text)
//! - Distractor sampling for multiple-choice stages
//! - Letter assembly and free-text answer validation
//! - Completion reporting to an external sink
//! - Word list parser and directory-backed list source
//! - Words-studied totals over recorded completions

pub mod assembly;
pub mod distractor;
pub mod engine;
pub mod error;
pub mod matching;
pub mod pair_set;
pub mod parser;
pub mod reporter;
pub mod source;
pub mod stats;
pub mod types;

pub use assembly::{ErrorMarker, LetterAssembly, LetterOutcome, MarkerToken, Slot};
pub use distractor::DistractorSampler;
pub use engine::{Feedback, Presentation, StageEngine, Ticket, Transition, Wait};
pub use error::{InputError, ParseError, ReportError, Result, SessionError, SourceError};
pub use matching::{FreeTextValidator, TextVerdict};
pub use pair_set::PairSet;
pub use parser::{parse, MIN_PAIRS};
pub use reporter::{CompletionSink, SessionReporter};
pub use source::{DirectorySource, PairSource};
pub use stats::{Bucket, StatsPeriod};
pub use types::{
    AnswerField, CompletionEvent, GameAnswer, PairIndex, SessionState, Stage, Timing, WordPair,
};
