//! Shared helpers for drill session tests.
//!
//! Each helper plays one learner move against the engine, reading the
//! expected answer from the engine's own presentation.

#![allow(dead_code)]

use async_trait::async_trait;
use drill_core::{
    CompletionEvent, CompletionSink, Feedback, PairSet, Presentation, ReportError, StageEngine,
    Transition, Wait, WordPair,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Mutex;

/// Four pairs whose words and translations are all distinct.
pub fn fruit() -> Vec<WordPair> {
    vec![
        WordPair::new("apple", "яблоко"),
        WordPair::new("pear", "груша"),
        WordPair::new("plum", "слива"),
        WordPair::new("cherry", "вишня"),
    ]
}

pub fn engine_with(pairs: Vec<WordPair>, seed: u64) -> StageEngine {
    StageEngine::start(PairSet::new(pairs).unwrap(), StdRng::seed_from_u64(seed))
}

pub fn engine(seed: u64) -> StageEngine {
    engine_with(fruit(), seed)
}

/// Letters the learner has to place for `word`, in order.
pub fn letters_of(word: &str) -> Vec<char> {
    word.trim()
        .to_lowercase()
        .chars()
        .filter(|c| *c != ' ' && *c != '-')
        .collect()
}

enum Move {
    Choice(String),
    Letters { wrong: Option<char>, letters: Vec<char> },
    Text(String),
}

fn plan(engine: &StageEngine, correct: bool) -> Move {
    let value = engine.current_pair().value.clone();
    match engine.presentation() {
        Presentation::Choice { answers, .. } => {
            let answer = answers
                .iter()
                .find(|a| a.is_correct == correct)
                .expect("answer set has the requested option");
            Move::Choice(answer.text.clone())
        }
        Presentation::Assembly { assembly, .. } => {
            let letters = letters_of(&value);
            let wrong = if correct {
                None
            } else {
                let expected = letters[0];
                Some(
                    *assembly
                        .available()
                        .iter()
                        .find(|c| **c != expected)
                        .expect("word has two distinct letters"),
                )
            };
            Move::Letters { wrong, letters }
        }
        Presentation::FreeText { .. } => {
            if correct {
                Move::Text(value)
            } else {
                Move::Text(format!("{value}-nope"))
            }
        }
        Presentation::Completed => panic!("session already completed"),
    }
}

/// Answer the current pair and return the resulting transition.
pub fn answer(engine: &mut StageEngine, correct: bool) -> Transition {
    let feedback = match plan(engine, correct) {
        Move::Choice(text) => engine.submit_choice(&text).unwrap(),
        Move::Text(text) => engine.submit_text(&text).unwrap(),
        Move::Letters { wrong, letters } => {
            if let Some(wrong) = wrong {
                let missed = engine.submit_letter(wrong).unwrap();
                assert!(matches!(missed, Feedback::LetterMissed { slot: 0, .. }));
            }
            let mut last = None;
            for letter in letters {
                last = Some(engine.submit_letter(letter).unwrap());
            }
            last.expect("word has letters")
        }
    };

    match feedback {
        Feedback::Answered {
            correct: was_correct,
            transition,
        } => {
            assert_eq!(was_correct, correct);
            transition
        }
        other => panic!("expected an evaluated answer, got {other:?}"),
    }
}

/// Resolve a transition the way a host would once its timer fires.
pub fn resolve(engine: &mut StageEngine, transition: Transition) {
    match transition.wait {
        Wait::After { .. } => assert!(engine.advance(transition.ticket)),
        Wait::Acknowledge => engine.acknowledge_and_advance().unwrap(),
    }
}

/// Answer and immediately resolve.
pub fn step(engine: &mut StageEngine, correct: bool) {
    let transition = answer(engine, correct);
    resolve(engine, transition);
}

#[derive(Default)]
pub struct RecordingSink {
    pub events: Mutex<Vec<CompletionEvent>>,
}

#[async_trait]
impl CompletionSink for RecordingSink {
    async fn record_completion(&self, event: &CompletionEvent) -> Result<(), ReportError> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

pub struct FailingSink;

#[async_trait]
impl CompletionSink for FailingSink {
    async fn record_completion(&self, _event: &CompletionEvent) -> Result<(), ReportError> {
        Err(ReportError::Sink("store unavailable".to_string()))
    }
}
