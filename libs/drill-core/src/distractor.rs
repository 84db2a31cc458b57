//! Wrong-answer sampling for the multiple-choice stages.

use crate::pair_set::PairSet;
use crate::types::{AnswerField, GameAnswer};
use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use std::collections::HashSet;

/// Draws distractors from the other pairs of the same list.
#[derive(Debug, Clone, Copy)]
pub struct DistractorSampler {
    count: usize,
}

impl Default for DistractorSampler {
    fn default() -> Self {
        Self {
            count: Self::DEFAULT_COUNT,
        }
    }
}

impl DistractorSampler {
    /// Three distractors plus the correct option gives four choices.
    pub const DEFAULT_COUNT: usize = 3;

    pub fn new(count: usize) -> Self {
        Self { count }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Pick up to `count` distinct alternatives to `correct`.
    ///
    /// Values are compared after trimming, so a list whose translations only
    /// differ by surrounding whitespace yields fewer distractors.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        correct: &str,
        field: AnswerField,
        pairs: &PairSet,
        rng: &mut R,
    ) -> Vec<String> {
        let correct = correct.trim();
        let mut seen = HashSet::new();
        let candidates: Vec<&str> = pairs
            .field_values(field)
            .map(str::trim)
            .filter(|v| *v != correct && seen.insert(*v))
            .collect();

        candidates
            .choose_multiple(rng, self.count)
            .map(|v| v.to_string())
            .collect()
    }

    /// Build the shuffled answer set: the correct option plus distractors.
    pub fn answer_set<R: Rng + ?Sized>(
        &self,
        correct: &str,
        field: AnswerField,
        pairs: &PairSet,
        rng: &mut R,
    ) -> Vec<GameAnswer> {
        let distractors = self.sample(correct, field, pairs, rng);

        let mut answers = Vec::with_capacity(distractors.len() + 1);
        answers.push(GameAnswer {
            text: correct.trim().to_string(),
            is_correct: true,
        });
        answers.extend(distractors.into_iter().map(|text| GameAnswer {
            text,
            is_correct: false,
        }));

        answers.shuffle(rng);
        answers
    }
}
