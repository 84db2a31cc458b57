//! Read-only word list for one session.

use crate::assembly;
use crate::error::SessionError;
use crate::types::{AnswerField, PairIndex, WordPair};
use std::ops::Index;

/// Ordered, non-empty list of pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairSet {
    pairs: Vec<WordPair>,
}

impl PairSet {
    /// Wrap a list of pairs.
    ///
    /// Fails on an empty list, and on a word with nothing but spaces and
    /// hyphens, which could never be assembled letter by letter.
    pub fn new(pairs: Vec<WordPair>) -> Result<Self, SessionError> {
        if pairs.is_empty() {
            return Err(SessionError::EmptyList);
        }
        if let Some(index) = pairs.iter().position(|p| !assembly::has_letters(&p.value)) {
            return Err(SessionError::NoLetters { index });
        }
        Ok(Self { pairs })
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn get(&self, index: PairIndex) -> Option<&WordPair> {
        self.pairs.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &WordPair> {
        self.pairs.iter()
    }

    /// All texts of one side, in list order.
    pub fn field_values(&self, field: AnswerField) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(move |p| p.field(field))
    }

    pub fn as_slice(&self) -> &[WordPair] {
        &self.pairs
    }
}

impl Index<PairIndex> for PairSet {
    type Output = WordPair;

    fn index(&self, index: PairIndex) -> &WordPair {
        &self.pairs[index]
    }
}

impl TryFrom<Vec<WordPair>> for PairSet {
    type Error = SessionError;

    fn try_from(pairs: Vec<WordPair>) -> Result<Self, SessionError> {
        Self::new(pairs)
    }
}
