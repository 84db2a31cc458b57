//! Parser for word list files.
//!
//! # Format
//! ```text
//! # Fruit
//! W: apple
//! T: яблоко
//!
//! W: ice cream
//! T: мороженое
//! ```
//!
//! Lines starting with `#` and blank lines are ignored. A list needs at
//! least [`MIN_PAIRS`] pairs, and no word may appear twice (compared trimmed
//! and case-folded).

use crate::assembly;
use crate::error::{ParseError, Result};
use crate::types::WordPair;
use std::collections::HashSet;

/// Smallest list worth drilling.
pub const MIN_PAIRS: usize = 4;

/// Parse list content into pairs, in file order.
pub fn parse(content: &str) -> Result<Vec<WordPair>> {
    let mut list = ListBuilder::default();
    let mut current: Option<PairBuilder> = None;

    for (idx, line) in content.lines().enumerate() {
        let line_num = idx + 1;
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if let Some(word) = trimmed.strip_prefix("W:") {
            if let Some(builder) = current.take() {
                list.push(builder)?;
            }
            current = Some(PairBuilder::new(line_num, word)?);
        } else if let Some(translation) = trimmed.strip_prefix("T:") {
            let builder = current
                .as_mut()
                .ok_or(ParseError::MissingWord { line: line_num })?;
            if builder.translation.is_some() {
                return Err(ParseError::MissingWord { line: line_num });
            }
            builder.translation = Some(non_empty(translation, line_num)?);
        } else {
            return Err(ParseError::UnexpectedLine { line: line_num });
        }
    }

    if let Some(builder) = current {
        list.push(builder)?;
    }

    list.finish()
}

#[derive(Default)]
struct ListBuilder {
    pairs: Vec<WordPair>,
    seen: HashSet<String>,
}

impl ListBuilder {
    fn push(&mut self, builder: PairBuilder) -> Result<()> {
        let line = builder.start_line;
        let pair = builder.build()?;
        if !self.seen.insert(pair.value.to_lowercase()) {
            return Err(ParseError::DuplicateWord { line });
        }
        self.pairs.push(pair);
        Ok(())
    }

    fn finish(self) -> Result<Vec<WordPair>> {
        if self.pairs.len() < MIN_PAIRS {
            return Err(ParseError::TooFewPairs {
                found: self.pairs.len(),
                min: MIN_PAIRS,
            });
        }
        Ok(self.pairs)
    }
}

struct PairBuilder {
    value: String,
    translation: Option<String>,
    start_line: usize,
}

impl PairBuilder {
    fn new(start_line: usize, word: &str) -> Result<Self> {
        let value = non_empty(word, start_line)?;
        if !assembly::has_letters(&value) {
            return Err(ParseError::EmptyValue { line: start_line });
        }
        Ok(Self {
            value,
            translation: None,
            start_line,
        })
    }

    fn build(self) -> Result<WordPair> {
        let translation = self.translation.ok_or(ParseError::MissingTranslation {
            line: self.start_line,
        })?;
        Ok(WordPair {
            value: self.value,
            translation,
        })
    }
}

fn non_empty(raw: &str, line: usize) -> Result<String> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(ParseError::EmptyValue { line });
    }
    Ok(value.to_string())
}
