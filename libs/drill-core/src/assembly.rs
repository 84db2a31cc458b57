//! Letter-by-letter word assembly used by the third stage.
//!
//! The target word is split into one slot per character. Spaces and hyphens
//! are pre-filled separators; every other slot must be filled strictly left
//! to right from a shuffled pool of the word's own letters.

use crate::error::InputError;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// One position of the target word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Slot {
    Separator { ch: char },
    Empty,
    Filled { ch: char },
}

impl Slot {
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Identifies one wrong-letter marker so a late clear cannot remove a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarkerToken(u64);

/// Transient highlight on the slot that received a wrong letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMarker {
    pub slot: usize,
    pub token: MarkerToken,
}

/// Result of a single accepted keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LetterOutcome {
    /// Letter went into `slot`; more slots remain.
    Placed { slot: usize },
    /// Letter was available but not the one expected at `slot`.
    Missed { slot: usize, marker: MarkerToken },
    /// Last slot filled. `clean` is false if any miss happened on the way.
    Assembled { clean: bool },
}

fn is_separator(ch: char) -> bool {
    ch == ' ' || ch == '-'
}

/// Whether `word` leaves at least one slot to fill.
pub fn has_letters(word: &str) -> bool {
    word.trim().chars().any(|c| !is_separator(c))
}

fn fold(ch: char) -> char {
    ch.to_lowercase().next().unwrap_or(ch)
}

/// Assembly state for one pair.
#[derive(Debug, Clone)]
pub struct LetterAssembly {
    expected: Vec<char>,
    slots: Vec<Slot>,
    available: Vec<char>,
    misses: u32,
    marker: Option<ErrorMarker>,
    next_token: u64,
}

impl LetterAssembly {
    /// Lay out slots for `word` and shuffle its letters once.
    pub fn new<R: Rng + ?Sized>(word: &str, rng: &mut R) -> Self {
        let expected: Vec<char> = word.trim().to_lowercase().chars().collect();

        let slots = expected
            .iter()
            .map(|&ch| {
                if is_separator(ch) {
                    Slot::Separator { ch }
                } else {
                    Slot::Empty
                }
            })
            .collect();

        let mut available: Vec<char> = expected
            .iter()
            .copied()
            .filter(|&c| !is_separator(c))
            .collect();
        available.shuffle(rng);

        Self {
            expected,
            slots,
            available,
            misses: 0,
            marker: None,
            next_token: 0,
        }
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Letters still to be placed, in shuffled order.
    pub fn available(&self) -> &[char] {
        &self.available
    }

    pub fn error_marker(&self) -> Option<ErrorMarker> {
        self.marker
    }

    pub fn misses(&self) -> u32 {
        self.misses
    }

    /// First empty slot, which is the only one accepting input.
    pub fn next_slot(&self) -> Option<usize> {
        self.slots.iter().position(Slot::is_open)
    }

    pub fn is_complete(&self) -> bool {
        self.next_slot().is_none()
    }

    /// Text assembled so far, with unfilled slots as underscores.
    pub fn rendered(&self) -> String {
        self.slots
            .iter()
            .map(|slot| match slot {
                Slot::Separator { ch } | Slot::Filled { ch } => *ch,
                Slot::Empty => '_',
            })
            .collect()
    }

    /// Try to place `letter` in the next empty slot.
    pub fn submit_letter(&mut self, letter: char) -> Result<LetterOutcome, InputError> {
        let letter = fold(letter);
        let slot = self.next_slot().ok_or(InputError::LetterUnavailable(letter))?;
        let pos = self
            .available
            .iter()
            .position(|&c| c == letter)
            .ok_or(InputError::LetterUnavailable(letter))?;

        if self.expected[slot] != letter {
            self.misses += 1;
            self.next_token += 1;
            let marker = ErrorMarker {
                slot,
                token: MarkerToken(self.next_token),
            };
            self.marker = Some(marker);
            return Ok(LetterOutcome::Missed {
                slot,
                marker: marker.token,
            });
        }

        self.available.remove(pos);
        self.slots[slot] = Slot::Filled { ch: letter };
        if self.marker.is_some_and(|m| m.slot == slot) {
            self.marker = None;
        }

        if self.is_complete() {
            Ok(LetterOutcome::Assembled {
                clean: self.misses == 0,
            })
        } else {
            Ok(LetterOutcome::Placed { slot })
        }
    }

    /// Remove the error marker if `token` is still the current one.
    pub fn clear_error(&mut self, token: MarkerToken) -> bool {
        match self.marker {
            Some(marker) if marker.token == token => {
                self.marker = None;
                true
            }
            _ => false,
        }
    }
}
