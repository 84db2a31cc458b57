//! Answer matching for the free-text stage.

use serde::{Deserialize, Serialize};

/// Result of comparing a typed answer to the target word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextVerdict {
    /// Whether the answer is considered correct.
    pub is_correct: bool,
    /// Normalized typed answer (for display).
    pub typed_normalized: String,
    /// Normalized target (for display).
    pub target_normalized: String,
}

/// Trim-and-case-fold comparison of typed answers.
#[derive(Debug, Clone, Copy, Default)]
pub struct FreeTextValidator;

impl FreeTextValidator {
    /// Compare `raw_input` with `target` ignoring surrounding whitespace and case.
    pub fn submit(&self, raw_input: &str, target: &str) -> TextVerdict {
        let typed_normalized = normalize(raw_input);
        let target_normalized = normalize(target);

        TextVerdict {
            is_correct: typed_normalized == target_normalized,
            typed_normalized,
            target_normalized,
        }
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}
