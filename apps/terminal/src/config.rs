//! Environment configuration for the terminal host.

use drill_core::Timing;
use std::path::PathBuf;

/// Host settings, read from the environment after `.env` is loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub list_dir: PathBuf,
    pub user_id: String,
    pub completions_path: PathBuf,
    pub timing: Timing,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or invalid values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Timing::default();
        let millis = |key: &str, default: u64| match lookup(key) {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(key, value = %raw, "invalid duration, using default");
                default
            }),
            None => default,
        };

        Self {
            list_dir: lookup("DRILL_LIST_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("lists")),
            user_id: lookup("DRILL_USER_ID").unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            completions_path: lookup("DRILL_COMPLETIONS")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("completions.jsonl")),
            timing: Timing {
                answer_feedback_ms: millis(
                    "DRILL_ANSWER_FEEDBACK_MS",
                    defaults.answer_feedback_ms,
                ),
                text_success_ms: millis("DRILL_TEXT_SUCCESS_MS", defaults.text_success_ms),
                stage_transition_ms: millis(
                    "DRILL_STAGE_TRANSITION_MS",
                    defaults.stage_transition_ms,
                ),
                letter_error_ms: millis("DRILL_LETTER_ERROR_MS", defaults.letter_error_ms),
            },
        }
    }
}
