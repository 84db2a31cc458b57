//! Plain-text rendering of engine presentations.

use drill_core::{Bucket, Presentation, SessionState, Slot, Stage, StatsPeriod};
use std::fmt::Write;

fn stage_title(stage: Stage) -> &'static str {
    match stage {
        Stage::WordChoice => "Pick the word",
        Stage::TranslationChoice => "Pick the translation",
        Stage::LetterAssembly => "Assemble the word",
        Stage::FreeText => "Type the word",
    }
}

/// Header line with stage number and progress within the stage.
pub fn header(state: &SessionState, total: usize) -> String {
    let stage = state.active_stage;
    format!(
        "[stage {}/4] {} ({}/{})",
        stage.number(),
        stage_title(stage),
        state.studied(stage).len(),
        total
    )
}

/// Body for the current pair, ending with an input hint.
pub fn body(presentation: &Presentation<'_>) -> String {
    let mut out = String::new();

    match presentation {
        Presentation::Choice {
            prompt, answers, ..
        } => {
            let _ = writeln!(out, "  {prompt}");
            for (i, answer) in answers.iter().enumerate() {
                let _ = writeln!(out, "    {}) {}", i + 1, answer.text);
            }
            out.push_str("> number or answer: ");
        }
        Presentation::Assembly { prompt, assembly } => {
            let _ = writeln!(out, "  {prompt}");
            let marked = assembly.error_marker().map(|m| m.slot);
            let _ = writeln!(out, "    {}", slots(assembly.slots(), marked));
            let letters: Vec<String> = assembly.available().iter().map(char::to_string).collect();
            let _ = writeln!(out, "    letters: {}", letters.join(" "));
            out.push_str("> letters: ");
        }
        Presentation::FreeText { prompt, revealed } => {
            let _ = writeln!(out, "  {prompt}");
            if let Some(answer) = revealed {
                let _ = writeln!(out, "    answer: {answer}");
            }
            out.push_str("> word: ");
        }
        Presentation::Completed => out.push_str("All stages complete.\n"),
    }

    out
}

/// Widest bar in the stats chart.
const BAR_WIDTH: usize = 40;

/// Words-studied chart, one row per bucket, bars scaled to the busiest one.
pub fn stats(buckets: &[Bucket], period: StatsPeriod) -> String {
    let max = buckets.iter().map(|b| b.words).max().unwrap_or(0).max(1);
    let mut out = String::new();

    for bucket in buckets {
        let label = match period {
            StatsPeriod::Month => bucket.start.format("%d.%m").to_string(),
            StatsPeriod::Year => bucket.start.format("%b %Y").to_string(),
        };
        let bar = "#".repeat(bucket.words * BAR_WIDTH / max);
        let _ = writeln!(out, "{label:>8} {:>4} {bar}", bucket.words);
    }

    let total: usize = buckets.iter().map(|b| b.words).sum();
    let _ = writeln!(out, "{:>8} {total:>4}", "total");
    out
}

/// Slot row; the marked slot is shown as `!`.
fn slots(slots: &[Slot], marked: Option<usize>) -> String {
    slots
        .iter()
        .enumerate()
        .map(|(i, slot)| match slot {
            _ if Some(i) == marked => '!',
            Slot::Separator { ch } | Slot::Filled { ch } => *ch,
            Slot::Empty => '_',
        })
        .collect()
}
