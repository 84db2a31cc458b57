//! Line-oriented session loop.
//!
//! Reads one line per learner action and sleeps through the engine's
//! transition delays before resolving them.

use crate::render;
use drill_core::{Feedback, Presentation, Stage, StageEngine, Wait};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tokio::time::sleep;

/// Typed at any prompt to leave the session.
pub const QUIT: &str = ":q";

/// How a driven session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Completed,
    Abandoned,
}

/// Drive `engine` from `input` until it completes or the learner leaves.
pub async fn drive<I, W>(
    engine: &mut StageEngine,
    input: I,
    out: &mut W,
) -> anyhow::Result<SessionEnd>
where
    I: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    let total = engine.pairs().len();

    while !engine.is_completed() {
        writeln!(out, "{}", render::header(&engine.state(), total))?;
        write!(out, "{}", render::body(&engine.presentation()))?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            return Ok(SessionEnd::Abandoned);
        };
        let line = line.trim();
        if line == QUIT {
            return Ok(SessionEnd::Abandoned);
        }

        let feedback = match engine.active_stage() {
            Stage::WordChoice | Stage::TranslationChoice => choose(engine, line, out)?,
            Stage::LetterAssembly => type_letters(engine, line, out).await?,
            Stage::FreeText => reject(engine.submit_text(line), out)?,
        };

        if let Some(feedback) = feedback {
            if !settle(engine, feedback, &mut lines, out).await? {
                return Ok(SessionEnd::Abandoned);
            }
        }
    }

    writeln!(out, "{}", render::body(&engine.presentation()))?;
    Ok(SessionEnd::Completed)
}

/// Accept either an option number or the option text; anything else is a miss.
fn choose<W: Write>(
    engine: &mut StageEngine,
    line: &str,
    out: &mut W,
) -> anyhow::Result<Option<Feedback>> {
    let text = match (engine.presentation(), line.parse::<usize>()) {
        (Presentation::Choice { answers, .. }, Ok(n)) if (1..=answers.len()).contains(&n) => {
            answers[n - 1].text.clone()
        }
        _ => line.to_string(),
    };
    reject(engine.submit_choice(&text), out)
}

/// Feed each non-separator character as one keystroke.
async fn type_letters<W: Write>(
    engine: &mut StageEngine,
    line: &str,
    out: &mut W,
) -> anyhow::Result<Option<Feedback>> {
    for letter in line.chars().filter(|c| !c.is_whitespace() && *c != '-') {
        match reject(engine.submit_letter(letter), out)? {
            Some(Feedback::LetterMissed {
                slot,
                marker,
                clear_after,
            }) => {
                writeln!(out, "  ✗ '{letter}' does not go in position {}", slot + 1)?;
                sleep(clear_after).await;
                engine.clear_letter_error(marker);
            }
            Some(answered @ Feedback::Answered { .. }) => return Ok(Some(answered)),
            Some(Feedback::LetterPlaced { .. }) | None => {}
        }
    }
    Ok(None)
}

/// Show refused input as a soft signal; it never ends the session.
fn reject<W: Write>(
    result: Result<Feedback, drill_core::InputError>,
    out: &mut W,
) -> anyhow::Result<Option<Feedback>> {
    match result {
        Ok(feedback) => Ok(Some(feedback)),
        Err(e) => {
            writeln!(out, "  ({e})")?;
            Ok(None)
        }
    }
}

/// Report the verdict and resolve its transition. Returns false if the learner quit.
async fn settle<R, W>(
    engine: &mut StageEngine,
    feedback: Feedback,
    lines: &mut Lines<R>,
    out: &mut W,
) -> anyhow::Result<bool>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let Feedback::Answered { correct, transition } = feedback else {
        return Ok(true);
    };

    if correct {
        writeln!(out, "  ✓ correct")?;
    } else {
        let field = engine.active_stage().answer_field();
        writeln!(out, "  ✗ {}", engine.current_pair().field(field))?;
    }

    match transition.wait {
        Wait::After { delay } => {
            sleep(delay).await;
            engine.advance(transition.ticket);
        }
        Wait::Acknowledge => {
            write!(out, "  press Enter to continue ")?;
            out.flush()?;
            match lines.next_line().await? {
                Some(line) if line.trim() == QUIT => return Ok(false),
                Some(_) => engine.acknowledge_and_advance()?,
                None => return Ok(false),
            }
        }
    }

    Ok(true)
}
