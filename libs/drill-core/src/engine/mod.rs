//! The four-stage drill state machine.
//!
//! A session walks the whole pair list through every [`Stage`] in order.
//! Within a stage a pair is "studied" once answered correctly; the stage ends
//! when every pair is studied. After a correct answer the next pair is drawn
//! from the unstudied ones; after a miss the missed pair is excluded from the
//! draw unless it is the only unstudied pair left.

mod round;
mod transition;

pub use round::Presentation;
pub use transition::{Ticket, Transition, Wait};

use crate::assembly::{LetterAssembly, LetterOutcome, MarkerToken};
use crate::distractor::DistractorSampler;
use crate::error::{InputError, SessionError};
use crate::matching::FreeTextValidator;
use crate::pair_set::PairSet;
use crate::reporter::SessionReporter;
use crate::types::{PairIndex, SessionState, Stage, Timing, WordPair};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::Rng;
use round::{ChoiceRound, Phase, TextRound};
use std::collections::BTreeSet;
use std::time::Duration;
use tokio::task::JoinHandle;
use transition::{Next, Pending};

/// Engine response to one accepted learner action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    /// The pair was evaluated; schedule `transition`.
    Answered { correct: bool, transition: Transition },
    /// A stage-3 letter was placed; more slots remain.
    LetterPlaced { slot: usize },
    /// A stage-3 letter was wrong; clear the marker after `clear_after`.
    LetterMissed {
        slot: usize,
        marker: MarkerToken,
        clear_after: Duration,
    },
}

/// Drill session over one pair list.
pub struct StageEngine<R = StdRng> {
    pairs: PairSet,
    rng: R,
    timing: Timing,
    sampler: DistractorSampler,
    phase: Phase,
    current: PairIndex,
    studied: [BTreeSet<PairIndex>; 4],
    pending: Option<Pending>,
    last_ticket: u64,
    reporter: Option<SessionReporter>,
    report_handle: Option<JoinHandle<()>>,
}

impl<R: Rng> StageEngine<R> {
    /// Start a session at stage 1 on a random pair.
    pub fn start(pairs: PairSet, rng: R) -> Self {
        let mut engine = Self {
            pairs,
            rng,
            timing: Timing::default(),
            sampler: DistractorSampler::default(),
            phase: Phase::Completed,
            current: 0,
            studied: Default::default(),
            pending: None,
            last_ticket: 0,
            reporter: None,
            report_handle: None,
        };

        let first = engine.pick_any();
        engine.enter_stage(Stage::WordChoice, first);
        engine
    }

    /// Start from raw pairs, failing on an empty list.
    pub fn from_pairs(pairs: Vec<WordPair>, rng: R) -> Result<Self, SessionError> {
        Ok(Self::start(PairSet::new(pairs)?, rng))
    }

    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    pub fn with_reporter(mut self, reporter: SessionReporter) -> Self {
        self.reporter = Some(reporter);
        self
    }

    pub fn pairs(&self) -> &PairSet {
        &self.pairs
    }

    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    pub fn active_stage(&self) -> Stage {
        self.phase.stage()
    }

    pub fn current_pair(&self) -> &WordPair {
        &self.pairs[self.current]
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.phase, Phase::Completed)
    }

    /// Transition waiting to be resolved, if any.
    pub fn pending(&self) -> Option<Transition> {
        self.pending.map(|p| p.transition)
    }

    /// Snapshot of the session.
    pub fn state(&self) -> SessionState {
        SessionState {
            active_stage: self.active_stage(),
            current_pair_index: self.current,
            studied_sets: self.studied.clone(),
            completed: self.is_completed(),
        }
    }

    /// What the host should show for the current pair.
    pub fn presentation(&self) -> Presentation<'_> {
        let pair = &self.pairs[self.current];
        let prompt = pair.field(self.active_stage().prompt_field());

        match &self.phase {
            Phase::WordChoice(round) | Phase::TranslationChoice(round) => Presentation::Choice {
                stage: self.active_stage(),
                prompt,
                answers: &round.answers,
                picked: round.picked,
            },
            Phase::LetterAssembly(assembly) => Presentation::Assembly { prompt, assembly },
            Phase::FreeText(round) => Presentation::FreeText {
                prompt,
                revealed: round.revealed.as_deref(),
            },
            Phase::Completed => Presentation::Completed,
        }
    }

    /// Take the handle of the spawned completion report, if one was spawned.
    ///
    /// Hosts that exit right after completion await it so the sink finishes.
    pub fn take_report_handle(&mut self) -> Option<JoinHandle<()>> {
        self.report_handle.take()
    }

    /// Answer a stage-1/2 prompt.
    ///
    /// Text matching one of the offered options picks it; any other non-blank
    /// text counts as a miss with nothing picked.
    pub fn submit_choice(&mut self, answer_text: &str) -> Result<Feedback, InputError> {
        self.ensure_accepting()?;
        let stage = self.active_stage();

        let (Phase::WordChoice(round) | Phase::TranslationChoice(round)) = &mut self.phase else {
            return Err(InputError::NotAccepted { stage });
        };

        let wanted = answer_text.trim();
        if wanted.is_empty() {
            return Err(InputError::EmptyAnswer);
        }
        round.picked = round.answers.iter().position(|a| a.text == wanted);
        let correct = round.picked.is_some_and(|i| round.answers[i].is_correct);

        let transition = self.commit(correct, self.timing.answer_feedback());
        Ok(Feedback::Answered {
            correct,
            transition,
        })
    }

    /// Type one letter in stage 3.
    pub fn submit_letter(&mut self, letter: char) -> Result<Feedback, InputError> {
        self.ensure_accepting()?;
        let stage = self.active_stage();

        let Phase::LetterAssembly(assembly) = &mut self.phase else {
            return Err(InputError::NotAccepted { stage });
        };

        match assembly.submit_letter(letter)? {
            LetterOutcome::Placed { slot } => Ok(Feedback::LetterPlaced { slot }),
            LetterOutcome::Missed { slot, marker } => Ok(Feedback::LetterMissed {
                slot,
                marker,
                clear_after: self.timing.letter_error(),
            }),
            LetterOutcome::Assembled { clean } => {
                let transition = self.commit(clean, self.timing.answer_feedback());
                Ok(Feedback::Answered {
                    correct: clean,
                    transition,
                })
            }
        }
    }

    /// Clear a stage-3 wrong-letter marker; stale tokens are ignored.
    pub fn clear_letter_error(&mut self, token: MarkerToken) -> bool {
        match &mut self.phase {
            Phase::LetterAssembly(assembly) => assembly.clear_error(token),
            _ => false,
        }
    }

    /// Submit a typed answer in stage 4.
    ///
    /// A miss reveals the answer and waits for [`Self::acknowledge_and_advance`].
    pub fn submit_text(&mut self, text: &str) -> Result<Feedback, InputError> {
        self.ensure_accepting()?;
        let stage = self.active_stage();

        let target = self.pairs[self.current].value.clone();
        let Phase::FreeText(round) = &mut self.phase else {
            return Err(InputError::NotAccepted { stage });
        };

        let verdict = FreeTextValidator.submit(text, &target);
        let transition = if verdict.is_correct {
            self.commit(true, self.timing.text_success())
        } else {
            round.revealed = Some(target);
            self.commit_awaiting_acknowledge()
        };

        Ok(Feedback::Answered {
            correct: verdict.is_correct,
            transition,
        })
    }

    /// Resolve a stage-4 miss once the learner has seen the answer.
    pub fn acknowledge_and_advance(&mut self) -> Result<(), InputError> {
        match self.pending {
            Some(pending) if pending.transition.wait == Wait::Acknowledge => {
                self.pending = None;
                self.apply(pending.next);
                Ok(())
            }
            _ if self.is_completed() => Err(InputError::SessionCompleted),
            _ => Err(InputError::NothingToAcknowledge),
        }
    }

    /// Resolve a timed transition. Returns false for stale or unknown tickets.
    pub fn advance(&mut self, ticket: Ticket) -> bool {
        match self.pending {
            Some(pending)
                if pending.transition.ticket == ticket
                    && matches!(pending.transition.wait, Wait::After { .. }) =>
            {
                self.pending = None;
                self.apply(pending.next);
                true
            }
            _ => false,
        }
    }

    fn ensure_accepting(&self) -> Result<(), InputError> {
        if self.is_completed() {
            return Err(InputError::SessionCompleted);
        }
        if self.pending.is_some() {
            return Err(InputError::TransitionPending);
        }
        Ok(())
    }

    /// Record the outcome for the current pair and decide where to go next.
    fn commit(&mut self, correct: bool, delay: Duration) -> Transition {
        let stage = self.active_stage();

        let (next, delay) = if correct {
            let studied = &mut self.studied[stage.index()];
            studied.insert(self.current);

            if studied.len() == self.pairs.len() {
                match stage.next() {
                    Some(next_stage) => {
                        let pair = self.pick_any();
                        (
                            Next::Stage {
                                stage: next_stage,
                                pair,
                            },
                            self.timing.stage_transition(),
                        )
                    }
                    None => (Next::Finish, delay),
                }
            } else {
                (Next::Pair(self.pick_unstudied(None)), delay)
            }
        } else {
            self.studied[stage.index()].remove(&self.current);
            (Next::Pair(self.pick_unstudied(Some(self.current))), delay)
        };

        self.hold(next, Wait::After { delay })
    }

    fn commit_awaiting_acknowledge(&mut self) -> Transition {
        let stage = self.active_stage();
        self.studied[stage.index()].remove(&self.current);
        let next = Next::Pair(self.pick_unstudied(Some(self.current)));
        self.hold(next, Wait::Acknowledge)
    }

    fn hold(&mut self, next: Next, wait: Wait) -> Transition {
        self.last_ticket += 1;
        let transition = Transition {
            ticket: Ticket(self.last_ticket),
            wait,
        };
        self.pending = Some(Pending { transition, next });
        transition
    }

    fn apply(&mut self, next: Next) {
        match next {
            Next::Pair(index) => self.present(self.active_stage(), index),
            Next::Stage { stage, pair } => {
                debug_assert_eq!(
                    self.studied[self.active_stage().index()].len(),
                    self.pairs.len()
                );
                self.enter_stage(stage, pair);
            }
            Next::Finish => self.finish(),
        }
    }

    fn enter_stage(&mut self, stage: Stage, pair: PairIndex) {
        tracing::debug!(stage = stage.number(), pair, "entering stage");
        self.studied[stage.index()].clear();
        self.present(stage, pair);
    }

    /// Build fresh per-pair state; the only place rounds are generated.
    fn present(&mut self, stage: Stage, index: PairIndex) {
        self.current = index;
        let pair = &self.pairs[index];

        self.phase = match stage {
            Stage::WordChoice | Stage::TranslationChoice => {
                let field = stage.answer_field();
                let round = ChoiceRound {
                    answers: self
                        .sampler
                        .answer_set(pair.field(field), field, &self.pairs, &mut self.rng),
                    picked: None,
                };
                if stage == Stage::WordChoice {
                    Phase::WordChoice(round)
                } else {
                    Phase::TranslationChoice(round)
                }
            }
            Stage::LetterAssembly => {
                Phase::LetterAssembly(LetterAssembly::new(&pair.value, &mut self.rng))
            }
            Stage::FreeText => Phase::FreeText(TextRound::default()),
        };
    }

    fn finish(&mut self) {
        self.phase = Phase::Completed;
        tracing::info!(pairs = self.pairs.len(), "drill session completed");

        if let Some(reporter) = &self.reporter {
            self.report_handle = reporter.report(self.pairs.len());
        }
    }

    fn pick_any(&mut self) -> PairIndex {
        self.rng.random_range(0..self.pairs.len())
    }

    /// Uniform draw among unstudied pairs of the active stage.
    ///
    /// `exclude` is honoured only while another unstudied pair exists.
    fn pick_unstudied(&mut self, exclude: Option<PairIndex>) -> PairIndex {
        let studied = &self.studied[self.active_stage().index()];
        let mut candidates: Vec<PairIndex> = (0..self.pairs.len())
            .filter(|i| !studied.contains(i))
            .collect();

        if let Some(excluded) = exclude {
            if candidates.len() > 1 {
                candidates.retain(|&i| i != excluded);
            }
        }

        candidates.choose(&mut self.rng).copied().unwrap_or(self.current)
    }
}

impl<R> std::fmt::Debug for StageEngine<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StageEngine")
            .field("stage", &self.phase.stage())
            .field("current", &self.current)
            .field("studied", &self.studied)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}
