//! Pending transitions between presentations.
//!
//! Every committed answer produces exactly one pending transition. Input is
//! refused until it resolves, which keeps double submissions out without
//! any cancellation plumbing in the host.

use crate::types::{PairIndex, Stage};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Generation number of one pending transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ticket(pub(crate) u64);

/// How the host resolves a pending transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Wait {
    /// Call `advance(ticket)` once the delay has elapsed.
    After { delay: Duration },
    /// Call `acknowledge_and_advance()` on learner request.
    Acknowledge,
}

/// What the host needs to schedule after an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub ticket: Ticket,
    pub wait: Wait,
}

/// Where the session goes once the transition resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Next {
    Pair(PairIndex),
    Stage { stage: Stage, pair: PairIndex },
    Finish,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Pending {
    pub transition: Transition,
    pub next: Next,
}
