//! Commands the host forwards to the engine, and what they produce.

use serde::{Deserialize, Serialize};

use crate::core::{Seat, UserId, UserRef};
use crate::events::{ChallengeResolution, ExactCallResolution};

/// A state-changing request from a user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Join(UserRef),
    Start,
    Bid {
        user: UserId,
        quantity: u32,
        face: u8,
    },
    /// Dudo: the standing bid is a bluff.
    Challenge { user: UserId },
    /// Calza: the standing bid is exact.
    ExactCall { user: UserId },
}

/// What happens after a resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FollowUp {
    /// Another round is due; the host schedules it.
    NextRound,
    /// The game is over.
    GameOver { winner: Option<Seat> },
}

/// A resolution together with its follow-up.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolved<T> {
    pub resolution: T,
    pub follow_up: FollowUp,
}

/// Result of an accepted command.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionOutcome {
    Joined(Seat),
    Started,
    BidPlaced,
    Challenged(Resolved<ChallengeResolution>),
    ExactCalled(Resolved<ExactCallResolution>),
}

impl ActionOutcome {
    /// The follow-up, for resolutions.
    #[must_use]
    pub fn follow_up(&self) -> Option<FollowUp> {
        match self {
            ActionOutcome::Challenged(r) => Some(r.follow_up),
            ActionOutcome::ExactCalled(r) => Some(r.follow_up),
            _ => None,
        }
    }

    /// Whether the host should schedule the next round.
    #[must_use]
    pub fn needs_next_round(&self) -> bool {
        self.follow_up() == Some(FollowUp::NextRound)
    }
}

/// Which calls the acting player may make right now.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalActions {
    pub bid: bool,
    pub challenge: bool,
    pub exact_call: bool,
}

impl LegalActions {
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn any(&self) -> bool {
        self.bid || self.challenge || self.exact_call
    }
}
