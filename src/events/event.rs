//! Game event types.
//!
//! Events describe what happened; they never drive the engine. Renderers
//! and loggers consume them after each accepted command.

use serde::{Deserialize, Serialize};

use crate::core::{Bid, Face, PlayerTally, Seat, UserRef};
use crate::rules::RevealedHand;

/// Outcome of a Dudo.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeResolution {
    pub challenger: Seat,
    pub bidder: Seat,
    pub bid: Bid,
    pub actual_count: u32,
    /// True when the bidder over-claimed.
    pub success: bool,
    pub loser: Seat,
    pub eliminated: bool,
    pub revealed: Vec<RevealedHand>,
}

/// Outcome of a Calza.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExactCallResolution {
    pub caller: Seat,
    pub bid: Bid,
    pub actual_count: u32,
    pub success: bool,
    pub eliminated: bool,
    pub revealed: Vec<RevealedHand>,
}

/// Final line for one player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub seat: Seat,
    pub user: UserRef,
    pub winner: bool,
    pub dice_left: u8,
    pub tally: PlayerTally,
}

/// Everything the engine reports.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    PlayerJoined {
        seat: Seat,
        user: UserRef,
    },
    RoundStarted {
        round: u32,
        palifico: bool,
        opener: Seat,
        opener_user: UserRef,
    },
    BidPlaced {
        seat: Seat,
        user: UserRef,
        quantity: u32,
        face: Face,
    },
    TurnAdvanced {
        seat: Seat,
        user: UserRef,
    },
    ChallengeResolved(ChallengeResolution),
    ExactCallResolved(ExactCallResolution),
    GameEnded {
        winner: Option<Seat>,
        standings: Vec<Standing>,
    },
}

impl GameEvent {
    /// Short stable name, for logs and metrics labels.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            GameEvent::PlayerJoined { .. } => "player_joined",
            GameEvent::RoundStarted { .. } => "round_started",
            GameEvent::BidPlaced { .. } => "bid_placed",
            GameEvent::TurnAdvanced { .. } => "turn_advanced",
            GameEvent::ChallengeResolved(_) => "challenge_resolved",
            GameEvent::ExactCallResolved(_) => "exact_call_resolved",
            GameEvent::GameEnded { .. } => "game_ended",
        }
    }
}
