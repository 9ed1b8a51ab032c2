//! Public views and checkpoints.
//!
//! ## TableView
//!
//! What every player may see: phases, die counts, the standing bid and the
//! recent bids. Hidden dice are never included.
//!
//! ## GameSnapshot
//!
//! Complete state, RNG included, for checkpoint/restore. Encoded with
//! bincode. Listeners and the stats sink are not part of a snapshot; the
//! host re-attaches them after restoring.

use std::sync::Arc;

use im::Vector;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::game::{GameEngine, Phase};
use crate::core::{Bid, BidRecord, DiceRng, DiceRngState, PerudoConfig, Player, Seat, UserRef};
use crate::events::EventBus;
use crate::stats::NullStats;

/// Public information about one seat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatView {
    pub seat: Seat,
    pub user: UserRef,
    pub die_count: u8,
    pub eliminated: bool,
}

/// Public information about the whole table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableView {
    pub phase: Phase,
    pub round: u32,
    pub palifico: bool,
    pub round_open: bool,
    pub turn: Option<Seat>,
    pub current_bid: Option<Bid>,
    pub total_dice: u32,
    pub seats: Vec<SeatView>,
    pub recent_bids: Vector<BidRecord>,
    pub winner: Option<Seat>,
}

/// Snapshot encode/decode failure.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot encoding failed: {0}")]
    Codec(#[from] bincode::Error),
    #[error("snapshot is inconsistent: {0}")]
    Corrupt(&'static str),
}

/// Full engine state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub config: PerudoConfig,
    pub players: Vec<Player>,
    pub phase: Phase,
    pub round: u32,
    pub turn: usize,
    pub current_bid: Option<Bid>,
    pub palifico: bool,
    pub round_open: bool,
    pub recent_bids: Vector<BidRecord>,
    pub winner: Option<Seat>,
    pub rng: DiceRngState,
}

impl GameSnapshot {
    pub fn encode(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, SnapshotError> {
        Ok(bincode::deserialize(bytes)?)
    }

    /// Check that every seat index points at the table and that the phase
    /// agrees with the round state.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        let corrupt = |reason| Err(SnapshotError::Corrupt(reason));

        if self.config.validate().is_err() {
            return corrupt("invalid configuration");
        }
        if self.players.len() > self.config.max_players {
            return corrupt("more players than seats");
        }
        let rolled = self.phase == Phase::InProgress && self.round_open;
        for player in &self.players {
            player
                .validate(self.config.max_dice, rolled)
                .map_err(SnapshotError::Corrupt)?;
        }
        if self.recent_bids.len() > self.config.history_len {
            return corrupt("bid history longer than configured");
        }

        let seated = |seat: Seat| seat.index() < self.players.len();
        if self.current_bid.is_some_and(|bid| !seated(bid.bidder))
            || self.recent_bids.iter().any(|record| !seated(record.bidder))
        {
            return corrupt("bid from a seat outside the table");
        }

        match self.phase {
            Phase::Lobby => {
                if self.round_open || self.current_bid.is_some() || self.winner.is_some() {
                    return corrupt("lobby with round state");
                }
            }
            Phase::InProgress => {
                if self.winner.is_some() {
                    return corrupt("winner while in progress");
                }
                let live = self.players.iter().filter(|p| !p.is_eliminated()).count();
                if live < 2 {
                    return corrupt("in progress with fewer than two live seats");
                }
                match self.players.get(self.turn) {
                    None => return corrupt("turn outside the table"),
                    Some(p) if p.is_eliminated() => return corrupt("turn on an eliminated seat"),
                    Some(_) => {}
                }
            }
            Phase::Finished => {
                if self.round_open {
                    return corrupt("open round after the game ended");
                }
                if let Some(winner) = self.winner {
                    match self.players.get(winner.index()) {
                        None => return corrupt("winner outside the table"),
                        Some(p) if p.is_eliminated() => return corrupt("winner is eliminated"),
                        Some(_) => {}
                    }
                }
            }
        }
        Ok(())
    }
}

impl GameEngine {
    /// Public view of the table.
    #[must_use]
    pub fn view(&self) -> TableView {
        TableView {
            phase: self.phase,
            round: self.round,
            palifico: self.palifico,
            round_open: self.is_round_open(),
            turn: self.current_turn(),
            current_bid: self.current_bid,
            total_dice: self.total_dice(),
            seats: self
                .players
                .iter()
                .enumerate()
                .map(|(i, p)| SeatView {
                    seat: Seat::new(i as u8),
                    user: p.user().clone(),
                    die_count: p.die_count(),
                    eliminated: p.is_eliminated(),
                })
                .collect(),
            recent_bids: self.recent_bids.clone(),
            winner: self.winner,
        }
    }

    /// Capture the complete state.
    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            config: self.config.clone(),
            players: self.players.clone(),
            phase: self.phase,
            round: self.round,
            turn: self.turn,
            current_bid: self.current_bid,
            palifico: self.palifico,
            round_open: self.round_open,
            recent_bids: self.recent_bids.clone(),
            winner: self.winner,
            rng: self.rng.state(),
        }
    }

    /// Rebuild an engine from a snapshot, with no listeners and a null sink.
    ///
    /// The snapshot is checked with [`GameSnapshot::validate`] first.
    pub fn restore(snapshot: GameSnapshot) -> Result<Self, SnapshotError> {
        snapshot.validate()?;

        Ok(Self {
            rng: DiceRng::from_state(&snapshot.rng),
            config: snapshot.config,
            players: snapshot.players,
            phase: snapshot.phase,
            round: snapshot.round,
            turn: snapshot.turn,
            current_bid: snapshot.current_bid,
            palifico: snapshot.palifico,
            round_open: snapshot.round_open,
            recent_bids: snapshot.recent_bids,
            winner: snapshot.winner,
            events: EventBus::new(),
            stats: Arc::new(NullStats),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Face, UserId};

    fn game() -> GameEngine {
        let mut game =
            GameEngine::with_host(UserRef::new(1, "a"), PerudoConfig::new().with_seed(5)).unwrap();
        game.add_player(UserRef::new(2, "b")).unwrap();
        game.start().unwrap();
        game
    }

    #[test]
    fn test_view_hides_dice() {
        let mut game = game();
        game.place_bid(UserId(1), 2, 5).unwrap();
        let view = game.view();

        assert_eq!(view.phase, Phase::InProgress);
        assert_eq!(view.turn, Some(Seat::new(1)));
        assert_eq!(view.total_dice, 10);
        assert_eq!(view.seats.len(), 2);
        assert_eq!(view.recent_bids.len(), 1);

        let json = serde_json::to_string(&view).unwrap();
        assert!(!json.contains("\"dice\""));
    }

    #[test]
    fn test_snapshot_roundtrip_continues_identically() {
        let mut original = game();
        original.place_bid(UserId(1), 2, 5).unwrap();

        let bytes = original.snapshot().encode().unwrap();
        let mut restored = GameEngine::restore(GameSnapshot::decode(&bytes).unwrap()).unwrap();

        assert_eq!(restored.snapshot(), original.snapshot());

        // Same RNG position: the next round rolls the same dice
        original.challenge(UserId(2)).unwrap();
        restored.challenge(UserId(2)).unwrap();
        original.start_next_round().unwrap();
        restored.start_next_round().unwrap();
        assert_eq!(original.players(), restored.players());
    }

    #[test]
    fn test_restore_rejects_bad_turn() {
        let mut snapshot = game().snapshot();
        snapshot.turn = 9;
        assert!(matches!(
            GameEngine::restore(snapshot),
            Err(SnapshotError::Corrupt(_))
        ));
    }

    fn rejected(snapshot: GameSnapshot) -> &'static str {
        match GameEngine::restore(snapshot) {
            Err(SnapshotError::Corrupt(reason)) => reason,
            other => panic!("expected a corrupt snapshot, got {other:?}"),
        }
    }

    #[test]
    fn test_restore_rejects_bid_from_unknown_seat() {
        let mut snapshot = game().snapshot();
        snapshot.current_bid = Some(Bid::new(9, Face::SIX, Seat::new(7)));
        assert_eq!(rejected(snapshot), "bid from a seat outside the table");

        let mut game = game();
        game.place_bid(UserId(1), 2, 5).unwrap();
        let mut snapshot = game.snapshot();
        snapshot.recent_bids[0].bidder = Seat::new(2);
        assert_eq!(rejected(snapshot), "bid from a seat outside the table");
    }

    #[test]
    fn test_restore_rejects_bad_winner() {
        let mut snapshot = game().snapshot();
        snapshot.phase = Phase::Finished;
        snapshot.round_open = false;
        snapshot.winner = Some(Seat::new(5));
        assert_eq!(rejected(snapshot.clone()), "winner outside the table");

        snapshot.winner = None;
        snapshot.round_open = true;
        assert_eq!(rejected(snapshot), "open round after the game ended");

        let mut snapshot = game().snapshot();
        snapshot.winner = Some(Seat::new(0));
        assert_eq!(rejected(snapshot), "winner while in progress");
    }

    #[test]
    fn test_restore_rejects_inconsistent_dice() {
        let mut rigged = game();
        rigged.rig_dice(Seat::new(0), &[Face::TWO; 6]);
        assert_eq!(
            rejected(rigged.snapshot()),
            "seat holds more dice than the table allows"
        );

        let mut snapshot = game().snapshot();
        snapshot.players[1].lose_die();
        assert_eq!(rejected(snapshot), "hand size disagrees with the die count");
    }

    #[test]
    fn test_restore_rejects_round_state_in_lobby() {
        let mut snapshot = game().snapshot();
        snapshot.phase = Phase::Lobby;
        assert_eq!(rejected(snapshot), "lobby with round state");
    }

    #[test]
    fn test_restore_rejects_single_live_seat() {
        let mut game = game();
        game.rig_dice(Seat::new(1), &[]);
        assert_eq!(
            rejected(game.snapshot()),
            "in progress with fewer than two live seats"
        );
    }

    #[test]
    fn test_restore_between_rounds() {
        let mut game = game();
        game.rig_dice(Seat::new(0), &[Face::TWO, Face::THREE]);
        game.rig_dice(Seat::new(1), &[Face::FOUR, Face::FIVE]);
        game.place_bid(UserId(1), 3, 6).unwrap();
        game.challenge(UserId(2)).unwrap();
        assert!(game.is_round_pending());

        // The loser's hand still shows the counted dice
        let snapshot = game.snapshot();
        assert_eq!(snapshot.players[0].dice().len(), 2);
        assert_eq!(snapshot.players[0].die_count(), 1);

        let mut restored = GameEngine::restore(snapshot).unwrap();
        assert_eq!(restored.start_next_round(), Ok(2));
        assert_eq!(restored.current_turn(), Some(Seat::new(0)));
    }

    #[test]
    fn test_decode_garbage() {
        assert!(matches!(
            GameSnapshot::decode(&[1, 2, 3]),
            Err(SnapshotError::Codec(_))
        ));
    }
}
