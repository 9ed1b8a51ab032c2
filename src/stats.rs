//! Long-term player statistics.
//!
//! The engine reports outcomes through a [`StatsSink`]; where they end up is
//! the host's business. Calls are fire-and-forget: a failing sink is logged
//! by the engine and never blocks the game.
//!
//! [`StatsBook`] is an in-memory sink with a leaderboard, suitable for a
//! single process or as a write-through cache in front of a real store.

use std::sync::{Mutex, PoisonError};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::UserId;

/// Sink failure.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StatsError {
    #[error("stats store unavailable: {0}")]
    Unavailable(String),
}

/// Destination for per-player outcome increments.
pub trait StatsSink: Send + Sync {
    /// The player lost a die in a resolution.
    fn record_round_loss(&self, player: UserId) -> Result<(), StatsError>;

    /// The player called Dudo; `success` when the bid was a bluff.
    fn record_bluff_outcome(&self, player: UserId, success: bool) -> Result<(), StatsError>;

    /// The player called Calza.
    fn record_calza_outcome(&self, player: UserId, success: bool) -> Result<(), StatsError>;

    /// Final result, once per player per game.
    fn record_game_result(
        &self,
        player: UserId,
        display_name: &str,
        is_winner: bool,
    ) -> Result<(), StatsError>;
}

/// Discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullStats;

impl StatsSink for NullStats {
    fn record_round_loss(&self, _player: UserId) -> Result<(), StatsError> {
        Ok(())
    }

    fn record_bluff_outcome(&self, _player: UserId, _success: bool) -> Result<(), StatsError> {
        Ok(())
    }

    fn record_calza_outcome(&self, _player: UserId, _success: bool) -> Result<(), StatsError> {
        Ok(())
    }

    fn record_game_result(
        &self,
        _player: UserId,
        _name: &str,
        _winner: bool,
    ) -> Result<(), StatsError> {
        Ok(())
    }
}

/// Lifetime record for one user.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: UserId,
    pub name: String,
    pub wins: u32,
    pub games_played: u32,
    pub dice_lost: u32,
    pub bluffs_called_success: u32,
    pub bluffs_called_fail: u32,
    pub calzas_success: u32,
    pub calzas_fail: u32,
}

impl PlayerRecord {
    fn new(id: UserId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }
}

/// In-memory, thread-safe stats store.
#[derive(Debug, Default)]
pub struct StatsBook {
    records: Mutex<FxHashMap<UserId, PlayerRecord>>,
}

impl StatsBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn update(&self, player: UserId, f: impl FnOnce(&mut PlayerRecord)) {
        let mut records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        f(records
            .entry(player)
            .or_insert_with(|| PlayerRecord::new(player)));
    }

    /// Record for one user, if any outcome was ever recorded.
    #[must_use]
    pub fn record(&self, player: UserId) -> Option<PlayerRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&player)
            .cloned()
    }

    /// Top `limit` players by wins (descending), ties broken by fewer games played.
    #[must_use]
    pub fn leaderboard(&self, limit: usize) -> Vec<PlayerRecord> {
        let records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        let mut rows: Vec<PlayerRecord> = records
            .values()
            .filter(|r| r.games_played > 0)
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            b.wins
                .cmp(&a.wins)
                .then(a.games_played.cmp(&b.games_played))
                .then(a.id.cmp(&b.id))
        });
        rows.truncate(limit);
        rows
    }
}

impl StatsSink for StatsBook {
    fn record_round_loss(&self, player: UserId) -> Result<(), StatsError> {
        self.update(player, |r| r.dice_lost += 1);
        Ok(())
    }

    fn record_bluff_outcome(&self, player: UserId, success: bool) -> Result<(), StatsError> {
        self.update(player, |r| {
            if success {
                r.bluffs_called_success += 1;
            } else {
                r.bluffs_called_fail += 1;
            }
        });
        Ok(())
    }

    fn record_calza_outcome(&self, player: UserId, success: bool) -> Result<(), StatsError> {
        self.update(player, |r| {
            if success {
                r.calzas_success += 1;
            } else {
                r.calzas_fail += 1;
            }
        });
        Ok(())
    }

    fn record_game_result(
        &self,
        player: UserId,
        display_name: &str,
        is_winner: bool,
    ) -> Result<(), StatsError> {
        self.update(player, |r| {
            r.name = display_name.to_string();
            r.games_played += 1;
            if is_winner {
                r.wins += 1;
            }
        });
        Ok(())
    }
}
