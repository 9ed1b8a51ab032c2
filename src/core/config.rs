//! Table configuration.
//!
//! Hosts configure a game at creation by providing a `PerudoConfig`:
//! - Dice per player and seat limits
//! - Bid-history length kept for display
//! - Delay before the next round opens after a resolution
//! - House rule for Calza during Palifico rounds
//! - Optional RNG seed (for replays and tests)

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Whether a Calza may be called during a Palifico round.
///
/// Table conventions differ; the default forbids it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalzaPolicy {
    /// Calza is always permitted.
    Allowed,
    /// Calza is rejected while Palifico is active.
    #[default]
    ForbiddenInPalifico,
}

/// Invalid configuration.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("players start with at least one die")]
    NoDice,
    #[error("a game needs at least two players (got minimum {0})")]
    MinPlayersTooLow(usize),
    #[error("minimum players ({min}) exceeds maximum players ({max})")]
    MinAboveMax { min: usize, max: usize },
    #[error("at most 255 seats are supported (got {0})")]
    TooManySeats(usize),
    #[error("bid history must keep at least one entry")]
    EmptyHistory,
}

/// Complete game configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerudoConfig {
    /// Dice each player starts with; also the cap for Calza rewards.
    pub max_dice: u8,

    /// Players needed before the game can start.
    pub min_players: usize,

    /// Seats available in the lobby.
    pub max_players: usize,

    /// Number of recent bids kept for display.
    pub history_len: usize,

    /// Pause between a resolution and the next round.
    pub round_delay: Duration,

    /// Calza house rule under Palifico.
    pub calza_policy: CalzaPolicy,

    /// Fixed RNG seed. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for PerudoConfig {
    fn default() -> Self {
        Self {
            max_dice: 5,
            min_players: 2,
            max_players: 10,
            history_len: 5,
            round_delay: Duration::from_secs(5),
            calza_policy: CalzaPolicy::default(),
            seed: None,
        }
    }
}

impl PerudoConfig {
    /// Create the standard configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_dice(mut self, dice: u8) -> Self {
        self.max_dice = dice;
        self
    }

    #[must_use]
    pub fn with_player_limits(mut self, min: usize, max: usize) -> Self {
        self.min_players = min;
        self.max_players = max;
        self
    }

    #[must_use]
    pub fn with_history_len(mut self, len: usize) -> Self {
        self.history_len = len;
        self
    }

    #[must_use]
    pub fn with_round_delay(mut self, delay: Duration) -> Self {
        self.round_delay = delay;
        self
    }

    #[must_use]
    pub fn with_calza_policy(mut self, policy: CalzaPolicy) -> Self {
        self.calza_policy = policy;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check the configuration is playable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_dice == 0 {
            return Err(ConfigError::NoDice);
        }
        if self.min_players < 2 {
            return Err(ConfigError::MinPlayersTooLow(self.min_players));
        }
        if self.min_players > self.max_players {
            return Err(ConfigError::MinAboveMax {
                min: self.min_players,
                max: self.max_players,
            });
        }
        if self.max_players > 255 {
            return Err(ConfigError::TooManySeats(self.max_players));
        }
        if self.history_len == 0 {
            return Err(ConfigError::EmptyHistory);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PerudoConfig::default();
        assert_eq!(config.max_dice, 5);
        assert_eq!(config.min_players, 2);
        assert_eq!(config.max_players, 10);
        assert_eq!(config.history_len, 5);
        assert_eq!(config.round_delay, Duration::from_secs(5));
        assert_eq!(config.calza_policy, CalzaPolicy::ForbiddenInPalifico);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = PerudoConfig::new()
            .with_max_dice(3)
            .with_player_limits(3, 6)
            .with_calza_policy(CalzaPolicy::Allowed)
            .with_seed(7);

        assert_eq!(config.max_dice, 3);
        assert_eq!((config.min_players, config.max_players), (3, 6));
        assert_eq!(config.calza_policy, CalzaPolicy::Allowed);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_validate() {
        assert_eq!(
            PerudoConfig::new().with_max_dice(0).validate(),
            Err(ConfigError::NoDice)
        );
        assert_eq!(
            PerudoConfig::new().with_player_limits(1, 4).validate(),
            Err(ConfigError::MinPlayersTooLow(1))
        );
        assert_eq!(
            PerudoConfig::new().with_player_limits(5, 4).validate(),
            Err(ConfigError::MinAboveMax { min: 5, max: 4 })
        );
        assert_eq!(
            PerudoConfig::new().with_player_limits(2, 300).validate(),
            Err(ConfigError::TooManySeats(300))
        );
        assert_eq!(
            PerudoConfig::new().with_history_len(0).validate(),
            Err(ConfigError::EmptyHistory)
        );
    }

    #[test]
    fn test_serde() {
        let config = PerudoConfig::new().with_seed(3);
        let json = serde_json::to_string(&config).unwrap();
        let back: PerudoConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
