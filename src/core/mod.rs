//! Core types: faces, players, bids, RNG, configuration.
//!
//! These are the leaf building blocks. They carry no turn logic;
//! the engine drives them.

pub mod face;
pub mod player;
pub mod bid;
pub mod rng;
pub mod config;

pub use face::Face;
pub use player::{Dice, Player, PlayerTally, Seat, UserId, UserRef};
pub use bid::{Bid, BidRecord};
pub use rng::{DiceRng, DiceRngState};
pub use config::{CalzaPolicy, ConfigError, PerudoConfig};
