//! # perudo-engine
//!
//! A Perudo (Liar's Dice) game engine for chat-hosted tables.
//!
//! ## Design Principles
//!
//! 1. **N-Player**: 2 to 255 seats (10 by default); seats keep their order for
//!    the whole game and eliminated players are skipped, never removed.
//!
//! 2. **Synchronous Core**: Every command is a short, synchronous state
//!    transition. Rule violations come back as [`ActionError`] values and
//!    leave the game untouched.
//!
//! 3. **Decoupled Output**: The engine never renders anything. It publishes
//!    [`GameEvent`]s and reports outcomes to an injected [`StatsSink`].
//!
//! ## Rules Summary
//!
//! - Aces (1s) are wild unless the round is Palifico.
//! - Opening on aces is only allowed in Palifico.
//! - Dudo: the bidder loses a die if the bid overstated the table, the
//!   challenger otherwise.
//! - Calza: the caller gains a die on an exact count, loses one otherwise.
//! - The loser of a round opens the next; the last player with dice wins.
//!
//! ## Modules
//!
//! - `core`: Faces, players, bids, RNG, configuration
//! - `rules`: Pure bid-ordering and resolution functions
//! - `engine`: The lifecycle state machine
//! - `events`: Event types and listener dispatch
//! - `stats`: Outcome sink trait and an in-memory store
//! - `table`: Table registry, per-table serialization, deferred round start
//!
//! ## Example
//!
//! ```
//! use perudo_engine::{GameEngine, PerudoConfig, UserId, UserRef};
//!
//! let mut game = GameEngine::with_host(UserRef::new(1, "ana"), PerudoConfig::new()).unwrap();
//! game.add_player(UserRef::new(2, "ben")).unwrap();
//! game.start().unwrap();
//!
//! game.place_bid(UserId(1), 2, 5).unwrap();
//! let outcome = game.challenge(UserId(2)).unwrap();
//! println!("{} dice showed five", outcome.resolution.actual_count);
//! ```

pub mod core;
pub mod rules;
pub mod engine;
pub mod events;
pub mod stats;
pub mod table;

// Re-export commonly used types
pub use crate::core::{
    Bid, BidRecord, CalzaPolicy, ConfigError, Dice, DiceRng, DiceRngState, Face, PerudoConfig,
    Player, PlayerTally, Seat, UserId, UserRef,
};

pub use crate::rules::{BidError, RevealedHand};

pub use crate::engine::{
    ActionError, ActionOutcome, Command, FollowUp, GameEngine, GameSnapshot, LegalActions, Phase,
    Resolved, SeatView, SnapshotError, TableView,
};

pub use crate::events::{
    ChallengeResolution, ChannelListener, EventBus, EventListener, EventLog,
    ExactCallResolution, GameEvent, ListenerId, Standing,
};

pub use crate::stats::{NullStats, PlayerRecord, StatsBook, StatsError, StatsSink};

pub use crate::table::{RoundTimer, Table, TableError, TableId, TableRegistry};
