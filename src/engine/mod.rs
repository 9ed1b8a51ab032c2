//! The stateful Perudo engine.
//!
//! [`GameEngine`] owns the seats, the lobby/round state machine, bid
//! validation and Dudo/Calza resolution. It publishes [`crate::events::GameEvent`]s
//! and reports outcomes to a [`crate::stats::StatsSink`].

mod command;
mod error;
mod game;
mod snapshot;

pub use command::{ActionOutcome, Command, FollowUp, LegalActions, Resolved};
pub use error::ActionError;
pub use game::{GameEngine, Phase};
pub use snapshot::{GameSnapshot, SeatView, SnapshotError, TableView};
