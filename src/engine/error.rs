//! Recoverable rule violations.
//!
//! Every variant is an expected outcome of user input. The engine leaves its
//! state untouched when it returns one; `Display` is the reason to show the
//! acting user.

use thiserror::Error;

use crate::rules::BidError;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("the game has already started")]
    NotInLobby,
    #[error("you are already seated at this table")]
    AlreadySeated,
    #[error("the table is full ({max} players)")]
    TableFull { max: usize },
    #[error("at least {min} players are needed to start (currently {have})")]
    NotEnoughPlayers { min: usize, have: usize },
    #[error("no game is in progress")]
    NotInProgress,
    #[error("the round is over; wait for the next one")]
    RoundNotOpen,
    #[error("you are not in this game")]
    NotSeated,
    #[error("it is not your turn")]
    NotYourTurn,
    #[error("invalid die face {0} (1-6)")]
    InvalidFace(u8),
    #[error("quantity must be at least 1")]
    InvalidQuantity,
    #[error(transparent)]
    Bid(#[from] BidError),
    #[error("there is no bid to call yet")]
    NoBid,
    #[error("Calza is not allowed during a Palifico round")]
    CalzaForbiddenInPalifico,
    #[error("no round is waiting to start")]
    NoPendingRound,
}
