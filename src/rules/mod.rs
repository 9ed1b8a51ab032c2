//! Pure rule functions.
//!
//! Nothing here mutates a game: the engine asks these functions whether a bid
//! is legal and what a resolution reveals, then applies the consequences.

pub mod bidding;
pub mod resolution;

pub use bidding::{check_opening, check_raise, is_raise, minimum_raise, BidError};
pub use resolution::{calza_succeeds, count_matching, dudo_succeeds, reveal, RevealedHand};
