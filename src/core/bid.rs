//! Bids.
//!
//! A bid claims that at least `quantity` dice on the table show `face`
//! (wildcards included outside Palifico). Bids are immutable once placed.

use serde::{Deserialize, Serialize};

use super::face::Face;
use super::player::Seat;

/// The standing claim of the round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bid {
    pub quantity: u32,
    pub face: Face,
    pub bidder: Seat,
}

impl Bid {
    #[must_use]
    pub const fn new(quantity: u32, face: Face, bidder: Seat) -> Self {
        Self {
            quantity,
            face,
            bidder,
        }
    }
}

impl std::fmt::Display for Bid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} x {}", self.quantity, self.face)
    }
}

/// Display-only history entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidRecord {
    pub quantity: u32,
    pub face: Face,
    pub bidder: Seat,
    pub bidder_name: String,
}
