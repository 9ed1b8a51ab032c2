//! Challenge resolution: counting the table and deciding Dudo / Calza.

use serde::{Deserialize, Serialize};

use crate::core::{Bid, Face, Player, Seat, UserRef};

/// One player's dice, revealed at resolution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealedHand {
    pub seat: Seat,
    pub user: UserRef,
    pub dice: Vec<Face>,
}

/// Count dice showing `face` across all live players.
///
/// Aces count toward any face unless `palifico`.
#[must_use]
pub fn count_matching<'a>(
    players: impl IntoIterator<Item = &'a Player>,
    face: Face,
    palifico: bool,
) -> u32 {
    players
        .into_iter()
        .filter(|p| !p.is_eliminated())
        .map(|p| p.count_matching(face, !palifico) as u32)
        .sum()
}

/// Reveal every live player's hand, in seat order.
#[must_use]
pub fn reveal(players: &[Player]) -> Vec<RevealedHand> {
    players
        .iter()
        .enumerate()
        .filter(|(_, p)| !p.is_eliminated())
        .map(|(i, p)| RevealedHand {
            seat: Seat::new(i as u8),
            user: p.user().clone(),
            dice: p.dice().to_vec(),
        })
        .collect()
}

/// A Dudo succeeds when the bidder over-claimed.
#[must_use]
pub fn dudo_succeeds(actual: u32, bid: &Bid) -> bool {
    actual < bid.quantity
}

/// A Calza succeeds only on an exact count.
#[must_use]
pub fn calza_succeeds(actual: u32, bid: &Bid) -> bool {
    actual == bid.quantity
}
