//! Bid legality.
//!
//! Given the standing bid `(q0, f0)`, a candidate `(q1, f1)` is a raise when:
//!
//! | Case | Legal iff |
//! |---|---|
//! | same face | `q1 > q0` |
//! | to aces (`f1 = 1`, `f0 != 1`) | `q1 >= ceil(q0 / 2)` |
//! | from aces (`f0 = 1`, `f1 != 1`) | `q1 >= 2 * q0 + 1` |
//! | other faces | `q1 > q0`, or `q1 == q0` and `f1 > f0` |
//!
//! Under Palifico the face is locked to the opening face and only the
//! quantity may rise. Every case reduces to a minimum quantity for the
//! candidate face, which is what [`minimum_raise`] computes.

use thiserror::Error;

use crate::core::{Bid, Face};

/// Why a bid was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum BidError {
    #[error("the opening bid cannot be on aces outside a Palifico round")]
    WildOpening,
    #[error("bid must beat {quantity} x {face}: at least {minimum} x {attempted} is required")]
    TooLow {
        quantity: u32,
        face: Face,
        attempted: Face,
        minimum: u32,
    },
    #[error("no quantity of {attempted} can beat {quantity} x {face}")]
    Unbeatable {
        quantity: u32,
        face: Face,
        attempted: Face,
    },
    #[error("Palifico round: every bid must stay on {locked}")]
    FaceLocked { locked: Face },
}

/// Check an opening bid (no standing bid this round).
pub fn check_opening(face: Face, palifico: bool) -> Result<(), BidError> {
    if face.is_wild() && !palifico {
        return Err(BidError::WildOpening);
    }
    Ok(())
}

/// Smallest quantity on `face` that beats `previous`.
///
/// Returns `None` when no quantity on that face is legal: a face change
/// under Palifico, or a minimum that would not fit in a `u32`.
///
/// ```
/// use perudo_engine::core::{Bid, Face, Seat};
/// use perudo_engine::rules::minimum_raise;
///
/// let standing = Bid::new(3, Face::FOUR, Seat::new(0));
/// assert_eq!(minimum_raise(&standing, Face::FIVE, false), Some(3));
/// assert_eq!(minimum_raise(&standing, Face::TWO, false), Some(4));
/// assert_eq!(minimum_raise(&standing, Face::ACE, false), Some(2));
/// ```
#[must_use]
pub fn minimum_raise(previous: &Bid, face: Face, palifico: bool) -> Option<u32> {
    let q0 = previous.quantity;
    let f0 = previous.face;

    if palifico {
        return if face == f0 { q0.checked_add(1) } else { None };
    }

    match (f0.is_wild(), face.is_wild()) {
        _ if face == f0 => q0.checked_add(1),
        (false, true) => Some(q0.div_ceil(2)),
        (true, false) => q0.checked_mul(2).and_then(|q| q.checked_add(1)),
        _ if face > f0 => Some(q0),
        _ => q0.checked_add(1),
    }
}

/// Check `quantity x face` against the standing bid.
pub fn check_raise(
    previous: &Bid,
    quantity: u32,
    face: Face,
    palifico: bool,
) -> Result<(), BidError> {
    match minimum_raise(previous, face, palifico) {
        None if palifico && face != previous.face => Err(BidError::FaceLocked {
            locked: previous.face,
        }),
        None => Err(BidError::Unbeatable {
            quantity: previous.quantity,
            face: previous.face,
            attempted: face,
        }),
        Some(minimum) if quantity < minimum => Err(BidError::TooLow {
            quantity: previous.quantity,
            face: previous.face,
            attempted: face,
            minimum,
        }),
        Some(_) => Ok(()),
    }
}

/// Whether `quantity x face` is a legal raise over `previous`.
#[must_use]
pub fn is_raise(previous: &Bid, quantity: u32, face: Face, palifico: bool) -> bool {
    check_raise(previous, quantity, face, palifico).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Seat;

    fn bid(quantity: u32, face: u8) -> Bid {
        Bid::new(quantity, Face::new(face).unwrap(), Seat::new(0))
    }

    fn f(v: u8) -> Face {
        Face::new(v).unwrap()
    }

    #[test]
    fn test_same_face_needs_more() {
        assert!(!is_raise(&bid(3, 4), 3, f(4), false));
        assert!(is_raise(&bid(3, 4), 4, f(4), false));
        assert!(is_raise(&bid(2, 1), 3, f(1), false));
        assert!(!is_raise(&bid(2, 1), 2, f(1), false));
    }

    #[test]
    fn test_switch_to_aces() {
        // ceil(3 / 2) = 2
        assert!(!is_raise(&bid(3, 4), 1, f(1), false));
        assert!(is_raise(&bid(3, 4), 2, f(1), false));
        assert!(is_raise(&bid(3, 4), 3, f(1), false));

        // ceil(4 / 2) = 2
        assert!(is_raise(&bid(4, 6), 2, f(1), false));
        assert!(!is_raise(&bid(5, 6), 2, f(1), false));
    }

    #[test]
    fn test_switch_from_aces() {
        assert!(!is_raise(&bid(2, 1), 4, f(3), false));
        assert!(is_raise(&bid(2, 1), 5, f(3), false));
        assert!(is_raise(&bid(1, 1), 3, f(6), false));
    }

    #[test]
    fn test_other_faces() {
        assert!(is_raise(&bid(3, 4), 3, f(5), false));
        assert!(!is_raise(&bid(3, 4), 3, f(2), false));
        assert!(is_raise(&bid(3, 4), 4, f(2), false));
        assert!(!is_raise(&bid(3, 6), 2, f(6), false));
    }

    #[test]
    fn test_palifico_locks_face() {
        assert_eq!(
            check_raise(&bid(2, 3), 5, f(4), true),
            Err(BidError::FaceLocked { locked: f(3) })
        );
        assert!(is_raise(&bid(2, 3), 3, f(3), true));
        assert!(!is_raise(&bid(2, 3), 2, f(3), true));

        // Aces lose their special ratio under Palifico
        assert!(!is_raise(&bid(4, 3), 2, f(1), true));
        assert!(is_raise(&bid(1, 1), 2, f(1), true));
    }

    #[test]
    fn test_opening() {
        assert_eq!(check_opening(f(1), false), Err(BidError::WildOpening));
        assert!(check_opening(f(1), true).is_ok());
        assert!(check_opening(f(2), false).is_ok());
    }

    #[test]
    fn test_minimum_at_quantity_limit() {
        assert_eq!(minimum_raise(&bid(u32::MAX, 3), f(3), false), None);
        assert_eq!(minimum_raise(&bid(u32::MAX, 3), f(2), false), None);
        assert_eq!(minimum_raise(&bid(u32::MAX, 3), f(4), false), Some(u32::MAX));
        assert_eq!(
            minimum_raise(&bid(u32::MAX, 3), f(1), false),
            Some(u32::MAX / 2 + 1)
        );
        assert_eq!(minimum_raise(&bid(u32::MAX, 3), f(3), true), None);

        // 2 * 3e9 + 1 does not fit
        assert_eq!(minimum_raise(&bid(3_000_000_000, 1), f(3), false), None);
        assert_eq!(
            minimum_raise(&bid(u32::MAX / 2, 1), f(3), false),
            Some(u32::MAX)
        );
    }

    #[test]
    fn test_unbeatable_bid_is_refused() {
        assert_eq!(
            check_raise(&bid(3_000_000_000, 1), u32::MAX, f(3), false),
            Err(BidError::Unbeatable {
                quantity: 3_000_000_000,
                face: f(1),
                attempted: f(3),
            })
        );
        assert_eq!(
            check_raise(&bid(u32::MAX, 5), 7, f(6), true),
            Err(BidError::FaceLocked { locked: f(5) })
        );
        assert!(!is_raise(&bid(u32::MAX, 5), u32::MAX, f(5), true));
    }

    #[test]
    fn test_too_low_reason() {
        let err = check_raise(&bid(2, 1), 4, f(3), false).unwrap_err();
        assert_eq!(
            err,
            BidError::TooLow {
                quantity: 2,
                face: f(1),
                attempted: f(3),
                minimum: 5,
            }
        );
        assert_eq!(
            err.to_string(),
            "bid must beat 2 x 1: at least 5 x 3 is required"
        );
    }
}
