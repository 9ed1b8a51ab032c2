//! Bid-ordering tests.
//!
//! Property tests check the ordering rule against a direct case-by-case
//! statement of it, and check that the engine accepts exactly the bids the
//! rule allows.

use proptest::prelude::*;

use perudo_engine::core::{Bid, Face, PerudoConfig, Seat, UserId, UserRef};
use perudo_engine::engine::{ActionError, GameEngine};
use perudo_engine::rules::{check_opening, is_raise, minimum_raise, BidError};

fn face(v: u8) -> Face {
    Face::new(v).unwrap()
}

/// The ordering rule written out case by case.
fn reference_rule(q0: u32, f0: u8, q1: u32, f1: u8, palifico: bool) -> bool {
    if palifico {
        return f1 == f0 && q1 > q0;
    }
    if f1 == f0 {
        q1 > q0
    } else if f1 == 1 {
        q1 >= (q0 + 1) / 2
    } else if f0 == 1 {
        q1 >= q0 * 2 + 1
    } else {
        q1 > q0 || (q1 == q0 && f1 > f0)
    }
}

proptest! {
    #[test]
    fn prop_raise_matches_rule(
        q0 in 1u32..40,
        f0 in 1u8..=6,
        q1 in 1u32..90,
        f1 in 1u8..=6,
        palifico in any::<bool>(),
    ) {
        let previous = Bid::new(q0, face(f0), Seat::new(0));
        prop_assert_eq!(
            is_raise(&previous, q1, face(f1), palifico),
            reference_rule(q0, f0, q1, f1, palifico)
        );
    }

    #[test]
    fn prop_minimum_raise_is_tight(
        q0 in 1u32..40,
        f0 in 1u8..=6,
        f1 in 1u8..=6,
        palifico in any::<bool>(),
    ) {
        let previous = Bid::new(q0, face(f0), Seat::new(0));
        match minimum_raise(&previous, face(f1), palifico) {
            Some(m) => {
                prop_assert!(m >= 1);
                prop_assert!(is_raise(&previous, m, face(f1), palifico));
                if m > 1 {
                    prop_assert!(!is_raise(&previous, m - 1, face(f1), palifico));
                }
            }
            None => {
                prop_assert!(palifico);
                prop_assert_ne!(f0, f1);
            }
        }
    }

    #[test]
    fn prop_engine_accepts_exactly_legal_raises(
        seed in any::<u64>(),
        q0 in 1u32..8,
        f0 in 2u8..=6,
        q1 in 0u32..20,
        f1 in 0u8..=7,
    ) {
        let mut game =
            GameEngine::with_host(UserRef::new(1, "a"), PerudoConfig::new().with_seed(seed))
                .unwrap();
        game.add_player(UserRef::new(2, "b")).unwrap();
        game.add_player(UserRef::new(3, "c")).unwrap();
        game.start().unwrap();

        game.place_bid(UserId(1), q0, f0).unwrap();
        let result = game.place_bid(UserId(2), q1, f1);

        let expected_ok = (1..=6).contains(&f1)
            && q1 >= 1
            && reference_rule(q0, f0, q1, f1, false);
        prop_assert_eq!(result.is_ok(), expected_ok);

        if expected_ok {
            prop_assert_eq!(game.current_bid().map(|b| b.quantity), Some(q1));
        } else {
            prop_assert_eq!(game.current_bid(), Some(&Bid::new(q0, face(f0), Seat::new(0))));
            prop_assert_eq!(game.current_turn(), Some(Seat::new(1)));
        }
    }
}

#[test]
fn test_switch_to_aces_examples() {
    let previous = Bid::new(3, face(4), Seat::new(0));
    assert!(!is_raise(&previous, 1, face(1), false));
    assert!(is_raise(&previous, 2, face(1), false));
    assert!(is_raise(&previous, 3, face(1), false));
}

#[test]
fn test_switch_from_aces_examples() {
    let previous = Bid::new(2, face(1), Seat::new(0));
    assert!(!is_raise(&previous, 4, face(3), false));
    assert!(is_raise(&previous, 5, face(3), false));
}

#[test]
fn test_opening_on_aces() {
    assert_eq!(check_opening(face(1), false), Err(BidError::WildOpening));
    assert_eq!(check_opening(face(1), true), Ok(()));
}

#[test]
fn test_engine_rejects_ace_opening_outside_palifico() {
    let mut game =
        GameEngine::with_host(UserRef::new(1, "a"), PerudoConfig::new().with_seed(3)).unwrap();
    game.add_player(UserRef::new(2, "b")).unwrap();
    game.start().unwrap();

    assert!(!game.is_palifico());
    assert_eq!(
        game.place_bid(UserId(1), 3, 1),
        Err(ActionError::Bid(BidError::WildOpening))
    );
    assert!(game.current_bid().is_none());
}

#[test]
fn test_engine_refuses_raise_past_quantity_limit() {
    let mut game =
        GameEngine::with_host(UserRef::new(1, "a"), PerudoConfig::new().with_seed(6)).unwrap();
    game.add_player(UserRef::new(2, "b")).unwrap();
    game.add_player(UserRef::new(3, "c")).unwrap();
    game.start().unwrap();

    game.place_bid(UserId(1), 4_000_000_000, 2).unwrap();
    game.place_bid(UserId(2), 3_000_000_000, 1).unwrap();
    let standing = *game.current_bid().unwrap();

    // Leaving aces would need 6e9 + 1
    assert_eq!(game.minimum_bid(face(3)), None);
    for quantity in [5, 1_705_032_705, u32::MAX] {
        assert_eq!(
            game.place_bid(UserId(3), quantity, 3),
            Err(ActionError::Bid(BidError::Unbeatable {
                quantity: 3_000_000_000,
                face: face(1),
                attempted: face(3),
            }))
        );
    }
    assert_eq!(game.current_bid(), Some(&standing));
    assert_eq!(game.current_turn(), Some(Seat::new(2)));

    // Staying on aces still works, and so does calling
    assert_eq!(game.minimum_bid(face(1)), Some(3_000_000_001));
    game.place_bid(UserId(3), 3_000_000_001, 1).unwrap();
    assert!(game.challenge(UserId(1)).unwrap().resolution.success);
}
