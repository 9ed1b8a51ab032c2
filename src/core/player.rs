//! Player identity, seats, and the per-seat dice record.
//!
//! ## UserId / UserRef
//!
//! Opaque reference to the external user (chat account) behind a seat.
//! The engine never interprets the id; it only compares it.
//!
//! ## Seat
//!
//! Type-safe index into the table's fixed turn order. Seats are assigned in
//! join order and never change, even when a player is eliminated.
//!
//! ## Player
//!
//! Mutable per-seat record: current dice, die count, elimination flag and
//! the tallies accumulated during the game.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::face::Face;
use super::rng::DiceRng;

/// External user identifier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub u64);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// External user reference: id plus display name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserRef {
    pub id: UserId,
    pub name: String,
}

impl UserRef {
    #[must_use]
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id: UserId(id),
            name: name.into(),
        }
    }
}

/// Seat index in turn order (0-based, join order).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Seat(pub u8);

impl Seat {
    #[must_use]
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    /// Get the raw seat index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Seat {}", self.0)
    }
}

/// A player's hidden hand. Inline for the usual five dice.
pub type Dice = SmallVec<[Face; 5]>;

/// Per-game counters reported at game end.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerTally {
    pub dice_lost: u32,
    pub bluffs_called_success: u32,
    pub bluffs_called_fail: u32,
    pub calzas_success: u32,
    pub calzas_fail: u32,
}

/// One seat at the table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    user: UserRef,
    dice: Dice,
    die_count: u8,
    max_dice: u8,
    eliminated: bool,
    tally: PlayerTally,
}

impl Player {
    /// Create a player holding `max_dice` dice (not yet rolled).
    #[must_use]
    pub fn new(user: UserRef, max_dice: u8) -> Self {
        Self {
            user,
            dice: Dice::new(),
            die_count: max_dice,
            max_dice,
            eliminated: max_dice == 0,
            tally: PlayerTally::default(),
        }
    }

    #[must_use]
    pub fn user(&self) -> &UserRef {
        &self.user
    }

    #[must_use]
    pub fn id(&self) -> UserId {
        self.user.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.user.name
    }

    /// Current hand, sorted ascending. Empty when eliminated.
    #[must_use]
    pub fn dice(&self) -> &[Face] {
        &self.dice
    }

    #[must_use]
    pub fn die_count(&self) -> u8 {
        self.die_count
    }

    #[must_use]
    pub fn is_eliminated(&self) -> bool {
        self.eliminated
    }

    #[must_use]
    pub fn tally(&self) -> &PlayerTally {
        &self.tally
    }

    pub(crate) fn tally_mut(&mut self) -> &mut PlayerTally {
        &mut self.tally
    }

    /// Reroll the whole hand.
    ///
    /// Eliminated players end up with an empty hand. Dice are sorted for
    /// stable rendering.
    pub fn roll_dice(&mut self, rng: &mut DiceRng) {
        self.dice.clear();
        if self.eliminated {
            return;
        }
        self.dice.extend((0..self.die_count).map(|_| rng.roll_die()));
        self.dice.sort_unstable();
    }

    /// Remove one die. Returns whether the player is now eliminated.
    ///
    /// Never goes below zero.
    pub fn lose_die(&mut self) -> bool {
        if self.die_count > 0 {
            self.die_count -= 1;
            self.tally.dice_lost += 1;
        }
        if self.die_count == 0 {
            self.eliminated = true;
            self.dice.clear();
        }
        self.eliminated
    }

    /// Add one die, capped at the starting maximum.
    pub fn gain_die(&mut self) {
        if !self.eliminated && self.die_count < self.max_dice {
            self.die_count += 1;
        }
    }

    /// Number of dice in hand showing `face`, counting wildcards when `aces_wild`.
    #[must_use]
    pub fn count_matching(&self, face: Face, aces_wild: bool) -> usize {
        self.dice
            .iter()
            .filter(|d| **d == face || (aces_wild && d.is_wild()))
            .count()
    }

    /// Check the seat's counters agree with each other.
    ///
    /// The hand only has to match `die_count` while `rolled` holds: between
    /// rounds it still shows the dice that were counted.
    pub(crate) fn validate(&self, max_dice: u8, rolled: bool) -> Result<(), &'static str> {
        if self.max_dice != max_dice
            || self.die_count > max_dice
            || self.dice.len() > usize::from(max_dice)
        {
            return Err("seat holds more dice than the table allows");
        }
        if self.eliminated != (self.die_count == 0) {
            return Err("elimination flag disagrees with the die count");
        }
        if self.eliminated && !self.dice.is_empty() {
            return Err("eliminated seat still holds dice");
        }
        if rolled && self.dice.len() != usize::from(self.die_count) {
            return Err("hand size disagrees with the die count");
        }
        Ok(())
    }

    /// Replace the hand with fixed dice. Test rigging only.
    #[doc(hidden)]
    pub fn set_dice(&mut self, dice: &[Face]) {
        self.dice = dice.iter().copied().collect();
        self.dice.sort_unstable();
        self.die_count = self.dice.len() as u8;
        self.eliminated = self.die_count == 0;
    }
}
