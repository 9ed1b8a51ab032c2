//! Die faces.
//!
//! A `Face` is always a value in `1..=6`. Face 1 ("aces") is the wildcard:
//! outside Palifico rounds it counts toward every bid.

use serde::{Deserialize, Serialize};

/// A single die face in `1..=6`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Face(u8);

impl Face {
    /// The wildcard face.
    pub const ACE: Face = Face(1);
    pub const TWO: Face = Face(2);
    pub const THREE: Face = Face(3);
    pub const FOUR: Face = Face(4);
    pub const FIVE: Face = Face(5);
    pub const SIX: Face = Face(6);

    /// All six faces in ascending order.
    pub const ALL: [Face; 6] = [
        Face::ACE,
        Face::TWO,
        Face::THREE,
        Face::FOUR,
        Face::FIVE,
        Face::SIX,
    ];

    /// Create a face, returning `None` outside `1..=6`.
    ///
    /// ```
    /// use perudo_engine::core::Face;
    ///
    /// assert_eq!(Face::new(3).map(Face::value), Some(3));
    /// assert!(Face::new(0).is_none());
    /// assert!(Face::new(7).is_none());
    /// ```
    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        if value >= 1 && value <= 6 {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Get the pip value.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Whether this is the wildcard face (1).
    #[must_use]
    pub const fn is_wild(self) -> bool {
        self.0 == 1
    }
}

impl TryFrom<u8> for Face {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Face::new(value).ok_or(value)
    }
}

impl From<Face> for u8 {
    fn from(face: Face) -> Self {
        face.0
    }
}

impl std::fmt::Display for Face {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
