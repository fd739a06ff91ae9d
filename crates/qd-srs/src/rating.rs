use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SrsError;

/// Self-reported recall quality for the card that was just shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Rating {
    /// Forgotten
    Again = 1,
    /// Recalled with serious difficulty
    Hard = 2,
    /// Recalled after some hesitation
    Good = 3,
    /// Recalled instantly
    Easy = 4,
}

impl Rating {
    /// All ratings, ordered from worst to best recall.
    pub const ALL: [Self; 4] = [Self::Again, Self::Hard, Self::Good, Self::Easy];

    /// Ordinal value of the rating (1..=4).
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Zero-based position, used to index per-rating weight tables.
    pub(crate) const fn index(self) -> usize {
        self as usize - 1
    }

    /// Button label shown to the user.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Again => "Again",
            Self::Hard => "Hard",
            Self::Good => "Good",
            Self::Easy => "Easy",
        }
    }
}

impl TryFrom<u8> for Rating {
    type Error = SrsError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Again),
            2 => Ok(Self::Hard),
            3 => Ok(Self::Good),
            4 => Ok(Self::Easy),
            other => Err(SrsError::InvalidArgument(format!(
                "rating must be between 1 and 4, got {other}"
            ))),
        }
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.value()
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of one attempt at a card.
///
/// `Lapse` is the ungraded "marked incorrect" case (raw value 0) and always
/// resets the card's repetition streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Review {
    /// Marked incorrect without a grade
    Lapse,
    /// Graded recall
    Graded(Rating),
}

impl Review {
    /// Raw value as stored and submitted by the presentation layer (0..=4).
    pub const fn value(self) -> u8 {
        match self {
            Self::Lapse => 0,
            Self::Graded(rating) => rating.value(),
        }
    }
}

impl TryFrom<u8> for Review {
    type Error = SrsError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Lapse),
            1..=4 => Rating::try_from(value).map(Self::Graded),
            other => Err(SrsError::InvalidArgument(format!(
                "review rating must be between 0 and 4, got {other}"
            ))),
        }
    }
}

impl From<Rating> for Review {
    fn from(rating: Rating) -> Self {
        Self::Graded(rating)
    }
}

impl From<Review> for u8 {
    fn from(review: Review) -> Self {
        review.value()
    }
}
