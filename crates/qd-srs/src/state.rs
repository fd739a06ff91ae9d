use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SrsError;

/// Memory state of a single card, the input and output of [`crate::schedule`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MemoryState {
    /// Days until recall probability decays to the target retention (>= 1)
    pub stability: f64,
    /// Intrinsic item hardness, in [1, 10]
    pub difficulty: f64,
    /// Successful reviews since the last lapse
    pub repetitions: u32,
    /// Interval in days that produced `due`
    pub interval: u32,
    /// When the card becomes due again
    pub due: DateTime<Utc>,
}

impl MemoryState {
    /// Default stability of a card that has never been reviewed.
    pub const DEFAULT_STABILITY: f64 = 1.0;
    /// Default difficulty of a card that has never been reviewed.
    pub const DEFAULT_DIFFICULTY: f64 = 5.0;
    /// Default interval of a card that has never been reviewed.
    pub const DEFAULT_INTERVAL: u32 = 1;

    /// State of a freshly imported card, due immediately.
    pub const fn new(now: DateTime<Utc>) -> Self {
        Self {
            stability: Self::DEFAULT_STABILITY,
            difficulty: Self::DEFAULT_DIFFICULTY,
            repetitions: 0,
            interval: Self::DEFAULT_INTERVAL,
            due: now,
        }
    }

    /// Whether the card should be reviewed at `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.due <= now
    }

    pub(crate) fn validate(&self) -> Result<(), SrsError> {
        if !self.stability.is_finite() || self.stability <= 0.0 {
            return Err(SrsError::InvalidArgument(format!(
                "stability must be a positive number, got {}",
                self.stability
            )));
        }
        if !self.difficulty.is_finite() {
            return Err(SrsError::InvalidArgument(format!(
                "difficulty must be a finite number, got {}",
                self.difficulty
            )));
        }
        Ok(())
    }
}
