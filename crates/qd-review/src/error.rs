//! Errors of review and deck operations.

use qd_db::StoreError;
use qd_srs::SrsError;
use thiserror::Error;
use uuid::Uuid;

/// Errors returned to the presentation layer.
///
/// Each variant maps to a distinct, actionable message; none of them is a
/// generic failure.
#[derive(Error, Debug)]
pub enum ReviewError {
    /// Bad rating or malformed card state handed to the scheduler
    #[error(transparent)]
    InvalidArgument(#[from] SrsError),
    /// The card store rejected a write; nothing was advanced
    #[error("Failed to persist review progress: {0}")]
    PersistenceFailure(#[from] StoreError),
    /// Fewer inactive cards match the filter than were requested
    #[error("Not enough inactive cards: requested {requested}, only {available} available")]
    InsufficientInactiveCards {
        /// Cards asked for
        requested: usize,
        /// Inactive cards matching the filter
        available: usize,
    },
    /// A rating arrived while no card was shown
    #[error("No card is currently being presented")]
    NoCardPresented,
    /// No card with this id in the pool
    #[error("Card not found: {0}")]
    CardNotFound(Uuid),
}
