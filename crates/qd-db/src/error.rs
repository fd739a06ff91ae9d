//! Model and storage errors.

use thiserror::Error;

/// Errors raised while converting stored documents into cards
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// The stored document carries no id
    #[error("Card document has no id")]
    MissingId,
}

/// Errors surfaced by a [`crate::store::CardStore`]
#[derive(Error, Debug)]
pub enum StoreError {
    /// Query or connection failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    /// A stored document could not become a card
    #[error("Invalid card document: {0}")]
    Model(#[from] ModelError),
    /// Backend not reachable
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}
