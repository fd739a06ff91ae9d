//! Review sessions and deck management for Quiz Deck.
//!
//! The caller owns a [`CardPool`] loaded through a [`qd_db::CardStore`] and a
//! [`ReviewSession`] that walks the due cards of that pool one at a time,
//! scheduling each of them with [`qd_srs`] as it is rated.

#![warn(missing_docs)]

pub mod config;
pub mod deck;
pub mod error;
pub mod metrics;
pub mod review;
pub mod tracing;

pub use config::{Environment, ReviewConfig};
pub use deck::{CardPool, DeckCounts, TopicDue};
pub use error::ReviewError;
pub use review::{
    AnswerCheck, CompletedTopics, ReviewSession, SessionState, StartOutcome, TopicProgress,
};
