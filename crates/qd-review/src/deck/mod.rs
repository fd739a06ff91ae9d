//! Deck management: the live card pool, its filters, counts and activation.

mod model;
mod pool;

pub use model::{DeckCounts, TopicDue};
pub use pool::CardPool;
