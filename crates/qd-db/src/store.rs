//! Persistence collaborator used by review sessions and deck management.

use std::future::Future;

use chrono::Utc;
use sqlx::PgPool;

use crate::{error::StoreError, models::Card, repositories::card};

/// Loads and saves cards on behalf of the review core.
///
/// Implementations decide how to retry; the core surfaces every failure to its
/// caller unchanged.
pub trait CardStore {
    /// Load the whole card pool, applying load-boundary defaults.
    fn load_cards(&self) -> impl Future<Output = Result<Vec<Card>, StoreError>> + Send;

    /// Persist one card.
    fn save_card(&self, card: &Card) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Persist several cards, all or nothing.
    fn save_cards(&self, cards: &[Card]) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// PostgreSQL-backed card store
#[derive(Debug, Clone)]
pub struct PgCardStore {
    pool: PgPool,
}

impl PgCardStore {
    /// Store backed by `pool`.
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Underlying connection pool.
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl CardStore for PgCardStore {
    async fn load_cards(&self) -> Result<Vec<Card>, StoreError> {
        let now = Utc::now();
        let documents = card::get_all_cards(&self.pool).await?;

        let cards = documents
            .into_iter()
            .map(|document| document.into_card(now))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("Loaded {} cards", cards.len());
        Ok(cards)
    }

    async fn save_card(&self, card: &Card) -> Result<(), StoreError> {
        card::upsert_card(&self.pool, card).await?;
        Ok(())
    }

    async fn save_cards(&self, cards: &[Card]) -> Result<(), StoreError> {
        // Single transaction so a failure leaves no partial batch behind
        let mut tx = self.pool.begin().await?;

        for card in cards {
            card::upsert_card(&mut *tx, card).await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
