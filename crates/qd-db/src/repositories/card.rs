//! Queries on the `cards` table.

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::{Card, CardDocument};

/// Fetch every card in pool order (oldest first).
pub async fn get_all_cards<'e, E>(executor: E) -> Result<Vec<CardDocument>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT
                id,
                question,
                options,
                answer,
                category,
                topic,
                active,
                stability,
                difficulty,
                repetitions,
                interval_days,
                next_review
            FROM cards
            ORDER BY created_at, id
        "#,
    )
    .fetch_all(executor)
    .await
}

/// Fetch one card by id.
pub async fn get_card<'e, E>(executor: E, card_id: Uuid) -> Result<Option<CardDocument>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT
                id,
                question,
                options,
                answer,
                category,
                topic,
                active,
                stability,
                difficulty,
                repetitions,
                interval_days,
                next_review
            FROM cards
            WHERE id = $1
        "#,
    )
    .bind(card_id)
    .fetch_optional(executor)
    .await
}

/// Insert or overwrite a card. Last write wins, there is no version check.
pub async fn upsert_card<'e, E>(executor: E, card: &Card) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        // language=PostgreSQL
        r#"
            INSERT INTO cards (
                id, question, options, answer, category, topic, active,
                stability, difficulty, repetitions, interval_days, next_review
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (id)
            DO UPDATE SET
                question = $2,
                options = $3,
                answer = $4,
                category = $5,
                topic = $6,
                active = $7,
                stability = $8,
                difficulty = $9,
                repetitions = $10,
                interval_days = $11,
                next_review = $12,
                updated_at = NOW()
        "#,
    )
    .bind(card.id)
    .bind(&card.question)
    .bind(&card.options)
    .bind(&card.answer)
    .bind(&card.category)
    .bind(&card.topic)
    .bind(card.active)
    .bind(card.stability)
    .bind(card.difficulty)
    .bind(i64::from(card.repetitions))
    .bind(i64::from(card.interval))
    .bind(card.next_review)
    .execute(executor)
    .await?;
    Ok(())
}
