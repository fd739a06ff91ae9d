//! Cards, their stored form and pool filters.

use std::fmt;

use chrono::{DateTime, Utc};
use qd_srs::MemoryState;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ModelError;

const MIN_STABILITY: f64 = 1.0;
const MIN_DIFFICULTY: f64 = 1.0;
const MAX_DIFFICULTY: f64 = 10.0;

/// Card model - a reviewable question with its scheduling state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// Unique card identifier, stable across reviews
    pub id: Uuid,
    /// Question text shown to the user
    pub question: String,
    /// Multiple-choice answers offered with the question
    pub options: Vec<String>,
    /// Expected answer, one of `options`
    pub answer: String,
    /// Category label (grouping only)
    pub category: String,
    /// Topic label (grouping only)
    pub topic: String,
    /// Only active cards are selected for review
    pub active: bool,
    /// Memory strength in days, always >= 1
    pub stability: f64,
    /// Intrinsic difficulty in [1, 10]
    pub difficulty: f64,
    /// Successful reviews since the last lapse
    pub repetitions: u32,
    /// Interval in days that produced `next_review`
    pub interval: u32,
    /// When the card becomes due
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub next_review: DateTime<Utc>,
}

impl Card {
    /// A freshly imported card: inactive, default memory state, due at `now`.
    pub fn new(
        question: impl Into<String>,
        options: Vec<String>,
        answer: impl Into<String>,
        category: impl Into<String>,
        topic: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let state = MemoryState::new(now);
        Self {
            id: Uuid::new_v4(),
            question: question.into(),
            options,
            answer: answer.into(),
            category: category.into(),
            topic: topic.into(),
            active: false,
            stability: state.stability,
            difficulty: state.difficulty,
            repetitions: state.repetitions,
            interval: state.interval,
            next_review: state.due,
        }
    }

    /// Scheduling state of the card.
    pub const fn memory_state(&self) -> MemoryState {
        MemoryState {
            stability: self.stability,
            difficulty: self.difficulty,
            repetitions: self.repetitions,
            interval: self.interval,
            due: self.next_review,
        }
    }

    /// Copy of the card carrying a new scheduling state.
    ///
    /// Identity, content and grouping fields are left untouched.
    pub fn with_memory_state(&self, state: &MemoryState) -> Self {
        Self {
            stability: state.stability,
            difficulty: state.difficulty,
            repetitions: state.repetitions,
            interval: state.interval,
            next_review: state.due,
            ..self.clone()
        }
    }

    /// Whether the card takes part in a review at `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.active && self.next_review <= now
    }

    /// Group this card belongs to.
    pub fn topic_key(&self) -> TopicKey {
        TopicKey::new(&self.category, &self.topic)
    }
}

/// Card as it comes out of storage, where any field may be missing.
///
/// Converted once at the load boundary by [`CardDocument::into_card`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CardDocument {
    /// Required; documents without one are rejected
    pub id: Option<Uuid>,
    /// Defaults to ""
    pub question: Option<String>,
    /// Defaults to no options
    pub options: Option<Vec<String>>,
    /// Defaults to ""
    pub answer: Option<String>,
    /// Defaults to ""
    pub category: Option<String>,
    /// Defaults to ""
    pub topic: Option<String>,
    /// Defaults to inactive
    pub active: Option<bool>,
    /// Defaults to 1
    pub stability: Option<f64>,
    /// Defaults to 5
    pub difficulty: Option<f64>,
    /// Defaults to 0
    pub repetitions: Option<i64>,
    /// Defaults to 1
    #[sqlx(rename = "interval_days")]
    pub interval: Option<i64>,
    /// Defaults to the load time
    #[serde(default, alias = "due", with = "chrono::serde::ts_milliseconds_option")]
    pub next_review: Option<DateTime<Utc>>,
}

impl CardDocument {
    /// Fill in defaults and produce a fully populated card.
    ///
    /// Zero, negative and non-finite numbers count as missing, the same as
    /// absent fields: stability falls back to 1, difficulty to 5, repetitions
    /// to 0, interval to 1 and the due date to `now`. Present values are
    /// brought into range: stability is floored at 1 and difficulty clamped
    /// to [1, 10].
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::MissingId`] when the document has no id.
    pub fn into_card(self, now: DateTime<Utc>) -> Result<Card, ModelError> {
        let id = self.id.ok_or(ModelError::MissingId)?;
        let defaults = MemoryState::new(now);

        let stability = self
            .stability
            .filter(|s| s.is_finite() && *s > 0.0)
            .map_or(defaults.stability, |s| s.max(MIN_STABILITY));
        let difficulty = self
            .difficulty
            .filter(|d| d.is_finite() && *d != 0.0)
            .map_or(defaults.difficulty, |d| {
                d.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY)
            });
        let repetitions = self
            .repetitions
            .and_then(|r| u32::try_from(r).ok())
            .unwrap_or(defaults.repetitions);
        let interval = self
            .interval
            .and_then(|i| u32::try_from(i).ok())
            .filter(|i| *i > 0)
            .unwrap_or(defaults.interval);

        Ok(Card {
            id,
            question: self.question.unwrap_or_default(),
            options: self.options.unwrap_or_default(),
            answer: self.answer.unwrap_or_default(),
            category: self.category.unwrap_or_default(),
            topic: self.topic.unwrap_or_default(),
            active: self.active.unwrap_or(false),
            stability,
            difficulty,
            repetitions,
            interval,
            next_review: self.next_review.unwrap_or(defaults.due),
        })
    }
}

/// A `{category, topic}` group used for due counts and completion marks
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TopicKey {
    /// Category label
    pub category: String,
    /// Topic label
    pub topic: String,
}

impl TopicKey {
    /// Key for `{category, topic}`.
    pub fn new(category: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            topic: topic.into(),
        }
    }
}

impl fmt::Display for TopicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.category, self.topic)
    }
}

/// Category/topic filter applied to the pool
///
/// `None` or an empty string matches every card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardFilter {
    /// Category to keep
    pub category: Option<String>,
    /// Topic to keep
    pub topic: Option<String>,
}

impl CardFilter {
    /// Filter matching every card.
    pub fn all() -> Self {
        Self::default()
    }

    /// Restrict to one category.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Restrict to one topic.
    pub fn topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    /// Whether `card` passes both restrictions.
    pub fn matches(&self, card: &Card) -> bool {
        fn field_matches(wanted: Option<&str>, value: &str) -> bool {
            wanted.is_none_or(|wanted| wanted.is_empty() || wanted == value)
        }

        field_matches(self.category.as_deref(), &card.category)
            && field_matches(self.topic.as_deref(), &card.topic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_new_card_defaults() {
        let card = Card::new(
            "2 + 2?",
            vec!["3".into(), "4".into()],
            "4",
            "Math",
            "Addition",
            now(),
        );

        assert!(!card.active);
        assert_eq!(card.stability, 1.0);
        assert_eq!(card.difficulty, 5.0);
        assert_eq!(card.repetitions, 0);
        assert_eq!(card.interval, 1);
        assert_eq!(card.next_review, now());
    }

    #[test]
    fn test_document_defaults_missing_fields() {
        let id = Uuid::new_v4();
        let doc: CardDocument = serde_json::from_value(json!({
            "id": id,
            "question": "Synonym of 'happy'?",
            "category": "English",
            "topic": "Synonyms",
        }))
        .unwrap();

        let card = doc.into_card(now()).unwrap();
        assert_eq!(card.id, id);
        assert!(!card.active);
        assert_eq!(card.stability, 1.0);
        assert_eq!(card.difficulty, 5.0);
        assert_eq!(card.repetitions, 0);
        assert_eq!(card.interval, 1);
        assert_eq!(card.next_review, now());
        assert!(card.options.is_empty());
    }

    #[test]
    fn test_document_treats_zero_as_missing() {
        let doc = CardDocument {
            id: Some(Uuid::new_v4()),
            stability: Some(0.0),
            difficulty: Some(0.0),
            repetitions: Some(-3),
            interval: Some(0),
            ..Default::default()
        };

        let card = doc.into_card(now()).unwrap();
        assert_eq!(card.stability, 1.0);
        assert_eq!(card.difficulty, 5.0);
        assert_eq!(card.repetitions, 0);
        assert_eq!(card.interval, 1);
    }

    #[test]
    fn test_document_values_brought_into_range() {
        let low = CardDocument {
            id: Some(Uuid::new_v4()),
            stability: Some(0.4),
            difficulty: Some(-2.0),
            ..Default::default()
        };
        let high = CardDocument {
            id: Some(Uuid::new_v4()),
            difficulty: Some(14.5),
            ..Default::default()
        };

        let low = low.into_card(now()).unwrap();
        assert_eq!(low.stability, 1.0);
        assert_eq!(low.difficulty, 1.0);
        assert_eq!(high.into_card(now()).unwrap().difficulty, 10.0);
    }

    #[test]
    fn test_document_keeps_present_fields() {
        let due = now() + Duration::days(4);
        let doc: CardDocument = serde_json::from_value(json!({
            "id": Uuid::new_v4(),
            "active": true,
            "stability": 4.2,
            "difficulty": 6.5,
            "repetitions": 3,
            "interval": 4,
            "nextReview": due.timestamp_millis(),
        }))
        .unwrap();

        let card = doc.into_card(now()).unwrap();
        assert!(card.active);
        assert_eq!(card.stability, 4.2);
        assert_eq!(card.difficulty, 6.5);
        assert_eq!(card.repetitions, 3);
        assert_eq!(card.interval, 4);
        assert_eq!(card.next_review, due);
    }

    #[test]
    fn test_document_without_id_is_rejected() {
        let doc = CardDocument::default();
        assert!(matches!(doc.into_card(now()), Err(ModelError::MissingId)));
    }

    #[test]
    fn test_with_memory_state_keeps_identity() {
        let card = Card::new("q", vec![], "a", "Math", "Fractions", now());
        let mut state = card.memory_state();
        state.stability = 9.0;
        state.repetitions = 2;
        state.due = now() + Duration::days(9);

        let updated = card.with_memory_state(&state);
        assert_eq!(updated.id, card.id);
        assert_eq!(updated.topic_key(), card.topic_key());
        assert_eq!(updated.stability, 9.0);
        assert_eq!(updated.repetitions, 2);
        assert_eq!(updated.next_review, now() + Duration::days(9));
    }

    #[test]
    fn test_filter_matches() {
        let card = Card::new("q", vec![], "a", "Math", "Fractions", now());

        assert!(CardFilter::all().matches(&card));
        assert!(CardFilter::all().category("Math").matches(&card));
        assert!(CardFilter::all().category("").topic("Fractions").matches(&card));
        assert!(!CardFilter::all().category("English").matches(&card));
        assert!(!CardFilter::all().category("Math").topic("Algebra").matches(&card));
    }

    #[test]
    fn test_topic_key_display() {
        assert_eq!(TopicKey::new("Math", "Fractions").to_string(), "Math:Fractions");
    }
}
