use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use qd_db::{Card, CardFilter, CardStore, TopicKey};
use uuid::Uuid;

use super::model::{DeckCounts, TopicDue};
use crate::{config::ReviewConfig, error::ReviewError, metrics};

/// The live card pool owned by the caller.
///
/// Every view (due cards, counts, groups) is recomputed from the current
/// contents on demand, so cards activated between sessions show up
/// immediately.
#[derive(Debug, Clone, Default)]
pub struct CardPool {
    cards: Vec<Card>,
}

impl CardPool {
    /// Wrap already loaded cards.
    pub const fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    /// Load the full pool through the persistence collaborator.
    pub async fn load<S: CardStore>(store: &S) -> Result<Self, ReviewError> {
        let cards = store.load_cards().await?;
        tracing::info!("Card pool loaded with {} cards", cards.len());
        Ok(Self::from_cards(cards))
    }

    /// All cards, in pool order.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Card with the given id.
    pub fn get(&self, id: Uuid) -> Option<&Card> {
        self.cards.iter().find(|card| card.id == id)
    }

    /// Number of cards in the pool.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Whether the pool holds no cards.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Cards matching `filter`, in pool order.
    pub fn filtered<'a, 'f>(
        &'a self,
        filter: &'f CardFilter,
    ) -> impl Iterator<Item = &'a Card> + use<'a, 'f> {
        self.cards.iter().filter(move |card| filter.matches(card))
    }

    /// Groups present among the active cards matching `filter`, due or not.
    pub fn active_topics(&self, filter: &CardFilter) -> BTreeSet<TopicKey> {
        self.filtered(filter)
            .filter(|card| card.active)
            .map(Card::topic_key)
            .collect()
    }

    /// Active cards due at `now`, oldest due date first.
    ///
    /// Cards sharing a due date keep their pool order.
    pub fn due_cards(&self, filter: &CardFilter, now: DateTime<Utc>) -> Vec<Card> {
        let mut due: Vec<Card> = self
            .filtered(filter)
            .filter(|card| card.is_due(now))
            .cloned()
            .collect();
        // sort_by_key is stable
        due.sort_by_key(|card| card.next_review);
        due
    }

    /// Number of active cards due at `now`.
    pub fn due_count(&self, filter: &CardFilter, now: DateTime<Utc>) -> usize {
        self.filtered(filter).filter(|card| card.is_due(now)).count()
    }

    /// Due cards grouped by `{category, topic}`, sorted by category then topic.
    pub fn due_count_by_topic(&self, filter: &CardFilter, now: DateTime<Utc>) -> Vec<TopicDue> {
        let mut groups: BTreeMap<TopicKey, usize> = BTreeMap::new();
        for card in self.filtered(filter).filter(|card| card.is_due(now)) {
            *groups.entry(card.topic_key()).or_default() += 1;
        }

        groups
            .into_iter()
            .map(|(key, count)| TopicDue {
                category: key.category,
                topic: key.topic,
                count,
            })
            .collect()
    }

    /// Active and inactive counts among cards matching `filter`.
    pub fn filtered_counts(&self, filter: &CardFilter) -> DeckCounts {
        self.filtered(filter)
            .fold(DeckCounts::default(), |mut counts, card| {
                if card.active {
                    counts.active += 1;
                } else {
                    counts.inactive += 1;
                }
                counts
            })
    }

    /// Active and inactive counts of the whole pool.
    pub fn total_counts(&self) -> DeckCounts {
        self.filtered_counts(&CardFilter::all())
    }

    /// Distinct non-empty categories, in first-seen order.
    pub fn categories(&self) -> Vec<String> {
        distinct_labels(self.cards.iter().map(|card| card.category.as_str()))
    }

    /// Distinct non-empty topics, in first-seen order.
    pub fn topics(&self) -> Vec<String> {
        distinct_labels(self.cards.iter().map(|card| card.topic.as_str()))
    }

    /// Active cards not yet due, soonest first.
    pub fn upcoming_reviews(
        &self,
        filter: &CardFilter,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Vec<&Card> {
        let mut upcoming: Vec<&Card> = self
            .filtered(filter)
            .filter(|card| card.active && card.next_review > now)
            .collect();
        upcoming.sort_by_key(|card| card.next_review);
        upcoming.truncate(limit);
        upcoming
    }

    /// Activate the first `count` inactive cards matching `filter`, due immediately.
    ///
    /// Nothing is changed unless at least `count` cards qualify and the whole
    /// batch is persisted.
    ///
    /// # Returns
    ///
    /// The ids of the activated cards, in pool order.
    pub async fn add_cards_to_deck<S: CardStore>(
        &mut self,
        store: &S,
        count: usize,
        filter: &CardFilter,
        now: DateTime<Utc>,
    ) -> Result<Vec<Uuid>, ReviewError> {
        let candidates: Vec<Card> = self
            .filtered(filter)
            .filter(|card| !card.active)
            .take(count)
            .map(|card| Card {
                active: true,
                next_review: now,
                ..card.clone()
            })
            .collect();

        if candidates.len() < count {
            let available = self.filtered(filter).filter(|card| !card.active).count();
            tracing::warn!(
                "Cannot add {} cards to deck: only {} inactive cards available",
                count,
                available
            );
            return Err(ReviewError::InsufficientInactiveCards {
                requested: count,
                available,
            });
        }

        if let Err(e) = store.save_cards(&candidates).await {
            tracing::error!("Failed to persist deck additions: {e}");
            metrics::record_persistence_failure("add_cards_to_deck");
            return Err(e.into());
        }

        let ids: Vec<Uuid> = candidates.iter().map(|card| card.id).collect();
        for card in candidates {
            self.replace(card);
        }

        metrics::record_cards_activated(ids.len());
        tracing::info!("{} cards added to active deck and due for review", ids.len());
        Ok(ids)
    }

    /// Activate one configured batch (`DECK_BATCH_SIZE`) of inactive cards.
    pub async fn add_batch_to_deck<S: CardStore>(
        &mut self,
        store: &S,
        config: &ReviewConfig,
        filter: &CardFilter,
        now: DateTime<Utc>,
    ) -> Result<Vec<Uuid>, ReviewError> {
        self.add_cards_to_deck(store, config.deck_batch_size, filter, now)
            .await
    }

    /// Activate or deactivate a single card.
    pub async fn set_active<S: CardStore>(
        &mut self,
        store: &S,
        id: Uuid,
        active: bool,
    ) -> Result<&Card, ReviewError> {
        let card = self.get(id).ok_or(ReviewError::CardNotFound(id))?;
        let updated = Card {
            active,
            ..card.clone()
        };

        if let Err(e) = store.save_card(&updated).await {
            tracing::error!("Failed to update active status of card {}: {e}", id);
            metrics::record_persistence_failure("set_active");
            return Err(e.into());
        }

        tracing::debug!("Card {} active={}", id, active);
        Ok(self.replace(updated))
    }

    /// Swap in the persisted version of a card, matched by id.
    pub(crate) fn replace(&mut self, card: Card) -> &Card {
        match self.cards.iter().position(|existing| existing.id == card.id) {
            Some(index) => {
                self.cards[index] = card;
                &self.cards[index]
            }
            None => {
                self.cards.push(card);
                &self.cards[self.cards.len() - 1]
            }
        }
    }
}

fn distinct_labels<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    labels
        .filter(|label| !label.is_empty() && seen.insert(*label))
        .map(str::to_owned)
        .collect()
}
