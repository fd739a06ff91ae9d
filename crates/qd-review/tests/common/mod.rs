use std::sync::{
    Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use chrono::{DateTime, Duration, TimeZone, Utc};
use qd_db::{Card, CardStore, StoreError};

/// Fixed clock for deterministic schedules
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap()
}

/// Build a card in the given group, due `due_in_days` from [`now`]
pub fn card(category: &str, topic: &str, active: bool, due_in_days: i64) -> Card {
    let mut card = Card::new(
        format!("{category}/{topic} question"),
        vec!["right".to_string(), "wrong".to_string()],
        "right",
        category,
        topic,
        now(),
    );
    card.active = active;
    card.next_review = now() + Duration::days(due_in_days);
    card
}

/// In-memory card store with switchable write failures
#[derive(Debug, Default)]
pub struct MemoryStore {
    cards: Mutex<Vec<Card>>,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn with_cards(cards: Vec<Card>) -> Self {
        Self {
            cards: Mutex::new(cards),
            ..Default::default()
        }
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful write calls
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn saved(&self, id: uuid::Uuid) -> Option<Card> {
        self.cards
            .lock()
            .unwrap()
            .iter()
            .find(|card| card.id == id)
            .cloned()
    }

    fn write(&self, batch: &[Card]) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("store is offline".to_string()));
        }

        let mut cards = self.cards.lock().unwrap();
        for card in batch {
            match cards.iter_mut().find(|existing| existing.id == card.id) {
                Some(existing) => *existing = card.clone(),
                None => cards.push(card.clone()),
            }
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl CardStore for MemoryStore {
    async fn load_cards(&self) -> Result<Vec<Card>, StoreError> {
        Ok(self.cards.lock().unwrap().clone())
    }

    async fn save_card(&self, card: &Card) -> Result<(), StoreError> {
        self.write(std::slice::from_ref(card))
    }

    async fn save_cards(&self, cards: &[Card]) -> Result<(), StoreError> {
        self.write(cards)
    }
}
