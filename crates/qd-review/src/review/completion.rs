use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use qd_db::TopicKey;

/// Groups whose review was completed today (UTC).
///
/// Marks from a previous day are dropped the first time the set is marked on
/// a new day, and are never reported as completed.
#[derive(Debug, Clone, Default)]
pub struct CompletedTopics {
    day: Option<NaiveDate>,
    topics: BTreeSet<TopicKey>,
}

impl CompletedTopics {
    /// Add `topics` to the marks of the day of `now`.
    pub fn mark(&mut self, now: DateTime<Utc>, topics: impl IntoIterator<Item = TopicKey>) {
        let today = now.date_naive();
        if self.day != Some(today) {
            self.topics.clear();
            self.day = Some(today);
        }
        self.topics.extend(topics);
    }

    /// Whether `key` was marked on the day of `now`.
    pub fn contains(&self, key: &TopicKey, now: DateTime<Utc>) -> bool {
        self.day == Some(now.date_naive()) && self.topics.contains(key)
    }

    /// Groups completed on the day of `now`.
    pub fn on(&self, now: DateTime<Utc>) -> impl Iterator<Item = &TopicKey> {
        let today = self.day == Some(now.date_naive());
        self.topics.iter().filter(move |_| today)
    }
}
