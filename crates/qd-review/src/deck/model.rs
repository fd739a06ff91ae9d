use qd_db::TopicKey;
use serde::Serialize;

/// Number of due cards in one `{category, topic}` group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicDue {
    /// Group category
    pub category: String,
    /// Group topic
    pub topic: String,
    /// Due cards in the group
    pub count: usize,
}

impl TopicDue {
    /// Key of the group.
    pub fn key(&self) -> TopicKey {
        TopicKey::new(&self.category, &self.topic)
    }
}

/// Active/inactive split of a (possibly filtered) pool
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeckCounts {
    /// Cards in the review deck
    pub active: usize,
    /// Cards waiting to be added
    pub inactive: usize,
}
