use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use qd_db::{Card, CardFilter, CardStore, TopicKey};
use qd_srs::Review;
use serde::Serialize;

use super::completion::CompletedTopics;
use crate::{deck::CardPool, error::ReviewError, metrics};

/// Where a review session stands.
///
/// `Selecting` and `Grading` are transient: they are only observable while
/// [`ReviewSession::start_review`] or [`ReviewSession::submit_rating`] runs,
/// or after a grading future was dropped before the card was persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum SessionState {
    /// No review started
    #[default]
    Idle,
    /// Choosing due cards
    Selecting,
    /// A card is shown and waits for a rating
    Presenting,
    /// A rating is being persisted
    Grading,
    /// The queue ran out
    Completed,
}

/// Result of starting a review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StartOutcome {
    /// `due` cards were queued and the first one is presented
    Reviewing { due: usize },
    /// Nothing was due; the session is already completed
    NothingDue,
}

/// Informational comparison of a submitted answer with the expected one.
///
/// Has no influence on scheduling: only the rating does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerCheck {
    /// What the user submitted
    pub response: String,
    /// The card's stored answer
    pub expected: String,
    /// Exact match of the two
    pub correct: bool,
}

/// Due count and completion mark of one group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicProgress {
    /// Group category
    pub category: String,
    /// Group topic
    pub topic: String,
    /// Cards of the group due now
    pub due: usize,
    /// Whether the group was completed today
    pub completed: bool,
}

/// One user's review controller.
///
/// Owns the queue of the current pass and the "completed today" marks, which
/// outlive individual passes. Abandoning a session only requires dropping it
/// or calling [`ReviewSession::abandon`].
#[derive(Debug, Default)]
pub struct ReviewSession {
    state: SessionState,
    filter: CardFilter,
    queue: VecDeque<Card>,
    processed: Vec<Card>,
    answer: Option<AnswerCheck>,
    completed: CompletedTopics,
}

impl ReviewSession {
    /// Idle session with no completion marks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Filter of the current or last pass.
    pub const fn filter(&self) -> &CardFilter {
        &self.filter
    }

    /// Card currently shown to the user.
    pub fn current_card(&self) -> Option<&Card> {
        match self.state {
            SessionState::Presenting | SessionState::Grading => self.queue.front(),
            _ => None,
        }
    }

    /// Cards left in the queue, including the current one.
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    /// Cards graded during the current pass, as persisted.
    pub fn processed(&self) -> &[Card] {
        &self.processed
    }

    /// Latest answer check for the current card.
    pub const fn answer_check(&self) -> Option<&AnswerCheck> {
        self.answer.as_ref()
    }

    /// Completion marks kept across passes.
    pub const fn completed_topics(&self) -> &CompletedTopics {
        &self.completed
    }

    /// Whether `key` was completed on the day of `now`.
    pub fn is_topic_completed(&self, key: &TopicKey, now: DateTime<Utc>) -> bool {
        self.completed.contains(key, now)
    }

    /// Select the due cards of `pool` matching `filter` and start presenting them.
    ///
    /// With nothing due the session completes right away, and every group of
    /// the filtered active pool is still marked as completed.
    pub fn start_review(
        &mut self,
        pool: &CardPool,
        filter: CardFilter,
        now: DateTime<Utc>,
    ) -> StartOutcome {
        if matches!(
            self.state,
            SessionState::Presenting | SessionState::Grading
        ) {
            tracing::debug!(
                "Restarting review with {} cards left in the previous queue",
                self.queue.len()
            );
        }

        self.state = SessionState::Selecting;
        self.filter = filter;
        self.processed.clear();
        self.answer = None;

        let due = pool.due_cards(&self.filter, now);
        tracing::debug!(
            "Selected {} due cards (category={:?}, topic={:?})",
            due.len(),
            self.filter.category,
            self.filter.topic
        );

        if due.is_empty() {
            self.queue.clear();
            self.complete(pool, now);
            return StartOutcome::NothingDue;
        }

        let count = due.len();
        self.queue = due.into();
        self.state = SessionState::Presenting;
        StartOutcome::Reviewing { due: count }
    }

    /// Compare a response with the current card's answer.
    ///
    /// Returns `None` when no card is being presented or the response is
    /// empty; an empty response leaves any earlier check in place.
    pub fn check_answer(&mut self, response: &str) -> Option<&AnswerCheck> {
        if response.is_empty() {
            return None;
        }
        let card = self.current_card()?;
        let check = AnswerCheck {
            response: response.to_owned(),
            expected: card.answer.clone(),
            correct: response == card.answer,
        };
        Some(self.answer.insert(check))
    }

    /// Grade the current card, persist it and move on to the next one.
    ///
    /// On persistence failure the card stays at the head of the queue and the
    /// pool is left untouched, so the same rating can simply be resubmitted.
    ///
    /// # Returns
    ///
    /// The card as persisted, carrying its new schedule.
    pub async fn submit_rating<S: CardStore>(
        &mut self,
        pool: &mut CardPool,
        store: &S,
        review: Review,
        now: DateTime<Utc>,
    ) -> Result<Card, ReviewError> {
        let card = self.current_card().ok_or(ReviewError::NoCardPresented)?;
        let next = qd_srs::schedule(&card.memory_state(), review, now)?;
        let updated = card.with_memory_state(&next);

        self.state = SessionState::Grading;
        if let Err(e) = store.save_card(&updated).await {
            tracing::error!("Failed to save review progress for card {}: {e}", updated.id);
            metrics::record_persistence_failure("submit_rating");
            self.state = SessionState::Presenting;
            return Err(e.into());
        }

        pool.replace(updated.clone());
        self.queue.pop_front();
        self.processed.push(updated.clone());
        self.answer = None;
        metrics::record_review_graded(review);
        tracing::debug!(
            "Card {} rated {}: next review in {} days",
            updated.id,
            review.value(),
            updated.interval
        );

        if self.queue.is_empty() {
            self.complete(pool, now);
        } else {
            self.state = SessionState::Presenting;
        }

        Ok(updated)
    }

    /// Drop the current pass. Completion marks are kept.
    pub fn abandon(&mut self) {
        self.queue.clear();
        self.processed.clear();
        self.answer = None;
        self.state = SessionState::Idle;
    }

    /// Due counts per group of `pool` with today's completion marks.
    pub fn topic_progress(
        &self,
        pool: &CardPool,
        filter: &CardFilter,
        now: DateTime<Utc>,
    ) -> Vec<TopicProgress> {
        pool.due_count_by_topic(filter, now)
            .into_iter()
            .map(|group| {
                let completed = self.completed.contains(&group.key(), now);
                TopicProgress {
                    category: group.category,
                    topic: group.topic,
                    due: group.count,
                    completed,
                }
            })
            .collect()
    }

    fn complete(&mut self, pool: &CardPool, now: DateTime<Utc>) {
        let topics = pool.active_topics(&self.filter);
        tracing::info!(
            "Review session complete: {} cards reviewed, {} topics marked done",
            self.processed.len(),
            topics.len()
        );

        self.completed.mark(now, topics);
        self.state = SessionState::Completed;
        metrics::record_session_completed(self.processed.len());
    }
}
