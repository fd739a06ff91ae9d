//! Counters for review activity.
//!
//! Recorded through the `metrics` facade; the embedding application decides
//! whether and where to export them.

use metrics::counter;
use qd_srs::Review;

/// Count one graded card, labelled by rating.
pub fn record_review_graded(review: Review) {
    let rating = match review {
        Review::Lapse => "lapse",
        Review::Graded(rating) => rating.label(),
    };
    counter!("reviews_graded_total", "rating" => rating).increment(1);
}

/// Count one finished review pass.
pub fn record_session_completed(graded: usize) {
    counter!("review_sessions_completed_total").increment(1);
    tracing::debug!("Recorded completed session with {} graded cards", graded);
}

/// Count cards added to the review deck.
pub fn record_cards_activated(count: usize) {
    counter!("cards_activated_total").increment(count as u64);
}

/// Count a failed write, labelled by operation.
pub fn record_persistence_failure(operation: &'static str) {
    counter!("persistence_failures_total", "operation" => operation).increment(1);
}
