//! SRS (Spaced Repetition System) library for Quiz Deck
//!
//! This crate provides the scheduling algorithm, a variant of the Free Spaced
//! Repetition Scheduler (FSRS), that decides when a card should be reviewed
//! again from its memory state and the user's self-reported recall.
//!
//! Everything here is pure: no I/O, no clock reads beyond the `now` that is
//! passed in, no shared state. The functions can be called from any number of
//! sessions concurrently.

#![warn(missing_docs)]

mod error;
mod rating;
mod state;

pub use error::SrsError;
pub use rating::{Rating, Review};
pub use state::MemoryState;

use chrono::{DateTime, Duration, Utc};

/// FSRS weight vector.
pub const WEIGHTS: [f64; 17] = [
    0.4, 0.6, 2.4, 5.8, 4.93, 0.94, 0.86, 0.01, 1.49, 0.14, 0.94, 2.18, 0.05, 0.34, 1.26, 0.29,
    2.61,
];

/// Target probability of recall at the due date.
pub const REQUEST_RETENTION: f64 = 0.9;

/// Longest interval ever scheduled, in days (100 years).
pub const MAXIMUM_INTERVAL: u32 = 36500;

/// Extra stability growth applied to `Easy` reviews.
pub const EASY_BONUS: f64 = 1.3;

/// Stability shrink factor applied to `Hard` reviews.
pub const HARD_FACTOR: f64 = 0.85;

/// Forgetting curve exponent used when a card is forgotten.
pub const DECAY: f64 = -0.5;

/// Retention at which stability is measured: a card with stability `s` has a
/// 90% recall probability after `s` days.
const STABILITY_RETENTION: f64 = 0.9;

/// Difficulty weights per rating, as `(intercept, slope)` indices into
/// [`WEIGHTS`]. `Easy` has no slope term.
const DIFFICULTY_WEIGHTS: [(usize, Option<usize>); 4] =
    [(10, Some(11)), (12, Some(13)), (14, Some(15)), (16, None)];

/// Seed stability for the first graded review of a card.
///
/// Always at least 1 and monotonic in the rating.
pub fn init_stability(rating: Rating) -> f64 {
    WEIGHTS[rating.index()].max(1.0)
}

/// Number of whole days until a card with the given stability decays to
/// [`REQUEST_RETENTION`].
///
/// The result is clamped to `[1, MAXIMUM_INTERVAL]`.
pub fn next_interval(stability: f64) -> u32 {
    next_interval_with_retention(stability, REQUEST_RETENTION)
}

/// Same as [`next_interval`] with an explicit target retention.
///
/// # Arguments
///
/// * `stability` - Current stability in days
/// * `retention` - Target recall probability in `(0, 1)`
///
/// # Returns
///
/// `stability * ln(retention) / ln(0.9)` rounded to the nearest day and
/// clamped to `[1, MAXIMUM_INTERVAL]`.
pub fn next_interval_with_retention(stability: f64, retention: f64) -> u32 {
    let days = (stability * retention.ln() / STABILITY_RETENTION.ln()).round();
    let days = days.clamp(1.0, f64::from(MAXIMUM_INTERVAL));

    // NaN survives the clamp and casts to 0
    (days as u32).max(1)
}

/// Difficulty after a review, clamped to `[1, 10]`.
///
/// Blends a mean-reversion term that shrinks as stability grows with a
/// rating-specific intercept and slope.
pub fn next_difficulty(stability: f64, rating: Rating) -> f64 {
    let mean_reversion = WEIGHTS[4] * stability.powf(-WEIGHTS[5]);
    let (intercept, slope) = DIFFICULTY_WEIGHTS[rating.index()];
    let rating_term = slope.map_or(0.0, |slope| WEIGHTS[slope] * f64::from(rating.value()));

    (WEIGHTS[intercept] + mean_reversion + rating_term).clamp(1.0, 10.0)
}

/// Stability after a review of a card that has been reviewed before.
///
/// # Arguments
///
/// * `stability` - Stability before the review
/// * `rating` - Recall quality reported for this review
/// * `difficulty` - Difficulty before the review
///
/// # Algorithm
///
/// * Again: `w6 * s^decay`, collapses toward the floor
/// * Hard: `s * hard_factor`
/// * Good: `s * (1 + e^w8 * (11 - d) * s^w9)`
/// * Easy: Good multiplied by `easy_bonus`
///
/// The result is floored at 1.
pub fn next_stability(stability: f64, rating: Rating, difficulty: f64) -> f64 {
    let growth = || 1.0 + WEIGHTS[8].exp() * (11.0 - difficulty) * stability.powf(WEIGHTS[9]);

    let next = match rating {
        Rating::Again => WEIGHTS[6] * stability.powf(DECAY),
        Rating::Hard => stability * HARD_FACTOR,
        Rating::Good => stability * growth(),
        Rating::Easy => stability * EASY_BONUS * growth(),
    };

    next.max(1.0)
}

/// Compute the memory state of a card after a review.
///
/// A graded review extends the repetition streak. The first graded review
/// after import or after a lapse seeds stability from the rating, later ones
/// grow it from the previous stability and difficulty. A lapse resets the
/// streak and schedules the card for tomorrow.
///
/// The input is never mutated and identical inputs always produce identical
/// outputs.
///
/// # Errors
///
/// Returns [`SrsError::InvalidArgument`] when the input state is malformed
/// (non-positive or non-finite stability, non-finite difficulty).
pub fn schedule(
    state: &MemoryState,
    review: Review,
    now: DateTime<Utc>,
) -> Result<MemoryState, SrsError> {
    state.validate()?;

    let next = match review {
        Review::Graded(rating) => {
            let repetitions = state.repetitions.saturating_add(1);
            let stability = if repetitions == 1 {
                init_stability(rating)
            } else {
                next_stability(state.stability, rating, state.difficulty)
            };
            let interval = next_interval(stability);

            MemoryState {
                stability,
                difficulty: next_difficulty(stability, rating),
                repetitions,
                interval,
                due: now + Duration::days(i64::from(interval)),
            }
        }
        Review::Lapse => {
            let stability = init_stability(Rating::Again);

            MemoryState {
                stability,
                difficulty: next_difficulty(stability, Rating::Again),
                repetitions: 0,
                interval: MemoryState::DEFAULT_INTERVAL,
                due: now + Duration::days(i64::from(MemoryState::DEFAULT_INTERVAL)),
            }
        }
    };

    Ok(next)
}

/// Interval in days each rating would produce, in [`Rating::ALL`] order.
///
/// Used to label the rating buttons before the user picks one.
pub fn preview_intervals(state: &MemoryState) -> Result<[u32; 4], SrsError> {
    let mut intervals = [0; 4];
    for (slot, rating) in intervals.iter_mut().zip(Rating::ALL) {
        *slot = schedule(state, rating.into(), state.due)?.interval;
    }
    Ok(intervals)
}
