//! Review sessions: due-card selection, grading and completion bookkeeping.

mod completion;
mod session;

pub use completion::CompletedTopics;
pub use session::{AnswerCheck, ReviewSession, SessionState, StartOutcome, TopicProgress};
