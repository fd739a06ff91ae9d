use thiserror::Error;

/// Errors raised by the scheduler.
///
/// Every variant is a caller contract violation: the scheduler never clamps
/// or coerces bad input into something it can work with.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SrsError {
    /// Out-of-range rating or malformed memory state
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
