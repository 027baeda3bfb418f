use thiserror::Error;

/// Malformed skeleton input.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TrackingError {
    #[error("finger chain needs at least 2 joints, got {0}")]
    TooFewJoints(usize),
    #[error("expected {expected} bone directions, got {actual}")]
    DirectionCount { expected: usize, actual: usize },
}
