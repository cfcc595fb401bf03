use thiserror::Error;

use crate::round::RoundPhase;

/// Failures raised by the round controller. None of them are fatal; state is
/// left untouched when one is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RoundError {
    #[error("no questions available for this round")]
    EmptyDeck,
    #[error("{operation} is not valid while the round is in {phase:?}")]
    InvalidPhaseOperation {
        operation: &'static str,
        phase: RoundPhase,
    },
    #[error("invalid round config: {0}")]
    InvalidConfig(String),
}

/// Failures loading or saving JSON documents (question bank, settings, history).
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("storage unavailable")]
    Unavailable,
}
