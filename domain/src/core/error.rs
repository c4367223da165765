//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// These are configuration problems detected before any capability is
/// called. Per-agent generation failures are never represented here; they
/// are captured inside [`RoundResponse`](crate::RoundResponse).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("No agents supplied for deliberation")]
    NoAgents,

    #[error("Duplicate agent id: {0}")]
    DuplicateAgentId(String),

    #[error("Invalid question: {0}")]
    InvalidQuestion(String),

    #[error("Unknown mode: {0} (expected quick, thoughtful, contemplate or council)")]
    UnknownMode(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl DomainError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DomainError::Cancelled)
    }
}
