//! Error types for TEMPO

use thiserror::Error;

/// Core TEMPO errors
#[derive(Error, Debug)]
pub enum TempoError {
    /// The host platform could not supply a meeting context. Callers fall
    /// back to local-only mode and keep the message for diagnostics.
    #[error("Host platform unavailable: {0}")]
    HostUnavailable(String),

    /// A snapshot could not be delivered to one recipient.
    #[error("Transport error: {0}")]
    Transport(String),

    /// A snapshot could not be serialized or parsed.
    #[error("Codec error: {0}")]
    Codec(String),

    /// A recipient identifier is not part of the current meeting.
    #[error("Unknown participant: {0}")]
    UnknownParticipant(String),
}

/// Result type for TEMPO operations
pub type TempoResult<T> = Result<T, TempoError>;
