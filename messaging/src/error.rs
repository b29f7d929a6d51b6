//! Error types for the messaging collaborators

use thiserror::Error;

/// Result type for messaging operations
pub type Result<T> = std::result::Result<T, MessagingError>;

/// Errors surfaced by posting, watching and filter construction
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MessagingError {
    /// `from` names a public key the backend holds no private key for
    #[error("unmatched pub / priv for seal")]
    UnmatchedIdentity,

    /// A key, payload or topic was not valid hex
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// The backend could not seal the message
    #[error("seal failed: {0}")]
    Seal(String),

    /// The backend could not send the envelope
    #[error("send failed: {0}")]
    Send(String),

    /// A filter option had the wrong shape
    #[error("invalid filter option `{field}`: {reason}")]
    InvalidFilter {
        /// Name of the option
        field: String,
        /// What was wrong with it
        reason: String,
    },
}

impl From<hex::FromHexError> for MessagingError {
    fn from(err: hex::FromHexError) -> Self {
        MessagingError::InvalidHex(err.to_string())
    }
}
