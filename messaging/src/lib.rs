//! GVM Messaging
//!
//! Collaborators that sit next to the execution runtime but share none of
//! its state:
//!
//! - [`whisper`]: posting sealed messages and watching for incoming ones,
//!   over an injected [`whisper::WhisperBackend`] that owns identities and
//!   encryption.
//! - [`filter`]: building a log query predicate from a loosely typed
//!   key/value option bag.
//!
//! Hex-encoded inputs may carry an optional `0x` prefix.

#![warn(missing_docs)]

pub mod error;
pub mod filter;
pub mod whisper;

pub use error::{MessagingError, Result};
pub use filter::{LogFilter, LogRecord};
pub use whisper::{Topic, Whisper, WhisperBackend, WhisperMessage};

/// Decode a hex string, with or without a `0x` prefix
pub fn from_hex(input: &str) -> Result<Vec<u8>> {
    let digits = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input);
    Ok(hex::decode(digits)?)
}

/// Encode bytes as a `0x` prefixed hex string
pub fn to_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}
