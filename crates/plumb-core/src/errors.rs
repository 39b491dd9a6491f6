//! Cross-cutting error types for Plumbing Forensics.
//!
//! Crate-specific failures (`ConfigError`, `DiagnosisError`, ...) live in
//! their own crates. The CLI converges everything through `anyhow`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// A location label did not match any known damage location.
    #[error("Unknown damage location: '{0}'")]
    UnknownLocation(String),

    /// An interview answer was addressed to a question that does not exist.
    #[error("Answer index {index} is out of range for {len} question(s)")]
    AnswerOutOfRange { index: usize, len: usize },

    /// Evidence text could not be decoded back into bytes.
    #[error("Evidence decode failed: {0}")]
    Decode(#[from] base64::DecodeError),
}
