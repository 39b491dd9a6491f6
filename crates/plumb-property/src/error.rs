//! Property lookup error types.

use thiserror::Error;

/// Failures of a property records backend.
///
/// An address that matches nothing is not an error; see
/// [`crate::PropertyMatch::found`].
#[derive(Debug, Error)]
pub enum PropertyError {
    /// The records backend could not be reached or answered badly.
    #[error("property records unavailable: {0}")]
    Unavailable(String),

    /// The address was empty after trimming.
    #[error("address is empty")]
    EmptyAddress,
}
