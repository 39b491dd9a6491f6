//! # plumb-diagnosis
//!
//! Client side of the external reasoning service.
//!
//! [`DiagnosisClient`] is the injectable seam. [`OpenAiClient`] talks to any
//! OpenAI-compatible `/chat/completions` endpoint; [`stub::ScriptedClient`]
//! replays canned replies so the wizard can be tested deterministically.
//!
//! Failure policy:
//! - A missing credential short-circuits before any request is built.
//! - Transport and status failures come back as [`DiagnosisError`]; callers
//!   turn them into a displayable message with
//!   [`DiagnosisError::user_message`].

mod client;
mod error;
mod http;
pub mod stub;

pub use client::{DiagnosisClient, OpenAiClient};
pub use error::DiagnosisError;
