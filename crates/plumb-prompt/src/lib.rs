//! # plumb-prompt
//!
//! Turns a case snapshot, the session's learned rules, and an optional
//! interview transcript into a [`PromptDocument`] ready for the diagnosis
//! client.
//!
//! Two compositions are offered:
//! - [`composer::diagnosis`]: the forensic report prompt (free text back).
//! - [`composer::questions`]: the follow-up question prompt (JSON back).

pub mod composer;
pub mod document;

pub use document::{ChatMessage, ContentPart, ImageUrl, PromptDocument, ResponseFormat, Role};
