//! # plumb-core
//!
//! Core types shared across the Plumbing Forensics crates:
//! - The in-progress [`case::Case`] and the field-level [`store::CaseStore`]
//! - Location, media, and wizard step enums
//! - Learned rules captured from user corrections
//! - Follow-up question sets with their JSON-or-fallback parsing
//! - Base64 evidence encoding for inline image parts
//! - Cross-cutting error types

pub mod case;
pub mod enums;
pub mod errors;
pub mod evidence;
pub mod questions;
pub mod rules;
pub mod store;

/// Sentinel rendered for any case field that has not been filled in.
pub const UNKNOWN: &str = "Unknown";

/// Sentinel rendered for optional free-text fields left empty.
pub const NONE: &str = "None";
