//! Learned rules captured from user corrections.
//!
//! Rules are append-only for the life of a session. They are never
//! deduplicated or validated, and prompts inject them verbatim in the order
//! they were learned.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::UNKNOWN;

/// A user's correction of a wrong diagnosis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LearnedRule {
    /// Symptom context the correction was made under.
    pub context: String,
    /// What the user said the real cause was.
    pub correction: String,
    pub learned_at: DateTime<Utc>,
}

impl LearnedRule {
    #[must_use]
    pub fn from_correction(context: Option<&str>, correction: &str) -> Self {
        Self {
            context: context
                .filter(|c| !c.trim().is_empty())
                .unwrap_or(UNKNOWN)
                .to_string(),
            correction: correction.to_string(),
            learned_at: Utc::now(),
        }
    }

    /// Rule text as injected into prompts.
    #[must_use]
    pub fn text(&self) -> String {
        format!(
            "User Correction: When symptoms match '{}', consider '{}' as high priority.",
            self.context, self.correction
        )
    }
}

/// Ordered, session-scoped list of learned rules.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RuleBook {
    rules: Vec<LearnedRule>,
}

impl RuleBook {
    #[must_use]
    pub const fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn push(&mut self, rule: LearnedRule) {
        self.rules.push(rule);
    }

    pub fn iter(&self) -> impl Iterator<Item = &LearnedRule> {
        self.rules.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn clear(&mut self) {
        self.rules.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_text_matches_correction_template() {
        let rule = LearnedRule::from_correction(Some("Constant drip"), "shower valve");
        assert_eq!(
            rule.text(),
            "User Correction: When symptoms match 'Constant drip', consider 'shower valve' as high priority."
        );
    }

    #[test]
    fn missing_context_renders_unknown() {
        let rule = LearnedRule::from_correction(None, "roof flashing");
        assert_eq!(rule.context, "Unknown");
        let blank = LearnedRule::from_correction(Some("  "), "roof flashing");
        assert_eq!(blank.context, "Unknown");
    }

    #[test]
    fn duplicates_are_kept_in_order() {
        let mut book = RuleBook::new();
        book.push(LearnedRule::from_correction(Some("a"), "x"));
        book.push(LearnedRule::from_correction(Some("a"), "x"));
        book.push(LearnedRule::from_correction(Some("b"), "y"));
        assert_eq!(book.len(), 3);
        let corrections: Vec<_> = book.iter().map(|r| r.correction.as_str()).collect();
        assert_eq!(corrections, ["x", "x", "y"]);
    }
}
