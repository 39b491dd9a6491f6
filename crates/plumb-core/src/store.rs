//! Case store: keyed field access over a swappable key-value backend.
//!
//! The store accepts any value for any key. Schema checks belong to the
//! wizard, which gates transitions on required fields. Missing fields read as
//! `None` here and render as `Unknown` in prompts.

use std::collections::BTreeMap;

use crate::UNKNOWN;
use crate::case::{Case, CaseField, QaPair};
use crate::errors::CoreError;
use crate::evidence::Evidence;
use crate::questions::DynamicQuestionSet;

/// Key-value backend for case fields.
///
/// Implement this to back a case with a host session mechanism instead of
/// process memory.
pub trait FieldStore {
    fn get(&self, key: &str) -> Option<&str>;
    fn set(&mut self, key: &str, value: String);
    fn remove(&mut self, key: &str) -> Option<String>;
    fn clear(&mut self);
}

/// In-memory [`FieldStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl FieldStore for MemoryStore {
    fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    fn set(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }

    fn clear(&mut self) {
        self.values.clear();
    }
}

/// Field values, media, and interview state for one case.
#[derive(Debug, Clone, Default)]
pub struct CaseStore<S = MemoryStore> {
    fields: S,
    media: Option<Evidence>,
    questions: Option<DynamicQuestionSet>,
    answers: Vec<String>,
}

impl<S: FieldStore> CaseStore<S> {
    pub const fn with_backend(fields: S) -> Self {
        Self {
            fields,
            media: None,
            questions: None,
            answers: Vec::new(),
        }
    }

    /// Raw value, treating blank strings as absent.
    #[must_use]
    pub fn get(&self, field: CaseField) -> Option<&str> {
        self.fields
            .get(field.key())
            .filter(|value| !value.trim().is_empty())
    }

    /// Value with default-on-missing semantics.
    #[must_use]
    pub fn get_or_unknown(&self, field: CaseField) -> &str {
        self.get(field).unwrap_or(UNKNOWN)
    }

    #[must_use]
    pub fn has(&self, field: CaseField) -> bool {
        self.get(field).is_some()
    }

    pub fn set(&mut self, field: CaseField, value: impl Into<String>) {
        self.fields.set(field.key(), value.into());
    }

    pub fn unset(&mut self, field: CaseField) {
        self.fields.remove(field.key());
    }

    /// Any-key access for callers extending the case beyond [`CaseField`].
    pub fn set_raw(&mut self, key: &str, value: impl Into<String>) {
        self.fields.set(key, value.into());
    }

    #[must_use]
    pub fn get_raw(&self, key: &str) -> Option<&str> {
        self.fields.get(key)
    }

    #[must_use]
    pub fn year_built(&self) -> Option<i32> {
        self.get(CaseField::YearBuilt)?.trim().parse().ok()
    }

    #[must_use]
    pub fn location(&self) -> Option<crate::enums::Location> {
        self.get(CaseField::Location)?.parse().ok()
    }

    pub fn set_media(&mut self, media: Evidence) {
        self.media = Some(media);
    }

    pub fn clear_media(&mut self) {
        self.media = None;
    }

    #[must_use]
    pub const fn media(&self) -> Option<&Evidence> {
        self.media.as_ref()
    }

    /// Install a question set. Answers are reset to one blank per question.
    pub fn set_questions(&mut self, questions: DynamicQuestionSet) {
        self.answers = vec![String::new(); questions.len()];
        self.questions = Some(questions);
    }

    #[must_use]
    pub const fn questions(&self) -> Option<&DynamicQuestionSet> {
        self.questions.as_ref()
    }

    #[must_use]
    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    /// Record the answer to question `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::AnswerOutOfRange`] when no question has that index.
    pub fn set_answer(&mut self, index: usize, answer: impl Into<String>) -> Result<(), CoreError> {
        let len = self.questions.as_ref().map_or(0, DynamicQuestionSet::len);
        if index >= len {
            return Err(CoreError::AnswerOutOfRange { index, len });
        }
        if self.answers.len() < len {
            self.answers.resize(len, String::new());
        }
        self.answers[index] = answer.into();
        Ok(())
    }

    /// Question/answer pairs in question order. Missing or blank answers
    /// become `Unknown`.
    #[must_use]
    pub fn transcript(&self) -> Vec<QaPair> {
        let Some(questions) = &self.questions else {
            return Vec::new();
        };
        questions
            .questions()
            .iter()
            .enumerate()
            .map(|(i, question)| QaPair {
                question: question.clone(),
                answer: self
                    .answers
                    .get(i)
                    .map(|a| a.trim())
                    .filter(|a| !a.is_empty())
                    .unwrap_or(UNKNOWN)
                    .to_string(),
            })
            .collect()
    }

    /// Empty every field, drop media, and forget the interview.
    pub fn reset(&mut self) {
        self.fields.clear();
        self.media = None;
        self.questions = None;
        self.answers.clear();
    }

    #[must_use]
    pub fn snapshot(&self) -> Case {
        let text = |field| self.get(field).map(str::to_string);
        Case {
            year_built: self.year_built(),
            location: self.location(),
            above: text(CaseField::Above),
            character: text(CaseField::Character),
            symptoms: text(CaseField::Symptoms),
            description: text(CaseField::Description),
            address: text(CaseField::Address),
            square_feet: self
                .get(CaseField::SquareFeet)
                .and_then(|v| v.trim().parse().ok()),
            floor_plan: text(CaseField::FloorPlan),
            media: self.media.clone(),
            interview: self.transcript(),
        }
    }
}

impl CaseStore<MemoryStore> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::Location;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_fields_default_to_unknown() {
        let store = CaseStore::new();
        assert_eq!(store.get_or_unknown(CaseField::Above), "Unknown");
        assert!(store.year_built().is_none());
    }

    #[test]
    fn blank_values_count_as_missing() {
        let mut store = CaseStore::new();
        store.set(CaseField::Symptoms, "   ");
        assert!(!store.has(CaseField::Symptoms));
    }

    #[test]
    fn overwrite_replaces_single_field() {
        let mut store = CaseStore::new();
        store.set(CaseField::YearBuilt, "1995");
        store.set(CaseField::Location, "ceiling");
        store.set(CaseField::YearBuilt, "1954");
        assert_eq!(store.year_built(), Some(1954));
        assert_eq!(store.location(), Some(Location::Ceiling));
    }

    #[test]
    fn store_accepts_arbitrary_keys() {
        let mut store = CaseStore::new();
        store.set_raw("inspector_notes", "stain is 2ft wide");
        assert_eq!(store.get_raw("inspector_notes"), Some("stain is 2ft wide"));
    }

    #[test]
    fn non_numeric_year_reads_as_missing() {
        let mut store = CaseStore::new();
        store.set(CaseField::YearBuilt, "nineteen fifty");
        assert!(store.year_built().is_none());
        assert!(store.has(CaseField::YearBuilt));
    }

    #[test]
    fn reset_clears_everything() {
        let mut store = CaseStore::new();
        store.set(CaseField::YearBuilt, "2001");
        store.set_media(Evidence::new(vec![1, 2], "image/png"));
        store.set_questions(DynamicQuestionSet::fallback());
        store.reset();
        assert!(!store.has(CaseField::YearBuilt));
        assert!(store.media().is_none());
        assert!(store.questions().is_none());
        assert!(store.answers().is_empty());
    }

    #[test]
    fn transcript_fills_gaps_with_unknown() {
        let mut store = CaseStore::new();
        store.set_questions(DynamicQuestionSet::fallback());
        store.set_answer(1, "Yes, when the shower runs").unwrap();

        let transcript = store.transcript();
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript[0].answer, "Unknown");
        assert_eq!(transcript[1].answer, "Yes, when the shower runs");
        assert_eq!(transcript[2].answer, "Unknown");
    }

    #[test]
    fn answer_out_of_range_is_rejected() {
        let mut store = CaseStore::new();
        let err = store.set_answer(0, "x").unwrap_err();
        assert!(matches!(err, CoreError::AnswerOutOfRange { index: 0, len: 0 }));
    }

    #[test]
    fn snapshot_carries_fields() {
        let mut store = CaseStore::new();
        store.set(CaseField::YearBuilt, "1978");
        store.set(CaseField::Location, "Wall / Cabinet");
        store.set(CaseField::SquareFeet, "1850");
        store.set(CaseField::Character, "Yes");
        let case = store.snapshot();
        assert_eq!(case.year_built, Some(1978));
        assert_eq!(case.location, Some(Location::Wall));
        assert_eq!(case.square_feet, Some(1850));
        assert_eq!(case.character.as_deref(), Some("Yes"));
        assert!(case.above.is_none());
    }
}
