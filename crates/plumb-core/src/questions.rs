//! Follow-up question sets produced by the external service.
//!
//! The service is asked for a JSON object `{"questions": [..]}`. Its output is
//! treated as untyped data: anything that does not validate falls back to
//! [`DEFAULT_QUESTIONS`] without surfacing an error.

use serde::Serialize;
use serde_json::Value;

/// Upper bound on follow-up questions per case.
pub const MAX_QUESTIONS: usize = 3;

/// Used whenever the service response cannot be turned into questions.
pub const DEFAULT_QUESTIONS: [&str; MAX_QUESTIONS] = [
    "When did you first notice the water or staining?",
    "Does the leak get worse when a specific fixture (shower, toilet, washer) is running?",
    "Have there been any recent repairs, renovations, or heavy rain near the affected area?",
];

/// Where a question set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionSource {
    Generated,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DynamicQuestionSet {
    questions: Vec<String>,
    pub source: QuestionSource,
}

impl DynamicQuestionSet {
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            questions: DEFAULT_QUESTIONS.iter().map(ToString::to_string).collect(),
            source: QuestionSource::Fallback,
        }
    }

    /// Parse a raw service response. Never fails.
    ///
    /// Accepts a JSON object whose `questions` key holds strings, optionally
    /// wrapped in a Markdown code fence. Blank and non-string entries are
    /// dropped and at most [`MAX_QUESTIONS`] are kept. An empty result, a
    /// missing key, or unparseable JSON yields [`Self::fallback`].
    #[must_use]
    pub fn from_response(raw: &str) -> Self {
        let value: Value = match serde_json::from_str(strip_code_fence(raw)) {
            Ok(value) => value,
            Err(error) => {
                tracing::warn!(%error, "question response is not valid JSON; using defaults");
                return Self::fallback();
            }
        };

        let Some(items) = value.get("questions").and_then(Value::as_array) else {
            tracing::warn!("question response has no 'questions' list; using defaults");
            return Self::fallback();
        };

        let questions: Vec<String> = items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .take(MAX_QUESTIONS)
            .map(str::to_string)
            .collect();

        if questions.is_empty() {
            tracing::warn!("question response held no usable questions; using defaults");
            return Self::fallback();
        }

        Self {
            questions,
            source: QuestionSource::Generated,
        }
    }

    #[must_use]
    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(body) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = body.strip_prefix("json").unwrap_or(body);
    body.strip_suffix("```").unwrap_or(body).trim()
}
