//! Wizard error types.
//!
//! None of these end the session: the wizard stays on its current step and
//! the caller re-renders. Service failures are not errors here at all; they
//! become the session notice.

use plumb_core::case::CaseField;
use plumb_core::enums::WizardStep;
use plumb_core::errors::CoreError;
use plumb_property::PropertyError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WizardError {
    /// Required fields of the current step are still empty.
    #[error("cannot leave {step}: missing {}", join_fields(.missing))]
    Incomplete {
        step: WizardStep,
        missing: Vec<CaseField>,
    },

    /// The action does not belong to the current step.
    #[error("'{action}' is not available during {step}")]
    NotAvailable {
        action: &'static str,
        step: WizardStep,
    },

    /// An answer was rejected by the question it targets.
    #[error("'{value}' is not a valid answer for {field}")]
    InvalidAnswer { field: CaseField, value: String },

    /// Feedback cannot be given before a report exists.
    #[error("no diagnosis report yet; run the diagnosis first")]
    NoReport,

    /// The correction text was blank.
    #[error("describe the actual cause before submitting")]
    EmptyCorrection,

    /// The year is outside the configured bounds.
    #[error("year {year} is outside {min}..={max}")]
    YearOutOfRange { year: i32, min: i32, max: i32 },

    #[error(transparent)]
    Property(#[from] PropertyError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

fn join_fields(fields: &[CaseField]) -> String {
    fields
        .iter()
        .map(|field| field.key())
        .collect::<Vec<_>>()
        .join(", ")
}
