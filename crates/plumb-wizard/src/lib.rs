//! # plumb-wizard
//!
//! The multi-step case wizard: intake, location triage, the optional
//! follow-up interview, diagnosis, and the feedback loop that turns a
//! rejected diagnosis into a learned rule.
//!
//! The renderer (terminal prompt, web form, test script) owns no state. It
//! reads [`Wizard::session`], shows the controls for the current step, and
//! feeds user input back as [`Action`]s.

pub mod error;
pub mod session;
pub mod triage;
pub mod wizard;

pub use error::WizardError;
pub use session::Session;
pub use triage::{AnswerInput, BranchQuestion, TriageBranch, branch};
pub use wizard::{Action, Wizard};
