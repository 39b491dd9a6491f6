//! Per-user session state owned by the wizard.

use plumb_core::enums::WizardStep;
use plumb_core::rules::RuleBook;
use plumb_core::store::{CaseStore, FieldStore, MemoryStore};
use plumb_property::PropertyMatch;

/// Everything one user's session holds: the current case, the learned rules,
/// and the wizard's position.
///
/// Sessions are isolated values; nothing is shared between them.
#[derive(Debug, Clone, Default)]
pub struct Session<S = MemoryStore> {
    pub case: CaseStore<S>,
    pub rules: RuleBook,
    pub(crate) step: WizardStep,
    pub(crate) report: Option<String>,
    pub(crate) notice: Option<String>,
    pub(crate) property: Option<PropertyMatch>,
}

impl<S: FieldStore> Session<S> {
    /// Session over a caller-provided field backend.
    pub fn with_backend(fields: S) -> Self {
        Self {
            case: CaseStore::with_backend(fields),
            rules: RuleBook::new(),
            step: WizardStep::Intake,
            report: None,
            notice: None,
            property: None,
        }
    }

    #[must_use]
    pub const fn step(&self) -> WizardStep {
        self.step
    }

    /// Report text from the last successful diagnosis of this case.
    #[must_use]
    pub fn report(&self) -> Option<&str> {
        self.report.as_deref()
    }

    /// Displayable message from the last failed service call.
    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Result of the last property lookup for this case.
    #[must_use]
    pub const fn property(&self) -> Option<&PropertyMatch> {
        self.property.as_ref()
    }

    /// Start a new case. Learned rules survive.
    pub fn restart(&mut self) {
        self.case.reset();
        self.step = WizardStep::Intake;
        self.report = None;
        self.notice = None;
        self.property = None;
    }

    /// Drop the case and every learned rule.
    pub fn clear(&mut self) {
        self.restart();
        self.rules.clear();
    }
}

impl Session<MemoryStore> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plumb_core::case::CaseField;
    use plumb_core::rules::LearnedRule;

    #[test]
    fn new_session_starts_at_intake() {
        let session = Session::new();
        assert_eq!(session.step(), WizardStep::Intake);
        assert!(session.rules.is_empty());
        assert!(session.report().is_none());
    }

    #[test]
    fn restart_keeps_rules() {
        let mut session = Session::new();
        session.case.set(CaseField::YearBuilt, "1960");
        session
            .rules
            .push(LearnedRule::from_correction(Some("Constant drip"), "vent stack"));
        session.step = WizardStep::Closed;
        session.restart();
        assert_eq!(session.step(), WizardStep::Intake);
        assert!(!session.case.has(CaseField::YearBuilt));
        assert_eq!(session.rules.len(), 1);
    }

    #[test]
    fn clear_drops_rules() {
        let mut session = Session::new();
        session
            .rules
            .push(LearnedRule::from_correction(None, "vent stack"));
        session.clear();
        assert!(session.rules.is_empty());
    }
}
