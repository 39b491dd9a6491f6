//! The case wizard: a step machine over one [`Session`].
//!
//! Every user input is an [`Action`]. [`Wizard::apply`] either performs the
//! whole update or none of it, so a renderer never observes a half-applied
//! step. Required-field gaps are reported as [`WizardError::Incomplete`] and
//! leave the session untouched; callers should consult
//! [`Wizard::can_advance`] and not offer the advance control at all.

use plumb_config::WizardConfig;
use plumb_core::case::CaseField;
use plumb_core::enums::{Location, WizardStep};
use plumb_core::evidence::Evidence;
use plumb_core::questions::DynamicQuestionSet;
use plumb_core::rules::LearnedRule;
use plumb_core::store::{FieldStore, MemoryStore};
use plumb_diagnosis::DiagnosisClient;
use plumb_prompt::{PromptDocument, composer};
use plumb_property::{MockPropertyTable, PropertyLookup};

use crate::error::WizardError;
use crate::session::Session;
use crate::triage::{self, TriageBranch};

/// A single user input.
#[derive(Debug, Clone)]
pub enum Action {
    // Intake
    SetYear(i32),
    SetDescription(String),
    AttachMedia(Evidence),
    RemoveMedia,
    FetchProperty(String),
    ChooseFloorPlan(String),
    StartTriage,
    // Triage
    SelectLocation(Location),
    Answer { field: CaseField, value: String },
    Analyze,
    // Interview
    GenerateQuestions,
    AnswerQuestion { index: usize, answer: String },
    FinishInterview,
    // Diagnosis and feedback
    RunDiagnosis,
    ConfirmDiagnosis,
    RejectDiagnosis,
    SubmitCorrection(String),
    // Any step
    NewCase,
    ClearSession,
}

impl Action {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SetYear(_) => "set year",
            Self::SetDescription(_) => "set description",
            Self::AttachMedia(_) => "attach media",
            Self::RemoveMedia => "remove media",
            Self::FetchProperty(_) => "fetch property",
            Self::ChooseFloorPlan(_) => "choose floor plan",
            Self::StartTriage => "start triage",
            Self::SelectLocation(_) => "select location",
            Self::Answer { .. } => "answer",
            Self::Analyze => "analyze",
            Self::GenerateQuestions => "generate questions",
            Self::AnswerQuestion { .. } => "answer question",
            Self::FinishInterview => "finish interview",
            Self::RunDiagnosis => "run diagnosis",
            Self::ConfirmDiagnosis => "confirm diagnosis",
            Self::RejectDiagnosis => "reject diagnosis",
            Self::SubmitCorrection(_) => "submit correction",
            Self::NewCase => "new case",
            Self::ClearSession => "clear session",
        }
    }
}

pub struct Wizard<C, L = MockPropertyTable, S = MemoryStore> {
    client: C,
    lookup: L,
    config: WizardConfig,
    session: Session<S>,
}

impl<C: DiagnosisClient> Wizard<C> {
    /// Wizard over a fresh in-memory session and the bundled property table.
    pub fn new(client: C, config: WizardConfig) -> Self {
        Self::with_session(client, MockPropertyTable::default(), config, Session::new())
    }
}

impl<C, L, S> Wizard<C, L, S>
where
    C: DiagnosisClient,
    L: PropertyLookup,
    S: FieldStore,
{
    pub const fn with_session(
        client: C,
        lookup: L,
        config: WizardConfig,
        session: Session<S>,
    ) -> Self {
        Self {
            client,
            lookup,
            config,
            session,
        }
    }

    #[must_use]
    pub const fn session(&self) -> &Session<S> {
        &self.session
    }

    #[must_use]
    pub const fn client(&self) -> &C {
        &self.client
    }

    /// Mutable client access, e.g. to install a credential typed at runtime.
    pub const fn client_mut(&mut self) -> &mut C {
        &mut self.client
    }

    #[must_use]
    pub const fn config(&self) -> &WizardConfig {
        &self.config
    }

    #[must_use]
    pub const fn step(&self) -> WizardStep {
        self.session.step
    }

    /// The triage branch currently on screen. Exactly one while a location is
    /// selected during triage, otherwise none.
    #[must_use]
    pub fn active_branch(&self) -> Option<&'static TriageBranch> {
        if self.session.step != WizardStep::Triage {
            return None;
        }
        self.session.case.location().map(triage::branch)
    }

    /// Steps of this wizard's flow, in order, excluding `Closed`.
    #[must_use]
    pub fn flow(&self) -> Vec<WizardStep> {
        let mut steps = vec![WizardStep::Intake, WizardStep::Triage];
        if self.config.interview {
            steps.extend([WizardStep::AutoQuestions, WizardStep::Interview]);
        }
        steps.extend([WizardStep::Diagnosis, WizardStep::Feedback]);
        steps
    }

    /// Position in the flow as a percentage.
    #[must_use]
    pub fn progress_percent(&self) -> u8 {
        let flow = self.flow();
        let Some(position) = flow.iter().position(|s| *s == self.session.step) else {
            return 100;
        };
        u8::try_from((position + 1) * 100 / flow.len()).unwrap_or(100)
    }

    /// The diagnosis document the current case would send, without sending it.
    #[must_use]
    pub fn preview(&self) -> PromptDocument {
        composer::diagnosis(&self.session.case.snapshot(), &self.session.rules)
    }

    /// Required fields of the current step that are still empty.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<CaseField> {
        let case = &self.session.case;
        match self.session.step {
            WizardStep::Intake => {
                let mut missing = Vec::new();
                if !case
                    .year_built()
                    .is_some_and(|year| self.config.accepts_year(year))
                {
                    missing.push(CaseField::YearBuilt);
                }
                if self.config.property_lookup {
                    for field in [CaseField::Address, CaseField::FloorPlan] {
                        if !case.has(field) {
                            missing.push(field);
                        }
                    }
                }
                missing
            }
            WizardStep::Triage => match case.location() {
                None => vec![CaseField::Location],
                Some(location) => triage::branch(location)
                    .required_fields()
                    .filter(|field| !case.has(*field))
                    .collect(),
            },
            _ => Vec::new(),
        }
    }

    /// Whether the step's advance control should be offered.
    #[must_use]
    pub fn can_advance(&self) -> bool {
        match self.session.step {
            WizardStep::Intake | WizardStep::Triage => self.missing_fields().is_empty(),
            WizardStep::Diagnosis => self.session.report.is_some(),
            WizardStep::AutoQuestions
            | WizardStep::Interview
            | WizardStep::Feedback
            | WizardStep::Closed => true,
        }
    }

    /// Apply one action and return the (possibly unchanged) step.
    ///
    /// Failed service calls are not errors: the step stays put and the
    /// session notice carries the displayable message.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError`] when the action does not fit the step, an
    /// answer is rejected, or required fields are missing. The session is
    /// unchanged in every error case.
    pub async fn apply(&mut self, action: Action) -> Result<WizardStep, WizardError> {
        let step = self.session.step;
        tracing::debug!(%step, action = action.name(), "wizard action");

        match (step, action) {
            (_, Action::NewCase) => {
                self.session.restart();
                Ok(self.session.step)
            }
            (_, Action::ClearSession) => {
                self.session.clear();
                Ok(self.session.step)
            }

            (WizardStep::Intake, Action::SetYear(year)) => {
                if !self.config.accepts_year(year) {
                    return Err(WizardError::YearOutOfRange {
                        year,
                        min: self.config.min_year,
                        max: self.config.max_year,
                    });
                }
                self.session.case.set(CaseField::YearBuilt, year.to_string());
                Ok(step)
            }
            (WizardStep::Intake, Action::SetDescription(text)) => {
                self.session.case.set(CaseField::Description, text);
                Ok(step)
            }
            (WizardStep::Intake, Action::AttachMedia(media)) => {
                self.session.case.set_media(media);
                Ok(step)
            }
            (WizardStep::Intake, Action::RemoveMedia) => {
                self.session.case.clear_media();
                Ok(step)
            }
            (WizardStep::Intake, Action::FetchProperty(address)) if self.config.property_lookup => {
                self.fetch_property(&address).await?;
                Ok(step)
            }
            (WizardStep::Intake, Action::ChooseFloorPlan(plan)) if self.config.property_lookup => {
                self.choose_floor_plan(&plan)?;
                Ok(step)
            }
            (WizardStep::Intake, Action::StartTriage) => {
                self.require_complete()?;
                self.transition(WizardStep::Triage)
            }

            (WizardStep::Triage, Action::SelectLocation(location)) => {
                self.select_location(location);
                Ok(step)
            }
            (WizardStep::Triage, Action::Answer { field, value }) => {
                self.answer_branch(field, &value)?;
                Ok(step)
            }
            (WizardStep::Triage, Action::Analyze) => {
                self.require_complete()?;
                if self.config.interview {
                    self.transition(WizardStep::AutoQuestions)
                } else {
                    self.transition(WizardStep::Diagnosis)
                }
            }

            (WizardStep::AutoQuestions, Action::GenerateQuestions) => {
                let document = composer::questions(&self.session.case.snapshot(), &self.session.rules);
                match self.call_service(&document).await {
                    Some(reply) => {
                        let questions = DynamicQuestionSet::from_response(&reply);
                        tracing::debug!(
                            count = questions.len(),
                            source = ?questions.source,
                            "follow-up questions ready"
                        );
                        self.session.case.set_questions(questions);
                        self.transition(WizardStep::Interview)
                    }
                    None => Ok(step),
                }
            }
            (WizardStep::Interview, Action::AnswerQuestion { index, answer }) => {
                self.session.case.set_answer(index, answer)?;
                Ok(step)
            }
            (WizardStep::Interview, Action::FinishInterview) => {
                self.transition(WizardStep::Diagnosis)
            }

            (WizardStep::Diagnosis, Action::RunDiagnosis) => {
                let document = self.preview();
                if let Some(report) = self.call_service(&document).await {
                    self.session.report = Some(report);
                }
                Ok(step)
            }
            (WizardStep::Diagnosis, Action::ConfirmDiagnosis) => {
                self.require_report()?;
                tracing::info!("diagnosis confirmed; closing case");
                self.transition(WizardStep::Closed)
            }
            (WizardStep::Diagnosis, Action::RejectDiagnosis) => {
                self.require_report()?;
                self.transition(WizardStep::Feedback)
            }

            (WizardStep::Feedback, Action::SubmitCorrection(correction)) => {
                if correction.trim().is_empty() {
                    return Err(WizardError::EmptyCorrection);
                }
                self.transition(WizardStep::Intake)?;
                let context = self.session.case.get(CaseField::Character);
                let rule = LearnedRule::from_correction(context, correction.trim());
                tracing::info!(rules = self.session.rules.len() + 1, "learned rule from correction");
                self.session.rules.push(rule);
                self.session.restart();
                Ok(self.session.step)
            }

            (step, action) => Err(WizardError::NotAvailable {
                action: action.name(),
                step,
            }),
        }
    }

    async fn fetch_property(&mut self, address: &str) -> Result<(), WizardError> {
        let found = self.lookup.lookup(address).await?;
        if !found.found() {
            tracing::info!(address, "address not in property records; using defaults");
        }

        let case = &mut self.session.case;
        case.set(CaseField::Address, address.trim());
        case.set(CaseField::YearBuilt, found.record.year_built.to_string());
        case.set(CaseField::SquareFeet, found.record.square_feet.to_string());
        match found.record.floor_plans.first() {
            Some(plan) => case.set(CaseField::FloorPlan, plan.clone()),
            None => case.unset(CaseField::FloorPlan),
        }
        self.session.property = Some(found);
        Ok(())
    }

    fn choose_floor_plan(&mut self, plan: &str) -> Result<(), WizardError> {
        let chosen = self
            .session
            .property
            .as_ref()
            .and_then(|found| {
                found
                    .record
                    .floor_plans
                    .iter()
                    .find(|candidate| candidate.eq_ignore_ascii_case(plan.trim()))
            })
            .cloned()
            .ok_or_else(|| WizardError::InvalidAnswer {
                field: CaseField::FloorPlan,
                value: plan.to_string(),
            })?;
        self.session.case.set(CaseField::FloorPlan, chosen);
        Ok(())
    }

    fn select_location(&mut self, location: Location) {
        let case = &mut self.session.case;
        if case.location() == Some(location) {
            return;
        }
        for field in CaseField::BRANCH {
            case.unset(field);
        }
        case.set(CaseField::Location, location.as_str());
        for (field, value) in triage::branch(location).implied {
            case.set(*field, *value);
        }
    }

    fn answer_branch(&mut self, field: CaseField, value: &str) -> Result<(), WizardError> {
        let Some(branch) = self.active_branch() else {
            return Err(WizardError::Incomplete {
                step: WizardStep::Triage,
                missing: vec![CaseField::Location],
            });
        };
        let accepted = branch
            .question(field)
            .and_then(|question| question.accept(value))
            .ok_or_else(|| WizardError::InvalidAnswer {
                field,
                value: value.to_string(),
            })?;
        self.session.case.set(field, accepted);
        Ok(())
    }

    fn require_complete(&self) -> Result<(), WizardError> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(WizardError::Incomplete {
                step: self.session.step,
                missing,
            })
        }
    }

    fn require_report(&self) -> Result<(), WizardError> {
        if self.session.report.is_some() {
            Ok(())
        } else {
            Err(WizardError::NoReport)
        }
    }

    fn transition(&mut self, next: WizardStep) -> Result<WizardStep, WizardError> {
        let from = self.session.step;
        if !from.can_transition_to(next) {
            return Err(WizardError::NotAvailable {
                action: next.as_str(),
                step: from,
            });
        }
        tracing::debug!(%from, to = %next, "wizard transition");
        self.session.step = next;
        self.session.notice = None;
        Ok(next)
    }

    /// Call the service once. Failures become the session notice.
    async fn call_service(&mut self, document: &PromptDocument) -> Option<String> {
        match self.client.complete(document).await {
            Ok(reply) => {
                self.session.notice = None;
                Some(reply)
            }
            Err(error) => {
                tracing::warn!(%error, step = %self.session.step, "diagnosis service call failed");
                self.session.notice = Some(error.user_message());
                None
            }
        }
    }
}
