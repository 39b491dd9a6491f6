//! Damage locations, media kinds, and wizard steps.
//!
//! All enums use `snake_case` serialization. [`WizardStep`] carries its state
//! machine through `allowed_next_states()`, which the wizard checks before
//! every transition.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// Location
// ---------------------------------------------------------------------------

/// Primary location where the water shows up. Selects the triage branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    Ceiling,
    Floor,
    Wall,
}

impl Location {
    pub const ALL: [Self; 3] = [Self::Ceiling, Self::Floor, Self::Wall];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ceiling => "ceiling",
            Self::Floor => "floor",
            Self::Wall => "wall",
        }
    }

    /// Label shown to the user and written into prompts.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ceiling => "Ceiling",
            Self::Floor => "Floor / Carpet",
            Self::Wall => "Wall / Cabinet",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Location {
    type Err = CoreError;

    /// Accepts either the storage key (`floor`) or the display label
    /// (`Floor / Carpet`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|loc| {
                needle.eq_ignore_ascii_case(loc.as_str()) || needle.eq_ignore_ascii_case(loc.label())
            })
            .ok_or_else(|| CoreError::UnknownLocation(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// MediaKind
// ---------------------------------------------------------------------------

/// Kind of uploaded evidence. Only images are forwarded to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    #[must_use]
    pub fn from_mime(mime: &str) -> Self {
        if mime.starts_with("video/") {
            Self::Video
        } else {
            Self::Image
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// WizardStep
// ---------------------------------------------------------------------------

/// Step of the case wizard.
///
/// ```text
/// intake → triage → diagnosis → feedback → intake   (incorrect, rule learned)
///                 → auto_questions → interview → diagnosis
///                                                diagnosis → closed → intake (new case)
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    #[default]
    Intake,
    Triage,
    AutoQuestions,
    Interview,
    Diagnosis,
    Feedback,
    Closed,
}

impl WizardStep {
    /// Valid next steps from the current step.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Intake => &[Self::Triage],
            Self::Triage => &[Self::AutoQuestions, Self::Diagnosis],
            Self::AutoQuestions => &[Self::Interview],
            Self::Interview => &[Self::Diagnosis],
            Self::Diagnosis => &[Self::Feedback, Self::Closed],
            Self::Feedback | Self::Closed => &[Self::Intake],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Intake => "intake",
            Self::Triage => "triage",
            Self::AutoQuestions => "auto_questions",
            Self::Interview => "interview",
            Self::Diagnosis => "diagnosis",
            Self::Feedback => "feedback",
            Self::Closed => "closed",
        }
    }

    /// Screen heading for the step.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Intake => "The Evidence",
            Self::Triage => "Where is the water coming from?",
            Self::AutoQuestions => "Preparing investigative questions",
            Self::Interview => "Follow-up Interview",
            Self::Diagnosis => "Senior Plumber Analysis",
            Self::Feedback => "Diagnostic Mismatch Detected",
            Self::Closed => "Case Closed",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
