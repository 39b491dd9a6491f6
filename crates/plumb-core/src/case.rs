//! The in-progress case and its field keys.

use serde::Serialize;
use std::fmt;

use crate::enums::Location;
use crate::evidence::Evidence;

/// Keys of the case fields held in the field store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseField {
    YearBuilt,
    Location,
    Above,
    Character,
    Symptoms,
    Description,
    Address,
    SquareFeet,
    FloorPlan,
}

impl CaseField {
    pub const ALL: [Self; 9] = [
        Self::YearBuilt,
        Self::Location,
        Self::Above,
        Self::Character,
        Self::Symptoms,
        Self::Description,
        Self::Address,
        Self::SquareFeet,
        Self::FloorPlan,
    ];

    /// Triage answers owned by whichever location branch is active.
    pub const BRANCH: [Self; 3] = [Self::Above, Self::Character, Self::Symptoms];

    /// Store key.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::YearBuilt => "year_built",
            Self::Location => "location",
            Self::Above => "above",
            Self::Character => "character",
            Self::Symptoms => "symptoms",
            Self::Description => "description",
            Self::Address => "address",
            Self::SquareFeet => "square_feet",
            Self::FloorPlan => "floor_plan",
        }
    }
}

impl fmt::Display for CaseField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One question/answer line of the interview transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

/// Read-only snapshot of a case, taken when a prompt is composed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Case {
    pub year_built: Option<i32>,
    pub location: Option<Location>,
    /// What sits directly above the damage.
    pub above: Option<String>,
    /// Leak timing or water temperature, depending on branch.
    pub character: Option<String>,
    pub symptoms: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub square_feet: Option<u32>,
    pub floor_plan: Option<String>,
    #[serde(skip_serializing)]
    pub media: Option<Evidence>,
    pub interview: Vec<QaPair>,
}

impl Case {
    /// Image evidence, if the uploaded media is an image.
    #[must_use]
    pub fn image(&self) -> Option<&Evidence> {
        self.media.as_ref().filter(|m| m.is_image())
    }
}
