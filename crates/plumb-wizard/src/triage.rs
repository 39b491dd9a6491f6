//! Location-driven triage branches.
//!
//! Each [`Location`] owns exactly one [`TriageBranch`]: its questions, which
//! of them are required, and the values the location implies on its own.

use plumb_core::case::CaseField;
use plumb_core::enums::Location;
use serde::Serialize;

/// How a branch question is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerInput {
    /// One of a fixed list of options.
    Choice(&'static [&'static str]),
    /// Free text; the placeholder is shown as a hint.
    FreeText { placeholder: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BranchQuestion {
    pub field: CaseField,
    pub prompt: &'static str,
    pub input: AnswerInput,
    pub required: bool,
}

impl BranchQuestion {
    /// Normalise an answer, or `None` if it is not acceptable.
    ///
    /// Choices match case-insensitively and are stored in their canonical
    /// spelling. Free text is trimmed and must be non-empty.
    #[must_use]
    pub fn accept(&self, value: &str) -> Option<String> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        match self.input {
            AnswerInput::Choice(options) => options
                .iter()
                .find(|option| option.eq_ignore_ascii_case(value))
                .map(|option| (*option).to_string()),
            AnswerInput::FreeText { .. } => Some(value.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TriageBranch {
    pub location: Location,
    /// Status line shown while the branch is active.
    pub banner: &'static str,
    pub questions: &'static [BranchQuestion],
    /// Fields the location fills in without asking.
    pub implied: &'static [(CaseField, &'static str)],
}

impl TriageBranch {
    #[must_use]
    pub fn question(&self, field: CaseField) -> Option<&BranchQuestion> {
        self.questions.iter().find(|q| q.field == field)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = CaseField> + '_ {
        self.questions.iter().filter(|q| q.required).map(|q| q.field)
    }
}

const CEILING: TriageBranch = TriageBranch {
    location: Location::Ceiling,
    banner: "Checking Gravity Sources...",
    questions: &[
        BranchQuestion {
            field: CaseField::Above,
            prompt: "What is directly above this spot?",
            input: AnswerInput::Choice(&["Roof / Attic", "Bathroom / Kitchen", "Nothing / Another Room"]),
            required: true,
        },
        BranchQuestion {
            field: CaseField::Character,
            prompt: "When does it leak?",
            input: AnswerInput::Choice(&[
                "Only when it rains",
                "Constant drip",
                "Only when showering upstairs",
            ]),
            required: true,
        },
    ],
    implied: &[],
};

const FLOOR: TriageBranch = TriageBranch {
    location: Location::Floor,
    banner: "Checking Hydrostatic & Supply Sources...",
    questions: &[
        BranchQuestion {
            field: CaseField::Character,
            prompt: "Touch the water. Is it:",
            input: AnswerInput::Choice(&["Warm / Hot", "Cold / Room Temp"]),
            required: true,
        },
        BranchQuestion {
            field: CaseField::Symptoms,
            prompt: "Any specific smell or sound?",
            input: AnswerInput::FreeText {
                placeholder: "e.g., Hissing sound, Musty smell",
            },
            required: false,
        },
    ],
    implied: &[(CaseField::Above, "N/A (Floor Leak)")],
};

const WALL: TriageBranch = TriageBranch {
    location: Location::Wall,
    banner: "Checking Risers & Drains...",
    questions: &[
        BranchQuestion {
            field: CaseField::Character,
            prompt: "Is the wall soft or bubbling?",
            input: AnswerInput::FreeText {
                placeholder: "Yes/No",
            },
            required: true,
        },
        BranchQuestion {
            field: CaseField::Symptoms,
            prompt: "Is this wall shared with a bathroom?",
            input: AnswerInput::FreeText {
                placeholder: "Yes, shower is behind it",
            },
            required: false,
        },
    ],
    implied: &[(CaseField::Above, "Inside Wall")],
};

/// The one branch handling `location`.
#[must_use]
pub const fn branch(location: Location) -> &'static TriageBranch {
    match location {
        Location::Ceiling => &CEILING,
        Location::Floor => &FLOOR,
        Location::Wall => &WALL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Location::Ceiling, &[CaseField::Above, CaseField::Character])]
    #[case(Location::Floor, &[CaseField::Character])]
    #[case(Location::Wall, &[CaseField::Character])]
    fn required_fields_per_branch(#[case] location: Location, #[case] expected: &[CaseField]) {
        let required: Vec<_> = branch(location).required_fields().collect();
        assert_eq!(required, expected);
    }

    #[test]
    fn branch_is_keyed_by_its_location() {
        for location in Location::ALL {
            assert_eq!(branch(location).location, location);
        }
    }

    #[test]
    fn choice_answers_are_canonicalised() {
        let q = branch(Location::Floor).question(CaseField::Character).unwrap();
        assert_eq!(q.accept("warm / hot").as_deref(), Some("Warm / Hot"));
        assert!(q.accept("Lukewarm").is_none());
    }

    #[test]
    fn free_text_must_not_be_blank() {
        let q = branch(Location::Wall).question(CaseField::Character).unwrap();
        assert_eq!(q.accept("  Yes, bubbling  ").as_deref(), Some("Yes, bubbling"));
        assert!(q.accept("   ").is_none());
    }

    #[test]
    fn ceiling_does_not_ask_about_symptoms() {
        assert!(branch(Location::Ceiling).question(CaseField::Symptoms).is_none());
    }
}
