//! Renders a case into instruction documents.
//!
//! Every document has three layers: a fixed persona preamble, a fixed output
//! template, and a facts block substituted from the case. Missing fields read
//! `Unknown` (or `None` for free-text symptoms and description).

use std::fmt::Write as _;

use plumb_core::case::Case;
use plumb_core::questions::MAX_QUESTIONS;
use plumb_core::rules::RuleBook;
use plumb_core::{NONE, UNKNOWN};

use crate::document::{ContentPart, ImageUrl, PromptDocument, ResponseFormat};

/// Heading of the learned-rules block in the facts text.
pub const RULES_HEADING: &str = "**USER CORRECTIONS (LEARNED RULES):**";

/// Heading of the interview transcript block.
pub const INTERVIEW_HEADING: &str = "**Follow-up Interview:**";

/// Instruction added whenever an image part is attached.
pub const IMAGE_NOTICE: &str = "(An image of the damage has been provided.)";

const PERSONA: &str = "You are a U.S. Licensed Senior Plumber and Forensic Specialist.";

const DIAGNOSIS_INSTRUCTIONS: &str = "\
Perform a Root Cause Analysis based on the provided text data and the attached image (if any).

thinking_process:
1. Check property age for banned materials (Polybutylene, Galvanized).
2. Apply 'Path of Least Resistance' logic based on the location.
3. IF specific \"Learned Rules\" are provided, prioritize them over standard logic.
4. IF a follow-up interview is provided, weigh each answer against the suspects.";

const DIAGNOSIS_FORMAT: &str = "\
Output Format:
## The Forensic Profile
- **Visual Analysis:** (What do you see in the photo?)
- **Suspected Pipe Material:** (Based on age/visuals)
- **Logic Path:** (Chain of Thought)

## Root Cause Probabilities
| Probability | Suspect | Reason |
| :--- | :--- | :--- |
| **High** | [Suspect 1] | [Why?] |
| **Medium** | [Suspect 2] | [Why?] |

## Recommended Action Plan
1. [Immediate Test]
2. [Secondary Test]";

/// Stage-2 (or single-stage) diagnosis prompt.
///
/// Includes the interview transcript when the case has one, and the learned
/// rules block when any rules exist.
#[must_use]
pub fn diagnosis(case: &Case, rules: &RuleBook) -> PromptDocument {
    let system = format!("{PERSONA}\n{DIAGNOSIS_INSTRUCTIONS}\n\n{DIAGNOSIS_FORMAT}");
    assemble(system, case, rules, ResponseFormat::Text)
}

/// Stage-1 prompt asking for investigative follow-up questions as JSON.
#[must_use]
pub fn questions(case: &Case, rules: &RuleBook) -> PromptDocument {
    let system = format!(
        "{PERSONA}\n\
         Before diagnosing, you interview the homeowner. Based on the case data and the \
         attached image (if any), write at most {MAX_QUESTIONS} short investigative questions \
         whose answers would best separate the likely leak sources.\n\
         IF specific \"Learned Rules\" are provided, use them to decide what to ask.\n\n\
         Respond with a JSON object only, shaped exactly as \
         {{\"questions\": [\"<question 1>\", \"<question 2>\", \"<question 3>\"]}}."
    );
    assemble(system, case, rules, ResponseFormat::JsonObject)
}

fn assemble(
    mut system: String,
    case: &Case,
    rules: &RuleBook,
    response_format: ResponseFormat,
) -> PromptDocument {
    let mut user = vec![ContentPart::Text {
        text: facts(case, rules),
    }];

    if let Some(url) = case.image().and_then(plumb_core::evidence::Evidence::inline_image) {
        system.push('\n');
        system.push_str(IMAGE_NOTICE);
        user.push(ContentPart::ImageUrl {
            image_url: ImageUrl { url },
        });
    }

    PromptDocument {
        system,
        user,
        response_format,
    }
}

/// Case-specific facts block.
#[must_use]
pub fn facts(case: &Case, rules: &RuleBook) -> String {
    let year = case
        .year_built
        .map_or_else(|| UNKNOWN.to_string(), |y| y.to_string());
    let location = case.location.map_or(UNKNOWN, |l| l.label());

    let mut text = String::from("**Case Data:**\n");
    let _ = writeln!(text, "- Property Year: {year}");
    let _ = writeln!(text, "- Damage Location: {location}");
    let _ = writeln!(text, "- Context (What is above): {}", or(case.above.as_deref(), UNKNOWN));
    let _ = writeln!(text, "- Symptoms: {}", or(case.symptoms.as_deref(), NONE));
    let _ = writeln!(text, "- Water Temp/Character: {}", or(case.character.as_deref(), UNKNOWN));
    let _ = writeln!(text, "- Homeowner Description: {}", or(case.description.as_deref(), NONE));

    if let Some(address) = &case.address {
        let sqft = case
            .square_feet
            .map_or_else(|| UNKNOWN.to_string(), |s| s.to_string());
        let _ = writeln!(text, "- Address: {address}");
        let _ = writeln!(text, "- Square Footage: {sqft}");
        let _ = writeln!(text, "- Floor Plan: {}", or(case.floor_plan.as_deref(), UNKNOWN));
    }

    let media = match &case.media {
        Some(m) if m.is_image() => "Photo attached",
        Some(_) => "Video uploaded (not attached; describe from text only)",
        None => NONE,
    };
    let _ = writeln!(text, "- Media: {media}");

    if !case.interview.is_empty() {
        let _ = write!(text, "\n{INTERVIEW_HEADING}\n");
        for (i, pair) in case.interview.iter().enumerate() {
            let n = i + 1;
            let _ = writeln!(text, "Q{n}: {}", pair.question);
            let _ = writeln!(text, "A{n}: {}", pair.answer);
        }
    }

    if !rules.is_empty() {
        let _ = write!(text, "\n{RULES_HEADING}\n");
        for rule in rules.iter() {
            let _ = writeln!(text, "- {}", rule.text());
        }
    }

    text
}

fn or<'a>(value: Option<&'a str>, default: &'a str) -> &'a str {
    value.unwrap_or(default)
}
