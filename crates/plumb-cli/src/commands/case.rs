use anyhow::Context;
use plumb_config::{PlumbConfig, WizardConfig};
use plumb_core::case::{Case, CaseField};
use plumb_core::evidence::Evidence;
use plumb_diagnosis::{DiagnosisClient, OpenAiClient};
use plumb_prompt::PromptDocument;
use plumb_wizard::{Action, Wizard};
use serde::Serialize;

use crate::cli::{CaseArgs, GlobalFlags, OutputFormat};
use crate::output::output;
use crate::progress::Progress;

#[derive(Debug, Serialize)]
struct DiagnoseResponse {
    case: Case,
    report: String,
}

/// Print the diagnosis prompt for the case without calling the service.
pub async fn compose(
    args: &CaseArgs,
    config: &PlumbConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let client = OpenAiClient::new(config.openai.clone())?;
    let wizard = prepare(args, client, config).await?;
    let document = wizard.preview();

    match flags.format {
        OutputFormat::Json => output(&document, flags.format),
        OutputFormat::Text => {
            print!("{}", document_text(&document));
            Ok(())
        }
    }
}

/// Diagnose the case in one shot and print the report.
pub async fn diagnose(
    args: &CaseArgs,
    config: &PlumbConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let client = OpenAiClient::new(config.openai.clone())?;
    let mut wizard = prepare(args, client, config).await?;

    let spinner = Progress::spinner("Consulting the senior plumber...");
    wizard.apply(Action::RunDiagnosis).await?;
    if let Some(notice) = wizard.session().notice() {
        spinner.finish_err("diagnosis failed");
        anyhow::bail!("{notice}");
    }
    spinner.finish_clear();

    let report = wizard
        .session()
        .report()
        .context("diagnosis finished without a report")?
        .to_string();

    match flags.format {
        OutputFormat::Json => output(
            &DiagnoseResponse {
                case: wizard.session().case.snapshot(),
                report,
            },
            flags.format,
        ),
        OutputFormat::Text => {
            println!("{report}");
            Ok(())
        }
    }
}

/// Drive a wizard from intake to the diagnosis step using the flag values.
///
/// Every flag goes through the same actions the interactive wizard uses, so
/// the same required-field gates apply.
pub async fn prepare<C: DiagnosisClient>(
    args: &CaseArgs,
    client: C,
    config: &PlumbConfig,
) -> anyhow::Result<Wizard<C>> {
    let wizard_config = WizardConfig {
        property_lookup: args.address.is_some(),
        interview: false,
        ..config.wizard.clone()
    };
    let default_year = wizard_config.default_year;
    let mut wizard = Wizard::new(client, wizard_config);

    if let Some(address) = &args.address {
        wizard.apply(Action::FetchProperty(address.clone())).await?;
        if let Some(plan) = &args.floor_plan {
            wizard.apply(Action::ChooseFloorPlan(plan.clone())).await?;
        }
    }

    match args.year {
        Some(year) => {
            wizard.apply(Action::SetYear(year)).await?;
        }
        None if !wizard.session().case.has(CaseField::YearBuilt) => {
            wizard.apply(Action::SetYear(default_year)).await?;
        }
        None => {}
    }

    if let Some(description) = &args.description {
        wizard
            .apply(Action::SetDescription(description.clone()))
            .await?;
    }
    if let Some(path) = &args.media {
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read media file {}", path.display()))?;
        wizard
            .apply(Action::AttachMedia(Evidence::from_upload(path, bytes)))
            .await?;
    }

    wizard.apply(Action::StartTriage).await?;
    wizard.apply(Action::SelectLocation(args.location)).await?;

    let answers = [
        (CaseField::Above, &args.above),
        (CaseField::Character, &args.character),
        (CaseField::Symptoms, &args.symptoms),
    ];
    for (field, value) in answers {
        if let Some(value) = value {
            wizard
                .apply(Action::Answer {
                    field,
                    value: value.clone(),
                })
                .await
                .with_context(|| {
                    format!("--{} does not fit a {} leak", field.key(), args.location)
                })?;
        }
    }

    wizard.apply(Action::Analyze).await?;
    Ok(wizard)
}

/// Human-readable rendering of a prompt document.
#[must_use]
pub fn document_text(document: &PromptDocument) -> String {
    let mut text = format!("# System\n{}\n\n# User\n{}", document.system, document.user_text());
    if document.has_image() {
        text.push_str("\n[image attached]\n");
    }
    text
}
