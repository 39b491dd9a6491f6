use std::fmt::{Display, Write as _};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use plumb_config::{PlumbConfig, WizardConfig};
use plumb_core::enums::{Location, WizardStep};
use plumb_core::evidence::Evidence;
use plumb_core::questions::QuestionSource;
use plumb_diagnosis::{DiagnosisClient, OpenAiClient};
use plumb_wizard::{Action, AnswerInput, BranchQuestion, Wizard};

use crate::cli::{GlobalFlags, RunArgs};
use crate::progress::Progress;

const HELP: &str = "Type :rules to list learned rules, :restart for a new case, \
                    :clear to also forget learned rules, :quit to exit.";

/// Session-level commands accepted at any prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Rules,
    Restart,
    Clear,
    Quit,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Command(Command),
}

/// Line-oriented prompt over any reader and writer.
pub struct Console<R, W> {
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub const fn new(input: R, out: W) -> Self {
        Self { input, out }
    }

    pub fn say(&mut self, text: impl Display) -> io::Result<()> {
        writeln!(self.out, "{text}")
    }

    /// Ask and read one trimmed line. End of input reads as `:quit`.
    pub fn ask(&mut self, prompt: &str) -> io::Result<Reply> {
        write!(self.out, "{prompt}\n> ")?;
        self.out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(Reply::Command(Command::Quit));
        }
        Ok(match line.trim() {
            ":rules" => Reply::Command(Command::Rules),
            ":restart" => Reply::Command(Command::Restart),
            ":clear" => Reply::Command(Command::Clear),
            ":quit" | ":q" => Reply::Command(Command::Quit),
            text => Reply::Text(text.to_string()),
        })
    }
}

/// Unwrap a text reply, or hand a session command back to the driver.
macro_rules! reply {
    ($ask:expr) => {
        match $ask? {
            Reply::Text(text) => text,
            Reply::Command(command) => return Ok(Some(command)),
        }
    };
}

pub async fn handle(
    args: &RunArgs,
    config: &PlumbConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let client = OpenAiClient::new(config.openai.clone())?;
    let wizard_config = WizardConfig {
        property_lookup: args.lookup || config.wizard.property_lookup,
        interview: args.interview || config.wizard.interview,
        ..config.wizard.clone()
    };
    let mut wizard = Wizard::new(client, wizard_config);
    let mut console = Console::new(io::BufReader::new(io::stdin()), io::stdout());

    if !flags.quiet {
        console.say("Plumbing Forensics: root cause analysis for water leaks.")?;
        console.say(HELP)?;
    }
    if ask_for_key(&mut wizard, &mut console)? {
        drive(&mut wizard, &mut console).await?;
    }
    Ok(())
}

/// Offer to install a key typed at runtime when none is configured.
/// Returns `false` when the user quit at the prompt.
fn ask_for_key<R: BufRead, W: Write>(
    wizard: &mut Wizard<OpenAiClient>,
    console: &mut Console<R, W>,
) -> io::Result<bool> {
    if wizard.client().is_configured() {
        return Ok(true);
    }
    console.say(
        "No OpenAI API key configured (PLUMB_OPENAI__API_KEY, OPENAI_API_KEY, or --api-key).",
    )?;
    match console.ask("Paste a key, or press Enter to continue without one:")? {
        Reply::Text(key) => {
            if !key.is_empty() {
                wizard.client_mut().set_api_key(key);
            }
            Ok(true)
        }
        Reply::Command(command) => Ok(command != Command::Quit),
    }
}

/// Run the wizard until the user quits or input ends.
pub async fn drive<C, R, W>(
    wizard: &mut Wizard<C>,
    console: &mut Console<R, W>,
) -> anyhow::Result<()>
where
    C: DiagnosisClient,
    R: BufRead,
    W: Write,
{

    loop {
        let step = wizard.step();
        console.say(format_args!(
            "\n== {} ({}%) ==",
            step.title(),
            wizard.progress_percent()
        ))?;

        let command = match step {
            WizardStep::Intake => intake(wizard, console).await?,
            WizardStep::Triage => triage(wizard, console).await?,
            WizardStep::AutoQuestions => questions(wizard, console).await?,
            WizardStep::Interview => interview(wizard, console).await?,
            WizardStep::Diagnosis => diagnosis(wizard, console).await?,
            WizardStep::Feedback => feedback(wizard, console).await?,
            WizardStep::Closed => closed(wizard, console).await?,
        };

        match command {
            None => {}
            Some(Command::Rules) => print_rules(wizard, console)?,
            Some(Command::Restart) => {
                wizard.apply(Action::NewCase).await?;
                console.say("Started a new case. Learned rules kept.")?;
            }
            Some(Command::Clear) => {
                wizard.apply(Action::ClearSession).await?;
                console.say("Session cleared. Learned rules forgotten.")?;
            }
            Some(Command::Quit) => return Ok(()),
        }
    }
}

type StepResult = anyhow::Result<Option<Command>>;

async fn intake<C, R, W>(wizard: &mut Wizard<C>, console: &mut Console<R, W>) -> StepResult
where
    C: DiagnosisClient,
    R: BufRead,
    W: Write,
{
    if wizard.config().property_lookup {
        loop {
            let address = reply!(console.ask("Property address:"));
            match wizard.apply(Action::FetchProperty(address)).await {
                Ok(_) => break,
                Err(error) => console.say(error)?,
            }
        }

        let property = wizard
            .session()
            .property()
            .cloned()
            .context("property lookup left no record")?;
        let record = &property.record;
        match &property.key {
            Some(key) => console.say(format_args!(
                "Found {key}: built {}, {} sq ft.",
                record.year_built, record.square_feet
            ))?,
            None => console.say(format_args!(
                "No record found. Using defaults: built {}, {} sq ft.",
                record.year_built, record.square_feet
            ))?,
        }

        if record.floor_plans.len() > 1 {
            for (n, plan) in record.floor_plans.iter().enumerate() {
                console.say(format_args!("  {}. {plan}", n + 1))?;
            }
            loop {
                let text = reply!(console.ask("Floor plan [1]:"));
                if text.is_empty() {
                    break;
                }
                let plan = pick(&text, &record.floor_plans).unwrap_or(text);
                match wizard.apply(Action::ChooseFloorPlan(plan)).await {
                    Ok(_) => break,
                    Err(error) => console.say(error)?,
                }
            }
        }
    }

    let default_year = wizard
        .session()
        .case
        .year_built()
        .unwrap_or_else(|| wizard.config().default_year);
    loop {
        let text = reply!(console.ask(&format!("Year built [{default_year}]:")));
        let year = if text.is_empty() {
            default_year
        } else if let Ok(year) = text.parse::<i32>() {
            year
        } else {
            console.say("Enter a four-digit year.")?;
            continue;
        };
        match wizard.apply(Action::SetYear(year)).await {
            Ok(_) => break,
            Err(error) => console.say(error)?,
        }
    }

    let description = reply!(console.ask("Describe what you see (optional):"));
    if !description.is_empty() {
        wizard.apply(Action::SetDescription(description)).await?;
    }

    loop {
        let path = reply!(console.ask("Photo or video path (optional):"));
        if path.is_empty() {
            break;
        }
        let path = PathBuf::from(path);
        match std::fs::read(&path) {
            Ok(bytes) => {
                let evidence = Evidence::from_upload(&path, bytes);
                console.say(format_args!("Attached {} ({}).", evidence.kind, evidence.mime))?;
                wizard.apply(Action::AttachMedia(evidence)).await?;
                break;
            }
            Err(error) => console.say(format_args!("Could not read {}: {error}", path.display()))?,
        }
    }

    advance(wizard, console, Action::StartTriage).await
}

async fn triage<C, R, W>(wizard: &mut Wizard<C>, console: &mut Console<R, W>) -> StepResult
where
    C: DiagnosisClient,
    R: BufRead,
    W: Write,
{
    for (n, location) in Location::ALL.iter().enumerate() {
        console.say(format_args!("  {}. {location}", n + 1))?;
    }
    let location = loop {
        let text = reply!(console.ask("Where is the water showing up?"));
        let chosen = text
            .parse::<usize>()
            .ok()
            .and_then(|n| Location::ALL.get(n.wrapping_sub(1)).copied())
            .or_else(|| text.parse().ok());
        match chosen {
            Some(location) => break location,
            None => console.say("Pick 1-3 or type the location.")?,
        }
    };
    wizard.apply(Action::SelectLocation(location)).await?;

    let branch = wizard
        .active_branch()
        .context("no triage branch after selecting a location")?;
    console.say(format_args!("[{}]", branch.banner))?;

    for question in branch.questions {
        loop {
            let text = reply!(console.ask(&question_prompt(question)));
            if text.is_empty() && !question.required {
                break;
            }
            let value = match question.input {
                AnswerInput::Choice(options) => pick(&text, options).unwrap_or(text),
                AnswerInput::FreeText { .. } => text,
            };
            match wizard
                .apply(Action::Answer {
                    field: question.field,
                    value,
                })
                .await
            {
                Ok(_) => break,
                Err(error) => console.say(error)?,
            }
        }
    }

    advance(wizard, console, Action::Analyze).await
}

async fn questions<C, R, W>(wizard: &mut Wizard<C>, console: &mut Console<R, W>) -> StepResult
where
    C: DiagnosisClient,
    R: BufRead,
    W: Write,
{
    let spinner = Progress::spinner("Preparing investigative questions...");
    wizard.apply(Action::GenerateQuestions).await?;
    if let Some(notice) = wizard.session().notice() {
        spinner.finish_err("question generation failed");
        console.say(notice)?;
        return retry_or_restart(console);
    }
    spinner.finish_clear();
    Ok(None)
}

async fn interview<C, R, W>(wizard: &mut Wizard<C>, console: &mut Console<R, W>) -> StepResult
where
    C: DiagnosisClient,
    R: BufRead,
    W: Write,
{
    let Some(set) = wizard.session().case.questions().cloned() else {
        wizard.apply(Action::FinishInterview).await?;
        return Ok(None);
    };
    if set.source == QuestionSource::Fallback {
        console.say("(Using standard follow-up questions.)")?;
    }
    console.say("Answer what you can. Press Enter to skip a question.")?;

    for (index, question) in set.questions().iter().enumerate() {
        let answer = reply!(console.ask(&format!("Q{}: {question}", index + 1)));
        if !answer.is_empty() {
            wizard
                .apply(Action::AnswerQuestion { index, answer })
                .await?;
        }
    }

    wizard.apply(Action::FinishInterview).await?;
    Ok(None)
}

async fn diagnosis<C, R, W>(wizard: &mut Wizard<C>, console: &mut Console<R, W>) -> StepResult
where
    C: DiagnosisClient,
    R: BufRead,
    W: Write,
{
    if wizard.session().report().is_none() {
        let spinner = Progress::spinner("Consulting the senior plumber...");
        wizard.apply(Action::RunDiagnosis).await?;
        if let Some(notice) = wizard.session().notice() {
            spinner.finish_err("diagnosis failed");
            console.say(notice)?;
            return retry_or_restart(console);
        }
        spinner.finish_clear();
    }

    if let Some(report) = wizard.session().report() {
        console.say(report)?;
    }

    loop {
        let text = reply!(console.ask("Is this diagnosis correct? [y/n]"));
        let action = match text.to_ascii_lowercase().as_str() {
            "y" | "yes" => Action::ConfirmDiagnosis,
            "n" | "no" => Action::RejectDiagnosis,
            _ => {
                console.say("Answer y or n.")?;
                continue;
            }
        };
        wizard.apply(action).await?;
        return Ok(None);
    }
}

async fn feedback<C, R, W>(wizard: &mut Wizard<C>, console: &mut Console<R, W>) -> StepResult
where
    C: DiagnosisClient,
    R: BufRead,
    W: Write,
{
    console.say("Teach the system what it missed. The correction applies to every later case.")?;
    loop {
        let correction = reply!(console.ask("What was the actual cause?"));
        match wizard.apply(Action::SubmitCorrection(correction)).await {
            Ok(_) => {
                console.say("Rule learned. Starting a new case.")?;
                return Ok(None);
            }
            Err(error) => console.say(error)?,
        }
    }
}

async fn closed<C, R, W>(wizard: &mut Wizard<C>, console: &mut Console<R, W>) -> StepResult
where
    C: DiagnosisClient,
    R: BufRead,
    W: Write,
{
    let text = reply!(console.ask("Start a new case? [y/N]"));
    if matches!(text.to_ascii_lowercase().as_str(), "y" | "yes") {
        wizard.apply(Action::NewCase).await?;
        Ok(None)
    } else {
        Ok(Some(Command::Quit))
    }
}

/// Try to leave the step. A refusal is shown and the step is asked again.
async fn advance<C, R, W>(
    wizard: &mut Wizard<C>,
    console: &mut Console<R, W>,
    action: Action,
) -> StepResult
where
    C: DiagnosisClient,
    R: BufRead,
    W: Write,
{
    if let Err(error) = wizard.apply(action).await {
        console.say(error)?;
    }
    Ok(None)
}

fn retry_or_restart<R: BufRead, W: Write>(console: &mut Console<R, W>) -> StepResult {
    let text = reply!(console.ask("Retry? [Y/n]"));
    if matches!(text.to_ascii_lowercase().as_str(), "n" | "no") {
        Ok(Some(Command::Restart))
    } else {
        Ok(None)
    }
}

fn print_rules<C, R, W>(wizard: &Wizard<C>, console: &mut Console<R, W>) -> io::Result<()>
where
    C: DiagnosisClient,
    R: BufRead,
    W: Write,
{
    let rules = &wizard.session().rules;
    if rules.is_empty() {
        return console.say("No corrections learned yet.");
    }
    for (n, rule) in rules.iter().enumerate() {
        console.say(format_args!("{}. {}", n + 1, rule.text()))?;
    }
    Ok(())
}

fn question_prompt(question: &BranchQuestion) -> String {
    let mut prompt = question.prompt.to_string();
    match question.input {
        AnswerInput::Choice(options) => {
            for (n, option) in options.iter().enumerate() {
                let _ = write!(prompt, "\n  {}. {option}", n + 1);
            }
        }
        AnswerInput::FreeText { placeholder } => {
            let _ = write!(prompt, " (e.g. {placeholder})");
        }
    }
    if !question.required {
        prompt.push_str(" [optional]");
    }
    prompt
}

/// Resolve a 1-based menu number to its option.
fn pick<S: AsRef<str>>(text: &str, options: &[S]) -> Option<String> {
    let n = text.parse::<usize>().ok()?;
    options
        .get(n.checked_sub(1)?)
        .map(|option| option.as_ref().to_string())
}
