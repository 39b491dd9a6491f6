use anyhow::Context;
use clap::Parser;
use plumb_config::PlumbConfig;

mod cli;
mod commands;
mod output;
mod progress;
mod ui;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("plumb error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    let flags = cli.global_flags();
    init_tracing(&flags)?;
    ui::init(&flags);

    let config = load_config(&flags)?;
    commands::dispatch(cli.command, &config, &flags).await
}

fn load_config(flags: &cli::GlobalFlags) -> anyhow::Result<PlumbConfig> {
    let mut config =
        PlumbConfig::load_with_dotenv().context("failed to load plumb configuration")?;
    if let Some(key) = &flags.api_key {
        config.openai.api_key.clone_from(key);
    }
    if !config.openai.is_configured() {
        tracing::debug!("no API key configured; diagnosis calls will be refused");
    }
    Ok(config)
}

fn init_tracing(flags: &cli::GlobalFlags) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_env("PLUMB_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(flags.log_level()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
