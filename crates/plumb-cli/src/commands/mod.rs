use plumb_config::PlumbConfig;

use crate::cli::{Commands, GlobalFlags};

pub mod case;
pub mod config;
pub mod lookup;
pub mod run;

/// Route a parsed command to its handler.
pub async fn dispatch(
    command: Commands,
    config: &PlumbConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Run(args) => run::handle(&args, config, flags).await,
        Commands::Lookup { address } => lookup::handle(&address, flags).await,
        Commands::Compose(args) => case::compose(&args, config, flags).await,
        Commands::Diagnose(args) => case::diagnose(&args, config, flags).await,
        Commands::Config => config::handle(config, flags),
    }
}
