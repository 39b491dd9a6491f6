use plumb_config::PlumbConfig;

use crate::cli::{GlobalFlags, OutputFormat};
use crate::output::output;

/// Print the effective configuration. The API key never leaves redacted.
pub fn handle(config: &PlumbConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let shown = PlumbConfig {
        openai: config.openai.redacted(),
        wizard: config.wizard.clone(),
    };
    match flags.format {
        OutputFormat::Json => output(&shown, flags.format),
        OutputFormat::Text => {
            print!("{}", toml::to_string_pretty(&shown)?);
            Ok(())
        }
    }
}
