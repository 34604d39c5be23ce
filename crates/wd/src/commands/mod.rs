//! CLI command implementations.

pub(crate) mod init;
pub(crate) mod render;

use std::path::PathBuf;

use clap::Args;
use wd_config::{CliSettings, Config};

use crate::error::CliError;

pub(crate) use init::InitArgs;
pub(crate) use render::RenderArgs;

/// Settings arguments shared by all commands.
#[derive(Args)]
pub(crate) struct SettingsArgs {
    /// Path to settings file (default: auto-discover wd.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Content root directory (overrides settings).
    #[arg(long)]
    content_path: Option<PathBuf>,

    /// Renderer command (overrides settings).
    #[arg(long, env = "WAVEDROM_CLI")]
    wavedrom_cli: Option<String>,

    /// Renderer timeout in seconds (overrides settings).
    #[arg(long)]
    timeout: Option<u64>,
}

impl SettingsArgs {
    /// Load host settings with CLI overrides applied.
    pub(crate) fn load(self) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            content_path: self.content_path,
            wavedrom_cli: self.wavedrom_cli,
            timeout: self.timeout,
        };
        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }
}
