//! `wd init` command implementation.

use clap::Args;

use super::SettingsArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the init command.
#[derive(Args)]
pub(crate) struct InitArgs {
    #[command(flatten)]
    settings: SettingsArgs,
}

impl InitArgs {
    /// Execute the init command.
    ///
    /// # Errors
    ///
    /// Returns an error if settings fail to load or the image directory
    /// cannot be created.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let mut settings = self.settings.load()?;
        let config = wd_diagrams::initialized(&mut settings)?;

        match &settings.config_path {
            Some(path) => output.setting("Settings", path.display()),
            None => output.setting("Settings", "defaults (no wd.toml found)"),
        }
        output.setting("Renderer", &config.cli);
        output.setting("Timeout", format_args!("{}s", config.timeout.as_secs()));
        output.done(&format!(
            "Image directory ready: {}",
            config.image_dir().display()
        ));

        Ok(())
    }
}
