//! Site settings for the `WaveDrom` markdown pipeline.
//!
//! Parses `wd.toml` settings files with serde and provides auto-discovery
//! of the settings file in parent directories. These settings play the role
//! of the host build system's settings mapping: the content root, the
//! renderer command and the list of markdown preprocessor extensions.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `content.path`
//! - `wavedrom.cli`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Settings filename to search for.
const CONFIG_FILENAME: &str = "wd.toml";

/// Default content root, relative to the settings base directory.
pub const DEFAULT_CONTENT_PATH: &str = "content";

/// Default external renderer command.
pub const DEFAULT_WAVEDROM_CLI: &str = "wavedrom-cli";

/// Default renderer timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override content root directory.
    pub content_path: Option<PathBuf>,
    /// Override renderer command.
    pub wavedrom_cli: Option<String>,
    /// Override renderer timeout in seconds.
    pub timeout: Option<u64>,
}

/// Site settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Content configuration (path is a relative string from TOML).
    content: ContentConfigRaw,
    /// Renderer configuration.
    pub wavedrom: WavedromSettings,
    /// Markdown parser configuration.
    pub markdown: MarkdownConfig,

    /// Resolved content configuration (set after loading).
    #[serde(skip)]
    pub content_resolved: ContentConfig,
    /// Path to the settings file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw content configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ContentConfigRaw {
    path: Option<String>,
}

/// Resolved content configuration.
#[derive(Debug, Default)]
pub struct ContentConfig {
    /// Content root directory.
    pub path: PathBuf,
}

/// External renderer settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct WavedromSettings {
    /// Renderer executable name or path.
    pub cli: String,
    /// Hard timeout for a single render, in seconds.
    pub timeout: u64,
}

impl Default for WavedromSettings {
    fn default() -> Self {
        Self {
            cli: DEFAULT_WAVEDROM_CLI.to_owned(),
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Markdown parser settings read when the preprocessor pipeline is built.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    /// Registered preprocessor extension names, in run order.
    pub extensions: Vec<String>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`wavedrom.cli`").
        field: String,
        /// Error message (e.g., "${`WAVEDROM_CLI`} not set").
        message: String,
    },
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `wd.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the resulting settings are invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Content root directory.
    #[must_use]
    pub fn content_path(&self) -> &Path {
        &self.content_resolved.path
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(content_path) = &settings.content_path {
            self.content_resolved.path.clone_from(content_path);
        }
        if let Some(cli) = &settings.wavedrom_cli {
            self.wavedrom.cli.clone_from(cli);
        }
        if let Some(timeout) = settings.timeout {
            self.wavedrom.timeout = timeout;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    #[must_use]
    pub fn default_with_base(base: &Path) -> Self {
        Self {
            content: ContentConfigRaw::default(),
            wavedrom: WavedromSettings::default(),
            markdown: MarkdownConfig::default(),
            content_resolved: ContentConfig {
                path: base.join(DEFAULT_CONTENT_PATH),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        const MAX_TIMEOUT: u64 = 3600;

        if self.wavedrom.cli.trim().is_empty() {
            return Err(ConfigError::Validation(
                "wavedrom.cli cannot be empty".to_owned(),
            ));
        }
        if self.wavedrom.timeout == 0 {
            return Err(ConfigError::Validation(
                "wavedrom.timeout must be greater than 0".to_owned(),
            ));
        }
        if self.wavedrom.timeout > MAX_TIMEOUT {
            return Err(ConfigError::Validation(format!(
                "wavedrom.timeout cannot exceed {MAX_TIMEOUT}"
            )));
        }
        if self.markdown.extensions.iter().any(|e| e.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "markdown.extensions cannot contain empty names".to_owned(),
            ));
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref path) = self.content.path {
            self.content.path = Some(expand::expand_env(path, "content.path")?);
        }
        self.wavedrom.cli = expand::expand_env(&self.wavedrom.cli, "wavedrom.cli")?;
        Ok(())
    }

    /// Resolve the content root against the settings file directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let path = self.content.path.as_deref().unwrap_or(DEFAULT_CONTENT_PATH);
        self.content_resolved = ContentConfig {
            path: config_dir.join(path),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.content_path(), Path::new("/test/content"));
        assert_eq!(config.wavedrom.cli, "wavedrom-cli");
        assert_eq!(config.wavedrom.timeout, 30);
        assert!(config.markdown.extensions.is_empty());
        assert!(config.config_path.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.wavedrom.cli, "wavedrom-cli");
        assert_eq!(config.wavedrom.timeout, 30);
        assert!(config.markdown.extensions.is_empty());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[content]
path = "site/content"

[wavedrom]
cli = "/usr/local/bin/wavedrom-cli"
timeout = 45

[markdown]
extensions = ["toc", "wavedrom"]
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(config.content_path(), Path::new("/project/site/content"));
        assert_eq!(config.wavedrom.cli, "/usr/local/bin/wavedrom-cli");
        assert_eq!(config.wavedrom.timeout, 45);
        assert_eq!(
            config.markdown.extensions,
            vec!["toc".to_owned(), "wavedrom".to_owned()]
        );
    }

    #[test]
    fn test_resolve_paths_default_content() {
        let mut config: Config = toml::from_str("[wavedrom]\ntimeout = 5\n").unwrap();
        config.resolve_paths(Path::new("/project"));
        assert_eq!(config.content_path(), Path::new("/project/content"));
    }

    #[test]
    fn test_resolve_paths_absolute_content() {
        let mut config: Config = toml::from_str("[content]\npath = \"/srv/content\"\n").unwrap();
        config.resolve_paths(Path::new("/project"));
        assert_eq!(config.content_path(), Path::new("/srv/content"));
    }

    #[test]
    fn test_validate_empty_cli() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.wavedrom.cli = "  ".to_owned();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("wavedrom.cli"));
    }

    #[test]
    fn test_validate_zero_timeout() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.wavedrom.timeout = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("wavedrom.timeout"));
    }

    #[test]
    fn test_validate_timeout_too_large() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.wavedrom.timeout = 3601;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_empty_extension_name() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.markdown.extensions.push(String::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            content_path: Some(PathBuf::from("/custom/content")),
            wavedrom_cli: Some("npx wavedrom-cli".to_owned()),
            timeout: Some(10),
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.content_path(), Path::new("/custom/content"));
        assert_eq!(config.wavedrom.cli, "npx wavedrom-cli");
        assert_eq!(config.wavedrom.timeout, 10);
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.apply_cli_settings(&CliSettings::default());

        assert_eq!(config.content_path(), Path::new("/test/content"));
        assert_eq!(config.wavedrom.cli, "wavedrom-cli");
        assert_eq!(config.wavedrom.timeout, 30);
    }

    #[test]
    fn test_expand_env_vars() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("WD_TEST_CONTENT_DIR", "/data/content");
            std::env::set_var("WD_TEST_CLI_BIN", "/opt/wavedrom-cli");
        }

        let toml = r#"
[content]
path = "${WD_TEST_CONTENT_DIR}"

[wavedrom]
cli = "${WD_TEST_CLI_BIN}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(config.content_path(), Path::new("/data/content"));
        assert_eq!(config.wavedrom.cli, "/opt/wavedrom-cli");

        unsafe {
            std::env::remove_var("WD_TEST_CONTENT_DIR");
            std::env::remove_var("WD_TEST_CLI_BIN");
        }
    }

    #[test]
    fn test_load_explicit_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("wd.toml");
        std::fs::write(&path, "[content]\npath = \"pages\"\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.content_path(), tmp.path().join("pages"));
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("missing.toml");

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("wd.toml");
        std::fs::write(&path, "[wavedrom\ncli = ").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_cli_settings_are_validated() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("wd.toml");
        std::fs::write(&path, "").unwrap();

        let overrides = CliSettings {
            timeout: Some(0),
            ..Default::default()
        };
        let err = Config::load(Some(&path), Some(&overrides)).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }
}
