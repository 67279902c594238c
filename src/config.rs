//! Layered configuration for the folio CLI.
//!
//! Values are resolved file → environment → CLI, later layers winning.
//!
//! # Configuration File Format
//!
//! ```toml
//! [api]
//! base_url = "https://api.medeirosdev.space"
//! timeout_secs = 30
//!
//! [session]
//! file = "/home/me/.config/folio/session.json"
//! ```
//!
//! | Setting            | Environment          | CLI flag         |
//! |--------------------|----------------------|------------------|
//! | `api.base_url`     | `FOLIO_API_URL`      | `--api-url`      |
//! | `api.timeout_secs` |                      |                  |
//! | `session.file`     | `FOLIO_SESSION_FILE` | `--session-file` |

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::portfolio::api::DEFAULT_API_URL;

pub const ENV_API_URL: &str = "FOLIO_API_URL";
pub const ENV_SESSION_FILE: &str = "FOLIO_SESSION_FILE";

const APP_DIR: &str = "folio";
const CONFIG_FILE: &str = "folio.toml";
const SESSION_FILE: &str = "session.json";

/// `[api]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSection {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// `[session]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSection {
    /// Where the credential is kept between invocations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

/// Contents of `folio.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FolioToml {
    #[serde(default)]
    pub api: ApiSection,
    #[serde(default)]
    pub session: SessionSection,
}

impl FolioToml {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse folio.toml")
    }

    /// Returns default configuration if the file doesn't exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration, creating the parent directory if needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize folio.toml")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Validate the configuration and return any warnings.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if !is_http_url(&self.api.base_url) {
            warnings.push(format!(
                "Invalid api.base_url '{}': should start with http:// or https://",
                self.api.base_url
            ));
        }
        if self.api.timeout_secs == 0 {
            warnings.push("api.timeout_secs must be greater than zero".to_string());
        }

        warnings
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// `~/.config/folio` or the platform equivalent.
pub fn app_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR))
}

pub fn default_config_path() -> PathBuf {
    app_dir()
        .map(|dir| dir.join(CONFIG_FILE))
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE))
}

pub fn default_session_path() -> PathBuf {
    app_dir()
        .map(|dir| dir.join(SESSION_FILE))
        .unwrap_or_else(|| PathBuf::from(".folio-session.json"))
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config: Option<PathBuf>,
    pub api_url: Option<String>,
    pub session_file: Option<PathBuf>,
    pub verbose: bool,
}

/// Fully resolved configuration.
#[derive(Debug, Clone)]
pub struct FolioConfig {
    /// Where `folio.toml` was (or would be) read from
    pub config_path: PathBuf,
    /// Parsed file contents, before env and CLI layers
    pub toml: FolioToml,
    pub verbose: bool,
    env_api_url: Option<String>,
    env_session_file: Option<PathBuf>,
    cli: CliOverrides,
}

impl FolioConfig {
    /// Resolve against the process environment.
    pub fn load(cli: CliOverrides) -> Result<Self> {
        Self::load_with_env(cli, |key| std::env::var(key).ok())
    }

    pub fn load_with_env<F>(cli: CliOverrides, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config_path = cli.config.clone().unwrap_or_else(default_config_path);
        let toml = FolioToml::load_or_default(&config_path)?;
        let non_empty = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            config_path,
            toml,
            verbose: cli.verbose,
            env_api_url: non_empty(ENV_API_URL),
            env_session_file: non_empty(ENV_SESSION_FILE).map(PathBuf::from),
            cli,
        })
    }

    /// API base URL (CLI → env → file).
    pub fn api_url(&self) -> String {
        self.cli
            .api_url
            .clone()
            .or_else(|| self.env_api_url.clone())
            .unwrap_or_else(|| self.toml.api.base_url.clone())
    }

    /// Session file (CLI → env → file → platform default).
    pub fn session_file(&self) -> PathBuf {
        self.cli
            .session_file
            .clone()
            .or_else(|| self.env_session_file.clone())
            .or_else(|| self.toml.session.file.clone())
            .unwrap_or_else(default_session_path)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.toml.api.timeout_secs.max(1))
    }

    /// The effective values, shaped like the file.
    pub fn effective(&self) -> FolioToml {
        FolioToml {
            api: ApiSection {
                base_url: self.api_url(),
                timeout_secs: self.toml.api.timeout_secs,
            },
            session: SessionSection {
                file: Some(self.session_file()),
            },
        }
    }

    pub fn validate(&self) -> Vec<String> {
        self.effective().validate()
    }
}
