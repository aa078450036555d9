//! Configuration types and loading
//!
//! Config precedence: CLI args > env vars > config file > defaults.
//! A missing config file is only an error when its path was given
//! explicitly; the default `notes.toml` is optional.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use notes_auth::DEFAULT_API_URL;
use notes_client::ClientConfig;

const DEFAULT_CONFIG_FILE: &str = "notes.toml";

/// Root configuration
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

/// Where the notes API lives
#[derive(Debug, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// Local session storage
#[derive(Debug, Default, Deserialize)]
pub struct SessionConfig {
    /// Token file; `~/` is expanded against `$HOME`
    #[serde(default)]
    pub token_file: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_API_URL.into()
}

fn default_timeout() -> u64 {
    30
}

/// Config file location and whether the user asked for it by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPath {
    pub path: PathBuf,
    pub explicit: bool,
}

impl Config {
    /// Load configuration from a TOML file, then overlay environment variables.
    pub fn load(location: &ConfigPath) -> common::Result<Self> {
        let mut config = match std::fs::read_to_string(&location.path) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && !location.explicit => {
                Config::default()
            }
            Err(e) => return Err(e.into()),
        };

        if let Ok(url) = std::env::var("NOTES_API_URL") {
            let url = url.trim();
            if !url.is_empty() {
                config.api.base_url = url.to_owned();
            }
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> common::Result<()> {
        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://")
        {
            return Err(common::Error::Config(format!(
                "base_url must start with http:// or https://, got: {}",
                self.api.base_url
            )));
        }

        if self.api.timeout_secs == 0 {
            return Err(common::Error::Config(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Resolve config file path from CLI arg or NOTES_CONFIG env var.
    pub fn resolve_path(cli_path: Option<&Path>) -> ConfigPath {
        if let Some(p) = cli_path {
            return ConfigPath {
                path: p.to_path_buf(),
                explicit: true,
            };
        }
        if let Ok(p) = std::env::var("NOTES_CONFIG") {
            return ConfigPath {
                path: PathBuf::from(p),
                explicit: true,
            };
        }
        ConfigPath {
            path: PathBuf::from(DEFAULT_CONFIG_FILE),
            explicit: false,
        }
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.api.base_url.clone(),
            timeout: Duration::from_secs(self.api.timeout_secs),
        }
    }

    /// Token file from config, else `$HOME/.notes/tokens.json`, else
    /// `./.notes-tokens.json`.
    pub fn token_file(&self) -> PathBuf {
        let home = std::env::var_os("HOME").map(PathBuf::from);
        match &self.session.token_file {
            Some(path) => match (path.strip_prefix("~"), &home) {
                (Ok(rest), Some(home)) => home.join(rest),
                _ => path.clone(),
            },
            None => match home {
                Some(home) => home.join(".notes").join("tokens.json"),
                None => PathBuf::from(".notes-tokens.json"),
            },
        }
    }
}
