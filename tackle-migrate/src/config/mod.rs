//! Configuration file for migration runs
//!
//! One TOML file describes both Tackle instances:
//!
//! ```toml
//! data_dir = "./tackle-data"
//!
//! [source]
//! url = "https://tackle1.example.com"
//! username = "admin"
//! password = "secret"
//!
//! [destination]
//! url = "https://tackle2.example.com"
//! realm = "tackle"
//! client_id = "tackle-ui"
//! username = "admin"
//! insecure = true
//! ```
//!
//! Passwords may be left out of the file and supplied through
//! `TACKLE_SOURCE_PASSWORD` / `TACKLE_DESTINATION_PASSWORD` (a `.env` file
//! is honoured) or typed at the prompt.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use log::debug;
use serde::Deserialize;

use crate::api::{CredentialSet, Environment};

pub const DEFAULT_CONFIG_FILE: &str = "tackle-config.toml";
pub const DEFAULT_DATA_DIR: &str = "tackle-data";

const SOURCE_PASSWORD_VAR: &str = "TACKLE_SOURCE_PASSWORD";
const DESTINATION_PASSWORD_VAR: &str = "TACKLE_DESTINATION_PASSWORD";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Snapshot directory; `--data-dir` takes precedence
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    pub source: EndpointConfig,
    pub destination: EndpointConfig,
}

/// Connection settings for one Tackle instance
#[derive(Clone, Deserialize)]
pub struct EndpointConfig {
    pub url: String,
    #[serde(default = "default_realm")]
    pub realm: String,
    #[serde(default = "default_client_id")]
    pub client_id: String,
    pub username: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub insecure: bool,
}

fn default_realm() -> String {
    "tackle".to_string()
}

fn default_client_id() -> String {
    "tackle-ui".to_string()
}

impl std::fmt::Debug for EndpointConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EndpointConfig")
            .field("url", &self.url)
            .field("realm", &self.realm)
            .field("client_id", &self.client_id)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("insecure", &self.insecure)
            .finish()
    }
}

impl Config {
    /// `./tackle-config.toml` if present, otherwise the per-user config file
    pub fn default_path() -> PathBuf {
        let local = PathBuf::from(DEFAULT_CONFIG_FILE);
        if local.exists() {
            return local;
        }
        dirs::config_dir()
            .map(|dir| dir.join("tackle-migrate").join("config.toml"))
            .unwrap_or(local)
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!("Config file does not exist: {}", path.display());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::parse(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.source.validate("source")?;
        config.destination.validate("destination")?;
        Ok(config)
    }

    /// Snapshot directory for this run
    pub fn data_dir(&self, cli_override: Option<&Path>) -> PathBuf {
        cli_override
            .map(Path::to_path_buf)
            .or_else(|| self.data_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
    }

    pub fn source_environment(&self) -> Result<Environment> {
        self.source.environment("source", SOURCE_PASSWORD_VAR)
    }

    pub fn destination_environment(&self) -> Result<Environment> {
        self.destination.environment("destination", DESTINATION_PASSWORD_VAR)
    }
}

impl EndpointConfig {
    fn validate(&self, name: &str) -> Result<()> {
        if self.url.trim().is_empty() {
            anyhow::bail!("[{}] url must not be empty", name);
        }
        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            anyhow::bail!("[{}] url must start with http:// or https://: {}", name, self.url);
        }
        if self.username.trim().is_empty() {
            anyhow::bail!("[{}] username must not be empty", name);
        }
        Ok(())
    }

    fn environment(&self, name: &str, password_var: &str) -> Result<Environment> {
        let password = match resolve_password(self.password.as_deref(), std::env::var(password_var).ok()) {
            Some(password) => password,
            None => prompt_password(name, &self.username)?,
        };

        Ok(Environment {
            name: name.to_string(),
            url: self.url.trim_end_matches('/').to_string(),
            realm: self.realm.clone(),
            client_id: self.client_id.clone(),
            insecure: self.insecure,
            credentials: CredentialSet {
                username: self.username.clone(),
                password,
            },
        })
    }
}

/// Environment variable first, then the config file
fn resolve_password(configured: Option<&str>, from_env: Option<String>) -> Option<String> {
    from_env
        .filter(|password| !password.is_empty())
        .or_else(|| configured.filter(|password| !password.is_empty()).map(str::to_owned))
}

fn prompt_password(name: &str, username: &str) -> Result<String> {
    if !std::io::stdin().is_terminal() {
        anyhow::bail!(
            "No password configured for the {} instance; set it in the config file or {}",
            name,
            if name == "source" {
                SOURCE_PASSWORD_VAR
            } else {
                DESTINATION_PASSWORD_VAR
            }
        );
    }
    rpassword::prompt_password(format!("Password for {} on the {} instance: ", username, name))
        .context("Failed to read password")
}
