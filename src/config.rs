// src/config.rs

//! Configuration loading utilities.
//!
//! The file location and every secret come from the environment; all other
//! behavior is in the TOML file.

use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};
use crate::models::Config;

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "NEWSWATCH_CONFIG";

/// Config file used when [`CONFIG_PATH_ENV`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "newswatch.toml";

const SMTP_USER_ENV: &str = "NEWSWATCH_SMTP_USER";
const SMTP_PASSWORD_ENV: &str = "NEWSWATCH_SMTP_PASSWORD";
const SMTP_OAUTH_TOKEN_ENV: &str = "NEWSWATCH_SMTP_OAUTH_TOKEN";

/// Secret half of the SMTP login.
#[derive(Clone, PartialEq, Eq)]
pub enum SmtpSecret {
    Password(String),
    /// Bearer token for XOAUTH2, minted by an external authorization flow
    OAuthToken(String),
}

/// SMTP login taken from the environment.
#[derive(Clone, PartialEq, Eq)]
pub struct SmtpCredentials {
    pub username: String,
    pub secret: SmtpSecret,
}

// Secrets never reach the logs.
impl std::fmt::Debug for SmtpSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SmtpSecret::Password(_) => f.write_str("Password(<redacted>)"),
            SmtpSecret::OAuthToken(_) => f.write_str("OAuthToken(<redacted>)"),
        }
    }
}

impl std::fmt::Debug for SmtpCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpCredentials")
            .field("username", &self.username)
            .field("secret", &self.secret)
            .finish()
    }
}

impl SmtpCredentials {
    /// Read credentials from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve credentials through an arbitrary variable lookup.
    ///
    /// An OAuth token wins over a password when both are present.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let present = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let username = present(SMTP_USER_ENV)
            .ok_or_else(|| AppError::config(format!("{SMTP_USER_ENV} is not set")))?;

        let secret = if let Some(token) = present(SMTP_OAUTH_TOKEN_ENV) {
            SmtpSecret::OAuthToken(token)
        } else if let Some(password) = present(SMTP_PASSWORD_ENV) {
            SmtpSecret::Password(password)
        } else {
            return Err(AppError::config(format!(
                "Neither {SMTP_OAUTH_TOKEN_ENV} nor {SMTP_PASSWORD_ENV} is set"
            )));
        };

        Ok(Self { username, secret })
    }
}

/// Path of the config file for this process.
pub fn config_path() -> PathBuf {
    std::env::var(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Load configuration from a TOML file.
///
/// A missing file falls back to defaults; a malformed one is an error.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        log::warn!(
            "Config file {} not found. Using default configuration.",
            path.display()
        );
        return Ok(Config::default());
    }

    Config::load(path)
        .map_err(|e| AppError::config(format!("Failed to load config from {path:?}: {e}")))
}

/// Load and validate the configuration.
pub fn load_validated(path: &Path) -> Result<Config> {
    let config = load_config(path)?;
    config.validate()?;
    Ok(config)
}
