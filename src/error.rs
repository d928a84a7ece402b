// src/error.rs

//! Unified error handling for the news watcher.
//!
//! Every failure aborts the current run. [`AppError::kind`] collapses the
//! variants onto the coarse categories the entry point reports.

use std::fmt;

use thiserror::Error;

/// Result type alias for watcher operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Coarse failure category of an aborted run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Fetch,
    Parse,
    Storage,
    Notification,
    Config,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Fetch => "fetch",
            ErrorKind::Parse => "parse",
            ErrorKind::Storage => "storage",
            ErrorKind::Notification => "notification",
            ErrorKind::Config => "config",
        };
        f.write_str(name)
    }
}

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Source page unreachable, timed out or answered non-2xx
    #[error("Fetch error for {url}: {message}")]
    Fetch { url: String, message: String },

    /// Source body is not an HTML document
    #[error("Parse error for {source_name}: {message}")]
    Parse {
        source_name: String,
        message: String,
    },

    /// Snapshot load or save failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Email delivery failed
    #[error("Notification error: {0}")]
    Notification(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl AppError {
    /// Create a fetch error for the given URL.
    pub fn fetch(url: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Fetch {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Create a parse error for the named source.
    pub fn parse(source_name: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Parse {
            source_name: source_name.into(),
            message: message.to_string(),
        }
    }

    /// Create a storage error.
    pub fn storage(message: impl fmt::Display) -> Self {
        Self::Storage(message.to_string())
    }

    /// Create a notification error.
    pub fn notification(message: impl fmt::Display) -> Self {
        Self::Notification(message.to_string())
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Category reported when this error terminates a run.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Fetch { .. } => ErrorKind::Fetch,
            AppError::Parse { .. } => ErrorKind::Parse,
            AppError::Storage(_) => ErrorKind::Storage,
            AppError::Notification(_) => ErrorKind::Notification,
            AppError::Config(_)
            | AppError::Selector { .. }
            | AppError::Io(_)
            | AppError::Toml(_) => ErrorKind::Config,
        }
    }
}
