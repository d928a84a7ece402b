//! Application configuration structures.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use lettre::message::Mailbox;
use scraper::Selector;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::PostSelectors;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP fetching behavior settings
    #[serde(default)]
    pub fetch: FetchConfig,

    /// News pages to watch, in merge order
    #[serde(default = "defaults::sources")]
    pub sources: Vec<SourceConfig>,

    /// Where the snapshot of seen posts lives
    #[serde(default)]
    pub storage: StorageConfig,

    /// Outbound email settings
    #[serde(default)]
    pub email: EmailConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.fetch.user_agent.trim().is_empty() {
            return Err(AppError::config("fetch.user_agent is empty"));
        }
        if self.fetch.timeout_secs == 0 {
            return Err(AppError::config("fetch.timeout_secs must be > 0"));
        }
        if self.sources.is_empty() {
            return Err(AppError::config("No sources defined"));
        }

        let mut names = HashSet::new();
        for source in &self.sources {
            source.validate()?;
            if !names.insert(source.name.as_str()) {
                return Err(AppError::config(format!(
                    "Duplicate source name '{}'",
                    source.name
                )));
            }
        }

        self.storage.validate()?;
        self.email.validate()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fetch: FetchConfig::default(),
            sources: defaults::sources(),
            storage: StorageConfig::default(),
            email: EmailConfig::default(),
        }
    }
}

/// HTTP client settings shared by all sources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// A single watched news page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Short unique name used in logs and errors
    pub name: String,

    /// Page that lists the posts
    pub url: String,

    /// Base URL that site-relative links are resolved against
    pub base_url: String,

    /// Where posts live on the page
    pub selectors: PostSelectors,
}

impl SourceConfig {
    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::config("Source name is empty"));
        }
        for (field, value) in [("url", &self.url), ("base_url", &self.base_url)] {
            Url::parse(value).map_err(|e| {
                AppError::config(format!("Source '{}' has invalid {field}: {e}", self.name))
            })?;
        }
        for selector in self.selectors.all() {
            Selector::parse(selector)
                .map_err(|e| AppError::selector(selector, format!("{e:?}")))?;
        }
        Ok(())
    }
}

/// Snapshot persistence backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StorageConfig {
    /// JSON file on the local filesystem
    Local {
        #[serde(default = "defaults::snapshot_path")]
        path: String,
    },

    /// Single object in an S3-compatible bucket
    S3 {
        bucket: String,
        #[serde(default = "defaults::snapshot_key")]
        key: String,
        #[serde(default)]
        region: Option<String>,
        /// Custom endpoint for S3-compatible object stores
        #[serde(default)]
        endpoint: Option<String>,
    },
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig::Local {
            path: defaults::snapshot_path(),
        }
    }
}

impl StorageConfig {
    fn validate(&self) -> Result<()> {
        match self {
            StorageConfig::Local { path } if path.trim().is_empty() => {
                Err(AppError::config("storage.path is empty"))
            }
            StorageConfig::S3 { bucket, key, .. }
                if bucket.trim().is_empty() || key.trim().is_empty() =>
            {
                Err(AppError::config("storage.bucket and storage.key must be set"))
            }
            _ => Ok(()),
        }
    }
}

/// Email delivery settings.
///
/// Credentials are never stored here; see [`crate::config::SmtpCredentials`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    #[serde(default = "defaults::smtp_host")]
    pub smtp_host: String,

    #[serde(default = "defaults::smtp_port")]
    pub smtp_port: u16,

    /// From address
    #[serde(default)]
    pub sender: String,

    /// Every new-post digest goes to all of these
    #[serde(default)]
    pub recipients: Vec<String>,

    /// Subject template; `{count}` is replaced with the number of new posts
    #[serde(default = "defaults::subject")]
    pub subject: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: defaults::smtp_host(),
            smtp_port: defaults::smtp_port(),
            sender: String::new(),
            recipients: Vec::new(),
            subject: defaults::subject(),
        }
    }
}

impl EmailConfig {
    fn validate(&self) -> Result<()> {
        if self.smtp_host.trim().is_empty() {
            return Err(AppError::config("email.smtp_host is empty"));
        }
        if self.sender.trim().is_empty() {
            return Err(AppError::config("email.sender is empty"));
        }
        parse_mailbox("email.sender", &self.sender)?;

        if self.recipients.is_empty() {
            return Err(AppError::config("No email recipients defined"));
        }
        for recipient in &self.recipients {
            parse_mailbox("email.recipients", recipient)?;
        }
        Ok(())
    }
}

pub(crate) fn parse_mailbox(field: &str, address: &str) -> Result<Mailbox> {
    address
        .parse()
        .map_err(|e| AppError::config(format!("Invalid {field} entry '{address}': {e}")))
}

mod defaults {
    use super::SourceConfig;
    use crate::models::PostSelectors;

    // Fetch defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
         (KHTML, like Gecko) Chrome/124.0 Safari/537.36"
            .into()
    }
    pub fn timeout() -> u64 {
        30
    }

    // Storage defaults
    pub fn snapshot_path() -> String {
        "data/snapshot.json".into()
    }
    pub fn snapshot_key() -> String {
        "snapshot.json".into()
    }

    // Email defaults
    pub fn smtp_host() -> String {
        "smtp.gmail.com".into()
    }
    pub fn smtp_port() -> u16 {
        465
    }
    pub fn subject() -> String {
        "New posts on Politechnika Lubelska news pages ({count})".into()
    }

    // Source defaults
    pub fn sources() -> Vec<SourceConfig> {
        vec![
            SourceConfig {
                name: "weii".to_string(),
                url: "https://weii.pollub.pl/".to_string(),
                base_url: "https://weii.pollub.pl".to_string(),
                selectors: PostSelectors::new(".news-list .news-item", ".news-title a")
                    .with_date(".news-date")
                    .with_contents(".news-lead"),
            },
            SourceConfig {
                name: "pollub".to_string(),
                url: "https://pollub.pl/aktualnosci".to_string(),
                base_url: "https://pollub.pl".to_string(),
                selectors: PostSelectors::new("article.news-item", "h3 a")
                    .with_date("time")
                    .with_contents("p.excerpt"),
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        let mut config = Config::default();
        config.email.sender = "watcher@example.org".to_string();
        config.email.recipients = vec!["student@example.org".to_string()];
        config
    }

    #[test]
    fn validate_default_config_needs_email() {
        assert!(Config::default().validate().is_err());
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn default_ships_two_sources() {
        let config = Config::default();
        assert_eq!(config.sources.len(), 2);
        assert_eq!(config.storage, StorageConfig::default());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = valid_config();
        config.fetch.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_duplicate_source_names() {
        let mut config = valid_config();
        config.sources[1].name = config.sources[0].name.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_selector() {
        let mut config = valid_config();
        config.sources[0].selectors.title = "[[invalid".to_string();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, AppError::Selector { .. }));
    }

    #[test]
    fn validate_rejects_malformed_recipient() {
        let mut config = valid_config();
        config
            .email
            .recipients
            .push("student at example dot org".to_string());
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn validate_rejects_malformed_sender() {
        let mut config = valid_config();
        config.email.sender = "watcher".to_string();
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn validate_rejects_relative_base_url() {
        let mut config = valid_config();
        config.sources[0].base_url = "/news".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn parses_s3_storage_from_toml() {
        let config: Config = toml::from_str(
            r#"
            [storage]
            backend = "s3"
            bucket = "news-snapshots"

            [email]
            sender = "watcher@example.org"
            recipients = ["a@example.org", "b@example.org"]
            "#,
        )
        .unwrap();

        assert_eq!(
            config.storage,
            StorageConfig::S3 {
                bucket: "news-snapshots".to_string(),
                key: "snapshot.json".to_string(),
                region: None,
                endpoint: None,
            }
        );
        assert_eq!(config.email.smtp_port, 465);
        assert_eq!(config.sources.len(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parses_custom_sources_from_toml() {
        let config: Config = toml::from_str(
            r#"
            [[sources]]
            name = "only"
            url = "https://example.org/news"
            base_url = "https://example.org"

            [sources.selectors]
            post = "div.post"
            title = "h2"
            link = "a.more"
            "#,
        )
        .unwrap();

        assert_eq!(config.sources.len(), 1);
        let selectors = &config.sources[0].selectors;
        assert_eq!(selectors.link.as_deref(), Some("a.more"));
        assert_eq!(selectors.link_attr, "href");
    }
}
