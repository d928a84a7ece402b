// src/models/mod.rs

//! Domain models for the news watcher.

mod config;
mod post;
mod report;
mod selectors;

// Re-export all public types
pub use config::{Config, EmailConfig, FetchConfig, SourceConfig, StorageConfig};
pub(crate) use config::parse_mailbox;
pub use post::Post;
pub use report::{RunOutcome, RunReport, SourceReport};
pub use selectors::PostSelectors;
