//! Service layer for the news watcher.
//!
//! - Page fetching (`DocumentFetcher`, `HttpFetcher`)
//! - Post extraction (`Extractor`)
//! - Digest delivery (`Notifier`, `EmailNotifier`)

mod extractor;
mod fetcher;
mod notifier;

pub use extractor::Extractor;
pub use fetcher::{DocumentFetcher, HttpFetcher};
pub use notifier::{EmailNotifier, Notifier, format_digest, format_subject};
