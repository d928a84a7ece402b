// src/pipeline/run.rs

//! One discovery pass: fetch, extract, merge, diff, save, notify.
//!
//! Every step runs at most once and errors abort the pass. The snapshot is
//! saved before the digest is sent, so a failed send is not retried on the
//! next run.

use chrono::Utc;
use futures::future::join_all;
use url::Url;

use crate::config::SmtpCredentials;
use crate::error::{AppError, Result};
use crate::models::{Config, Post, RunOutcome, RunReport, SourceConfig, SourceReport};
use crate::pipeline::diff::{extend_snapshot, find_new};
use crate::services::{
    DocumentFetcher, EmailNotifier, Extractor, HttpFetcher, Notifier, format_digest,
    format_subject,
};
use crate::storage::{self, SnapshotStore};

/// A configured source ready to be fetched and extracted.
#[derive(Debug, Clone)]
pub struct Source {
    pub name: String,
    pub url: String,
    pub base_url: Url,
    extractor: Extractor,
}

impl Source {
    pub fn from_config(config: &SourceConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            AppError::config(format!("Source '{}' has invalid base_url: {e}", config.name))
        })?;

        Ok(Self {
            name: config.name.clone(),
            url: config.url.clone(),
            base_url,
            extractor: Extractor::new(&config.name, &config.selectors)?,
        })
    }

    /// Extract this source's posts from its fetched page.
    pub fn extract(&self, raw_html: &str) -> Result<Vec<Post>> {
        self.extractor.extract(raw_html, &self.base_url)
    }
}

/// Orchestrates a single pass over all sources.
pub struct Pipeline<'a> {
    sources: Vec<Source>,
    recipients: Vec<String>,
    subject: String,
    fetcher: &'a dyn DocumentFetcher,
    store: &'a dyn SnapshotStore,
    notifier: &'a dyn Notifier,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        config: &Config,
        fetcher: &'a dyn DocumentFetcher,
        store: &'a dyn SnapshotStore,
        notifier: &'a dyn Notifier,
    ) -> Result<Self> {
        let sources = config
            .sources
            .iter()
            .map(Source::from_config)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            sources,
            recipients: config.email.recipients.clone(),
            subject: config.email.subject.clone(),
            fetcher,
            store,
            notifier,
        })
    }

    /// Run one pass.
    pub async fn run(&self) -> Result<RunReport> {
        let started_at = Utc::now();

        let (batch, sources) = self.collect_batch().await?;
        log::info!(
            "Batch holds {} posts from {} sources",
            batch.len(),
            sources.len()
        );

        let existing = self.store.load().await?;
        log::info!("Snapshot holds {} posts", existing.len());

        let new_posts = find_new(&existing, &batch);
        if new_posts.is_empty() {
            log::info!("No new posts");
            return Ok(RunReport {
                started_at,
                finished_at: Utc::now(),
                sources,
                batch_size: batch.len(),
                snapshot_size: existing.len(),
                new_posts,
                outcome: RunOutcome::NoNewPosts,
            });
        }
        log::info!("Found {} new posts", new_posts.len());

        let snapshot = extend_snapshot(existing, &new_posts);
        self.store.save(&snapshot).await?;

        let subject = format_subject(&self.subject, new_posts.len());
        let body = format_digest(&new_posts);
        self.notifier.send(&self.recipients, &subject, &body).await?;

        Ok(RunReport {
            started_at,
            finished_at: Utc::now(),
            sources,
            batch_size: batch.len(),
            snapshot_size: snapshot.len(),
            new_posts,
            outcome: RunOutcome::Notified,
        })
    }

    /// Fetch all sources concurrently, then extract and merge in source order.
    async fn collect_batch(&self) -> Result<(Vec<Post>, Vec<SourceReport>)> {
        let bodies = join_all(self.sources.iter().map(|s| self.fetcher.fetch(&s.url))).await;

        let mut batch = Vec::new();
        let mut reports = Vec::with_capacity(self.sources.len());

        for (source, body) in self.sources.iter().zip(bodies) {
            let body = body.inspect_err(|e| log::error!("{}: {}", source.name, e))?;
            let posts = source.extract(&body)?;
            log::info!("{}: {} posts", source.name, posts.len());

            reports.push(SourceReport {
                name: source.name.clone(),
                post_count: posts.len(),
            });
            batch.extend(posts);
        }

        Ok((batch, reports))
    }
}

/// Run one pass with the production collaborators.
pub async fn run_once(config: &Config) -> Result<RunReport> {
    let fetcher = HttpFetcher::new(&config.fetch)?;
    let notifier = EmailNotifier::new(&config.email, SmtpCredentials::from_env()?)?;
    let store = storage::open(&config.storage).await?;

    Pipeline::new(config, &fetcher, store.as_ref(), &notifier)?
        .run()
        .await
}
