//! newswatch
//!
//! Runs exactly one discovery pass and exits. Meant to be invoked by an
//! external scheduler (cron, systemd timer, serverless trigger).

use std::process::ExitCode;

use newswatch::{config, error::Result, models::RunReport, pipeline};

/// Initialize logging; `RUST_LOG` overrides the default level.
fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();
}

async fn run() -> Result<RunReport> {
    let config_path = config::config_path();
    let config = config::load_validated(&config_path)?;
    log::info!(
        "Loaded configuration from {} ({} sources)",
        config_path.display(),
        config.sources.len()
    );

    pipeline::run_once(&config).await
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();
    log::info!("newswatch starting...");

    match run().await {
        Ok(report) => {
            for source in &report.sources {
                log::info!("  {}: {} posts", source.name, source.post_count);
            }
            log::info!(
                "Done in {}ms: {} new of {} extracted, snapshot size {} ({:?})",
                report.elapsed_ms(),
                report.new_posts.len(),
                report.batch_size,
                report.snapshot_size,
                report.outcome
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Run failed ({} error): {}", e.kind(), e);
            ExitCode::FAILURE
        }
    }
}
