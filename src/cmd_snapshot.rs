//! `snapshot` and `replay` command handlers.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use tracing::{info, warn};

use glimpse_config::{Config, ConfigValidator};
use glimpse_core::{SnapshotEngine, SnapshotOutcome};
use glimpse_driver_cdp::{CdpClient, CdpPageDriver};
use glimpse_driver_fixture::{FixturePage, PageModel};

/// Where to find the page for a live snapshot.
pub(crate) struct LiveTarget {
    pub endpoint: Option<String>,
    pub url: Option<String>,
    pub target: Option<String>,
}

/// Snapshot a live page. A tab opened for the pass is closed afterwards.
pub(crate) async fn run_snapshot(
    config: &Config,
    live: LiveTarget,
    output: Option<&Path>,
    report: bool,
) -> anyhow::Result<()> {
    let engine = engine(config)?;
    let endpoint = live.endpoint.unwrap_or_else(|| config.browser.endpoint.clone());
    let request_timeout = Duration::from_secs(config.browser.request_timeout_secs);

    let client = CdpClient::connect(&endpoint, request_timeout)
        .await
        .with_context(|| format!("Failed to connect to Chrome at {}", endpoint))?;

    let (session, opened) = match &live.target {
        Some(id) => (client.attach_page(id).await?, false),
        None => (client.new_page().await?, true),
    };

    let driver = CdpPageDriver::new(session);
    let result = snapshot_page(&engine, &driver, live.url.as_deref(), config).await;

    if opened {
        if let Err(e) = client.close_page(driver.session().target_id()).await {
            warn!("Failed to close page {}: {}", driver.session().target_id(), e);
        }
    }

    emit(&result?, output, report)
}

async fn snapshot_page(
    engine: &SnapshotEngine,
    driver: &CdpPageDriver,
    url: Option<&str>,
    config: &Config,
) -> anyhow::Result<SnapshotOutcome> {
    match url {
        Some(url) => {
            let load_timeout = Duration::from_secs(config.browser.load_timeout_secs);
            driver
                .session()
                .navigate(url, load_timeout)
                .await
                .with_context(|| format!("Failed to load {}", url))?;
        }
        None => {
            let current = driver.session().get_url().await.unwrap_or_default();
            info!("Snapshotting current page {}", current);
        }
    }
    Ok(engine.run(driver).await?)
}

/// Snapshot a recorded page model.
pub(crate) async fn run_replay(
    config: &Config,
    fixture: &Path,
    output: Option<&Path>,
    report: bool,
) -> anyhow::Result<()> {
    let engine = engine(config)?;
    let model = PageModel::from_path(fixture)
        .with_context(|| format!("Failed to load fixture {}", fixture.display()))?;
    let page = FixturePage::new(model);

    let outcome = engine.run(&page).await?;
    emit(&outcome, output, report)
}

fn engine(config: &Config) -> anyhow::Result<SnapshotEngine> {
    let validation = ConfigValidator::ensure_valid(config)?;
    for warning in &validation.warnings {
        warn!("Config {}: {}", warning.path, warning.message);
    }
    Ok(SnapshotEngine::from_config(config))
}

/// Write the payload to `output` (or stdout) and the report to stderr.
fn emit(outcome: &SnapshotOutcome, output: Option<&Path>, report: bool) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, &outcome.payload)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {} bytes to {}", outcome.payload.len(), path.display());
        }
        None => println!("{}", outcome.payload),
    }

    if report {
        eprintln!("{}", serde_json::to_string_pretty(&outcome.report)?);
    }
    Ok(())
}
