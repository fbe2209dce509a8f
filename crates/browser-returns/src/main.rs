mod bootstrap;

use anyhow::{Context, Result};
use returns_core::buckets::resolve_buckets;
use returns_core::formatting::render_report;
use returns_core::settings::Settings;
use returns_runtime::pipeline;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_deref())?;

    tracing::info!("browser-returns v{} starting", env!("CARGO_PKG_VERSION"));

    let buckets = resolve_buckets(settings.buckets.as_deref())
        .context("failed to load bucket configuration")?;
    tracing::debug!("Using {} buckets", buckets.len());

    let report = pipeline::run(&settings.data_dir, &buckets)
        .await
        .with_context(|| format!("failed to build report from {}", settings.data_dir.display()))?;

    print!("{}", render_report(&report, settings.output_format())?);

    Ok(())
}
