//! End-to-end report pipeline.
//!
//! rows → records → client groups → client metrics → bucket rollups → report.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use returns_core::buckets::BucketDefinition;
use returns_core::error::Result;
use returns_core::models::{ClientMetrics, Report, VisitRecord};
use returns_data::grouper::group_by_client;
use returns_data::metrics::derive_all;
use returns_data::normalizer::normalize_rows;
use returns_data::reader::load_rows;

use crate::rollup::RollupAggregator;

/// Build the report for already-normalized records.
pub async fn build_report(
    buckets: &[BucketDefinition],
    records: Vec<VisitRecord>,
) -> Result<Report> {
    let groups = group_by_client(&records);
    let metrics: Arc<[ClientMetrics]> = derive_all(&groups).into();
    let records: Arc<[VisitRecord]> = records.into();

    let totals = RollupAggregator::global_totals(&records, &metrics);
    let rollups = RollupAggregator::rollup_all(buckets, metrics, records).await?;

    Ok(Report {
        buckets: rollups,
        totals,
    })
}

/// Normalize raw rows and build the report.
///
/// A single invalid date aborts the run before any aggregation starts.
pub async fn report_from_rows<R: AsRef<[String]>>(
    buckets: &[BucketDefinition],
    rows: &[R],
) -> Result<Report> {
    let records = normalize_rows(rows)?;
    build_report(buckets, records).await
}

/// Load every CSV under `data_dir` and build the report.
pub async fn run(data_dir: &Path, buckets: &[BucketDefinition]) -> Result<Report> {
    let start = Instant::now();
    tracing::info!("Reading exports from {}", data_dir.display());

    let rows = load_rows(data_dir)?;
    let report = report_from_rows(buckets, &rows).await?;

    tracing::info!(
        records = report.totals.total_records,
        returning_users = report.totals.total_returning_users,
        buckets = report.buckets.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "report assembled"
    );
    Ok(report)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
