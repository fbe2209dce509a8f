//! Per-bucket rollups and global totals.
//!
//! Every bucket reads the same immutable record and metric sets, so bucket
//! rollups run as independent tasks on the blocking pool and are joined back
//! in configured order.

use std::sync::Arc;

use returns_core::buckets::BucketDefinition;
use returns_core::error::{Result, ReturnsError};
use returns_core::models::{BucketRollup, ClientMetrics, GlobalTotals, VisitRecord};
use returns_data::metrics::saturating_sum;
use tokio::task::JoinHandle;

// ── RollupAggregator ──────────────────────────────────────────────────────────

/// Stateless helper that rolls client metrics up into bucket statistics.
pub struct RollupAggregator;

impl RollupAggregator {
    /// Roll up one bucket.
    ///
    /// Returning-client figures come from `metrics`; the record-level figures
    /// (`total_users`, `record_*`) come from every matching record in
    /// `records`, returning or not.
    pub fn rollup_bucket(
        bucket: &BucketDefinition,
        metrics: &[ClientMetrics],
        records: &[VisitRecord],
    ) -> BucketRollup {
        let matching: Vec<&ClientMetrics> =
            metrics.iter().filter(|m| bucket.matches_metrics(m)).collect();
        let returning = matching.len() as u64;

        let day_sum: i64 = matching.iter().map(|m| m.average_days_between_visits).sum();
        let visit_sum = saturating_sum(matching.iter().map(|m| m.visit_count));

        let mut rollup = BucketRollup {
            bucket: bucket.name.clone(),
            label: bucket.label(),
            returning_user_total: returning,
            average_days_between_visit: day_sum.checked_div(returning as i64).unwrap_or(0),
            sessions_total: saturating_sum(matching.iter().map(|m| m.total_sessions)),
            transactions_total: saturating_sum(matching.iter().map(|m| m.total_transactions)),
            average_returns: visit_sum.checked_div(returning).unwrap_or(0),
            ..Default::default()
        };

        for record in records.iter().filter(|r| bucket.matches_record(r)) {
            rollup.total_users += 1;
            rollup.record_sessions_total =
                rollup.record_sessions_total.saturating_add(record.sessions);
            rollup.record_transactions_total =
                rollup.record_transactions_total.saturating_add(record.transactions);
        }

        rollup
    }

    /// Roll up every bucket concurrently and return the rollups in the order
    /// of `buckets`.
    pub async fn rollup_all(
        buckets: &[BucketDefinition],
        metrics: Arc<[ClientMetrics]>,
        records: Arc<[VisitRecord]>,
    ) -> Result<Vec<BucketRollup>> {
        let handles: Vec<JoinHandle<BucketRollup>> = buckets
            .iter()
            .cloned()
            .map(|bucket| {
                let metrics = Arc::clone(&metrics);
                let records = Arc::clone(&records);
                tokio::task::spawn_blocking(move || {
                    Self::rollup_bucket(&bucket, &metrics, &records)
                })
            })
            .collect();

        let mut rollups = Vec::with_capacity(handles.len());
        for handle in handles {
            let rollup = handle
                .await
                .map_err(|e| ReturnsError::TaskJoin(e.to_string()))?;
            tracing::debug!(
                bucket = %rollup.bucket,
                returning = rollup.returning_user_total,
                records = rollup.total_users,
                "bucket rolled up"
            );
            rollups.push(rollup);
        }
        Ok(rollups)
    }

    /// Totals over the full, unfiltered sets.
    ///
    /// Computed independently of the buckets so that overlapping buckets are
    /// never counted twice.
    pub fn global_totals(records: &[VisitRecord], metrics: &[ClientMetrics]) -> GlobalTotals {
        GlobalTotals {
            total_records: records.len() as u64,
            total_sessions: saturating_sum(records.iter().map(|r| r.sessions)),
            total_transactions: saturating_sum(records.iter().map(|r| r.transactions)),
            total_returning_users: metrics.len() as u64,
            total_returning_sessions: saturating_sum(metrics.iter().map(|m| m.total_sessions)),
            total_returning_transactions: saturating_sum(
                metrics.iter().map(|m| m.total_transactions),
            ),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
