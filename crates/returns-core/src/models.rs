use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single browsing session read from an analytics export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitRecord {
    /// Position of the row in the concatenated input.
    pub index: usize,
    /// Calendar date of the session.
    pub date: NaiveDate,
    /// Visitor identifier correlating sessions of one client.
    pub client_id: String,
    /// Device category as exported (e.g. "desktop", "mobile").
    #[serde(default)]
    pub device_category: String,
    /// Browser name; compared case-insensitively.
    pub browser: String,
    /// Browser version string, possibly empty.
    #[serde(default)]
    pub browser_version: String,
    /// Number of sessions recorded on the row.
    #[serde(default)]
    pub sessions: u64,
    /// Number of transactions recorded on the row.
    #[serde(default)]
    pub transactions: u64,
    /// Transaction revenue recorded on the row.
    #[serde(default)]
    pub transaction_revenue: f64,
}

/// All visits of one returning client, sorted by date.
///
/// A group always holds at least two records; see [`ClientGroup::new`].
#[derive(Debug, Clone, PartialEq)]
pub struct ClientGroup {
    client_id: String,
    records: Vec<VisitRecord>,
}

impl ClientGroup {
    /// Build a group from the visits of `client_id`.
    ///
    /// Returns `None` when fewer than two records are supplied: single-visit
    /// clients are not returning users. The records are sorted ascending by
    /// date; the sort is stable so visits sharing a date keep input order.
    pub fn new(client_id: impl Into<String>, mut records: Vec<VisitRecord>) -> Option<Self> {
        if records.len() < 2 {
            return None;
        }
        records.sort_by_key(|r| r.date);
        Some(Self {
            client_id: client_id.into(),
            records,
        })
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Visits in ascending date order.
    pub fn records(&self) -> &[VisitRecord] {
        &self.records
    }

    /// Earliest visit of the group.
    pub fn first(&self) -> &VisitRecord {
        // Non-empty by construction.
        &self.records[0]
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Temporal and volumetric metrics for one returning client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientMetrics {
    pub client_id: String,
    /// Browser of the client's first visit.
    pub browser: String,
    /// Browser version of the client's first visit.
    pub browser_version: String,
    /// Truncated mean of the day gaps between consecutive visits.
    pub average_days_between_visits: i64,
    pub total_sessions: u64,
    pub total_transactions: u64,
    /// Number of visits (the group size).
    pub visit_count: u64,
}

/// Rolled-up statistics for one configured browser bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketRollup {
    /// Bucket name as configured (e.g. `"safari 12+"`).
    pub bucket: String,
    /// Display label (upper-cased name).
    pub label: String,
    /// Number of returning clients in the bucket.
    pub returning_user_total: u64,
    /// Truncated mean of the clients' average day gaps; 0 when empty.
    pub average_days_between_visit: i64,
    /// Sessions summed over returning clients.
    pub sessions_total: u64,
    /// Transactions summed over returning clients.
    pub transactions_total: u64,
    /// Truncated mean of the clients' visit counts; 0 when empty.
    pub average_returns: u64,
    /// Number of records (returning or not) matching the bucket.
    pub total_users: u64,
    /// Sessions summed over all matching records.
    pub record_sessions_total: u64,
    /// Transactions summed over all matching records.
    pub record_transactions_total: u64,
}

/// Process-wide totals, computed once over the unfiltered sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalTotals {
    pub total_records: u64,
    pub total_sessions: u64,
    pub total_transactions: u64,
    pub total_returning_users: u64,
    pub total_returning_sessions: u64,
    pub total_returning_transactions: u64,
}

/// The final output of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// One rollup per configured bucket, in configured order.
    pub buckets: Vec<BucketRollup>,
    pub totals: GlobalTotals,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(index: usize, date: &str, client: &str) -> VisitRecord {
        VisitRecord {
            index,
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            client_id: client.to_string(),
            device_category: "desktop".to_string(),
            browser: "Chrome".to_string(),
            browser_version: "80.0".to_string(),
            sessions: 1,
            transactions: 0,
            transaction_revenue: 0.0,
        }
    }

    // ── ClientGroup::new ──────────────────────────────────────────────────────

    #[test]
    fn test_client_group_rejects_empty() {
        assert!(ClientGroup::new("a", vec![]).is_none());
    }

    #[test]
    fn test_client_group_rejects_single_visit() {
        assert!(ClientGroup::new("a", vec![record(0, "2020-01-01", "a")]).is_none());
    }

    #[test]
    fn test_client_group_sorts_by_date() {
        let group = ClientGroup::new(
            "a",
            vec![
                record(0, "2020-01-10", "a"),
                record(1, "2020-01-01", "a"),
                record(2, "2020-01-05", "a"),
            ],
        )
        .unwrap();

        let indices: Vec<usize> = group.records().iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![1, 2, 0]);
        assert_eq!(group.first().index, 1);
        assert_eq!(group.len(), 3);
        assert!(!group.is_empty());
        assert_eq!(group.client_id(), "a");
    }

    #[test]
    fn test_client_group_sort_is_stable_for_equal_dates() {
        let group = ClientGroup::new(
            "a",
            vec![
                record(0, "2020-01-02", "a"),
                record(1, "2020-01-01", "a"),
                record(2, "2020-01-01", "a"),
            ],
        )
        .unwrap();

        let indices: Vec<usize> = group.records().iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![1, 2, 0]);
    }

    // ── Serialization ─────────────────────────────────────────────────────────

    #[test]
    fn test_report_serializes_snake_case_fields() {
        let report = Report {
            buckets: vec![BucketRollup {
                bucket: "chrome".to_string(),
                label: "CHROME".to_string(),
                returning_user_total: 1,
                ..Default::default()
            }],
            totals: GlobalTotals {
                total_records: 4,
                ..Default::default()
            },
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["buckets"][0]["label"], "CHROME");
        assert_eq!(json["buckets"][0]["returning_user_total"], 1);
        assert_eq!(json["totals"]["total_records"], 4);
    }
}
