//! Conversion of raw CSV rows into typed [`VisitRecord`]s.
//!
//! Column layout (fixed by the export format):
//! `index, date, clientId, deviceCategory, browser, browserVersion, sessions,
//! transactions, transactionRevenue`.
//!
//! Dates are strict: any row whose date is not `YYYY-MM-DD` aborts the run.
//! Counts are lenient: an unparsable count becomes zero.

use chrono::NaiveDate;
use returns_core::error::{Result, ReturnsError};
use returns_core::models::VisitRecord;
use tracing::{debug, trace};

/// Number of columns every row must carry.
pub const EXPECTED_COLUMNS: usize = 9;

const COL_DATE: usize = 1;
const COL_CLIENT_ID: usize = 2;
const COL_DEVICE_CATEGORY: usize = 3;
const COL_BROWSER: usize = 4;
const COL_BROWSER_VERSION: usize = 5;
const COL_SESSIONS: usize = 6;
const COL_TRANSACTIONS: usize = 7;
const COL_REVENUE: usize = 8;

/// Normalize every row, failing on the first invalid one.
pub fn normalize_rows<R: AsRef<[String]>>(rows: &[R]) -> Result<Vec<VisitRecord>> {
    let records = rows
        .iter()
        .enumerate()
        .map(|(index, row)| normalize_row(index, row.as_ref()))
        .collect::<Result<Vec<_>>>()?;

    debug!("Normalized {} records", records.len());
    Ok(records)
}

/// Normalize the row at position `index`.
pub fn normalize_row(index: usize, row: &[String]) -> Result<VisitRecord> {
    if row.len() < EXPECTED_COLUMNS {
        return Err(ReturnsError::MalformedRow {
            row: index,
            expected: EXPECTED_COLUMNS,
            found: row.len(),
        });
    }

    let client_id = row[COL_CLIENT_ID].clone();
    if client_id.is_empty() {
        return Err(ReturnsError::MissingClientId(index));
    }

    let date = parse_date(&row[COL_DATE]).ok_or_else(|| ReturnsError::InvalidDate {
        row: index,
        value: row[COL_DATE].clone(),
    })?;

    Ok(VisitRecord {
        index,
        date,
        client_id,
        device_category: row[COL_DEVICE_CATEGORY].clone(),
        browser: row[COL_BROWSER].clone(),
        browser_version: row[COL_BROWSER_VERSION].clone(),
        sessions: parse_count(index, "sessions", &row[COL_SESSIONS]),
        transactions: parse_count(index, "transactions", &row[COL_TRANSACTIONS]),
        transaction_revenue: parse_revenue(&row[COL_REVENUE]),
    })
}

/// Parse a `YYYY-MM-DD` date.
///
/// Returns `None` unless the value splits on `-` into exactly three numeric
/// segments forming a real calendar date.
///
/// # Examples
///
/// ```
/// use returns_data::normalizer::parse_date;
///
/// assert!(parse_date("2020-01-05").is_some());
/// assert!(parse_date("2020-1-5").is_some());
/// assert!(parse_date("2020/01/05").is_none());
/// assert!(parse_date("2020-02-30").is_none());
/// ```
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = value.split('-').collect();
    let [year, month, day] = parts.as_slice() else {
        return None;
    };
    let year: i32 = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    let day: u32 = day.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parse a non-negative count, falling back to zero.
pub fn parse_count(row: usize, field: &str, value: &str) -> u64 {
    value.parse().unwrap_or_else(|_| {
        trace!("row {}: {} {:?} is not a count; using 0", row, field, value);
        0
    })
}

fn parse_revenue(value: &str) -> f64 {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .unwrap_or(0.0)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
