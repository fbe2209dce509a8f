//! Plain-text and JSON rendering of a [`Report`].

use std::fmt::Write as _;

use crate::error::Result;
use crate::models::{BucketRollup, GlobalTotals, Report};

/// Line printed after every bucket block.
pub const SEPARATOR: &str = "--- --- --- --- --- ---";

/// How a report is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Render `report` in the requested format.
pub fn render_report(report: &Report, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(report)),
        OutputFormat::Json => render_json(report),
    }
}

/// Pretty-printed JSON, terminated by a newline.
pub fn render_json(report: &Report) -> Result<String> {
    let mut out = serde_json::to_string_pretty(report)?;
    out.push('\n');
    Ok(out)
}

/// Global totals first, then one block per bucket in report order.
///
/// # Examples
///
/// ```
/// use returns_core::formatting::render_text;
/// use returns_core::models::Report;
///
/// let text = render_text(&Report::default());
/// assert!(text.starts_with("Total records: 0\n"));
/// ```
pub fn render_text(report: &Report) -> String {
    let mut out = String::new();
    write_totals(&mut out, &report.totals);
    for rollup in &report.buckets {
        write_bucket(&mut out, rollup);
    }
    out
}

fn write_totals(out: &mut String, totals: &GlobalTotals) {
    // Writing into a String cannot fail.
    let _ = writeln!(out, "Total records: {}", totals.total_records);
    let _ = writeln!(out, "Total sessions: {}", totals.total_sessions);
    let _ = writeln!(out, "Total returning users: {}", totals.total_returning_users);
    let _ = writeln!(out, "Total transactions: {}", totals.total_transactions);
    let _ = writeln!(
        out,
        "Total returning user sessions: {}",
        totals.total_returning_sessions
    );
    let _ = writeln!(
        out,
        "Total returning user transactions: {}",
        totals.total_returning_transactions
    );
    let _ = writeln!(out, "{}", SEPARATOR);
}

fn write_bucket(out: &mut String, rollup: &BucketRollup) {
    let label = &rollup.label;
    let _ = writeln!(out, "{} total users: {}", label, rollup.total_users);
    let _ = writeln!(
        out,
        "{} returning users: {}",
        label, rollup.returning_user_total
    );
    let _ = writeln!(
        out,
        "{} average days between visits: {}",
        label, rollup.average_days_between_visit
    );
    let _ = writeln!(
        out,
        "{} total sessions: {}",
        label, rollup.record_sessions_total
    );
    let _ = writeln!(
        out,
        "{} total transactions: {}",
        label, rollup.record_transactions_total
    );
    let _ = writeln!(
        out,
        "{} total returning user sessions: {}",
        label, rollup.sessions_total
    );
    let _ = writeln!(
        out,
        "{} total returning user transactions: {}",
        label, rollup.transactions_total
    );
    let _ = writeln!(
        out,
        "{} average number of returns: {}",
        label, rollup.average_returns
    );
    let _ = writeln!(out, "{}", SEPARATOR);
}
