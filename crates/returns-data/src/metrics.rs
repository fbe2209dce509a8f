//! Per-client metric derivation.

use returns_core::models::{ClientGroup, ClientMetrics};

/// Whole days from each visit to the next, in group order.
///
/// A group of `n` visits yields `n - 1` gaps. Partial days are truncated
/// toward zero.
pub fn day_gaps(group: &ClientGroup) -> Vec<i64> {
    group
        .records()
        .windows(2)
        .map(|pair| {
            let hours = (pair[1].date - pair[0].date).num_hours();
            hours / 24
        })
        .collect()
}

/// Average of the day gaps.
///
/// No gaps gives 0, one gap is returned as-is, otherwise the mean is
/// truncated toward zero.
///
/// # Examples
///
/// ```
/// use returns_data::metrics::average_gap;
///
/// assert_eq!(average_gap(&[]), 0);
/// assert_eq!(average_gap(&[7]), 7);
/// assert_eq!(average_gap(&[4, 5]), 4);
/// ```
pub fn average_gap(gaps: &[i64]) -> i64 {
    match gaps {
        [] => 0,
        [only] => *only,
        _ => gaps.iter().sum::<i64>() / gaps.len() as i64,
    }
}

/// Sum of `values`, clamped at `u64::MAX` instead of overflowing.
pub fn saturating_sum<I: IntoIterator<Item = u64>>(values: I) -> u64 {
    values.into_iter().fold(0u64, u64::saturating_add)
}

/// Derive the metrics of one returning client.
///
/// Browser and version are taken from the client's earliest visit.
pub fn derive_metrics(group: &ClientGroup) -> ClientMetrics {
    let first = group.first();
    let records = group.records();

    ClientMetrics {
        client_id: group.client_id().to_string(),
        browser: first.browser.clone(),
        browser_version: first.browser_version.clone(),
        average_days_between_visits: average_gap(&day_gaps(group)),
        total_sessions: saturating_sum(records.iter().map(|r| r.sessions)),
        total_transactions: saturating_sum(records.iter().map(|r| r.transactions)),
        visit_count: group.len() as u64,
    }
}

/// Derive metrics for every group, preserving group order.
pub fn derive_all(groups: &[ClientGroup]) -> Vec<ClientMetrics> {
    groups.iter().map(derive_metrics).collect()
}
