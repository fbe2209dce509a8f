//! Partitioning of visit records by client.

use std::collections::HashMap;

use returns_core::models::{ClientGroup, VisitRecord};
use tracing::debug;

/// Group `records` by client id and keep only returning clients.
///
/// Groups come out in the order each client first appears in `records`;
/// within a group, visits are sorted ascending by date (see
/// [`ClientGroup::new`]). Clients with a single visit are dropped.
pub fn group_by_client(records: &[VisitRecord]) -> Vec<ClientGroup> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut buckets: Vec<(&str, Vec<VisitRecord>)> = Vec::new();

    for record in records {
        let slot = *positions
            .entry(record.client_id.as_str())
            .or_insert_with(|| {
                buckets.push((record.client_id.as_str(), Vec::new()));
                buckets.len() - 1
            });
        buckets[slot].1.push(record.clone());
    }

    let clients = buckets.len();
    let groups: Vec<ClientGroup> = buckets
        .into_iter()
        .filter_map(|(client_id, visits)| ClientGroup::new(client_id, visits))
        .collect();

    debug!(
        "Grouped {} records into {} clients, {} returning",
        records.len(),
        clients,
        groups.len()
    );
    groups
}
