//! Every line label ever published.

use tracing::debug;

use crate::domain::collate;
use crate::rules::RuleStore;

use super::union_sorted;

/// Normalize raw line labels and merge them into the list.
///
/// Each label goes through the vehicle rules as if it were a vehicle's line,
/// so the list uses the same labels as the bus and stop catalogs. Empty
/// labels are dropped. Returns whether the list changed.
pub fn merge_route_numbers<S: AsRef<str>>(
    catalog: &mut Vec<String>,
    raw_labels: impl IntoIterator<Item = S>,
    rules: &RuleStore,
) -> bool {
    let labels: Vec<String> = raw_labels
        .into_iter()
        .map(|raw| rules.normalize_line(raw.as_ref()))
        .filter(|label| !label.is_empty())
        .collect();

    let before = catalog.len();
    let changed = union_sorted(
        catalog,
        labels.iter().map(String::as_str),
        collate::numeric_aware,
    );
    if changed {
        debug!(added = catalog.len() - before, "new route numbers");
    }
    changed
}
