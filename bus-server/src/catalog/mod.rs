//! Persisted reference catalogs.
//!
//! Three catalogs are built up from what the feeds report over time:
//! - `stop-list.json`: every stop a bus has reached, with the lines seen there
//! - `route-codes.json`: the route codes each line has run under
//! - `route-numbers.json`: every line label the operator has published
//!
//! Catalogs only grow. Each tick loads the current snapshot, merges the new
//! observations, and writes the snapshot back only if something was added.

mod aliases;
mod observed;
mod reconciler;
mod route_codes;
mod route_numbers;
mod stops;
mod store;


use std::cmp::Ordering;

pub use aliases::{AliasError, StopAliases};
pub use observed::{ObservedFacts, ObservedStop};
pub use reconciler::{CatalogChanges, CatalogReconciler, TickOutcome};
pub use route_codes::{RouteCodes, merge_route_codes};
pub use route_numbers::merge_route_numbers;
pub use stops::{StopEntry, merge_stops};
pub use store::{JsonFileStore, ROUTE_CODES, ROUTE_NUMBERS, STOP_LIST, SnapshotStore, StoreError};

#[cfg(test)]
pub use store::MemoryStore;

/// Add the missing `items` to `target`, re-sorting if anything was added.
///
/// Returns whether `target` grew. An unchanged list keeps its order.
fn union_sorted<'a>(
    target: &mut Vec<String>,
    items: impl IntoIterator<Item = &'a str>,
    order: impl Fn(&str, &str) -> Ordering,
) -> bool {
    let before = target.len();
    for item in items {
        if !target.iter().any(|existing| existing == item) {
            target.push(item.to_string());
        }
    }

    if target.len() == before {
        return false;
    }
    target.sort_by(|a, b| order(a, b));
    true
}
