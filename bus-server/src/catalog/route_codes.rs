//! Route codes seen per line.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::collate;

use super::union_sorted;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteCodes {
    pub line: String,
    #[serde(default)]
    pub codes: Vec<String>,
}

/// Merge observed route codes into the catalog. Returns whether it changed.
///
/// Codes within an entry are kept in plain lexicographic order; entries are
/// ordered by line with numbers compared by value.
pub fn merge_route_codes(
    catalog: &mut Vec<RouteCodes>,
    observed: &BTreeMap<String, BTreeSet<String>>,
) -> bool {
    let mut changed = false;

    for (line, codes) in observed {
        let codes = codes.iter().map(String::as_str);
        match catalog.iter_mut().find(|entry| entry.line == *line) {
            Some(entry) => {
                if union_sorted(&mut entry.codes, codes, str::cmp) {
                    debug!(line = %line, codes = ?entry.codes, "line gained route codes");
                    changed = true;
                }
            }
            None => {
                let mut entry = RouteCodes {
                    line: line.clone(),
                    codes: Vec::new(),
                };
                union_sorted(&mut entry.codes, codes, str::cmp);
                debug!(line = %line, codes = ?entry.codes, "new line");
                catalog.push(entry);
                changed = true;
            }
        }
    }

    if changed {
        catalog.sort_by(|a, b| collate::numeric_aware(&a.line, &b.line));
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observed(entries: &[(&str, &[&str])]) -> BTreeMap<String, BTreeSet<String>> {
        entries
            .iter()
            .map(|(line, codes)| {
                (
                    line.to_string(),
                    codes.iter().map(|c| c.to_string()).collect(),
                )
            })
            .collect()
    }

    fn entry(line: &str, codes: &[&str]) -> RouteCodes {
        RouteCodes {
            line: line.into(),
            codes: codes.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[test]
    fn new_lines_are_inserted_in_order() {
        let mut catalog = vec![entry("10", &["1000"])];

        let changed = merge_route_codes(
            &mut catalog,
            &observed(&[("7A", &["72", "700"]), ("2", &["20"])]),
        );

        assert!(changed);
        assert_eq!(
            catalog,
            vec![
                entry("2", &["20"]),
                entry("7A", &["700", "72"]),
                entry("10", &["1000"]),
            ]
        );
    }

    #[test]
    fn union_with_known_line() {
        let mut catalog = vec![entry("7A", &["700"])];

        assert!(merge_route_codes(&mut catalog, &observed(&[("7A", &["701", "700"])])));
        assert_eq!(catalog, vec![entry("7A", &["700", "701"])]);

        assert!(!merge_route_codes(&mut catalog, &observed(&[("7A", &["701"])])));
    }

    #[test]
    fn nothing_observed_is_no_change() {
        let mut catalog = vec![entry("7A", &["700"])];
        assert!(!merge_route_codes(&mut catalog, &BTreeMap::new()));
    }
}
