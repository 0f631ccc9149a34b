//! The stop list catalog.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::collate;

use super::aliases::StopAliases;
use super::observed::ObservedStop;
use super::union_sorted;

/// One known stop.
///
/// The JSON field names are swapped relative to their meaning; consumers of
/// `stop-list.json` already depend on them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopEntry {
    /// Display name.
    #[serde(rename = "stopId")]
    pub name: String,

    /// Stop code, the natural key.
    #[serde(rename = "stopName")]
    pub code: String,

    #[serde(default)]
    pub lines: Vec<String>,
}

/// Merge observed stops into the catalog. Returns whether it changed.
///
/// New stops take their display name from the alias table when it has one.
/// Known stops only ever gain lines; their name is never rewritten.
pub fn merge_stops(
    catalog: &mut Vec<StopEntry>,
    observed: &BTreeMap<String, ObservedStop>,
    aliases: &StopAliases,
) -> bool {
    let mut index: HashMap<String, usize> = HashMap::with_capacity(catalog.len());
    for (i, entry) in catalog.iter().enumerate() {
        index.entry(entry.code.clone()).or_insert(i);
    }

    let mut changed = false;
    for (code, stop) in observed {
        let lines = stop.lines.iter().map(String::as_str);
        match index.get(code) {
            Some(&i) => {
                if union_sorted(&mut catalog[i].lines, lines, collate::numeric_aware) {
                    debug!(stop = %code, lines = ?catalog[i].lines, "stop gained lines");
                    changed = true;
                }
            }
            None => {
                let name = aliases.resolve(code).unwrap_or(&stop.name).to_string();
                debug!(stop = %code, name = %name, "new stop");
                let mut entry = StopEntry {
                    name,
                    code: code.clone(),
                    lines: Vec::new(),
                };
                union_sorted(&mut entry.lines, lines, collate::numeric_aware);
                index.insert(code.clone(), catalog.len());
                catalog.push(entry);
                changed = true;
            }
        }
    }

    if changed {
        catalog.sort_by(stop_order);
    }
    changed
}

fn stop_order(a: &StopEntry, b: &StopEntry) -> Ordering {
    collate::text(&a.name, &b.name).then_with(|| a.code.cmp(&b.code))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn observed(entries: &[(&str, &str, &[&str])]) -> BTreeMap<String, ObservedStop> {
        entries
            .iter()
            .map(|(code, name, lines)| {
                (
                    code.to_string(),
                    ObservedStop {
                        name: name.to_string(),
                        lines: lines.iter().map(|l| l.to_string()).collect::<BTreeSet<_>>(),
                    },
                )
            })
            .collect()
    }

    fn entry(name: &str, code: &str, lines: &[&str]) -> StopEntry {
        StopEntry {
            name: name.into(),
            code: code.into(),
            lines: lines.iter().map(|l| l.to_string()).collect(),
        }
    }

    #[test]
    fn known_stop_gains_line() {
        let mut catalog = vec![entry("Garibaldi", "S1", &["1", "9"])];

        let changed = merge_stops(
            &mut catalog,
            &observed(&[("S1", "GARIBALDI", &["7A"])]),
            &StopAliases::empty(),
        );

        assert!(changed);
        assert_eq!(catalog, vec![entry("Garibaldi", "S1", &["1", "7A", "9"])]);
    }

    #[test]
    fn known_lines_are_not_a_change() {
        let mut catalog = vec![entry("Garibaldi", "S1", &["1", "9"])];

        let changed = merge_stops(
            &mut catalog,
            &observed(&[("S1", "Other name", &["9"])]),
            &StopAliases::empty(),
        );

        assert!(!changed);
        assert_eq!(catalog, vec![entry("Garibaldi", "S1", &["1", "9"])]);
    }

    #[test]
    fn new_stop_prefers_alias() {
        let aliases: StopAliases = [("S2", "Stazione FS")].into_iter().collect();
        let mut catalog = Vec::new();

        let changed = merge_stops(
            &mut catalog,
            &observed(&[("S2", "STAZ. FS", &["11", "2"]), ("S3", "POLICLINICO", &[])]),
            &aliases,
        );

        assert!(changed);
        assert_eq!(
            catalog,
            vec![
                entry("POLICLINICO", "S3", &[]),
                entry("Stazione FS", "S2", &["2", "11"]),
            ]
        );
    }

    #[test]
    fn alias_ignored_for_known_stop() {
        let aliases: StopAliases = [("S1", "New name")].into_iter().collect();
        let mut catalog = vec![entry("Old name", "S1", &["1"])];

        merge_stops(&mut catalog, &observed(&[("S1", "X", &["2"])]), &aliases);

        assert_eq!(catalog[0].name, "Old name");
    }

    #[test]
    fn sorted_by_name_then_code() {
        let mut catalog = vec![entry("b", "S9", &[])];

        merge_stops(
            &mut catalog,
            &observed(&[("S2", "a", &[]), ("S1", "B", &[])]),
            &StopAliases::empty(),
        );

        let codes: Vec<_> = catalog.iter().map(|e| e.code.as_str()).collect();
        assert_eq!(codes, vec!["S2", "S1", "S9"]);
    }

    #[test]
    fn published_field_names() {
        let value = serde_json::to_value(entry("Garibaldi", "MO2076", &["7A"])).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "stopId": "Garibaldi", "stopName": "MO2076", "lines": ["7A"] })
        );
    }
}
