//! Facts derived from one snapshot of vehicles.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::VehicleRecord;

/// A stop as seen by the vehicles currently at or past it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedStop {
    /// Waypoint name from the first vehicle that reported this stop.
    pub name: String,
    pub lines: BTreeSet<String>,
}

/// What one polling tick learned about stops and routes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservedFacts {
    /// Keyed by stop code.
    pub stops: BTreeMap<String, ObservedStop>,
    /// Route codes keyed by line label.
    pub route_codes: BTreeMap<String, BTreeSet<String>>,
}

impl ObservedFacts {
    /// Derive facts from already-normalized vehicles.
    ///
    /// Vehicles missing a stop code or name contribute no stop; vehicles
    /// missing a line or route code contribute no route code. Empty strings
    /// count as missing.
    pub fn from_vehicles<'a>(vehicles: impl IntoIterator<Item = &'a VehicleRecord>) -> Self {
        let mut facts = Self::default();

        for vehicle in vehicles {
            let line = non_empty(Some(&vehicle.line));

            if let Some(code) = non_empty(vehicle.waypoint_code.as_ref())
                && let Some(name) = non_empty(vehicle.waypoint_name.as_ref())
            {
                let stop = facts
                    .stops
                    .entry(code.to_string())
                    .or_insert_with(|| ObservedStop {
                        name: name.to_string(),
                        lines: BTreeSet::new(),
                    });
                if let Some(line) = line {
                    stop.lines.insert(line.to_string());
                }
            }

            if let Some(line) = line
                && let Some(route_code) = non_empty(vehicle.route_code.as_ref())
            {
                facts
                    .route_codes
                    .entry(line.to_string())
                    .or_default()
                    .insert(route_code.to_string());
            }
        }

        facts
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty() && self.route_codes.is_empty()
    }
}

fn non_empty(s: Option<&String>) -> Option<&str> {
    s.map(String::as_str).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_name_wins() {
        let vehicles = [
            VehicleRecord::new(1, "7A").with_waypoint("MO1", "GARIBALDI"),
            VehicleRecord::new(2, "9").with_waypoint("MO1", "Garibaldi (centro)"),
        ];

        let facts = ObservedFacts::from_vehicles(&vehicles);

        let stop = &facts.stops["MO1"];
        assert_eq!(stop.name, "GARIBALDI");
        assert_eq!(
            stop.lines.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["7A", "9"]
        );
    }

    #[test]
    fn incomplete_observations_are_skipped() {
        let mut no_name = VehicleRecord::new(1, "7A");
        no_name.waypoint_code = Some("MO1".into());
        let empty_code = VehicleRecord::new(2, "7A").with_waypoint("", "Somewhere");
        let no_line = VehicleRecord::new(3, "")
            .with_waypoint("MO2", "Stazione")
            .with_route_code("R1");

        let facts = ObservedFacts::from_vehicles(&[no_name, empty_code, no_line]);

        assert_eq!(facts.stops.len(), 1);
        assert!(facts.stops["MO2"].lines.is_empty());
        assert!(facts.route_codes.is_empty());
    }

    #[test]
    fn route_codes_grouped_by_line() {
        let vehicles = [
            VehicleRecord::new(1, "7A").with_route_code("700"),
            VehicleRecord::new(2, "7A").with_route_code("701"),
            VehicleRecord::new(3, "7A").with_route_code("700"),
            VehicleRecord::new(4, "9"),
        ];

        let facts = ObservedFacts::from_vehicles(&vehicles);

        assert_eq!(facts.route_codes.len(), 1);
        assert_eq!(facts.route_codes["7A"].len(), 2);
        assert!(facts.stops.is_empty());
    }

    #[test]
    fn nothing_observed() {
        assert!(ObservedFacts::from_vehicles(std::iter::empty()).is_empty());
    }
}
