//! Drives catalog merges from the upstream feed.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::domain::VehicleRecord;
use crate::rules::RuleStore;
use crate::scheduler::SingleFlight;
use crate::seta::TransitFeed;

use super::aliases::StopAliases;
use super::observed::ObservedFacts;
use super::route_codes::{RouteCodes, merge_route_codes};
use super::route_numbers::merge_route_numbers;
use super::stops::{StopEntry, merge_stops};
use super::store::{ROUTE_CODES, ROUTE_NUMBERS, STOP_LIST, SnapshotStore};

/// Which catalogs a vehicle pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogChanges {
    pub stops: bool,
    pub route_codes: bool,
}

impl CatalogChanges {
    pub fn any(&self) -> bool {
        self.stops || self.route_codes
    }
}

/// Result of one scheduled refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome<T> {
    Completed(T),
    /// The previous run of the same refresh hadn't finished.
    AlreadyRunning,
    /// The feed couldn't be fetched; nothing was touched.
    FetchFailed,
}

/// Keeps the stop, route code and route number catalogs up to date.
pub struct CatalogReconciler<S, F> {
    rules: Arc<RuleStore>,
    aliases: Arc<StopAliases>,
    store: Arc<S>,
    feed: Arc<F>,
    vehicles_flight: SingleFlight,
    routes_flight: SingleFlight,
}

impl<S: SnapshotStore, F: TransitFeed> CatalogReconciler<S, F> {
    pub fn new(
        rules: Arc<RuleStore>,
        aliases: Arc<StopAliases>,
        store: Arc<S>,
        feed: Arc<F>,
    ) -> Self {
        Self {
            rules,
            aliases,
            store,
            feed,
            vehicles_flight: SingleFlight::new(),
            routes_flight: SingleFlight::new(),
        }
    }

    /// Merge one snapshot of vehicles into the stop and route code catalogs.
    pub fn reconcile_vehicles(&self, mut vehicles: Vec<VehicleRecord>) -> CatalogChanges {
        for vehicle in &mut vehicles {
            self.rules.normalize_vehicle(vehicle);
        }
        let facts = ObservedFacts::from_vehicles(&vehicles);
        debug!(
            vehicles = vehicles.len(),
            stops = facts.stops.len(),
            lines = facts.route_codes.len(),
            "derived catalog facts"
        );

        let mut stops: Vec<StopEntry> = self.store.load(STOP_LIST);
        let stops_changed = merge_stops(&mut stops, &facts.stops, &self.aliases);
        if stops_changed {
            self.persist(STOP_LIST, &stops);
        }

        let mut route_codes: Vec<RouteCodes> = self.store.load(ROUTE_CODES);
        let codes_changed = merge_route_codes(&mut route_codes, &facts.route_codes);
        if codes_changed {
            self.persist(ROUTE_CODES, &route_codes);
        }

        CatalogChanges {
            stops: stops_changed,
            route_codes: codes_changed,
        }
    }

    /// Merge raw line labels into the route number list.
    pub fn reconcile_route_numbers<L: AsRef<str>>(
        &self,
        raw_labels: impl IntoIterator<Item = L>,
    ) -> bool {
        let mut numbers: Vec<String> = self.store.load(ROUTE_NUMBERS);
        let changed = merge_route_numbers(&mut numbers, raw_labels, &self.rules);
        if changed {
            self.persist(ROUTE_NUMBERS, &numbers);
        }
        changed
    }

    /// Fetch the vehicle map and update stops and route codes.
    pub async fn refresh_stops_and_routes(&self) -> TickOutcome<CatalogChanges> {
        let Some(_flight) = self.vehicles_flight.try_acquire() else {
            warn!("stop refresh still running, skipping tick");
            return TickOutcome::AlreadyRunning;
        };

        let vehicles = match self.feed.fetch_vehicles().await {
            Ok(collection) => collection.into_vehicles(),
            Err(e) => {
                warn!(error = %e, "vehicle fetch failed, skipping tick");
                return TickOutcome::FetchFailed;
            }
        };

        let changes = self.reconcile_vehicles(vehicles);
        if changes.any() {
            info!(
                stops = changes.stops,
                route_codes = changes.route_codes,
                "catalogs updated"
            );
        } else {
            debug!("catalogs unchanged");
        }
        TickOutcome::Completed(changes)
    }

    /// Fetch the route list and update route numbers.
    pub async fn refresh_route_numbers(&self) -> TickOutcome<bool> {
        let Some(_flight) = self.routes_flight.try_acquire() else {
            warn!("route number refresh still running, skipping tick");
            return TickOutcome::AlreadyRunning;
        };

        let lines = match self.feed.fetch_routes().await {
            Ok(routes) => routes.into_lines(),
            Err(e) => {
                warn!(error = %e, "route list fetch failed, skipping tick");
                return TickOutcome::FetchFailed;
            }
        };

        let changed = self.reconcile_route_numbers(&lines);
        if changed {
            info!(routes = lines.len(), "route numbers updated");
        }
        TickOutcome::Completed(changed)
    }

    fn persist<T: serde::Serialize>(&self, name: &str, value: &T) {
        if let Err(e) = self.store.write(name, value) {
            error!(snapshot = name, error = %e, "failed to write snapshot");
        }
    }
}
