//! Arrival reconciliation.
//!
//! The arrival feed lists a trip twice once it is being tracked: the
//! timetable entry and the live prediction. We keep the live one, drop the
//! timetable duplicate, and annotate the live entry with how late it is.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::domain::{ArrivalKind, ArrivalRecord, ClockTime};
use crate::rules::RuleStore;
use crate::seta::{ArrivalResponse, TransitFeed};

/// Normalize, deduplicate and annotate one stop's arrivals.
///
/// A planned entry is dropped when a realtime entry with the same trip id
/// exists. Realtime entries with a planned counterpart get a `delay`.
/// Order of the surviving entries is the input order.
pub fn reconcile(mut services: Vec<ArrivalRecord>, rules: &RuleStore) -> Vec<ArrivalRecord> {
    for service in &mut services {
        rules.normalize_arrival(service);
    }

    // Later entries overwrite earlier ones for the same trip.
    let mut planned: HashMap<Option<&str>, Option<&str>> = HashMap::new();
    let mut tracked: HashSet<Option<&str>> = HashSet::new();
    for service in &services {
        let trip = service.trip_id.as_deref();
        match service.kind {
            ArrivalKind::Planned => {
                planned.insert(trip, service.time.as_deref());
            }
            ArrivalKind::Realtime => {
                tracked.insert(trip);
            }
            ArrivalKind::Other(_) => {}
        }
    }

    let mut delays = Vec::with_capacity(services.len());
    let mut keep = Vec::with_capacity(services.len());
    for service in &services {
        let trip = service.trip_id.as_deref();
        let kept = match service.kind {
            ArrivalKind::Planned | ArrivalKind::Other(_) => !tracked.contains(&trip),
            ArrivalKind::Realtime => true,
        };
        keep.push(kept);

        let delay = match (&service.kind, planned.get(&trip)) {
            (ArrivalKind::Realtime, Some(&planned_time)) => planned_time
                .zip(service.time.as_deref())
                .and_then(|(p, r)| compute_delay(p, r)),
            _ => None,
        };
        delays.push(delay);
    }

    services
        .into_iter()
        .zip(keep)
        .zip(delays)
        .filter_map(|((mut service, kept), delay)| {
            if !kept {
                return None;
            }
            if delay.is_some() {
                service.delay = delay;
            }
            Some(service)
        })
        .collect()
}

/// Minutes between two "HH:MM" clock times.
///
/// No day rollover correction: 23:58 planned and 00:03 realtime gives
/// -1435, not 5. `None` when either side doesn't parse.
pub fn compute_delay(planned: &str, realtime: &str) -> Option<i32> {
    let planned = ClockTime::parse(planned).ok()?;
    let realtime = ClockTime::parse(realtime).ok()?;
    Some(realtime.minutes_of_day() - planned.minutes_of_day())
}

/// Fetch a stop's arrivals and reconcile them.
///
/// Boards the operator marks as errors, or that carry no service list, are
/// passed through untouched. Any fetch failure yields the degraded board.
pub async fn fetch_arrivals<F: TransitFeed>(
    feed: &F,
    rules: &RuleStore,
    stop_id: &str,
) -> ArrivalResponse {
    let mut response = match feed.fetch_arrivals(stop_id).await {
        Ok(response) => response,
        Err(e) => {
            warn!(stop_id, error = %e, "arrival fetch failed");
            return ArrivalResponse::degraded();
        }
    };

    if response.is_error() {
        debug!(stop_id, "upstream reported no arrivals");
        return response;
    }

    if let Some(services) = response.arrival.services.take() {
        let raw = services.len();
        let services = reconcile(services, rules);
        debug!(stop_id, raw, kept = services.len(), "reconciled arrivals");
        response.arrival.services = Some(services);
    }

    response
}
