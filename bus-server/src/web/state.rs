//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::ArrivalCache;
use crate::catalog::JsonFileStore;
use crate::config::RouteToggles;
use crate::rules::RuleStore;
use crate::seta::FeedSource;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Upstream feed
    pub feed: Arc<FeedSource>,

    /// Normalization rules
    pub rules: Arc<RuleStore>,

    /// Catalog snapshots served under `/static`
    pub snapshots: Arc<JsonFileStore>,

    /// Recently reconciled arrival boards
    pub arrivals: Arc<ArrivalCache>,

    pub routes: RouteToggles,
}

impl AppState {
    pub fn new(
        feed: Arc<FeedSource>,
        rules: Arc<RuleStore>,
        snapshots: Arc<JsonFileStore>,
        arrivals: ArrivalCache,
        routes: RouteToggles,
    ) -> Self {
        Self {
            feed,
            rules,
            snapshots,
            arrivals: Arc::new(arrivals),
            routes,
        }
    }
}
