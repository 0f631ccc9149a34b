//! SETA (Modena bus operator) upstream feed.
//!
//! Three endpoints are consumed:
//! - the vehicle map, a GeoJSON feature collection of buses in service
//! - the arrival board of one stop, keyed by stop id
//! - the route list, used to learn every line the operator publishes
//!
//! Payloads are forwarded mostly as served, so the types keep any field
//! they don't model and write it back out unchanged.

mod client;
mod error;
mod mock;
mod types;

use std::future::Future;

pub use client::{SetaClient, SetaConfig};
pub use error::SetaError;
pub use mock::MockSetaFeed;
pub use types::{
    ArrivalBoard, ArrivalResponse, Geometry, NO_ARRIVALS_MESSAGE, RouteEntry, RouteList,
    VehicleCollection, VehicleFeature,
};

/// Source of upstream payloads.
pub trait TransitFeed: Send + Sync {
    fn fetch_vehicles(&self) -> impl Future<Output = Result<VehicleCollection, SetaError>> + Send;

    fn fetch_arrivals(
        &self,
        stop_id: &str,
    ) -> impl Future<Output = Result<ArrivalResponse, SetaError>> + Send;

    fn fetch_routes(&self) -> impl Future<Output = Result<RouteList, SetaError>> + Send;
}

impl TransitFeed for SetaClient {
    fn fetch_vehicles(&self) -> impl Future<Output = Result<VehicleCollection, SetaError>> + Send {
        self.get_vehicles()
    }

    fn fetch_arrivals(
        &self,
        stop_id: &str,
    ) -> impl Future<Output = Result<ArrivalResponse, SetaError>> + Send {
        self.get_arrivals(stop_id)
    }

    fn fetch_routes(&self) -> impl Future<Output = Result<RouteList, SetaError>> + Send {
        self.get_routes()
    }
}

impl TransitFeed for MockSetaFeed {
    fn fetch_vehicles(&self) -> impl Future<Output = Result<VehicleCollection, SetaError>> + Send {
        self.get_vehicles()
    }

    fn fetch_arrivals(
        &self,
        stop_id: &str,
    ) -> impl Future<Output = Result<ArrivalResponse, SetaError>> + Send {
        self.get_arrivals(stop_id)
    }

    fn fetch_routes(&self) -> impl Future<Output = Result<RouteList, SetaError>> + Send {
        self.get_routes()
    }
}

/// The feed the server runs against: live API or canned payloads.
#[derive(Debug, Clone)]
pub enum FeedSource {
    Live(SetaClient),
    Mock(MockSetaFeed),
}

impl TransitFeed for FeedSource {
    async fn fetch_vehicles(&self) -> Result<VehicleCollection, SetaError> {
        match self {
            FeedSource::Live(client) => client.get_vehicles().await,
            FeedSource::Mock(mock) => mock.get_vehicles().await,
        }
    }

    async fn fetch_arrivals(&self, stop_id: &str) -> Result<ArrivalResponse, SetaError> {
        match self {
            FeedSource::Live(client) => client.get_arrivals(stop_id).await,
            FeedSource::Mock(mock) => mock.get_arrivals(stop_id).await,
        }
    }

    async fn fetch_routes(&self) -> Result<RouteList, SetaError> {
        match self {
            FeedSource::Live(client) => client.get_routes().await,
            FeedSource::Mock(mock) => mock.get_routes().await,
        }
    }
}
