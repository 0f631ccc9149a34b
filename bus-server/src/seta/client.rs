//! SETA HTTP client.
//!
//! Thin async wrapper over the operator's three JSON endpoints. No
//! normalization happens here; callers get the payloads as served.

use std::time::Duration;

use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::error::SetaError;
use super::types::{ArrivalResponse, RouteList, VehicleCollection};

/// Default request timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// How much of an unparseable body to keep for the error message.
const BODY_SNIPPET_CHARS: usize = 500;

/// Configuration for the SETA client.
#[derive(Debug, Clone)]
pub struct SetaConfig {
    /// Vehicle map endpoint (GeoJSON feature collection)
    pub vehicles_url: String,
    /// Arrival endpoint; the stop id is appended as a path segment
    pub arrival_url: String,
    /// Route list endpoint
    pub routes_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl SetaConfig {
    /// Create a new config with the given endpoints.
    pub fn new(
        vehicles_url: impl Into<String>,
        arrival_url: impl Into<String>,
        routes_url: impl Into<String>,
    ) -> Self {
        Self {
            vehicles_url: vehicles_url.into(),
            arrival_url: arrival_url.into(),
            routes_url: routes_url.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// SETA API client.
#[derive(Debug, Clone)]
pub struct SetaClient {
    http: reqwest::Client,
    config: SetaConfig,
}

impl SetaClient {
    /// Create a new client with the given configuration.
    pub fn new(config: SetaConfig) -> Result<Self, SetaError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { http, config })
    }

    /// Fetch every vehicle currently on the map.
    pub async fn get_vehicles(&self) -> Result<VehicleCollection, SetaError> {
        self.get_json(&self.config.vehicles_url).await
    }

    /// Fetch the arrival board for one stop.
    pub async fn get_arrivals(&self, stop_id: &str) -> Result<ArrivalResponse, SetaError> {
        let url = arrival_url(&self.config.arrival_url, stop_id)?;
        self.get_json(url.as_str()).await
    }

    /// Fetch the list of all routes.
    pub async fn get_routes(&self) -> Result<RouteList, SetaError> {
        self.get_json(&self.config.routes_url).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, SetaError> {
        debug!(url, "fetching upstream feed");
        let response = self.http.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SetaError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| SetaError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(BODY_SNIPPET_CHARS).collect()),
        })
    }
}

/// Append `stop_id` to `base` as one escaped path segment.
fn arrival_url(base: &str, stop_id: &str) -> Result<Url, SetaError> {
    let mut url = Url::parse(base)
        .map_err(|e| SetaError::NotConfigured(format!("arrival URL {base}: {e}")))?;
    url.path_segments_mut()
        .map_err(|()| SetaError::NotConfigured(format!("arrival URL {base} has no path")))?
        .pop_if_empty()
        .push(stop_id);
    Ok(url)
}
