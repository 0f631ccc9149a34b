//! Mock feed for running without the live API.
//!
//! Loads sample payloads from JSON files and serves them as if they were
//! live responses. Payloads can be swapped at runtime, which tests use to
//! simulate successive polling ticks.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::sync::RwLock;

use super::error::SetaError;
use super::types::{ArrivalResponse, RouteList, VehicleCollection};

#[derive(Debug, Default)]
struct MockData {
    vehicles: Option<VehicleCollection>,
    routes: Option<RouteList>,
    arrivals: HashMap<String, ArrivalResponse>,
}

/// Feed that serves canned payloads.
#[derive(Debug, Clone, Default)]
pub struct MockSetaFeed {
    data: Arc<RwLock<MockData>>,
}

impl MockSetaFeed {
    /// An empty mock; every fetch fails until payloads are set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load payloads from a directory.
    ///
    /// Expects `vehicles.json`, `routes.json` and `arrivals/{STOP}.json`;
    /// any of them may be missing.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, SetaError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(SetaError::NotConfigured(format!(
                "mock data directory {} not found",
                dir.display()
            )));
        }

        let mut data = MockData {
            vehicles: read_optional(&dir.join("vehicles.json"))?,
            routes: read_optional(&dir.join("routes.json"))?,
            arrivals: HashMap::new(),
        };

        let arrivals_dir = dir.join("arrivals");
        if arrivals_dir.is_dir() {
            let entries = std::fs::read_dir(&arrivals_dir).map_err(|e| {
                SetaError::NotConfigured(format!("failed to read {}: {e}", arrivals_dir.display()))
            })?;
            for entry in entries {
                let path = entry
                    .map_err(|e| SetaError::NotConfigured(format!("bad directory entry: {e}")))?
                    .path();
                if path.extension().and_then(|s| s.to_str()) != Some("json") {
                    continue;
                }
                let Some(stop_id) = path.file_stem().and_then(|s| s.to_str()) else {
                    continue;
                };
                if let Some(board) = read_optional(&path)? {
                    data.arrivals.insert(stop_id.to_string(), board);
                }
            }
        }

        Ok(Self {
            data: Arc::new(RwLock::new(data)),
        })
    }

    pub async fn set_vehicles(&self, vehicles: VehicleCollection) {
        self.data.write().await.vehicles = Some(vehicles);
    }

    pub async fn set_routes(&self, routes: RouteList) {
        self.data.write().await.routes = Some(routes);
    }

    pub async fn set_arrivals(&self, stop_id: impl Into<String>, board: ArrivalResponse) {
        self.data.write().await.arrivals.insert(stop_id.into(), board);
    }

    /// Forget the vehicle payload so the next fetch fails.
    pub async fn clear_vehicles(&self) {
        self.data.write().await.vehicles = None;
    }

    pub async fn get_vehicles(&self) -> Result<VehicleCollection, SetaError> {
        self.data
            .read()
            .await
            .vehicles
            .clone()
            .ok_or_else(|| not_found("vehicles"))
    }

    pub async fn get_arrivals(&self, stop_id: &str) -> Result<ArrivalResponse, SetaError> {
        self.data
            .read()
            .await
            .arrivals
            .get(stop_id)
            .cloned()
            .ok_or_else(|| not_found(&format!("arrivals for stop {stop_id}")))
    }

    pub async fn get_routes(&self) -> Result<RouteList, SetaError> {
        self.data
            .read()
            .await
            .routes
            .clone()
            .ok_or_else(|| not_found("routes"))
    }
}

fn not_found(what: &str) -> SetaError {
    SetaError::Api {
        status: 404,
        message: format!("no mock data for {what}"),
    }
}

fn read_optional<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, SetaError> {
    if !path.exists() {
        return Ok(None);
    }
    let json = std::fs::read_to_string(path).map_err(|e| {
        SetaError::NotConfigured(format!("failed to read {}: {e}", path.display()))
    })?;
    serde_json::from_str(&json)
        .map(Some)
        .map_err(|e| SetaError::Json {
            message: format!("{}: {e}", path.display()),
            body: None,
        })
}
