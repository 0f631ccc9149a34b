//! SETA API response DTOs.
//!
//! These types map directly to the JSON the operator serves. The record
//! types themselves live in [`crate::domain`]; this module holds the
//! envelopes around them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::{ArrivalRecord, VehicleRecord};

/// Error marker returned when arrivals can't be produced.
pub const NO_ARRIVALS_MESSAGE: &str = "no arrivals scheduled in next 90 minutes or API error";

/// GeoJSON point geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: Vec<f64>,
}

/// One vehicle on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleFeature {
    #[serde(rename = "type", default = "feature_type")]
    pub kind: String,
    pub properties: VehicleRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Geometry>,
}

impl VehicleFeature {
    pub fn new(properties: VehicleRecord) -> Self {
        Self {
            kind: feature_type(),
            properties,
            geometry: None,
        }
    }
}

fn feature_type() -> String {
    "Feature".to_string()
}

fn collection_type() -> String {
    "FeatureCollection".to_string()
}

/// Response from the vehicle map endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleCollection {
    #[serde(rename = "type", default = "collection_type")]
    pub kind: String,
    pub features: Vec<VehicleFeature>,
}

impl VehicleCollection {
    pub fn new(vehicles: impl IntoIterator<Item = VehicleRecord>) -> Self {
        Self {
            kind: collection_type(),
            features: vehicles.into_iter().map(VehicleFeature::new).collect(),
        }
    }

    /// Take the vehicle properties out of the collection.
    pub fn into_vehicles(self) -> Vec<VehicleRecord> {
        self.features.into_iter().map(|f| f.properties).collect()
    }
}

/// Arrivals at one stop, as sent by the arrival endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrivalBoard {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub services: Option<Vec<ArrivalRecord>>,

    /// Set by the operator when there is nothing to show.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response from the arrival endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrivalResponse {
    pub arrival: ArrivalBoard,
}

impl ArrivalResponse {
    pub fn new(services: Vec<ArrivalRecord>) -> Self {
        Self {
            arrival: ArrivalBoard {
                services: Some(services),
                error: None,
                extra: Map::new(),
            },
        }
    }

    /// The response served when the upstream call fails.
    pub fn degraded() -> Self {
        Self {
            arrival: ArrivalBoard {
                services: Some(Vec::new()),
                error: Some(NO_ARRIVALS_MESSAGE.to_string()),
                extra: Map::new(),
            },
        }
    }

    /// Whether the board carries an error marker.
    pub fn is_error(&self) -> bool {
        self.arrival.error.is_some()
    }
}

/// One entry of the route list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteEntry {
    #[serde(rename = "linea")]
    pub line: String,
}

/// Response from the route list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteList {
    #[serde(rename = "routesdata")]
    pub routes: Vec<RouteEntry>,
}

impl RouteList {
    pub fn new<S: Into<String>>(lines: impl IntoIterator<Item = S>) -> Self {
        Self {
            routes: lines
                .into_iter()
                .map(|line| RouteEntry { line: line.into() })
                .collect(),
        }
    }

    pub fn into_lines(self) -> Vec<String> {
        self.routes.into_iter().map(|r| r.line).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ArrivalKind;

    #[test]
    fn parse_vehicle_collection() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": {
                        "vehicle_code": 312,
                        "linea": "7A",
                        "route_desc": "Policlinico - Stazione FS",
                        "plate_num": "FG123AB"
                    },
                    "geometry": { "type": "Point", "coordinates": [10.92, 44.64] }
                }
            ]
        }"#;
        let collection: VehicleCollection = serde_json::from_str(json).unwrap();
        assert_eq!(collection.features.len(), 1);
        assert_eq!(
            collection.features[0].geometry.as_ref().unwrap().coordinates,
            vec![10.92, 44.64]
        );
        let vehicles = collection.into_vehicles();
        assert_eq!(vehicles[0].vehicle_code, Some(312));
    }

    #[test]
    fn parse_arrival_response() {
        let json = r#"{
            "arrival": {
                "services": [
                    { "service": "7A", "destination": "Centro", "arrival": "10:00", "type": "planned", "codice_corsa": "X" }
                ],
                "stopname": "GARIBALDI"
            }
        }"#;
        let response: ArrivalResponse = serde_json::from_str(json).unwrap();
        let services = response.arrival.services.as_ref().unwrap();
        assert_eq!(services[0].kind, ArrivalKind::Planned);
        assert!(!response.is_error());
        assert_eq!(
            response.arrival.extra.get("stopname"),
            Some(&Value::from("GARIBALDI"))
        );
    }

    #[test]
    fn partial_feature_keeps_collection() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "properties": { "vehicle_code": 1, "linea": "7A", "route_desc": "x", "plate_num": "AB" } },
                { "type": "Feature", "properties": { "vehicle_code": 2, "linea": "9", "route_desc": "y" } },
                { "type": "Feature", "properties": { "linea": "1" } }
            ]
        }"#;
        let vehicles = serde_json::from_str::<VehicleCollection>(json)
            .unwrap()
            .into_vehicles();
        assert_eq!(vehicles.len(), 3);
        assert_eq!(vehicles[1].plate, "");
        assert_eq!(vehicles[2].vehicle_code, None);
    }

    #[test]
    fn service_without_type_keeps_board() {
        let json = r#"{
            "arrival": {
                "services": [
                    { "service": "7A", "arrival": "10:00", "type": "planned", "codice_corsa": "X" },
                    { "service": "9", "arrival": "10:10", "codice_corsa": "Y" }
                ]
            }
        }"#;
        let response: ArrivalResponse = serde_json::from_str(json).unwrap();
        let services = response.arrival.services.as_ref().unwrap();
        assert_eq!(services.len(), 2);
        assert!(services[1].kind.is_missing());
    }

    #[test]
    fn parse_arrival_error_marker() {
        let json = r#"{ "arrival": { "error": "no arrivals scheduled in next 90 minutes" } }"#;
        let response: ArrivalResponse = serde_json::from_str(json).unwrap();
        assert!(response.is_error());
        assert!(response.arrival.services.is_none());
    }

    #[test]
    fn degraded_shape() {
        let value = serde_json::to_value(ArrivalResponse::degraded()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "arrival": { "services": [], "error": NO_ARRIVALS_MESSAGE }
            })
        );
    }

    #[test]
    fn parse_route_list() {
        let json = r#"{ "routesdata": [ { "linea": "1" }, { "linea": "7A", "descr": "x" } ] }"#;
        let list: RouteList = serde_json::from_str(json).unwrap();
        assert_eq!(list.into_lines(), vec!["1", "7A"]);
    }
}
