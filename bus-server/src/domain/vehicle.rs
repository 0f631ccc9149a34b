//! Vehicle observations from the vehicle map feed.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::field::{FieldRef, FieldValue, RecordField, RuleTarget};

/// Properties of one vehicle in the vehicle map feed.
///
/// Field names follow the upstream JSON. Properties the upstream sends
/// that aren't modelled here are kept in `extra` and written back out.
/// Every field may be missing from a feature; text fields then read as empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleRecord {
    /// Fleet number of the vehicle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_code: Option<i64>,

    /// Line label, e.g. "7A".
    #[serde(rename = "linea", default)]
    pub line: String,

    /// Human-readable route description.
    #[serde(default)]
    pub route_desc: String,

    /// Licence plate.
    #[serde(rename = "plate_num", default)]
    pub plate: String,

    /// Vehicle model, filled in by the model rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Code of the last stop the vehicle reached.
    #[serde(
        rename = "reached_waypoint_code",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub waypoint_code: Option<String>,

    /// Name of the last stop the vehicle reached.
    #[serde(rename = "wp_desc", default, skip_serializing_if = "Option::is_none")]
    pub waypoint_name: Option<String>,

    /// Route variant code, e.g. "728(1)".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_code: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl VehicleRecord {
    /// A vehicle with only the required fields set.
    pub fn new(vehicle_code: i64, line: impl Into<String>) -> Self {
        Self {
            vehicle_code: Some(vehicle_code),
            line: line.into(),
            route_desc: String::new(),
            plate: String::new(),
            model: None,
            waypoint_code: None,
            waypoint_name: None,
            route_code: None,
            extra: Map::new(),
        }
    }

    /// Stand-in vehicle used to push a bare line label through the vehicle rules.
    pub fn placeholder(line: impl Into<String>) -> Self {
        Self {
            vehicle_code: None,
            ..Self::new(0, line)
        }
    }

    /// Set the reached waypoint.
    pub fn with_waypoint(mut self, code: impl Into<String>, name: impl Into<String>) -> Self {
        self.waypoint_code = Some(code.into());
        self.waypoint_name = Some(name.into());
        self
    }

    /// Set the route code.
    pub fn with_route_code(mut self, code: impl Into<String>) -> Self {
        self.route_code = Some(code.into());
        self
    }
}

/// Fields of [`VehicleRecord`] addressable by rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VehicleField {
    VehicleCode,
    Line,
    RouteDescription,
    Plate,
    Model,
    WaypointCode,
    WaypointName,
    RouteCode,
}

impl RecordField for VehicleField {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "vehicle_code" => VehicleField::VehicleCode,
            "linea" => VehicleField::Line,
            "route_desc" => VehicleField::RouteDescription,
            "plate_num" => VehicleField::Plate,
            "model" => VehicleField::Model,
            "reached_waypoint_code" => VehicleField::WaypointCode,
            "wp_desc" => VehicleField::WaypointName,
            "route_code" => VehicleField::RouteCode,
            _ => return None,
        })
    }

    fn name(self) -> &'static str {
        match self {
            VehicleField::VehicleCode => "vehicle_code",
            VehicleField::Line => "linea",
            VehicleField::RouteDescription => "route_desc",
            VehicleField::Plate => "plate_num",
            VehicleField::Model => "model",
            VehicleField::WaypointCode => "reached_waypoint_code",
            VehicleField::WaypointName => "wp_desc",
            VehicleField::RouteCode => "route_code",
        }
    }

    fn accepts(self, value: &FieldValue) -> bool {
        match self {
            VehicleField::VehicleCode => value.as_integer().is_some(),
            _ => value.as_text().is_some(),
        }
    }
}

impl RuleTarget for VehicleRecord {
    type Field = VehicleField;

    fn get(&self, field: VehicleField) -> Option<FieldRef<'_>> {
        match field {
            VehicleField::VehicleCode => self.vehicle_code.map(FieldRef::Integer),
            VehicleField::Line => Some(FieldRef::Text(&self.line)),
            VehicleField::RouteDescription => Some(FieldRef::Text(&self.route_desc)),
            VehicleField::Plate => Some(FieldRef::Text(&self.plate)),
            VehicleField::Model => self.model.as_deref().map(FieldRef::Text),
            VehicleField::WaypointCode => self.waypoint_code.as_deref().map(FieldRef::Text),
            VehicleField::WaypointName => self.waypoint_name.as_deref().map(FieldRef::Text),
            VehicleField::RouteCode => self.route_code.as_deref().map(FieldRef::Text),
        }
    }

    fn set(&mut self, field: VehicleField, value: &FieldValue) {
        if let VehicleField::VehicleCode = field {
            if let Some(n) = value.as_integer() {
                self.vehicle_code = Some(n);
            }
            return;
        }

        let Some(text) = value.as_text() else {
            return;
        };
        let text = text.to_string();
        match field {
            VehicleField::VehicleCode => {}
            VehicleField::Line => self.line = text,
            VehicleField::RouteDescription => self.route_desc = text,
            VehicleField::Plate => self.plate = text,
            VehicleField::Model => self.model = Some(text),
            VehicleField::WaypointCode => self.waypoint_code = Some(text),
            VehicleField::WaypointName => self.waypoint_name = Some(text),
            VehicleField::RouteCode => self.route_code = Some(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "vehicle_code": 312,
        "linea": "7A",
        "route_desc": "Policlinico - Stazione FS",
        "plate_num": "FG123AB",
        "reached_waypoint_code": "MO2076",
        "wp_desc": "GARIBALDI",
        "route_code": "728(1)",
        "delay_sec": 40
    }"#;

    #[test]
    fn deserialize_wire_names() {
        let v: VehicleRecord = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(v.vehicle_code, Some(312));
        assert_eq!(v.line, "7A");
        assert_eq!(v.plate, "FG123AB");
        assert_eq!(v.waypoint_code.as_deref(), Some("MO2076"));
        assert_eq!(v.waypoint_name.as_deref(), Some("GARIBALDI"));
        assert_eq!(v.route_code.as_deref(), Some("728(1)"));
        assert!(v.model.is_none());
        assert_eq!(v.extra.get("delay_sec"), Some(&Value::from(40)));
    }

    #[test]
    fn serialize_keeps_unmodelled_fields_and_omits_missing() {
        let v: VehicleRecord = serde_json::from_str(SAMPLE).unwrap();
        let out = serde_json::to_value(&v).unwrap();
        assert_eq!(out["linea"], "7A");
        assert_eq!(out["delay_sec"], 40);
        assert!(out.get("model").is_none());
    }

    #[test]
    fn optional_fields_read_as_absent() {
        let v = VehicleRecord::new(1, "1");
        assert_eq!(v.get(VehicleField::Model), None);
        assert_eq!(v.get(VehicleField::WaypointCode), None);
        assert_eq!(v.get(VehicleField::VehicleCode), Some(FieldRef::Integer(1)));
    }

    #[test]
    fn missing_fields_are_tolerated() {
        let v: VehicleRecord = serde_json::from_str(r#"{ "linea": "9" }"#).unwrap();
        assert_eq!(v.line, "9");
        assert_eq!(v.plate, "");
        assert_eq!(v.route_desc, "");
        assert_eq!(v.vehicle_code, None);
        assert_eq!(v.get(VehicleField::VehicleCode), None);

        let out = serde_json::to_value(&v).unwrap();
        assert!(out.get("vehicle_code").is_none());
    }

    #[test]
    fn set_ignores_wrong_type() {
        let mut v = VehicleRecord::new(1, "1");
        v.set(VehicleField::VehicleCode, &FieldValue::Text("9".into()));
        assert_eq!(v.vehicle_code, Some(1));
        v.set(VehicleField::Line, &FieldValue::Integer(9));
        assert_eq!(v.line, "1");
        v.set(VehicleField::Model, &FieldValue::Text("Citaro".into()));
        assert_eq!(v.model.as_deref(), Some("Citaro"));
    }

    #[test]
    fn field_names_round_trip() {
        let all = [
            VehicleField::VehicleCode,
            VehicleField::Line,
            VehicleField::RouteDescription,
            VehicleField::Plate,
            VehicleField::Model,
            VehicleField::WaypointCode,
            VehicleField::WaypointName,
            VehicleField::RouteCode,
        ];
        for field in all {
            assert_eq!(VehicleField::from_name(field.name()), Some(field));
        }
        assert_eq!(VehicleField::from_name("colour"), None);
    }
}
