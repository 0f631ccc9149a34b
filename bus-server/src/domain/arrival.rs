//! Arrival predictions at a stop.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::field::{FieldRef, FieldValue, RecordField, RuleTarget};

/// Whether an arrival comes from the timetable or from live tracking.
///
/// Unknown tags are preserved verbatim so they survive a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ArrivalKind {
    Planned,
    Realtime,
    Other(String),
}

impl ArrivalKind {
    /// The upstream didn't send a kind.
    pub fn is_missing(&self) -> bool {
        matches!(self, ArrivalKind::Other(s) if s.is_empty())
    }

    pub fn as_str(&self) -> &str {
        match self {
            ArrivalKind::Planned => "planned",
            ArrivalKind::Realtime => "realtime",
            ArrivalKind::Other(s) => s,
        }
    }
}

impl Default for ArrivalKind {
    fn default() -> Self {
        ArrivalKind::Other(String::new())
    }
}

impl From<String> for ArrivalKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "planned" => ArrivalKind::Planned,
            "realtime" => ArrivalKind::Realtime,
            _ => ArrivalKind::Other(s),
        }
    }
}

impl From<ArrivalKind> for String {
    fn from(kind: ArrivalKind) -> Self {
        match kind {
            ArrivalKind::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ArrivalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One service arriving at a stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrivalRecord {
    /// Line label shown to passengers.
    #[serde(rename = "service", default, skip_serializing_if = "Option::is_none")]
    pub line: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,

    /// Clock time, "HH:MM".
    #[serde(rename = "arrival", default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "ArrivalKind::is_missing")]
    pub kind: ArrivalKind,

    /// Identifies the physical run; shared by its planned and realtime entries.
    #[serde(rename = "codice_corsa", default, skip_serializing_if = "Option::is_none")]
    pub trip_id: Option<String>,

    /// Realtime minus planned arrival, in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<i32>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ArrivalRecord {
    pub fn new(trip_id: impl Into<String>, kind: ArrivalKind, time: impl Into<String>) -> Self {
        Self {
            line: None,
            destination: None,
            time: Some(time.into()),
            kind,
            trip_id: Some(trip_id.into()),
            delay: None,
            extra: Map::new(),
        }
    }

    pub fn planned(trip_id: impl Into<String>, time: impl Into<String>) -> Self {
        Self::new(trip_id, ArrivalKind::Planned, time)
    }

    pub fn realtime(trip_id: impl Into<String>, time: impl Into<String>) -> Self {
        Self::new(trip_id, ArrivalKind::Realtime, time)
    }

    pub fn with_line(mut self, line: impl Into<String>) -> Self {
        self.line = Some(line.into());
        self
    }

    pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = Some(destination.into());
        self
    }
}

/// Fields of [`ArrivalRecord`] addressable by rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrivalField {
    Line,
    Destination,
    Time,
    Kind,
    TripId,
    Delay,
}

impl RecordField for ArrivalField {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "service" => ArrivalField::Line,
            "destination" => ArrivalField::Destination,
            "arrival" => ArrivalField::Time,
            "type" => ArrivalField::Kind,
            "codice_corsa" => ArrivalField::TripId,
            "delay" => ArrivalField::Delay,
            _ => return None,
        })
    }

    fn name(self) -> &'static str {
        match self {
            ArrivalField::Line => "service",
            ArrivalField::Destination => "destination",
            ArrivalField::Time => "arrival",
            ArrivalField::Kind => "type",
            ArrivalField::TripId => "codice_corsa",
            ArrivalField::Delay => "delay",
        }
    }

    fn accepts(self, value: &FieldValue) -> bool {
        match self {
            ArrivalField::Delay => value
                .as_integer()
                .is_some_and(|n| i32::try_from(n).is_ok()),
            _ => value.as_text().is_some(),
        }
    }
}

impl RuleTarget for ArrivalRecord {
    type Field = ArrivalField;

    fn get(&self, field: ArrivalField) -> Option<FieldRef<'_>> {
        match field {
            ArrivalField::Line => self.line.as_deref().map(FieldRef::Text),
            ArrivalField::Destination => self.destination.as_deref().map(FieldRef::Text),
            ArrivalField::Time => self.time.as_deref().map(FieldRef::Text),
            ArrivalField::Kind => {
                (!self.kind.is_missing()).then(|| FieldRef::Text(self.kind.as_str()))
            }
            ArrivalField::TripId => self.trip_id.as_deref().map(FieldRef::Text),
            ArrivalField::Delay => self.delay.map(|d| FieldRef::Integer(d.into())),
        }
    }

    fn set(&mut self, field: ArrivalField, value: &FieldValue) {
        if !field.accepts(value) {
            return;
        }
        match (field, value) {
            (ArrivalField::Delay, FieldValue::Integer(n)) => self.delay = i32::try_from(*n).ok(),
            (ArrivalField::Kind, FieldValue::Text(s)) => self.kind = ArrivalKind::from(s.clone()),
            (ArrivalField::Line, FieldValue::Text(s)) => self.line = Some(s.clone()),
            (ArrivalField::Destination, FieldValue::Text(s)) => {
                self.destination = Some(s.clone())
            }
            (ArrivalField::Time, FieldValue::Text(s)) => self.time = Some(s.clone()),
            (ArrivalField::TripId, FieldValue::Text(s)) => self.trip_id = Some(s.clone()),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_wire_names() {
        let json = r#"{
            "service": "7A",
            "destination": "Stazione FS",
            "arrival": "14:30",
            "type": "realtime",
            "codice_corsa": "C-991",
            "busnum": "312"
        }"#;
        let a: ArrivalRecord = serde_json::from_str(json).unwrap();
        assert_eq!(a.line.as_deref(), Some("7A"));
        assert_eq!(a.time.as_deref(), Some("14:30"));
        assert_eq!(a.kind, ArrivalKind::Realtime);
        assert_eq!(a.trip_id.as_deref(), Some("C-991"));
        assert_eq!(a.delay, None);
        assert_eq!(a.extra.get("busnum"), Some(&Value::from("312")));
    }

    #[test]
    fn unknown_kind_round_trips() {
        let a: ArrivalRecord =
            serde_json::from_str(r#"{"type": "cancelled", "codice_corsa": "X"}"#).unwrap();
        assert_eq!(a.kind, ArrivalKind::Other("cancelled".into()));
        let out = serde_json::to_value(&a).unwrap();
        assert_eq!(out["type"], "cancelled");
    }

    #[test]
    fn missing_kind_is_tolerated() {
        let a: ArrivalRecord =
            serde_json::from_str(r#"{"service": "7A", "codice_corsa": "X"}"#).unwrap();
        assert!(a.kind.is_missing());
        assert_eq!(a.get(ArrivalField::Kind), None);

        let out = serde_json::to_value(&a).unwrap();
        assert!(out.get("type").is_none());
    }

    #[test]
    fn delay_omitted_until_set() {
        let mut a = ArrivalRecord::realtime("X", "10:05");
        assert!(serde_json::to_value(&a).unwrap().get("delay").is_none());
        a.delay = Some(5);
        assert_eq!(serde_json::to_value(&a).unwrap()["delay"], 5);
    }

    #[test]
    fn kind_is_readable_as_text() {
        let a = ArrivalRecord::planned("X", "10:00");
        assert_eq!(a.get(ArrivalField::Kind), Some(FieldRef::Text("planned")));
    }

    #[test]
    fn set_kind_parses_tag() {
        let mut a = ArrivalRecord::planned("X", "10:00");
        a.set(ArrivalField::Kind, &FieldValue::from("realtime"));
        assert_eq!(a.kind, ArrivalKind::Realtime);
    }

    #[test]
    fn delay_must_fit_i32() {
        assert!(ArrivalField::Delay.accepts(&FieldValue::Integer(-12)));
        assert!(!ArrivalField::Delay.accepts(&FieldValue::Integer(i64::MAX)));
        assert!(!ArrivalField::Delay.accepts(&FieldValue::from("5")));
    }
}
