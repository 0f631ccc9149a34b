//! Rule types and the rule file loader.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::domain::{
    ArrivalField, ArrivalRecord, FieldValue, RecordField, VehicleField, VehicleRecord,
};

use super::engine::{apply, apply_model};
use super::error::RuleError;

/// Suffix that turns a condition key into a substring test.
const CONTAINS_MARKER: &str = "_includes";

/// The field a condition reads.
///
/// Conditions may name fields the record type doesn't have; such a
/// condition never matches. Keeping the name lets us report it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector<F> {
    Known(F),
    Unknown(String),
}

impl<F: RecordField> Selector<F> {
    fn parse(name: &str) -> Self {
        match F::from_name(name) {
            Some(field) => Selector::Known(field),
            None => Selector::Unknown(name.to_string()),
        }
    }
}

/// One test against a record field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition<F> {
    /// Field exists and equals the value, with the same type.
    Equals { field: Selector<F>, value: FieldValue },
    /// Field exists, is non-empty text, and contains the needle.
    Contains { field: Selector<F>, needle: String },
}

/// Overwrite one field with a fixed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mutation<F> {
    pub field: F,
    pub value: FieldValue,
}

/// Conditions that must all hold, and the mutations applied when they do.
///
/// An empty condition list matches every record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizationRule<F> {
    pub conditions: Vec<Condition<F>>,
    pub mutations: Vec<Mutation<F>>,
}

impl<F> NormalizationRule<F> {
    pub fn new(conditions: Vec<Condition<F>>, mutations: Vec<Mutation<F>>) -> Self {
        Self {
            conditions,
            mutations,
        }
    }
}

/// What a matching model rule assigns to a vehicle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelTarget {
    pub model: String,
    /// When set, the plate becomes `prefix` followed by the fleet number.
    pub plate_prefix: Option<String>,
}

/// Maps fleet numbers to a vehicle model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelRule {
    /// Fleet numbers in `min..=max`.
    Range { min: i64, max: i64, target: ModelTarget },
    /// A single fleet number.
    Exact { code: i64, target: ModelTarget },
}

impl ModelRule {
    pub fn matches(&self, vehicle_code: i64) -> bool {
        match self {
            ModelRule::Range { min, max, .. } => (*min..=*max).contains(&vehicle_code),
            ModelRule::Exact { code, .. } => *code == vehicle_code,
        }
    }

    pub fn target(&self) -> &ModelTarget {
        match self {
            ModelRule::Range { target, .. } | ModelRule::Exact { target, .. } => target,
        }
    }
}

/// All normalization rules, loaded once and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleStore {
    pub arrival_rules: Vec<NormalizationRule<ArrivalField>>,
    pub vehicle_rules: Vec<NormalizationRule<VehicleField>>,
    pub model_rules: Vec<ModelRule>,
}

impl RuleStore {
    /// Load and validate a rule file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RuleError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| RuleError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Parse and validate rules from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, RuleError> {
        let raw: RawRuleStore = serde_json::from_str(json).map_err(|e| RuleError::Json {
            message: e.to_string(),
        })?;

        let arrival_rules = compile_rules("arrival_rules", raw.arrival_rules)?;
        let vehicle_rules = compile_rules("bus_rules", raw.bus_rules)?;
        let model_rules = raw
            .model_rules
            .into_iter()
            .enumerate()
            .map(|(index, rule)| rule.compile(index))
            .collect::<Result<_, _>>()?;

        Ok(Self {
            arrival_rules,
            vehicle_rules,
            model_rules,
        })
    }

    /// Apply the arrival rules to one arrival.
    pub fn normalize_arrival(&self, arrival: &mut ArrivalRecord) {
        apply(arrival, &self.arrival_rules);
    }

    /// Apply the vehicle rules, then the model rules, to one vehicle.
    pub fn normalize_vehicle(&self, vehicle: &mut VehicleRecord) {
        apply(vehicle, &self.vehicle_rules);
        apply_model(vehicle, &self.model_rules);
    }

    /// Normalize a bare line label the same way a vehicle's line is normalized.
    pub fn normalize_line(&self, line: &str) -> String {
        let mut placeholder = VehicleRecord::placeholder(line);
        self.normalize_vehicle(&mut placeholder);
        placeholder.line
    }
}

#[derive(Debug, Deserialize)]
struct RawRuleStore {
    #[serde(default)]
    arrival_rules: Vec<RawRule>,
    #[serde(default)]
    bus_rules: Vec<RawRule>,
    #[serde(default)]
    model_rules: Vec<RawModelRule>,
}

#[derive(Debug, Deserialize)]
struct RawRule {
    #[serde(default)]
    conditions: BTreeMap<String, FieldValue>,
    #[serde(default)]
    mutations: BTreeMap<String, FieldValue>,
}

#[derive(Debug, Deserialize)]
struct RawModelRule {
    range: Option<(i64, i64)>,
    exact: Option<i64>,
    model: String,
    plate_prefix: Option<String>,
}

impl RawModelRule {
    fn compile(self, index: usize) -> Result<ModelRule, RuleError> {
        let target = ModelTarget {
            model: self.model,
            plate_prefix: self.plate_prefix.filter(|p| !p.is_empty()),
        };

        match (self.range, self.exact) {
            (Some((min, max)), None) => {
                if min > max {
                    return Err(RuleError::InvalidModelRule {
                        index,
                        reason: "range minimum exceeds maximum",
                    });
                }
                Ok(ModelRule::Range { min, max, target })
            }
            (None, Some(code)) => Ok(ModelRule::Exact { code, target }),
            (Some(_), Some(_)) => Err(RuleError::InvalidModelRule {
                index,
                reason: "has both `range` and `exact`",
            }),
            (None, None) => Err(RuleError::InvalidModelRule {
                index,
                reason: "needs either `range` or `exact`",
            }),
        }
    }
}

fn compile_rules<F: RecordField>(
    section: &'static str,
    raw: Vec<RawRule>,
) -> Result<Vec<NormalizationRule<F>>, RuleError> {
    raw.into_iter()
        .enumerate()
        .map(|(index, rule)| {
            let conditions = rule
                .conditions
                .into_iter()
                .map(|(key, value)| compile_condition(&key, value))
                .collect();

            let mutations = rule
                .mutations
                .into_iter()
                .map(|(key, value)| {
                    let field = F::from_name(&key).ok_or_else(|| RuleError::UnknownField {
                        section,
                        index,
                        field: key.clone(),
                    })?;
                    if !field.accepts(&value) {
                        return Err(RuleError::InvalidValue {
                            section,
                            index,
                            field: field.name(),
                            value: serde_json::to_string(&value).unwrap_or_default(),
                        });
                    }
                    Ok(Mutation { field, value })
                })
                .collect::<Result<_, _>>()?;

            Ok(NormalizationRule::new(conditions, mutations))
        })
        .collect()
}

fn compile_condition<F: RecordField>(key: &str, value: FieldValue) -> Condition<F> {
    match key.strip_suffix(CONTAINS_MARKER) {
        Some(name) => Condition::Contains {
            field: Selector::parse(name),
            needle: value.to_string(),
        },
        None => Condition::Equals {
            field: Selector::parse(key),
            value,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULES: &str = r#"{
        "arrival_rules": [
            {
                "conditions": { "destination_includes": "STAZ" },
                "mutations": { "destination": "Stazione FS" }
            }
        ],
        "bus_rules": [
            {
                "conditions": { "linea": "7/" },
                "mutations": { "linea": "7A" }
            },
            {
                "conditions": { "vehicle_code": 0, "color": "red" },
                "mutations": {}
            }
        ],
        "model_rules": [
            { "range": [100, 199], "model": "Citaro", "plate_prefix": "MO" },
            { "exact": 250, "model": "Urbino", "plate_prefix": "" }
        ]
    }"#;

    #[test]
    fn parse_full_file() {
        let store = RuleStore::from_json(RULES).unwrap();

        assert_eq!(store.arrival_rules.len(), 1);
        assert_eq!(
            store.arrival_rules[0].conditions,
            vec![Condition::Contains {
                field: Selector::Known(ArrivalField::Destination),
                needle: "STAZ".into(),
            }]
        );

        assert_eq!(store.vehicle_rules.len(), 2);
        assert_eq!(
            store.vehicle_rules[0].mutations,
            vec![Mutation {
                field: VehicleField::Line,
                value: FieldValue::from("7A"),
            }]
        );

        // Unknown condition fields are kept, not rejected
        assert!(store.vehicle_rules[1]
            .conditions
            .contains(&Condition::Equals {
                field: Selector::Unknown("color".into()),
                value: FieldValue::from("red"),
            }));

        assert_eq!(
            store.model_rules,
            vec![
                ModelRule::Range {
                    min: 100,
                    max: 199,
                    target: ModelTarget {
                        model: "Citaro".into(),
                        plate_prefix: Some("MO".into()),
                    },
                },
                // Empty prefix means "don't touch the plate"
                ModelRule::Exact {
                    code: 250,
                    target: ModelTarget {
                        model: "Urbino".into(),
                        plate_prefix: None,
                    },
                },
            ]
        );
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let store = RuleStore::from_json("{}").unwrap();
        assert_eq!(store, RuleStore::default());
    }

    #[test]
    fn numeric_needle_becomes_text() {
        let store = RuleStore::from_json(
            r#"{ "bus_rules": [ { "conditions": { "plate_num_includes": 12 }, "mutations": {} } ] }"#,
        )
        .unwrap();
        assert_eq!(
            store.vehicle_rules[0].conditions,
            vec![Condition::Contains {
                field: Selector::Known(VehicleField::Plate),
                needle: "12".into(),
            }]
        );
    }

    #[test]
    fn reject_unknown_mutation_field() {
        let err = RuleStore::from_json(
            r#"{ "bus_rules": [ { "conditions": {}, "mutations": { "colour": "red" } } ] }"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RuleError::UnknownField { section: "bus_rules", index: 0, .. }
        ));
    }

    #[test]
    fn reject_mistyped_mutation() {
        let err = RuleStore::from_json(
            r#"{ "bus_rules": [ { "mutations": { "vehicle_code": "12" } } ] }"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RuleError::InvalidValue { field: "vehicle_code", .. }
        ));

        let err = RuleStore::from_json(
            r#"{ "arrival_rules": [ { "mutations": { "destination": 4 } } ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, RuleError::InvalidValue { field: "destination", .. }));
    }

    #[test]
    fn reject_ambiguous_model_rules() {
        let both = r#"{ "model_rules": [ { "range": [1, 2], "exact": 1, "model": "A" } ] }"#;
        assert!(matches!(
            RuleStore::from_json(both),
            Err(RuleError::InvalidModelRule { index: 0, .. })
        ));

        let neither = r#"{ "model_rules": [ { "model": "A" } ] }"#;
        assert!(matches!(
            RuleStore::from_json(neither),
            Err(RuleError::InvalidModelRule { index: 0, .. })
        ));

        let inverted = r#"{ "model_rules": [ { "range": [9, 1], "model": "A" } ] }"#;
        assert!(RuleStore::from_json(inverted).is_err());
    }

    #[test]
    fn reject_bad_json() {
        assert!(matches!(
            RuleStore::from_json("{ not json"),
            Err(RuleError::Json { .. })
        ));
    }

    #[test]
    fn load_missing_file() {
        let err = RuleStore::load("/nonexistent/rules.json").unwrap_err();
        assert!(matches!(err, RuleError::Io { .. }));
    }

    #[test]
    fn load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");
        std::fs::write(&path, RULES).unwrap();

        let store = RuleStore::load(&path).unwrap();
        assert_eq!(store.model_rules.len(), 2);
    }

    #[test]
    fn shipped_rules_load() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/transformation-rules.json");
        let store = RuleStore::load(path).unwrap();
        assert_eq!(store.normalize_line("7/"), "7A");
    }

    #[test]
    fn normalize_line_uses_vehicle_rules() {
        let store = RuleStore::from_json(RULES).unwrap();
        assert_eq!(store.normalize_line("7/"), "7A");
        assert_eq!(store.normalize_line("9"), "9");
    }
}
