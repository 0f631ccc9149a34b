//! Rule evaluation.

use tracing::trace;

use crate::domain::{FieldRef, RuleTarget, VehicleRecord};

use super::store::{Condition, ModelRule, NormalizationRule, Selector};

/// Apply every matching rule to `record`, in order.
///
/// Each rule's conditions are checked against the record as left by the
/// rules before it, so a mutation can enable or disable later rules.
pub fn apply<R: RuleTarget>(record: &mut R, rules: &[NormalizationRule<R::Field>]) {
    for (index, rule) in rules.iter().enumerate() {
        if rule.conditions.iter().all(|c| holds(record, c)) {
            trace!(rule = index, "normalization rule matched");
            for mutation in &rule.mutations {
                record.set(mutation.field, &mutation.value);
            }
        }
    }
}

fn holds<R: RuleTarget>(record: &R, condition: &Condition<R::Field>) -> bool {
    match condition {
        Condition::Equals { field, value } => {
            read(record, field).is_some_and(|actual| actual.equals(value))
        }
        Condition::Contains { field, needle } => match read(record, field) {
            Some(FieldRef::Text(text)) => !text.is_empty() && text.contains(needle.as_str()),
            _ => false,
        },
    }
}

fn read<'a, R: RuleTarget>(record: &'a R, selector: &Selector<R::Field>) -> Option<FieldRef<'a>> {
    match selector {
        Selector::Known(field) => record.get(*field),
        Selector::Unknown(_) => None,
    }
}

/// The outcome of resolving a fleet number against the model rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelResolution<'a> {
    pub model: &'a str,
    pub plate: Option<String>,
}

/// Find the model for a fleet number. The first matching rule wins.
pub fn resolve_model(vehicle_code: i64, rules: &[ModelRule]) -> Option<ModelResolution<'_>> {
    let rule = rules.iter().find(|r| r.matches(vehicle_code))?;
    let target = rule.target();
    Some(ModelResolution {
        model: &target.model,
        plate: target
            .plate_prefix
            .as_ref()
            .map(|prefix| format!("{prefix}{vehicle_code}")),
    })
}

/// Set the vehicle's model (and plate, if the rule says so) from the model rules.
///
/// Leaves the vehicle untouched when no rule matches or it has no fleet number.
pub fn apply_model(vehicle: &mut VehicleRecord, rules: &[ModelRule]) {
    let Some(vehicle_code) = vehicle.vehicle_code else {
        return;
    };
    if let Some(resolution) = resolve_model(vehicle_code, rules) {
        vehicle.model = Some(resolution.model.to_string());
        if let Some(plate) = resolution.plate {
            vehicle.plate = plate;
        }
    }
}
