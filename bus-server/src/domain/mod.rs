//! Domain types for the bus feed.
//!
//! Vehicle and arrival records mirror the upstream JSON shapes closely so
//! they can be passed back to clients after normalization. Each record
//! exposes a typed field view that the rule engine evaluates against,
//! instead of looking fields up by name at runtime.

mod arrival;
mod clock;
pub mod collate;
mod field;
mod vehicle;

pub use arrival::{ArrivalField, ArrivalKind, ArrivalRecord};
pub use clock::{ClockError, ClockTime};
pub use field::{FieldRef, FieldValue, RecordField, RuleTarget};
pub use vehicle::{VehicleField, VehicleRecord};
