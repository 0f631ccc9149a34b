//! Declarative normalization rules.
//!
//! The operator's feeds carry inconsistent labels (line names, destinations,
//! plates). A rule file describes, per record type, a list of
//! condition/mutation pairs, plus a table that maps fleet numbers to vehicle
//! models. The file is loaded once at start-up into an immutable
//! [`RuleStore`] that is shared by reference with everything that
//! normalizes records.
//!
//! Evaluation order matters:
//! - normalization rules: every matching rule is applied, in file order,
//!   each one seeing the mutations of the rules before it
//! - model rules: the first matching rule wins

mod engine;
mod error;
mod store;

pub use engine::{ModelResolution, apply, apply_model, resolve_model};
pub use error::RuleError;
pub use store::{
    Condition, ModelRule, ModelTarget, Mutation, NormalizationRule, RuleStore, Selector,
};
