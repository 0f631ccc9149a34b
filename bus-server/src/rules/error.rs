//! Rule loading errors.

use std::path::PathBuf;

/// Errors raised while loading or validating a rule file.
///
/// Evaluating rules never fails; every problem is caught here, at load time.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// The rule file couldn't be read
    #[error("failed to read rule file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The rule file isn't valid JSON or doesn't have the expected shape
    #[error("rule file JSON error: {message}")]
    Json { message: String },

    /// A mutation names a field the record type doesn't have
    #[error("{section}[{index}]: unknown mutation field `{field}`")]
    UnknownField {
        section: &'static str,
        index: usize,
        field: String,
    },

    /// A mutation value has the wrong type for its field
    #[error("{section}[{index}]: value {value} can't be written to `{field}`")]
    InvalidValue {
        section: &'static str,
        index: usize,
        field: &'static str,
        value: String,
    },

    /// A model rule is neither a range nor an exact match, or is both
    #[error("model_rules[{index}]: {reason}")]
    InvalidModelRule { index: usize, reason: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = RuleError::UnknownField {
            section: "bus_rules",
            index: 3,
            field: "colour".into(),
        };
        assert_eq!(
            err.to_string(),
            "bus_rules[3]: unknown mutation field `colour`"
        );

        let err = RuleError::InvalidModelRule {
            index: 0,
            reason: "range minimum exceeds maximum",
        };
        assert_eq!(
            err.to_string(),
            "model_rules[0]: range minimum exceeds maximum"
        );

        let err = RuleError::InvalidValue {
            section: "arrival_rules",
            index: 1,
            field: "delay",
            value: "\"soon\"".into(),
        };
        assert!(err.to_string().contains("can't be written to `delay`"));
    }
}
