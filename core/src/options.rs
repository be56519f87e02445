//! Validation of pagination options.
//!
//! Options are checked against a fixed rule table: every key must be listed,
//! and each listed key that is present must pass its type and range check.
//! The first violation aborts validation.

use serde_json::Value;

use crate::error::ValidationError;
use crate::types::Parameters;

/// One entry of an option schema.
struct OptionRule {
    key: &'static str,
    check: fn(i64) -> bool,
    rule: &'static str,
}

const PAGINATION: &[OptionRule] = &[
    OptionRule {
        key: "page",
        check: |v| v > 0,
        rule: "page > 0",
    },
    OptionRule {
        key: "per_page",
        check: |v| (1..=100).contains(&v),
        rule: "1 <= per_page <= 100",
    },
];

/// Options that passed validation, unchanged from the caller's input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedOptions {
    params: Parameters,
}

impl ValidatedOptions {
    pub fn page(&self) -> Option<i64> {
        self.params.get("page").and_then(Value::as_i64)
    }

    pub fn per_page(&self) -> Option<i64> {
        self.params.get("per_page").and_then(Value::as_i64)
    }

    pub fn as_params(&self) -> &Parameters {
        &self.params
    }

    pub fn into_params(self) -> Parameters {
        self.params
    }
}

/// Validate `options` against the pagination schema.
pub fn validate(options: &Parameters) -> Result<ValidatedOptions, ValidationError> {
    if let Some(key) = options
        .keys()
        .find(|key| !PAGINATION.iter().any(|rule| rule.key == key.as_str()))
    {
        return Err(ValidationError::UnknownOption { key: key.clone() });
    }

    for rule in PAGINATION {
        let Some(value) = options.get(rule.key) else {
            continue;
        };
        let n = value.as_i64().ok_or_else(|| ValidationError::InvalidType {
            key: rule.key.to_string(),
            expected: "an integer",
        })?;
        if !(rule.check)(n) {
            return Err(ValidationError::OutOfRange {
                key: rule.key.to_string(),
                rule: rule.rule,
            });
        }
    }

    Ok(ValidatedOptions {
        params: options.clone(),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn opts(value: Value) -> Parameters {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn page_zero_fails() {
        let err = validate(&opts(json!({"page": 0}))).unwrap_err();
        assert_eq!(
            err,
            ValidationError::OutOfRange {
                key: "page".to_string(),
                rule: "page > 0"
            }
        );
    }

    #[test]
    fn per_page_bounds() {
        assert!(validate(&opts(json!({"per_page": 101}))).is_err());
        assert!(validate(&opts(json!({"per_page": 0}))).is_err());
        assert!(validate(&opts(json!({"per_page": 1}))).is_ok());
        assert!(validate(&opts(json!({"per_page": 100}))).is_ok());
    }

    #[test]
    fn unknown_key_fails() {
        let err = validate(&opts(json!({"unknown": 1}))).unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownOption {
                key: "unknown".to_string()
            }
        );
    }

    #[test]
    fn valid_options_are_unchanged() {
        let input = opts(json!({"page": 2, "per_page": 50}));
        let validated = validate(&input).unwrap();
        assert_eq!(validated.page(), Some(2));
        assert_eq!(validated.per_page(), Some(50));
        assert_eq!(validated.as_params(), &input);
    }

    #[test]
    fn non_integers_are_rejected() {
        for bad in [json!("2"), json!(2.5), json!(true), json!(null)] {
            let err = validate(&opts(json!({ "page": bad }))).unwrap_err();
            assert!(matches!(err, ValidationError::InvalidType { ref key, .. } if key == "page"));
        }
    }

    #[test]
    fn first_violation_wins() {
        let err = validate(&opts(json!({"page": -1, "per_page": 500}))).unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { ref key, .. } if key == "page"));
    }

    #[test]
    fn empty_is_valid() {
        assert_eq!(validate(&Parameters::new()).unwrap(), ValidatedOptions::default());
    }
}
