//! The validation pipeline.
//!
//! A payload passes in two steps. Shape: the JSON object is split between the
//! schema's parts and each part is decoded with serde, which rejects unknown
//! keys, missing required fields, wrong types and values outside an
//! enumeration. Serde stops at the first such error inside a part, so a part
//! contributes at most one shape violation. Constraints: the typed value is
//! run through `validator`, and every range failure found anywhere in the
//! payload is reported. When a part of a composed schema fails its shape
//! step, the parts that decoded still report their range failures. Nothing is
//! returned unless both steps are clean.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::core::schema::Schema;
use crate::error::{join_path, Constraint, ValidationError, Violation};

/// Validate a parsed payload against `T`, applying static defaults.
pub fn validate<T: Schema>(payload: Value) -> Result<T, ValidationError> {
    let mut object = match payload {
        Value::Object(object) => object,
        other => {
            return Err(ValidationError::single(Violation::new(
                "",
                Constraint::Malformed,
                format!("expected a JSON object, found {}", json_kind(&other)),
            )))
        }
    };

    let mut violations: Vec<Violation> = object
        .keys()
        .filter(|key| !T::owns(key))
        .map(|key| Violation::unknown_key(key.as_str()))
        .collect();

    match T::decode_fields(&mut object) {
        Ok(decoded) => {
            violations.extend(decoded.violations());
            ValidationError::check(violations).map(|()| decoded)
        }
        Err(found) => {
            violations.extend(found);
            Err(ValidationError::new(violations))
        }
    }
}

/// Parse and validate a raw JSON body.
pub fn validate_str<T: Schema>(raw: &str) -> Result<T, ValidationError> {
    let payload: Value = serde_json::from_str(raw).map_err(|err| {
        ValidationError::single(Violation::new(
            "",
            Constraint::Malformed,
            format!("invalid JSON: {}", err),
        ))
    })?;
    validate(payload)
}

/// Validate `payload` and serialize the defaulted result back to JSON.
pub fn normalize<T: Schema>(payload: Value) -> Result<Value, ValidationError> {
    let validated: T = validate(payload)?;
    to_json(&validated)
}

pub(crate) fn to_json<T: Serialize>(value: &T) -> Result<Value, ValidationError> {
    serde_json::to_value(value).map_err(|err| {
        ValidationError::single(Violation::new(
            "",
            Constraint::InvalidValue,
            format!("failed to serialize validated payload: {}", err),
        ))
    })
}

/// Decode a nested value and check its constraints, reporting paths under `prefix`.
pub fn decode_at<T>(value: Value, prefix: &str) -> Result<T, ValidationError>
where
    T: DeserializeOwned + Validate,
{
    let decoded: T = decode_value(value).map_err(|v| ValidationError::single(v.prefixed(prefix)))?;
    let violations = constraint_violations(&decoded)
        .into_iter()
        .map(|v| v.prefixed(prefix))
        .collect();
    ValidationError::check(violations).map(|()| decoded)
}

/// Shape-only decoding; the first serde error is returned with its path.
pub(crate) fn decode_value<T: DeserializeOwned>(value: Value) -> Result<T, Violation> {
    serde_path_to_error::deserialize(value).map_err(|err| {
        let path = err.path().to_string();
        // serde_path_to_error renders the root as "."
        let path = if path == "." { String::new() } else { path };
        Violation::from_serde(path, err.into_inner().to_string())
    })
}

/// Run `validator` over `value` and flatten the nested error tree.
pub fn constraint_violations<T: Validate>(value: &T) -> Vec<Violation> {
    let mut found = Vec::new();
    if let Err(errors) = value.validate() {
        flatten_errors("", &errors, &mut found);
    }
    found
}

/// Entries of `values` that have no JSON encoding (NaN and the infinities).
///
/// `serde_json` writes them as `null`, which no response schema accepts.
pub fn non_finite_violations(path: &str, values: &[f64]) -> Vec<Violation> {
    values
        .iter()
        .enumerate()
        .filter(|(_, value)| !value.is_finite())
        .map(|(index, value)| non_finite(format!("{}[{}]", path, index), *value))
        .collect()
}

/// Same as [`non_finite_violations`] for every row of a matrix.
pub fn non_finite_matrix_violations(path: &str, rows: &[Vec<f64>]) -> Vec<Violation> {
    rows.iter()
        .enumerate()
        .flat_map(|(index, row)| non_finite_violations(&format!("{}[{}]", path, index), row))
        .collect()
}

pub fn non_finite(path: impl Into<String>, value: f64) -> Violation {
    Violation::new(path, Constraint::InvalidValue, format!("value {} is not a finite number", value))
}

fn flatten_errors(prefix: &str, errors: &ValidationErrors, out: &mut Vec<Violation>) {
    for (field, kind) in errors.errors() {
        let path = join_path(prefix, field);
        match kind {
            ValidationErrorsKind::Field(failures) => {
                out.extend(failures.iter().map(|failure| describe(&path, failure)));
            }
            ValidationErrorsKind::Struct(inner) => flatten_errors(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    flatten_errors(&format!("{}[{}]", path, index), inner, out);
                }
            }
        }
    }
}

fn describe(path: &str, failure: &validator::ValidationError) -> Violation {
    if let Some(message) = &failure.message {
        return Violation::new(path, Constraint::InvalidValue, message.to_string());
    }

    match failure.code.as_ref() {
        "range" => {
            let value = failure
                .params
                .get("value")
                .map(|v| v.to_string())
                .unwrap_or_default();
            let bound = match (failure.params.get("min"), failure.params.get("max")) {
                (Some(min), Some(max)) => format!("must be within [{}, {}]", min, max),
                (Some(min), None) => format!("must be >= {}", min),
                (None, Some(max)) => format!("must be <= {}", max),
                (None, None) => "is out of range".to_string(),
            };
            Violation::new(
                path,
                Constraint::OutOfRange,
                format!("value {} {}", value, bound),
            )
        }
        code => Violation::new(path, Constraint::InvalidValue, format!("failed `{}` check", code)),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, Validate)]
    #[serde(deny_unknown_fields)]
    struct Inner {
        #[validate(range(min = 1))]
        steps: i64,
        #[validate(range(min = 0.0, max = 1.0))]
        fraction: f64,
    }

    #[derive(Debug, Deserialize, Validate)]
    #[serde(deny_unknown_fields)]
    struct Outer {
        #[validate(nested)]
        items: Vec<Inner>,
    }

    #[test]
    fn test_decode_value_reports_nested_path() {
        let err = decode_value::<Outer>(json!({"items": [{"steps": 1, "fraction": "x"}]})).unwrap_err();
        assert_eq!(err.path, "items[0].fraction");
        assert_eq!(err.constraint, Constraint::WrongType);
    }

    #[test]
    fn test_decode_value_missing_field() {
        let err = decode_value::<Inner>(json!({"steps": 1})).unwrap_err();
        assert_eq!(err.constraint, Constraint::MissingField);
        assert!(err.message.contains("fraction"));
    }

    #[test]
    fn test_constraint_violations_aggregate() {
        let outer: Outer = serde_json::from_value(json!({
            "items": [
                {"steps": 0, "fraction": 0.5},
                {"steps": 3, "fraction": 1.5},
            ]
        }))
        .unwrap();

        let mut found = constraint_violations(&outer);
        found.sort_by(|a, b| a.path.cmp(&b.path));
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].path, "items[0].steps");
        assert_eq!(found[0].constraint, Constraint::OutOfRange);
        assert!(found[0].message.contains(">= 1"));
        assert_eq!(found[1].path, "items[1].fraction");
        assert!(found[1].message.contains("within"));
    }

    #[test]
    fn test_non_finite_values_located() {
        assert!(non_finite_violations("mean", &[0.0, -1.5, 1.0e300]).is_empty());

        let found = non_finite_violations("mean", &[0.0, f64::NAN, f64::INFINITY]);
        let paths: Vec<&str> = found.iter().map(|v| v.path.as_str()).collect();
        assert_eq!(paths, vec!["mean[1]", "mean[2]"]);
        assert!(found.iter().all(|v| v.constraint == Constraint::InvalidValue));

        let found = non_finite_matrix_violations("var", &[vec![1.0, 0.0], vec![0.0, f64::NEG_INFINITY]]);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].path, "var[1][1]");
    }

    #[test]
    fn test_decode_at_prefixes_paths() {
        let err = decode_at::<Inner>(json!({"steps": 0, "fraction": 0.5}), "optimizer_info.optimizer_parameters")
            .unwrap_err();
        assert!(err.has_path("optimizer_info.optimizer_parameters.steps"));
    }
}
