use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::models::ErrorResponse;
use crate::services::BackendError;

/// The constraint a payload value failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Constraint {
    /// The body is not parseable JSON or not a JSON object.
    Malformed,
    WrongType,
    MissingField,
    UnknownKey,
    NotInEnumeration,
    OutOfRange,
    InvalidValue,
}

/// A single schema violation, located by its path in the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Path in `a.b[0].c` notation; empty for the payload root.
    pub path: String,
    pub constraint: Constraint,
    pub message: String,
}

impl Violation {
    pub fn new(path: impl Into<String>, constraint: Constraint, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            constraint,
            message: message.into(),
        }
    }

    pub fn unknown_key(path: impl Into<String>) -> Self {
        let path = path.into();
        let message = format!("unknown field `{}`", path.rsplit('.').next().unwrap_or(path.as_str()));
        Self::new(path, Constraint::UnknownKey, message)
    }

    /// Classify an error message produced by serde while decoding a value.
    pub fn from_serde(path: impl Into<String>, message: String) -> Self {
        let constraint = if message.starts_with("unknown field") {
            Constraint::UnknownKey
        } else if message.starts_with("missing field") {
            Constraint::MissingField
        } else if message.starts_with("unknown variant") {
            Constraint::NotInEnumeration
        } else if message.starts_with("invalid type") || message.starts_with("invalid length") {
            Constraint::WrongType
        } else if message.contains("out of range") {
            Constraint::OutOfRange
        } else {
            Constraint::InvalidValue
        };
        Self::new(path, constraint, message)
    }

    /// Re-root this violation under `prefix`.
    pub fn prefixed(mut self, prefix: &str) -> Self {
        self.path = join_path(prefix, &self.path);
        self
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Join a parent path and a child path; index segments attach without a dot.
pub fn join_path(prefix: &str, path: &str) -> String {
    match (prefix.is_empty(), path.is_empty()) {
        (true, _) => path.to_string(),
        (false, true) => prefix.to_string(),
        (false, false) if path.starts_with('[') => format!("{}{}", prefix, path),
        (false, false) => format!("{}.{}", prefix, path),
    }
}

/// A payload rejected by schema validation.
///
/// Always carries at least one [`Violation`], sorted by path so that the
/// client-facing message is stable across runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("payload failed validation: {}", summarize(.violations))]
pub struct ValidationError {
    violations: Vec<Violation>,
}

fn summarize(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    pub fn new(mut violations: Vec<Violation>) -> Self {
        violations.sort_by(|a, b| a.path.cmp(&b.path));
        Self { violations }
    }

    pub fn single(violation: Violation) -> Self {
        Self {
            violations: vec![violation],
        }
    }

    /// Ok when nothing was found, otherwise the collected violations.
    pub fn check(violations: Vec<Violation>) -> Result<(), Self> {
        if violations.is_empty() {
            Ok(())
        } else {
            Err(Self::new(violations))
        }
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }

    /// True if some violation sits exactly at `path`.
    pub fn has_path(&self, path: &str) -> bool {
        self.violations.iter().any(|v| v.path == path)
    }

    pub fn prefixed(self, prefix: &str) -> Self {
        Self::new(
            self.violations
                .into_iter()
                .map(|v| v.prefixed(prefix))
                .collect(),
        )
    }
}

/// Errors surfaced by the HTTP layer
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("unknown endpoint `{0}`")]
    UnknownEndpoint(String),

    #[error("computation failed: {0}")]
    Backend(#[from] BackendError),

    #[error("computed response failed validation: {0}")]
    InvalidResponse(ValidationError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation_failed",
            ApiError::UnknownEndpoint(_) => "unknown_endpoint",
            ApiError::Backend(BackendError::InvalidInput(_)) => "invalid_input",
            ApiError::Backend(_) => "computation_failed",
            ApiError::InvalidResponse(_) => "invalid_response",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::UnknownEndpoint(_) => StatusCode::NOT_FOUND,
            ApiError::Backend(BackendError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            ApiError::Backend(_) | ApiError::InvalidResponse(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let violations = match self {
            ApiError::Validation(err) | ApiError::InvalidResponse(err) => err.violations().to_vec(),
            _ => Vec::new(),
        };
        let status = self.status_code();

        HttpResponse::build(status).json(ErrorResponse {
            error: self.code().to_string(),
            message: self.to_string(),
            status_code: status.as_u16(),
            violations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("", "dim"), "dim");
        assert_eq!(join_path("domain_info", ""), "domain_info");
        assert_eq!(join_path("domain_info", "dim"), "domain_info.dim");
        assert_eq!(join_path("points_sampled", "[2].value"), "points_sampled[2].value");
    }

    #[test]
    fn test_serde_message_classification() {
        let cases = [
            ("unknown field `foo`, expected `dim`", Constraint::UnknownKey),
            ("missing field `dim`", Constraint::MissingField),
            ("unknown variant `x`, expected `tensor_product`", Constraint::NotInEnumeration),
            ("invalid type: string \"a\", expected f64", Constraint::WrongType),
            ("value -1 is out of range: must be positive and finite", Constraint::OutOfRange),
            ("something else", Constraint::InvalidValue),
        ];
        for (message, expected) in cases {
            assert_eq!(Violation::from_serde("x", message.to_string()).constraint, expected);
        }
    }

    #[test]
    fn test_violations_sorted_by_path() {
        let err = ValidationError::new(vec![
            Violation::new("num_to_sample", Constraint::OutOfRange, "b"),
            Violation::new("domain_info.dim", Constraint::OutOfRange, "a"),
        ]);
        assert_eq!(err.violations()[0].path, "domain_info.dim");
        assert!(err.to_string().contains("domain_info.dim: a; num_to_sample: b"));
    }

    #[test]
    fn test_api_error_status() {
        let validation = ApiError::Validation(ValidationError::single(Violation::unknown_key("foo")));
        assert_eq!(validation.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::UnknownEndpoint("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Backend(BackendError::Computation("boom".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
