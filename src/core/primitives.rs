//! Primitive value validators.
//!
//! Ranged integers are declared as `i64` fields carrying `#[validate(range(..))]`
//! so that negative or zero inputs reach the range check and get reported
//! with the rest of the payload instead of failing as a type mismatch.
//! Enumerated strings are the serde enums in [`crate::constants`]; an
//! unknown value fails with serde's "unknown variant ..., expected one of ..."
//! message, which names the allowed set.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A float in the open interval `(0, +inf)`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct PositiveFloat(f64);

#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("value {0} is out of range: must be positive and finite")]
pub struct NotPositiveFinite(pub f64);

impl PositiveFloat {
    pub fn new(value: f64) -> Result<Self, NotPositiveFinite> {
        // NaN fails both comparisons
        if value > 0.0 && value < f64::INFINITY {
            Ok(Self(value))
        } else {
            Err(NotPositiveFinite(value))
        }
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for PositiveFloat {
    type Error = NotPositiveFinite;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PositiveFloat> for f64 {
    fn from(value: PositiveFloat) -> Self {
        value.0
    }
}

impl fmt::Display for PositiveFloat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_open_interval() {
        for value in [f64::MIN_POSITIVE, 1.0e-300, 0.5, 1.0, 1.0e300, f64::MAX] {
            assert_eq!(PositiveFloat::new(value).map(PositiveFloat::get), Ok(value));
        }
    }

    #[test]
    fn test_rejects_boundaries_and_nan() {
        for value in [0.0, -0.0, -1.0e-12, -3.5, f64::INFINITY, f64::NEG_INFINITY] {
            assert_eq!(PositiveFloat::new(value), Err(NotPositiveFinite(value)));
        }
        assert!(PositiveFloat::new(f64::NAN).is_err());
    }

    #[test]
    fn test_deserialize_cites_value() {
        let err = serde_json::from_str::<PositiveFloat>("-2.5").unwrap_err();
        assert!(err.to_string().contains("value -2.5 is out of range"));

        let ok: PositiveFloat = serde_json::from_str("2").unwrap();
        assert_eq!(ok.get(), 2.0);
        assert_eq!(serde_json::to_string(&ok).unwrap(), "2.0");
    }
}
