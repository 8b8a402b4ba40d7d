//! Optimizer settings and the per-optimizer parameter schemas.
//!
//! `optimizer_parameters` is accepted by [`OptimizerInfo`] as an open mapping.
//! Its real schema depends on the optimizer type, which may itself be absent
//! until the computation layer picks a default, so checking it is a second,
//! explicit phase: [`OptimizerInfo::parameters_for`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use crate::constants::OptimizerType;
use crate::core::validation::{decode_at, decode_value};
use crate::error::ValidationError;

/// Path of the parameter block inside every request that carries one.
pub const OPTIMIZER_PARAMETERS_PATH: &str = "optimizer_info.optimizer_parameters";

/// Multistart optimizer settings
///
/// Every field is optional and stays `None` when omitted: the correct
/// defaults depend on which objective is being optimized and are resolved by
/// [`crate::core::defaults::resolve_optimizer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, Default)]
#[serde(deny_unknown_fields)]
pub struct OptimizerInfo {
    #[serde(default)]
    pub optimizer_type: Option<OptimizerType>,
    #[serde(default)]
    #[validate(range(min = 1))]
    pub num_multistarts: Option<i64>,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub num_random_samples: Option<i64>,
    #[serde(default)]
    pub optimizer_parameters: Option<Map<String, Value>>,
}

impl OptimizerInfo {
    /// Validate the raw parameter block against the schema of `optimizer_type`.
    ///
    /// Returns `Ok(None)` when no block was supplied.
    pub fn parameters_for(
        &self,
        optimizer_type: OptimizerType,
    ) -> Result<Option<OptimizerParameters>, ValidationError> {
        match &self.optimizer_parameters {
            Some(raw) => OptimizerParameters::decode(optimizer_type, raw).map(Some),
            None => Ok(None),
        }
    }
}

/// Gradient descent settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct GradientDescentParameters {
    #[validate(range(min = 1))]
    pub max_num_steps: i64,
    #[validate(range(min = 1))]
    pub max_num_restarts: i64,
    #[validate(range(min = 0))]
    pub num_steps_averaged: i64,
    #[validate(range(min = 0.0))]
    pub gamma: f64,
    #[validate(range(min = 0.0))]
    pub pre_mult: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub max_relative_change: f64,
    #[validate(range(min = 0.0))]
    pub tolerance: f64,
}

/// Newton settings
///
/// `gamma` and `time_factor` have stricter lower bounds than their gradient
/// descent counterparts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct NewtonParameters {
    #[validate(range(min = 1))]
    pub max_num_steps: i64,
    #[validate(range(min = 1.0))]
    pub gamma: f64,
    #[validate(range(min = 1.0e-16))]
    pub time_factor: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub max_relative_change: f64,
    #[validate(range(min = 0.0))]
    pub tolerance: f64,
}

/// The null optimizer takes no parameters; any key is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct NullParameters {}

/// A parameter block validated against its optimizer's schema
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OptimizerParameters {
    Null(NullParameters),
    GradientDescent(GradientDescentParameters),
    Newton(NewtonParameters),
}

impl OptimizerParameters {
    /// Select the schema for `optimizer_type` and validate `raw` against it.
    pub fn decode(
        optimizer_type: OptimizerType,
        raw: &Map<String, Value>,
    ) -> Result<Self, ValidationError> {
        let value = Value::Object(raw.clone());
        match optimizer_type {
            OptimizerType::NullOptimizer => decode_value::<NullParameters>(value)
                .map(OptimizerParameters::Null)
                .map_err(|v| ValidationError::single(v.prefixed(OPTIMIZER_PARAMETERS_PATH))),
            OptimizerType::GradientDescentOptimizer => {
                decode_at(value, OPTIMIZER_PARAMETERS_PATH).map(OptimizerParameters::GradientDescent)
            }
            OptimizerType::NewtonOptimizer => {
                decode_at(value, OPTIMIZER_PARAMETERS_PATH).map(OptimizerParameters::Newton)
            }
        }
    }

    pub fn optimizer_type(&self) -> OptimizerType {
        match self {
            OptimizerParameters::Null(_) => OptimizerType::NullOptimizer,
            OptimizerParameters::GradientDescent(_) => OptimizerType::GradientDescentOptimizer,
            OptimizerParameters::Newton(_) => OptimizerType::NewtonOptimizer,
        }
    }
}
