use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use crate::core::schema::{composed_schema, decode_leaf, leaf_schema, owns_field, Schema, SchemaFields};
use crate::core::validation::{non_finite, non_finite_matrix_violations, non_finite_violations};
use crate::error::{Constraint, Violation};
use crate::models::domain::CovarianceInfo;

/// Free-form optimizer diagnostics; unknown keys are preserved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptimizerSuccess(pub Map<String, Value>);

impl OptimizerSuccess {
    pub fn found_update(found: bool) -> Self {
        let mut map = Map::new();
        map.insert("found_update".to_string(), Value::Bool(found));
        Self(map)
    }
}

impl Default for OptimizerSuccess {
    fn default() -> Self {
        Self::found_update(false)
    }
}

/// Status block of the next-points endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct GpNextPointsStatus {
    pub expected_improvement: f64,
    #[serde(default)]
    pub optimizer_success: OptimizerSuccess,
}

/// Response of every `gp_next_points_*` endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct GpNextPointsResponse {
    pub endpoint: String,
    pub points_to_sample: Vec<Vec<f64>>,
    #[validate(nested)]
    pub status: GpNextPointsStatus,
}

impl SchemaFields for GpNextPointsResponse {
    const FIELDS: &'static [&'static str] = &["endpoint", "points_to_sample", "status"];
}

/// Status block of `gp_hyper_opt`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct GpHyperOptStatus {
    pub log_likelihood: f64,
    pub grad_log_likelihood: Vec<f64>,
    #[serde(default)]
    pub optimizer_success: OptimizerSuccess,
}

/// Response of `gp_hyper_opt`: the tuned covariance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct GpHyperOptResponse {
    pub endpoint: String,
    pub covariance_info: CovarianceInfo,
    #[validate(nested)]
    pub status: GpHyperOptStatus,
}

impl SchemaFields for GpHyperOptResponse {
    const FIELDS: &'static [&'static str] = &["endpoint", "covariance_info", "status"];
}

/// Response of `gp_ei`, one value per evaluated point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GpEiResponse {
    pub endpoint: String,
    pub expected_improvement: Vec<f64>,
}

impl SchemaFields for GpEiResponse {
    const FIELDS: &'static [&'static str] = &["endpoint", "expected_improvement"];
}

impl Schema for GpEiResponse {
    fn owns(key: &str) -> bool {
        owns_field(Self::FIELDS, key)
    }

    fn decode_fields(object: &mut Map<String, Value>) -> Result<Self, Vec<Violation>> {
        decode_leaf(object)
    }

    fn violations(&self) -> Vec<Violation> {
        self.expected_improvement
            .iter()
            .enumerate()
            .filter_map(|(index, value)| {
                expected_improvement_violation(format!("expected_improvement[{}]", index), *value)
            })
            .collect()
    }
}

/// Expected improvement is a finite, non-negative number.
fn expected_improvement_violation(path: String, value: f64) -> Option<Violation> {
    if !value.is_finite() {
        Some(non_finite(path, value))
    } else if value < 0.0 {
        Some(Violation::new(
            path,
            Constraint::OutOfRange,
            format!("value {} must be >= 0", value),
        ))
    } else {
        None
    }
}

fn next_points_violations(response: &GpNextPointsResponse) -> Vec<Violation> {
    let mut found = non_finite_matrix_violations("points_to_sample", &response.points_to_sample);
    found.extend(expected_improvement_violation(
        "status.expected_improvement".to_string(),
        response.status.expected_improvement,
    ));
    found
}

fn hyper_opt_violations(response: &GpHyperOptResponse) -> Vec<Violation> {
    let status = &response.status;
    let mut found = non_finite_violations("status.grad_log_likelihood", &status.grad_log_likelihood);
    if !status.log_likelihood.is_finite() {
        found.push(non_finite("status.log_likelihood", status.log_likelihood));
    }
    found
}

fn mean_violations(part: &MeanPart) -> Vec<Violation> {
    non_finite_violations("mean", &part.mean)
}

fn var_violations(part: &VarPart) -> Vec<Violation> {
    non_finite_matrix_violations("var", &part.var)
}

fn var_diag_violations(part: &VarDiagPart) -> Vec<Violation> {
    non_finite_violations("var", &part.var)
}

// Partial shapes combined into the mean/variance responses.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct EndpointPart {
    pub endpoint: String,
}

impl SchemaFields for EndpointPart {
    const FIELDS: &'static [&'static str] = &["endpoint"];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct MeanPart {
    pub mean: Vec<f64>,
}

impl SchemaFields for MeanPart {
    const FIELDS: &'static [&'static str] = &["mean"];
}

/// Full posterior covariance matrix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct VarPart {
    pub var: Vec<Vec<f64>>,
}

impl SchemaFields for VarPart {
    const FIELDS: &'static [&'static str] = &["var"];
}

/// Diagonal of the posterior covariance matrix, under the same key as [`VarPart`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct VarDiagPart {
    pub var: Vec<f64>,
}

impl SchemaFields for VarDiagPart {
    const FIELDS: &'static [&'static str] = &["var"];
}

leaf_schema!(
    GpNextPointsResponse => next_points_violations,
    GpHyperOptResponse => hyper_opt_violations,
    EndpointPart,
    MeanPart => mean_violations,
    VarPart => var_violations,
    VarDiagPart => var_diag_violations,
);

composed_schema! {
    /// Response of `gp_mean`
    pub struct GpMeanResponse {
        pub endpoint: EndpointPart,
        pub mean: MeanPart,
    }
}

composed_schema! {
    /// Response of `gp_var`
    pub struct GpVarResponse {
        pub endpoint: EndpointPart,
        pub var: VarPart,
    }
}

composed_schema! {
    /// Response of `gp_var_diag`
    pub struct GpVarDiagResponse {
        pub endpoint: EndpointPart,
        pub var: VarDiagPart,
    }
}

composed_schema! {
    /// Response of `gp_mean_var`
    pub struct GpMeanVarResponse {
        pub endpoint: EndpointPart,
        pub mean: MeanPart,
        pub var: VarPart,
    }
}

composed_schema! {
    /// Response of `gp_mean_var_diag`
    pub struct GpMeanVarDiagResponse {
        pub endpoint: EndpointPart,
        pub mean: MeanPart,
        pub var: VarDiagPart,
    }
}

impl GpMeanResponse {
    pub fn new(endpoint: impl Into<String>, mean: Vec<f64>) -> Self {
        Self {
            endpoint: EndpointPart { endpoint: endpoint.into() },
            mean: MeanPart { mean },
        }
    }
}

impl GpVarResponse {
    pub fn new(endpoint: impl Into<String>, var: Vec<Vec<f64>>) -> Self {
        Self {
            endpoint: EndpointPart { endpoint: endpoint.into() },
            var: VarPart { var },
        }
    }
}

impl GpVarDiagResponse {
    pub fn new(endpoint: impl Into<String>, var: Vec<f64>) -> Self {
        Self {
            endpoint: EndpointPart { endpoint: endpoint.into() },
            var: VarDiagPart { var },
        }
    }
}

impl GpMeanVarResponse {
    pub fn new(endpoint: impl Into<String>, mean: Vec<f64>, var: Vec<Vec<f64>>) -> Self {
        Self {
            endpoint: EndpointPart { endpoint: endpoint.into() },
            mean: MeanPart { mean },
            var: VarPart { var },
        }
    }
}

impl GpMeanVarDiagResponse {
    pub fn new(endpoint: impl Into<String>, mean: Vec<f64>, var: Vec<f64>) -> Self {
        Self {
            endpoint: EndpointPart { endpoint: endpoint.into() },
            mean: MeanPart { mean },
            var: VarDiagPart { var },
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<Violation>,
}

/// One entry of the endpoint listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointDescription {
    pub name: String,
    pub path: String,
}
