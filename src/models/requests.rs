use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::constants::{
    ConstantLiarMethod, LikelihoodType, DEFAULT_CONSTANT_LIAR_LIE_NOISE_VARIANCE,
    DEFAULT_EXPECTED_IMPROVEMENT_MC_ITERATIONS, DEFAULT_KRIGING_NOISE_VARIANCE,
    DEFAULT_KRIGING_STD_DEVIATION_COEF, DEFAULT_MAX_NUM_THREADS,
};
use crate::core::schema::{composed_schema, leaf_schema, SchemaFields};
use crate::models::domain::{BoundedDomainInfo, CovarianceInfo, DomainInfo, GpHistoricalInfo};
use crate::models::optimizer::OptimizerInfo;

// `max_num_threads` is bounded by MAX_ALLOWED_NUM_THREADS; the literal is
// pinned to the constant by the tests below.

/// Request for `gp_next_points_epi`, and the shared part of every
/// `gp_next_points_*` request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct GpNextPointsRequest {
    #[serde(default = "default_num_to_sample")]
    #[validate(range(min = 1))]
    pub num_to_sample: i64,
    #[serde(default = "default_mc_iterations")]
    #[validate(range(min = 1))]
    pub mc_iterations: i64,
    #[serde(default = "default_max_num_threads")]
    #[validate(range(min = 1, max = 10000))]
    pub max_num_threads: i64,
    #[validate(nested)]
    pub gp_historical_info: GpHistoricalInfo,
    #[validate(nested)]
    pub domain_info: BoundedDomainInfo,
    #[serde(default)]
    pub covariance_info: CovarianceInfo,
    #[serde(default)]
    #[validate(nested)]
    pub optimizer_info: OptimizerInfo,
    #[serde(default)]
    pub points_being_sampled: Vec<Vec<f64>>,
}

impl SchemaFields for GpNextPointsRequest {
    const FIELDS: &'static [&'static str] = &[
        "num_to_sample",
        "mc_iterations",
        "max_num_threads",
        "gp_historical_info",
        "domain_info",
        "covariance_info",
        "optimizer_info",
        "points_being_sampled",
    ];
}

/// Fields the constant liar heuristic adds to a next-points request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ConstantLiarInfo {
    #[serde(default)]
    pub lie_method: ConstantLiarMethod,
    /// Explicit lie; overrides `lie_method` when present.
    #[serde(default)]
    pub lie_value: Option<f64>,
    #[serde(default = "default_lie_noise_variance")]
    #[validate(range(min = 0.0))]
    pub lie_noise_variance: f64,
}

impl SchemaFields for ConstantLiarInfo {
    const FIELDS: &'static [&'static str] = &["lie_method", "lie_value", "lie_noise_variance"];
}

/// Fields kriging believer adds to a next-points request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct KrigingInfo {
    #[serde(default = "default_kriging_std_deviation_coef")]
    pub std_deviation_coef: f64,
    #[serde(default = "default_kriging_noise_variance")]
    #[validate(range(min = 0.0))]
    pub kriging_noise_variance: f64,
}

impl SchemaFields for KrigingInfo {
    const FIELDS: &'static [&'static str] = &["std_deviation_coef", "kriging_noise_variance"];
}

composed_schema! {
    /// Request for `gp_next_points_constant_liar`
    pub struct GpNextPointsConstantLiarRequest {
        pub base: GpNextPointsRequest,
        pub liar: ConstantLiarInfo,
    }
}

composed_schema! {
    /// Request for `gp_next_points_kriging`
    pub struct GpNextPointsKrigingRequest {
        pub base: GpNextPointsRequest,
        pub kriging: KrigingInfo,
    }
}

/// Request for `gp_hyper_opt`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct GpHyperOptRequest {
    #[serde(default = "default_max_num_threads")]
    #[validate(range(min = 1, max = 10000))]
    pub max_num_threads: i64,
    #[validate(nested)]
    pub gp_historical_info: GpHistoricalInfo,
    #[validate(nested)]
    pub domain_info: DomainInfo,
    /// Starting point for the optimization.
    #[serde(default)]
    pub covariance_info: CovarianceInfo,
    #[validate(nested)]
    pub hyperparameter_domain_info: BoundedDomainInfo,
    #[serde(default)]
    #[validate(nested)]
    pub optimizer_info: OptimizerInfo,
    #[serde(default)]
    pub log_likelihood_info: LikelihoodType,
}

impl SchemaFields for GpHyperOptRequest {
    const FIELDS: &'static [&'static str] = &[
        "max_num_threads",
        "gp_historical_info",
        "domain_info",
        "covariance_info",
        "hyperparameter_domain_info",
        "optimizer_info",
        "log_likelihood_info",
    ];
}

/// Request shared by `gp_mean_var` and its mean/variance variants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct GpMeanVarRequest {
    pub points_to_sample: Vec<Vec<f64>>,
    #[validate(nested)]
    pub gp_historical_info: GpHistoricalInfo,
    #[serde(default)]
    #[validate(nested)]
    pub domain_info: Option<DomainInfo>,
    #[serde(default)]
    pub covariance_info: CovarianceInfo,
}

impl SchemaFields for GpMeanVarRequest {
    const FIELDS: &'static [&'static str] = &[
        "points_to_sample",
        "gp_historical_info",
        "domain_info",
        "covariance_info",
    ];
}

/// Request for `gp_ei`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct GpEiRequest {
    pub points_to_evaluate: Vec<Vec<f64>>,
    #[serde(default)]
    pub points_being_sampled: Vec<Vec<f64>>,
    #[serde(default = "default_mc_iterations")]
    #[validate(range(min = 1))]
    pub mc_iterations: i64,
    #[serde(default = "default_max_num_threads")]
    #[validate(range(min = 1, max = 10000))]
    pub max_num_threads: i64,
    #[validate(nested)]
    pub gp_historical_info: GpHistoricalInfo,
    #[serde(default)]
    #[validate(nested)]
    pub domain_info: Option<DomainInfo>,
    #[serde(default)]
    pub covariance_info: CovarianceInfo,
}

impl SchemaFields for GpEiRequest {
    const FIELDS: &'static [&'static str] = &[
        "points_to_evaluate",
        "points_being_sampled",
        "mc_iterations",
        "max_num_threads",
        "gp_historical_info",
        "domain_info",
        "covariance_info",
    ];
}

leaf_schema!(
    GpNextPointsRequest,
    ConstantLiarInfo,
    KrigingInfo,
    GpHyperOptRequest,
    GpMeanVarRequest,
    GpEiRequest,
);

fn default_num_to_sample() -> i64 { 1 }
fn default_mc_iterations() -> i64 { DEFAULT_EXPECTED_IMPROVEMENT_MC_ITERATIONS }
fn default_max_num_threads() -> i64 { DEFAULT_MAX_NUM_THREADS }
fn default_lie_noise_variance() -> f64 { DEFAULT_CONSTANT_LIAR_LIE_NOISE_VARIANCE }
fn default_kriging_std_deviation_coef() -> f64 { DEFAULT_KRIGING_STD_DEVIATION_COEF }
fn default_kriging_noise_variance() -> f64 { DEFAULT_KRIGING_NOISE_VARIANCE }
