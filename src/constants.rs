//! Enumerations and default constants shared by every schema.
//!
//! String values are part of the wire contract and must not change.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default number of threads handed to the computation layer.
pub const DEFAULT_MAX_NUM_THREADS: i64 = 4;
/// Upper bound accepted for `max_num_threads`.
pub const MAX_ALLOWED_NUM_THREADS: i64 = 10000;
/// Largest domain dimension for which default hyperparameters are generated.
pub const MAX_DEFAULTED_DIMENSION: usize = 10000;
/// Default number of Monte-Carlo iterations for expected improvement.
pub const DEFAULT_EXPECTED_IMPROVEMENT_MC_ITERATIONS: i64 = 10000;

/// Default noise variance attached to the constant liar's lie.
pub const DEFAULT_CONSTANT_LIAR_LIE_NOISE_VARIANCE: f64 = 1.0e-12;
/// Default noise variance used by kriging believer.
pub const DEFAULT_KRIGING_NOISE_VARIANCE: f64 = 1.0e-8;
/// Default number of standard deviations kriging adds to the mean.
pub const DEFAULT_KRIGING_STD_DEVIATION_COEF: f64 = 0.0;

/// Domain shapes the optimizer can search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DomainType {
    #[default]
    TensorProduct,
    SimplexIntersectTensorProduct,
}

/// Covariance kernels known to the GP layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CovarianceType {
    #[default]
    SquareExponential,
}

impl CovarianceType {
    /// Number of hyperparameters the kernel takes over a `dim`-dimensional domain.
    pub fn num_hyperparameters(&self, dim: usize) -> usize {
        match self {
            // signal variance plus one length scale per dimension
            CovarianceType::SquareExponential => dim + 1,
        }
    }
}

/// Local optimizers available to the multistart driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizerType {
    NullOptimizer,
    NewtonOptimizer,
    GradientDescentOptimizer,
}

impl OptimizerType {
    pub const ALL: [OptimizerType; 3] = [
        OptimizerType::NullOptimizer,
        OptimizerType::NewtonOptimizer,
        OptimizerType::GradientDescentOptimizer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OptimizerType::NullOptimizer => "null_optimizer",
            OptimizerType::NewtonOptimizer => "newton_optimizer",
            OptimizerType::GradientDescentOptimizer => "gradient_descent_optimizer",
        }
    }
}

impl fmt::Display for OptimizerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Objective used when tuning hyperparameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LikelihoodType {
    #[default]
    LogMarginalLikelihood,
    LeaveOneOutLogLikelihood,
}

/// How the constant liar picks its lie when no explicit value is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConstantLiarMethod {
    #[default]
    ConstantLiarMin,
    ConstantLiarMax,
    ConstantLiarMean,
}
