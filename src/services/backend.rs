use thiserror::Error;

use crate::core::defaults::ResolvedOptimizer;
use crate::models::requests::{
    GpEiRequest, GpHyperOptRequest, GpMeanVarRequest, GpNextPointsConstantLiarRequest,
    GpNextPointsKrigingRequest, GpNextPointsRequest,
};

/// Errors a computation backend can report
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    /// The payload was well-formed but the backend cannot use it
    /// (e.g. point dimensions disagree with the domain).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Computation failed: {0}")]
    Computation(String),
}

/// Raw result of a next-points search
#[derive(Debug, Clone, PartialEq)]
pub struct NextPointsOutcome {
    pub points_to_sample: Vec<Vec<f64>>,
    pub expected_improvement: f64,
    pub found_update: bool,
}

/// Raw result of a hyperparameter optimization
#[derive(Debug, Clone, PartialEq)]
pub struct HyperOptOutcome {
    pub hyperparameters: Vec<f64>,
    pub log_likelihood: f64,
    pub grad_log_likelihood: Vec<f64>,
    pub found_update: bool,
}

/// Posterior mean and full covariance at the requested points
#[derive(Debug, Clone, PartialEq)]
pub struct MeanVarOutcome {
    pub mean: Vec<f64>,
    pub var: Vec<Vec<f64>>,
}

/// The GP computation layer
///
/// Requests arrive validated and with static defaults applied. The dynamic
/// defaults are already resolved and passed alongside: `optimizer` for the
/// searches, `hyperparameters` for the covariance. Methods are blocking and
/// are run on actix's blocking pool.
pub trait GpBackend: Send + Sync {
    fn next_points_epi(
        &self,
        request: &GpNextPointsRequest,
        optimizer: &ResolvedOptimizer,
        hyperparameters: &[f64],
    ) -> Result<NextPointsOutcome, BackendError>;

    fn next_points_constant_liar(
        &self,
        request: &GpNextPointsConstantLiarRequest,
        optimizer: &ResolvedOptimizer,
        hyperparameters: &[f64],
    ) -> Result<NextPointsOutcome, BackendError>;

    fn next_points_kriging(
        &self,
        request: &GpNextPointsKrigingRequest,
        optimizer: &ResolvedOptimizer,
        hyperparameters: &[f64],
    ) -> Result<NextPointsOutcome, BackendError>;

    fn hyper_opt(
        &self,
        request: &GpHyperOptRequest,
        optimizer: &ResolvedOptimizer,
        hyperparameters: &[f64],
    ) -> Result<HyperOptOutcome, BackendError>;

    fn mean_var(
        &self,
        request: &GpMeanVarRequest,
        hyperparameters: &[f64],
    ) -> Result<MeanVarOutcome, BackendError>;

    /// One expected-improvement value per point to evaluate.
    fn expected_improvement(
        &self,
        request: &GpEiRequest,
        hyperparameters: &[f64],
    ) -> Result<Vec<f64>, BackendError>;
}

impl MeanVarOutcome {
    /// One mean per point and a `num_points` x `num_points` covariance.
    pub fn check_shape(&self, num_points: usize) -> Result<(), BackendError> {
        if self.mean.len() != num_points {
            return Err(BackendError::Computation(format!(
                "posterior mean has {} entries for {} point(s)",
                self.mean.len(),
                num_points
            )));
        }
        if self.var.len() != num_points {
            return Err(BackendError::Computation(format!(
                "posterior covariance has {} rows for {} point(s)",
                self.var.len(),
                num_points
            )));
        }
        self.check_square()
    }

    /// Diagonal of the covariance matrix.
    pub fn var_diag(&self) -> Result<Vec<f64>, BackendError> {
        self.check_square()?;
        Ok(self.var.iter().enumerate().map(|(i, row)| row[i]).collect())
    }

    fn check_square(&self) -> Result<(), BackendError> {
        let n = self.var.len();
        match self.var.iter().position(|row| row.len() != n) {
            Some(i) => Err(BackendError::Computation(format!(
                "posterior covariance row {} has {} entries, expected {}",
                i,
                self.var[i].len(),
                n
            ))),
            None => Ok(()),
        }
    }
}
