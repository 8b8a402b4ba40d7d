//! Resolution of the defaults a schema cannot know statically.
//!
//! The optimizer type, its multistart and random-sample counts, its parameter
//! block and the covariance hyperparameters all depend on which objective is
//! being optimized. Requests leave them as `None`; these functions are called
//! by the computation side once the objective is known. The validator never
//! calls them.
//!
//! `domain_info.dim` is only checked for sign by the schemas, so the
//! dimension is cross-checked against the coordinates a request carries
//! before anything is sized from it.

use crate::constants::{LikelihoodType, OptimizerType, MAX_DEFAULTED_DIMENSION};
use crate::error::{Constraint, ValidationError, Violation};
use crate::models::domain::CovarianceInfo;
use crate::models::optimizer::{
    GradientDescentParameters, NewtonParameters, NullParameters, OptimizerInfo, OptimizerParameters,
};

/// What a multistart optimizer is maximizing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Objective {
    /// Closed-form EI; one point to sample and none in flight.
    ExpectedImprovementAnalytic,
    /// Monte-Carlo EI over several points.
    ExpectedImprovementMonteCarlo,
    Likelihood(LikelihoodType),
}

impl Objective {
    /// EI flavor used by `gp_next_points_epi`.
    pub fn for_next_points(num_to_sample: i64, points_being_sampled: &[Vec<f64>]) -> Self {
        if num_to_sample == 1 && points_being_sampled.is_empty() {
            Objective::ExpectedImprovementAnalytic
        } else {
            Objective::ExpectedImprovementMonteCarlo
        }
    }

    pub fn default_optimizer_type(&self) -> OptimizerType {
        match self {
            Objective::Likelihood(LikelihoodType::LogMarginalLikelihood) => OptimizerType::NewtonOptimizer,
            _ => OptimizerType::GradientDescentOptimizer,
        }
    }

    /// Newton needs a Hessian, which only the log marginal likelihood provides.
    pub fn supports(&self, optimizer_type: OptimizerType) -> bool {
        match optimizer_type {
            OptimizerType::NewtonOptimizer => {
                *self == Objective::Likelihood(LikelihoodType::LogMarginalLikelihood)
            }
            _ => true,
        }
    }

    fn default_num_multistarts(&self, optimizer_type: OptimizerType) -> i64 {
        match (optimizer_type, self) {
            (OptimizerType::NullOptimizer, _) => 1,
            (OptimizerType::NewtonOptimizer, _) => 200,
            (_, Objective::ExpectedImprovementAnalytic) => 600,
            (_, Objective::ExpectedImprovementMonteCarlo) => 200,
            (_, Objective::Likelihood(_)) => 400,
        }
    }

    fn default_num_random_samples(&self) -> i64 {
        match self {
            Objective::Likelihood(_) => 300,
            _ => 4000,
        }
    }

    fn default_parameters(&self, optimizer_type: OptimizerType) -> OptimizerParameters {
        match optimizer_type {
            OptimizerType::NullOptimizer => OptimizerParameters::Null(NullParameters {}),
            OptimizerType::NewtonOptimizer => OptimizerParameters::Newton(NewtonParameters {
                max_num_steps: 100,
                gamma: 1.05,
                time_factor: 1.0e-2,
                max_relative_change: 1.0,
                tolerance: 1.0e-9,
            }),
            OptimizerType::GradientDescentOptimizer => {
                OptimizerParameters::GradientDescent(match self {
                    Objective::ExpectedImprovementAnalytic => gradient_descent(500, 4, 0, 0.6, 1.0, 1.0, 1.0e-7),
                    Objective::ExpectedImprovementMonteCarlo => gradient_descent(100, 2, 15, 0.7, 1.0, 0.7, 1.0e-5),
                    Objective::Likelihood(_) => gradient_descent(400, 10, 10, 0.7, 1.0, 0.7, 1.0e-7),
                })
            }
        }
    }
}

fn gradient_descent(
    max_num_steps: i64,
    max_num_restarts: i64,
    num_steps_averaged: i64,
    gamma: f64,
    pre_mult: f64,
    max_relative_change: f64,
    tolerance: f64,
) -> GradientDescentParameters {
    GradientDescentParameters {
        max_num_steps,
        max_num_restarts,
        num_steps_averaged,
        gamma,
        pre_mult,
        max_relative_change,
        tolerance,
    }
}

/// Optimizer settings with every sentinel filled in
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOptimizer {
    pub optimizer_type: OptimizerType,
    pub num_multistarts: i64,
    pub num_random_samples: i64,
    pub parameters: OptimizerParameters,
}

/// Fill in whatever `info` leaves open for `objective`.
///
/// An explicit parameter block is validated against the schema of the
/// resolved optimizer type before it is used.
pub fn resolve_optimizer(
    info: &OptimizerInfo,
    objective: Objective,
) -> Result<ResolvedOptimizer, ValidationError> {
    let optimizer_type = info
        .optimizer_type
        .unwrap_or_else(|| objective.default_optimizer_type());

    if !objective.supports(optimizer_type) {
        return Err(ValidationError::single(Violation::new(
            "optimizer_info.optimizer_type",
            Constraint::InvalidValue,
            format!("{} is not supported for {:?}", optimizer_type, objective),
        )));
    }

    let parameters = match info.parameters_for(optimizer_type)? {
        Some(parameters) => parameters,
        None => objective.default_parameters(optimizer_type),
    };

    Ok(ResolvedOptimizer {
        optimizer_type,
        num_multistarts: info
            .num_multistarts
            .unwrap_or_else(|| objective.default_num_multistarts(optimizer_type)),
        num_random_samples: info
            .num_random_samples
            .unwrap_or_else(|| objective.default_num_random_samples()),
        parameters,
    })
}

/// Dimension of a request, checked against every coordinate count it carries.
///
/// `declared` is the domain's `dim` when one was sent; otherwise the first
/// witness sets the dimension. Each witness is a payload path and the number
/// of coordinates found there. With neither, the dimension is 0.
pub fn resolve_dimension<I>(declared: Option<usize>, witnesses: I) -> Result<usize, ValidationError>
where
    I: IntoIterator<Item = (String, usize)>,
{
    let mut witnesses = witnesses.into_iter();
    let dim = match declared.or_else(|| witnesses.next().map(|(_, len)| len)) {
        Some(dim) => dim,
        None => return Ok(0),
    };

    let violations = witnesses
        .filter(|(_, len)| *len != dim)
        .map(|(path, len)| {
            Violation::new(
                path,
                Constraint::InvalidValue,
                format!("has {} coordinate(s), domain has {}", len, dim),
            )
        })
        .collect();
    ValidationError::check(violations).map(|()| dim)
}

/// Hyperparameters to use for `covariance_info` over a `dim`-dimensional domain.
///
/// Absent hyperparameters default to one per kernel parameter, all equal to 1.
/// Defaults are refused above [`MAX_DEFAULTED_DIMENSION`].
pub fn resolve_hyperparameters(covariance_info: &CovarianceInfo, dim: usize) -> Result<Vec<f64>, ValidationError> {
    if let Some(values) = covariance_info.hyperparameter_values() {
        return Ok(values);
    }
    if dim > MAX_DEFAULTED_DIMENSION {
        return Err(ValidationError::single(Violation::new(
            "covariance_info.hyperparameters",
            Constraint::InvalidValue,
            format!(
                "no default for a {}-dimensional domain (at most {}); send hyperparameters explicitly",
                dim, MAX_DEFAULTED_DIMENSION
            ),
        )));
    }
    Ok(vec![1.0; covariance_info.covariance_type.num_hyperparameters(dim)])
}
