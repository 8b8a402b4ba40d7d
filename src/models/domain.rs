use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::constants::{CovarianceType, DomainType};
use crate::core::PositiveFloat;

/// A sampled point: coordinates, measured value and its noise variance
///
/// The coordinate count is not checked against the domain here; the compute
/// routes check it with [`crate::core::defaults::resolve_dimension`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct SampledPoint {
    pub point: Vec<f64>,
    pub value: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub value_var: f64,
}

/// Historical data the GP is conditioned on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct GpHistoricalInfo {
    #[validate(nested)]
    pub points_sampled: Vec<SampledPoint>,
}

impl GpHistoricalInfo {
    pub fn num_sampled(&self) -> usize {
        self.points_sampled.len()
    }
}

/// One closed interval of a tensor-product domain
///
/// `min <= max` is deliberately not enforced at this layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DomainCoordinate {
    pub min: f64,
    pub max: f64,
}

/// Domain description without bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct DomainInfo {
    #[serde(default)]
    pub domain_type: DomainType,
    #[validate(range(min = 0))]
    pub dim: i64,
}

impl DomainInfo {
    /// Validated dimension; a decoded `DomainInfo` never holds a negative one.
    pub fn dimension(&self) -> usize {
        usize::try_from(self.dim).unwrap_or(0)
    }
}

/// Domain description with one bound per dimension, used where a search happens
///
/// `domain_bounds.len()` is expected to equal `dim`; the schema does not
/// cross-check it, the compute routes do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct BoundedDomainInfo {
    #[serde(default)]
    pub domain_type: DomainType,
    #[validate(range(min = 0))]
    pub dim: i64,
    pub domain_bounds: Vec<DomainCoordinate>,
}

impl BoundedDomainInfo {
    pub fn dimension(&self) -> usize {
        usize::try_from(self.dim).unwrap_or(0)
    }

    /// The unbounded view of this domain.
    pub fn domain_info(&self) -> DomainInfo {
        DomainInfo {
            domain_type: self.domain_type,
            dim: self.dim,
        }
    }
}

/// Covariance kernel selection
///
/// `hyperparameters` stays `None` when omitted: the right default depends on
/// the kernel and the domain, so the computation layer fills it in (see
/// [`crate::core::defaults::resolve_hyperparameters`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct CovarianceInfo {
    #[serde(default)]
    pub covariance_type: CovarianceType,
    #[serde(default)]
    pub hyperparameters: Option<Vec<PositiveFloat>>,
}

impl CovarianceInfo {
    pub fn hyperparameter_values(&self) -> Option<Vec<f64>> {
        self.hyperparameters
            .as_ref()
            .map(|values| values.iter().map(|v| v.get()).collect())
    }
}
