use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::core::validation::normalize;
use crate::error::{ApiError, ValidationError};
use crate::models::requests::{
    GpEiRequest, GpHyperOptRequest, GpMeanVarRequest, GpNextPointsConstantLiarRequest,
    GpNextPointsKrigingRequest, GpNextPointsRequest,
};
use crate::models::responses::{
    GpEiResponse, GpHyperOptResponse, GpMeanResponse, GpMeanVarDiagResponse, GpMeanVarResponse,
    GpNextPointsResponse, GpVarDiagResponse, GpVarResponse,
};

/// Every endpoint the service exposes, with its request and response schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    NextPointsEpi,
    NextPointsConstantLiar,
    NextPointsKriging,
    HyperOpt,
    MeanVar,
    MeanVarDiag,
    Mean,
    Var,
    VarDiag,
    Ei,
}

impl Endpoint {
    pub const ALL: [Endpoint; 10] = [
        Endpoint::NextPointsEpi,
        Endpoint::NextPointsConstantLiar,
        Endpoint::NextPointsKriging,
        Endpoint::HyperOpt,
        Endpoint::MeanVar,
        Endpoint::MeanVarDiag,
        Endpoint::Mean,
        Endpoint::Var,
        Endpoint::VarDiag,
        Endpoint::Ei,
    ];

    /// Name echoed in every response's `endpoint` field.
    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::NextPointsEpi => "gp_next_points_epi",
            Endpoint::NextPointsConstantLiar => "gp_next_points_constant_liar",
            Endpoint::NextPointsKriging => "gp_next_points_kriging",
            Endpoint::HyperOpt => "gp_hyper_opt",
            Endpoint::MeanVar => "gp_mean_var",
            Endpoint::MeanVarDiag => "gp_mean_var_diag",
            Endpoint::Mean => "gp_mean",
            Endpoint::Var => "gp_var",
            Endpoint::VarDiag => "gp_var_diag",
            Endpoint::Ei => "gp_ei",
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::NextPointsEpi => "/gp/next_points/epi",
            Endpoint::NextPointsConstantLiar => "/gp/next_points/constant_liar",
            Endpoint::NextPointsKriging => "/gp/next_points/kriging",
            Endpoint::HyperOpt => "/gp/hyper_opt",
            Endpoint::MeanVar => "/gp/mean_var",
            Endpoint::MeanVarDiag => "/gp/mean_var_diag",
            Endpoint::Mean => "/gp/mean",
            Endpoint::Var => "/gp/var",
            Endpoint::VarDiag => "/gp/var_diag",
            Endpoint::Ei => "/gp/ei",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|endpoint| endpoint.name() == name)
    }

    /// Validate a request body for this endpoint and return it with static defaults applied.
    pub fn normalize_request(&self, payload: Value) -> Result<Value, ValidationError> {
        match self {
            Endpoint::NextPointsEpi => normalize::<GpNextPointsRequest>(payload),
            Endpoint::NextPointsConstantLiar => normalize::<GpNextPointsConstantLiarRequest>(payload),
            Endpoint::NextPointsKriging => normalize::<GpNextPointsKrigingRequest>(payload),
            Endpoint::HyperOpt => normalize::<GpHyperOptRequest>(payload),
            Endpoint::MeanVar
            | Endpoint::MeanVarDiag
            | Endpoint::Mean
            | Endpoint::Var
            | Endpoint::VarDiag => normalize::<GpMeanVarRequest>(payload),
            Endpoint::Ei => normalize::<GpEiRequest>(payload),
        }
    }

    /// Validate a response body for this endpoint.
    pub fn normalize_response(&self, payload: Value) -> Result<Value, ValidationError> {
        match self {
            Endpoint::NextPointsEpi | Endpoint::NextPointsConstantLiar | Endpoint::NextPointsKriging => {
                normalize::<GpNextPointsResponse>(payload)
            }
            Endpoint::HyperOpt => normalize::<GpHyperOptResponse>(payload),
            Endpoint::MeanVar => normalize::<GpMeanVarResponse>(payload),
            Endpoint::MeanVarDiag => normalize::<GpMeanVarDiagResponse>(payload),
            Endpoint::Mean => normalize::<GpMeanResponse>(payload),
            Endpoint::Var => normalize::<GpVarResponse>(payload),
            Endpoint::VarDiag => normalize::<GpVarDiagResponse>(payload),
            Endpoint::Ei => normalize::<GpEiResponse>(payload),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Endpoint {
    type Err = ApiError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::from_name(name).ok_or_else(|| ApiError::UnknownEndpoint(name.to_string()))
    }
}
