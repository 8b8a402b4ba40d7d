// Model exports
pub mod domain;
pub mod endpoints;
pub mod optimizer;
pub mod requests;
pub mod responses;

pub use domain::{BoundedDomainInfo, CovarianceInfo, DomainCoordinate, DomainInfo, GpHistoricalInfo, SampledPoint};
pub use endpoints::Endpoint;
pub use optimizer::{
    GradientDescentParameters, NewtonParameters, NullParameters, OptimizerInfo, OptimizerParameters,
};
pub use requests::{
    ConstantLiarInfo, GpEiRequest, GpHyperOptRequest, GpMeanVarRequest, GpNextPointsConstantLiarRequest,
    GpNextPointsKrigingRequest, GpNextPointsRequest, KrigingInfo,
};
pub use responses::{
    EndpointDescription, ErrorResponse, GpEiResponse, GpHyperOptResponse, GpHyperOptStatus, GpMeanResponse,
    GpMeanVarDiagResponse, GpMeanVarResponse, GpNextPointsResponse, GpNextPointsStatus, GpVarDiagResponse,
    GpVarResponse, HealthResponse, OptimizerSuccess,
};
