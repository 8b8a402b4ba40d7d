use actix_web::{web, HttpResponse};
use serde_json::Value;
use std::sync::Arc;

use crate::core::defaults::{resolve_dimension, resolve_hyperparameters, resolve_optimizer, Objective};
use crate::core::primitives::PositiveFloat;
use crate::core::schema::Schema;
use crate::core::validation::validate;
use crate::error::{ApiError, Constraint, ValidationError, Violation};
use crate::models::{
    CovarianceInfo, Endpoint, GpEiRequest, GpHistoricalInfo, GpEiResponse, GpHyperOptRequest, GpHyperOptResponse,
    GpHyperOptStatus, GpMeanResponse, GpMeanVarDiagResponse, GpMeanVarRequest, GpMeanVarResponse,
    GpNextPointsConstantLiarRequest, GpNextPointsKrigingRequest, GpNextPointsRequest,
    GpNextPointsResponse, GpNextPointsStatus, GpVarDiagResponse, GpVarResponse, OptimizerSuccess,
};
use crate::services::{BackendError, GpBackend, MeanVarOutcome, NextPointsOutcome};

/// State for the compute routes
#[derive(Clone)]
pub struct GpState {
    pub backend: Arc<dyn GpBackend>,
}

impl GpState {
    pub fn new(backend: Arc<dyn GpBackend>) -> Self {
        Self { backend }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route(Endpoint::NextPointsEpi.path(), web::post().to(next_points_epi))
        .route(Endpoint::NextPointsConstantLiar.path(), web::post().to(next_points_constant_liar))
        .route(Endpoint::NextPointsKriging.path(), web::post().to(next_points_kriging))
        .route(Endpoint::HyperOpt.path(), web::post().to(hyper_opt))
        .route(Endpoint::MeanVar.path(), web::post().to(mean_var))
        .route(Endpoint::MeanVarDiag.path(), web::post().to(mean_var_diag))
        .route(Endpoint::Mean.path(), web::post().to(mean))
        .route(Endpoint::Var.path(), web::post().to(var))
        .route(Endpoint::VarDiag.path(), web::post().to(var_diag))
        .route(Endpoint::Ei.path(), web::post().to(expected_improvement));
}

/// POST /gp/next_points/epi
async fn next_points_epi(
    state: web::Data<GpState>,
    body: web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    let request: GpNextPointsRequest = validate_body(Endpoint::NextPointsEpi, body)?;
    let objective = Objective::for_next_points(request.num_to_sample, &request.points_being_sampled);
    let optimizer = resolve_optimizer(&request.optimizer_info, objective)?;
    let hyperparameters = next_points_hyperparameters(&request)?;

    let backend = state.backend.clone();
    let outcome = run_blocking(Endpoint::NextPointsEpi, move || {
        backend.next_points_epi(&request, &optimizer, &hyperparameters)
    })
    .await?;
    respond(Endpoint::NextPointsEpi, next_points_response(Endpoint::NextPointsEpi, outcome))
}

/// POST /gp/next_points/constant_liar
async fn next_points_constant_liar(
    state: web::Data<GpState>,
    body: web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    let request: GpNextPointsConstantLiarRequest = validate_body(Endpoint::NextPointsConstantLiar, body)?;
    // Each lie-augmented point is chosen by single-point EI.
    let optimizer = resolve_optimizer(&request.base.optimizer_info, Objective::ExpectedImprovementAnalytic)?;
    let hyperparameters = next_points_hyperparameters(&request.base)?;

    let backend = state.backend.clone();
    let outcome = run_blocking(Endpoint::NextPointsConstantLiar, move || {
        backend.next_points_constant_liar(&request, &optimizer, &hyperparameters)
    })
    .await?;
    respond(
        Endpoint::NextPointsConstantLiar,
        next_points_response(Endpoint::NextPointsConstantLiar, outcome),
    )
}

/// POST /gp/next_points/kriging
async fn next_points_kriging(
    state: web::Data<GpState>,
    body: web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    let request: GpNextPointsKrigingRequest = validate_body(Endpoint::NextPointsKriging, body)?;
    let optimizer = resolve_optimizer(&request.base.optimizer_info, Objective::ExpectedImprovementAnalytic)?;
    let hyperparameters = next_points_hyperparameters(&request.base)?;

    let backend = state.backend.clone();
    let outcome = run_blocking(Endpoint::NextPointsKriging, move || {
        backend.next_points_kriging(&request, &optimizer, &hyperparameters)
    })
    .await?;
    respond(
        Endpoint::NextPointsKriging,
        next_points_response(Endpoint::NextPointsKriging, outcome),
    )
}

/// POST /gp/hyper_opt
async fn hyper_opt(
    state: web::Data<GpState>,
    body: web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    let request: GpHyperOptRequest = validate_body(Endpoint::HyperOpt, body)?;
    let optimizer = resolve_optimizer(
        &request.optimizer_info,
        Objective::Likelihood(request.log_likelihood_info),
    )?;
    let dim = resolve_dimension(
        Some(request.domain_info.dimension()),
        sampled_lengths(&request.gp_historical_info),
    )?;
    let hyperparameters = resolve_hyperparameters(&request.covariance_info, dim)?;
    let covariance_type = request.covariance_info.covariance_type;

    let backend = state.backend.clone();
    let outcome = run_blocking(Endpoint::HyperOpt, move || {
        backend.hyper_opt(&request, &optimizer, &hyperparameters)
    })
    .await?;

    let hyperparameters = outcome
        .hyperparameters
        .iter()
        .enumerate()
        .map(|(i, value)| {
            PositiveFloat::new(*value).map_err(|err| {
                Violation::new(
                    format!("covariance_info.hyperparameters[{}]", i),
                    Constraint::OutOfRange,
                    err.to_string(),
                )
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map_err(|violation| invalid_response(Endpoint::HyperOpt, ValidationError::single(violation)))?;

    respond(
        Endpoint::HyperOpt,
        GpHyperOptResponse {
            endpoint: Endpoint::HyperOpt.name().to_string(),
            covariance_info: CovarianceInfo {
                covariance_type,
                hyperparameters: Some(hyperparameters),
            },
            status: GpHyperOptStatus {
                log_likelihood: outcome.log_likelihood,
                grad_log_likelihood: outcome.grad_log_likelihood,
                optimizer_success: OptimizerSuccess::found_update(outcome.found_update),
            },
        },
    )
}

/// POST /gp/mean_var
async fn mean_var(state: web::Data<GpState>, body: web::Json<Value>) -> Result<HttpResponse, ApiError> {
    let outcome = compute_mean_var(Endpoint::MeanVar, &state, body).await?;
    respond(
        Endpoint::MeanVar,
        GpMeanVarResponse::new(Endpoint::MeanVar.name(), outcome.mean, outcome.var),
    )
}

/// POST /gp/mean_var_diag
async fn mean_var_diag(state: web::Data<GpState>, body: web::Json<Value>) -> Result<HttpResponse, ApiError> {
    let outcome = compute_mean_var(Endpoint::MeanVarDiag, &state, body).await?;
    let diag = outcome.var_diag()?;
    respond(
        Endpoint::MeanVarDiag,
        GpMeanVarDiagResponse::new(Endpoint::MeanVarDiag.name(), outcome.mean, diag),
    )
}

/// POST /gp/mean
async fn mean(state: web::Data<GpState>, body: web::Json<Value>) -> Result<HttpResponse, ApiError> {
    let outcome = compute_mean_var(Endpoint::Mean, &state, body).await?;
    respond(Endpoint::Mean, GpMeanResponse::new(Endpoint::Mean.name(), outcome.mean))
}

/// POST /gp/var
async fn var(state: web::Data<GpState>, body: web::Json<Value>) -> Result<HttpResponse, ApiError> {
    let outcome = compute_mean_var(Endpoint::Var, &state, body).await?;
    respond(Endpoint::Var, GpVarResponse::new(Endpoint::Var.name(), outcome.var))
}

/// POST /gp/var_diag
async fn var_diag(state: web::Data<GpState>, body: web::Json<Value>) -> Result<HttpResponse, ApiError> {
    let outcome = compute_mean_var(Endpoint::VarDiag, &state, body).await?;
    respond(
        Endpoint::VarDiag,
        GpVarDiagResponse::new(Endpoint::VarDiag.name(), outcome.var_diag()?),
    )
}

/// POST /gp/ei
async fn expected_improvement(
    state: web::Data<GpState>,
    body: web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    let request: GpEiRequest = validate_body(Endpoint::Ei, body)?;
    let dim = resolve_dimension(
        request.domain_info.as_ref().map(|domain| domain.dimension()),
        sampled_lengths(&request.gp_historical_info)
            .chain(point_lengths("points_to_evaluate", &request.points_to_evaluate))
            .chain(point_lengths("points_being_sampled", &request.points_being_sampled)),
    )?;
    let hyperparameters = resolve_hyperparameters(&request.covariance_info, dim)?;

    let backend = state.backend.clone();
    let values = run_blocking(Endpoint::Ei, move || {
        backend.expected_improvement(&request, &hyperparameters)
    })
    .await?;
    respond(
        Endpoint::Ei,
        GpEiResponse {
            endpoint: Endpoint::Ei.name().to_string(),
            expected_improvement: values,
        },
    )
}

async fn compute_mean_var(
    endpoint: Endpoint,
    state: &web::Data<GpState>,
    body: web::Json<Value>,
) -> Result<MeanVarOutcome, ApiError> {
    let request: GpMeanVarRequest = validate_body(endpoint, body)?;
    let dim = resolve_dimension(
        request.domain_info.as_ref().map(|domain| domain.dimension()),
        sampled_lengths(&request.gp_historical_info)
            .chain(point_lengths("points_to_sample", &request.points_to_sample)),
    )?;
    let hyperparameters = resolve_hyperparameters(&request.covariance_info, dim)?;
    let num_points = request.points_to_sample.len();

    let backend = state.backend.clone();
    let outcome = run_blocking(endpoint, move || backend.mean_var(&request, &hyperparameters)).await?;
    outcome.check_shape(num_points).map_err(|err| {
        tracing::error!("Backend returned a malformed posterior for {}: {}", endpoint, err);
        ApiError::Backend(err)
    })?;
    Ok(outcome)
}

/// Hyperparameters for a next-points search, once the domain agrees with the data.
fn next_points_hyperparameters(request: &GpNextPointsRequest) -> Result<Vec<f64>, ValidationError> {
    let domain = &request.domain_info;
    let dim = resolve_dimension(
        Some(domain.dimension()),
        std::iter::once(("domain_info.domain_bounds".to_string(), domain.domain_bounds.len()))
            .chain(sampled_lengths(&request.gp_historical_info))
            .chain(point_lengths("points_being_sampled", &request.points_being_sampled)),
    )?;
    resolve_hyperparameters(&request.covariance_info, dim)
}

fn sampled_lengths(info: &GpHistoricalInfo) -> impl Iterator<Item = (String, usize)> + '_ {
    info.points_sampled.iter().enumerate().map(|(i, sampled)| {
        (
            format!("gp_historical_info.points_sampled[{}].point", i),
            sampled.point.len(),
        )
    })
}

fn point_lengths<'a>(field: &'a str, points: &'a [Vec<f64>]) -> impl Iterator<Item = (String, usize)> + 'a {
    points
        .iter()
        .enumerate()
        .map(move |(i, point)| (format!("{}[{}]", field, i), point.len()))
}

fn next_points_response(endpoint: Endpoint, outcome: NextPointsOutcome) -> GpNextPointsResponse {
    GpNextPointsResponse {
        endpoint: endpoint.name().to_string(),
        points_to_sample: outcome.points_to_sample,
        status: GpNextPointsStatus {
            expected_improvement: outcome.expected_improvement,
            optimizer_success: OptimizerSuccess::found_update(outcome.found_update),
        },
    }
}

fn validate_body<T: Schema>(endpoint: Endpoint, body: web::Json<Value>) -> Result<T, ApiError> {
    validate(body.into_inner()).map_err(|err| {
        tracing::info!("Rejected {} request: {} violation(s)", endpoint, err.violations().len());
        ApiError::Validation(err)
    })
}

async fn run_blocking<T, F>(endpoint: Endpoint, compute: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, BackendError> + Send + 'static,
    T: Send + 'static,
{
    match web::block(compute).await {
        Ok(Ok(outcome)) => Ok(outcome),
        Ok(Err(err)) => {
            tracing::error!("Backend failed for {}: {}", endpoint, err);
            Err(ApiError::Backend(err))
        }
        Err(err) => {
            tracing::error!("Blocking pool failed for {}: {}", endpoint, err);
            Err(ApiError::Internal(err.to_string()))
        }
    }
}

/// Check the packaged response against its own schema before sending it.
fn respond<T: Schema>(endpoint: Endpoint, response: T) -> Result<HttpResponse, ApiError> {
    ValidationError::check(response.violations()).map_err(|err| invalid_response(endpoint, err))?;
    Ok(HttpResponse::Ok().json(response))
}

fn invalid_response(endpoint: Endpoint, err: ValidationError) -> ApiError {
    tracing::error!("Computed {} response failed validation: {}", endpoint, err);
    ApiError::InvalidResponse(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_next_points_dimension_must_match_bounds() {
        let request: GpNextPointsRequest = validate(json!({
            "gp_historical_info": {"points_sampled": [{"point": [0.0, 1.0], "value": 0.0}]},
            "domain_info": {"dim": 2, "domain_bounds": [{"min": 0.0, "max": 1.0}, {"min": 0.0, "max": 1.0}]},
        }))
        .unwrap();
        assert_eq!(next_points_hyperparameters(&request).unwrap(), vec![1.0, 1.0, 1.0]);

        let request: GpNextPointsRequest = validate(json!({
            "gp_historical_info": {"points_sampled": []},
            "domain_info": {"dim": i64::MAX, "domain_bounds": []},
        }))
        .unwrap();
        let err = next_points_hyperparameters(&request).unwrap_err();
        assert!(err.has_path("domain_info.domain_bounds"));
    }

    #[test]
    fn test_point_lengths_paths() {
        let points = vec![vec![0.5], vec![0.5, 0.5]];
        let found: Vec<(String, usize)> = point_lengths("points_to_sample", &points).collect();
        assert_eq!(
            found,
            vec![("points_to_sample[0]".to_string(), 1), ("points_to_sample[1]".to_string(), 2)]
        );
    }
}
