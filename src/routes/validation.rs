use actix_web::{web, HttpResponse};
use serde_json::Value;

use crate::error::ApiError;
use crate::models::{Endpoint, EndpointDescription};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/endpoints", web::get().to(list_endpoints))
        .route("/validate/{endpoint}", web::post().to(validate_request))
        .route("/validate/{endpoint}/response", web::post().to(validate_response));
}

/// GET /endpoints
async fn list_endpoints() -> HttpResponse {
    let endpoints: Vec<EndpointDescription> = Endpoint::ALL
        .iter()
        .map(|endpoint| EndpointDescription {
            name: endpoint.name().to_string(),
            path: endpoint.path().to_string(),
        })
        .collect();
    HttpResponse::Ok().json(endpoints)
}

/// POST /validate/{endpoint}
///
/// Returns the request with static defaults applied. Dynamic defaults
/// (optimizer settings, hyperparameters) stay absent.
async fn validate_request(
    path: web::Path<String>,
    body: web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    let endpoint: Endpoint = path.into_inner().parse()?;
    match endpoint.normalize_request(body.into_inner()) {
        Ok(normalized) => {
            tracing::debug!("Validated {} request", endpoint);
            Ok(HttpResponse::Ok().json(normalized))
        }
        Err(err) => {
            tracing::info!("Rejected {} request: {} violation(s)", endpoint, err.violations().len());
            Err(err.into())
        }
    }
}

/// POST /validate/{endpoint}/response
async fn validate_response(
    path: web::Path<String>,
    body: web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    let endpoint: Endpoint = path.into_inner().parse()?;
    match endpoint.normalize_response(body.into_inner()) {
        Ok(normalized) => {
            tracing::debug!("Validated {} response", endpoint);
            Ok(HttpResponse::Ok().json(normalized))
        }
        Err(err) => {
            tracing::info!("Rejected {} response: {} violation(s)", endpoint, err.violations().len());
            Err(err.into())
        }
    }
}
