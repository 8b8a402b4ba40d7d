// Route exports
pub mod gp;
pub mod health;
pub mod validation;

use actix_web::{error, web, HttpRequest};

use crate::error::{ApiError, Constraint, ValidationError, Violation};

pub use gp::GpState;

/// Health, endpoint listing and validation-only routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(health::configure)
        .configure(validation::configure);
}

/// Compute routes; the app must provide `web::Data<GpState>`
pub fn configure_gp_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(gp::configure);
}

/// Turn body extraction failures into the same error shape as schema violations
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    ApiError::Validation(ValidationError::single(Violation::new(
        "",
        Constraint::Malformed,
        format!("invalid JSON: {}", err),
    )))
    .into()
}
