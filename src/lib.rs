//! GP Contracts - request/response validation for a Gaussian Process optimization service
//!
//! Every payload exchanged with the GP endpoints is checked against a closed
//! schema before any computation runs: unknown keys, wrong types, values
//! outside an enumeration and out-of-range numbers are all rejected with the
//! offending path. Static defaults are applied during validation; defaults
//! that depend on the optimization objective are left for
//! [`core::defaults`] to resolve.

pub mod config;
pub mod constants;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{normalize, validate, validate_str, PositiveFloat, Schema};
pub use error::{ApiError, Constraint, ValidationError, Violation};
pub use models::Endpoint;
