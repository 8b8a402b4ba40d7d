// Validation core exports
pub mod defaults;
pub mod primitives;
pub mod schema;
pub mod validation;

pub use defaults::{resolve_dimension, resolve_hyperparameters, resolve_optimizer, Objective, ResolvedOptimizer};
pub use primitives::PositiveFloat;
pub use schema::{Schema, SchemaFields};
pub use validation::{decode_at, normalize, validate, validate_str};
