// Service exports
pub mod backend;

pub use backend::{BackendError, GpBackend, HyperOptOutcome, MeanVarOutcome, NextPointsOutcome};
