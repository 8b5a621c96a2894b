//! Academic year data models and DTOs.
//!
//! Re-exports the shared models from `schoolyard-models`.

pub use schoolyard_models::academic_years::*;
pub use schoolyard_models::terms::*;
