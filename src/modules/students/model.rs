//! Student data models and DTOs.
//!
//! Re-exports student models from the `schoolyard-models` crate.

pub use schoolyard_models::students::*;
