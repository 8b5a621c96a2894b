//! Submission data models and DTOs.
//!
//! Re-exports submission models from the `schoolyard-models` crate.

pub use schoolyard_models::submissions::*;
