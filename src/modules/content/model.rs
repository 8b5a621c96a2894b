//! Content data models and DTOs.
//!
//! Re-exports content models from the `schoolyard-models` crate.

pub use schoolyard_models::content::*;
