//! # Schoolyard Core
//!
//! Core types, errors, and utilities shared by every Schoolyard crate.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`pagination`]: Pagination utilities for list endpoints
//! - [`serde`]: Custom serde helpers for query strings
//!
//! # Example
//!
//! ```ignore
//! use schoolyard_core::errors::AppError;
//! use schoolyard_core::pagination::{PaginationMeta, PaginationParams};
//!
//! let error = AppError::not_found(anyhow::anyhow!("Student not found"));
//!
//! let params = PaginationParams::default();
//! let meta = PaginationMeta::for_offset(&params, 42);
//! ```

pub mod errors;
pub mod pagination;
pub mod serde;

// Re-export commonly used types at crate root
pub use errors::AppError;
pub use pagination::{PaginationMeta, PaginationParams};
