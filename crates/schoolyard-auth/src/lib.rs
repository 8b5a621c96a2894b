//! # Schoolyard Auth
//!
//! Bearer token claims and JWT utilities for the Schoolyard API.
//!
//! Tokens are issued by an external identity provider and only verified
//! here. [`create_access_token`] exists for the admin CLI and for tests.
//!
//! # Example
//!
//! ```ignore
//! use schoolyard_auth::{create_access_token, verify_token};
//! use schoolyard_config::JwtConfig;
//! use schoolyard_models::UserRole;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token(user_id, "teacher@school.test", UserRole::Teacher, &config)?;
//! let claims = verify_token(&token, &config)?;
//! assert!(claims.role.is_staff());
//! ```

pub mod claims;
pub mod jwt;

pub use claims::Claims;
pub use jwt::{create_access_token, verify_token};
