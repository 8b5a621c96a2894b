//! # Schoolyard Config
//!
//! Configuration structures loaded from environment variables:
//!
//! - [`jwt`]: bearer token verification settings
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`grading`]: quiz auto-grading behaviour
//! - [`server`]: listener address
//!
//! Each config exposes `from_env()` plus a `from_lookup()` constructor that
//! takes any `Fn(&str) -> Option<String>`, so parsing can be tested without
//! touching the process environment.
//!
//! # Example
//!
//! ```ignore
//! use schoolyard_config::{CorsConfig, GradingConfig, JwtConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let cors_config = CorsConfig::from_env();
//! let grading_config = GradingConfig::from_env();
//! ```

pub mod cors;
pub mod grading;
pub mod jwt;
pub mod server;

// Re-export commonly used types at crate root
pub use cors::CorsConfig;
pub use grading::GradingConfig;
pub use jwt::JwtConfig;
pub use server::ServerConfig;

/// Reads a variable from the process environment.
pub(crate) fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Parses a boolean flag the way operators tend to write them.
pub(crate) fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
