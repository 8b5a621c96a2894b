//! Request extractors and route guards.
//!
//! - [`auth`]: the [`auth::AuthUser`] extractor that verifies bearer tokens
//! - [`role`]: role guards used as route layers and in handlers
//!
//! ```ignore
//! use axum::{Router, middleware};
//! use crate::middleware::role::require_staff;
//!
//! let routes = init_content_router()
//!     .route_layer(middleware::from_fn_with_state(state.clone(), require_staff));
//! ```

pub mod auth;
pub mod role;
