//! # Schoolyard CLI
//!
//! Seeding and administration helpers used by the `schoolyard-cli` binary.
//!
//! ## Usage
//!
//! ```ignore
//! use schoolyard_cli::seeder::{SeedConfig, seed_all};
//!
//! let config = SeedConfig::new(120).with_staff(2, 8);
//! seed_all(&pool, config).await?;
//! ```

pub mod admin;
pub mod seeder;
