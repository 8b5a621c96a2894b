//! # Schoolyard API
//!
//! School-management backend built with Axum and PostgreSQL. It covers the
//! academic calendar, targeted content and quiz grading.
//!
//! ## Overview
//!
//! - **Academic years and terms**: month-based terms, conflict detection and
//!   current-term resolution with an admin override
//! - **Students**: the directory content is targeted against
//! - **Content**: announcements, assignments and quizzes published to all
//!   students, to grade/section groups or to named students
//! - **Submissions**: one per student and content item, auto-graded for
//!   objective quiz questions, late when past the due instant
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── middleware/          # AuthUser extractor and role guards
//! ├── modules/
//! │   ├── academic_years/ # Years, terms, the term calendar
//! │   ├── students/       # Student records and the directory seam
//! │   ├── content/        # Publishing and audience resolution
//! │   ├── questions/      # Quiz questions
//! │   └── submissions/    # Grader, one-per-student store, grading
//! ├── clock.rs             # Injectable "now"
//! └── validator.rs         # Validated JSON extractor
//! ```
//!
//! Each feature module has the same layout:
//!
//! - `mod.rs`: Module exports
//! - `controller.rs`: HTTP handlers
//! - `service.rs`: Business logic
//! - `model.rs`: Data models and DTOs
//! - `router.rs`: Axum router configuration
//!
//! The pure pieces (`academic_years::calendar`, `content::audience`,
//! `submissions::grader`) take no database handle and are tested in place.
//!
//! ## Roles
//!
//! | Role | Can |
//! |------|-----|
//! | Admin | Manage years, terms and students, plus everything a teacher can |
//! | Teacher | Publish content, add questions, grade submissions |
//! | Student | Read content published to them, submit once per item |
//! | Parent | Read the academic calendar |
//!
//! Bearer tokens are verified with `JWT_SECRET`; the role claim is trusted
//! as issued. Development tokens come from `schoolyard-cli issue-token`.
//!
//! ## API Documentation
//!
//! - Swagger UI: `http://localhost:3000/swagger-ui`
//! - Scalar: `http://localhost:3000/scalar`

pub mod clock;
pub mod docs;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod validator;

// Re-export workspace crates for convenience
pub use schoolyard_auth;
pub use schoolyard_config;
pub use schoolyard_core;
pub use schoolyard_db;
pub use schoolyard_models;
