//! Student models and DTOs.
//!
//! Students are rows of `users` with the `student` role plus a grade, a
//! section and a sequential student number.

use crate::ids::UserId;
use crate::users::UserRole;
use chrono::{DateTime, Utc};
use schoolyard_core::{PaginationMeta, PaginationParams, serde::empty_string_as_none};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Student {
    pub id: UserId,
    /// Sequential number, e.g. "STU-000042"
    pub student_number: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub grade: Option<String>,
    pub section: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The slice of a user record the audience resolver needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct DirectoryEntry {
    pub id: UserId,
    pub role: UserRole,
    pub grade: Option<String>,
    pub section: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateStudentDto {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 50))]
    pub grade: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub section: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateStudentDto {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub grade: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub section: Option<String>,
}

/// Filters for listing students. Grade and section intersect.
#[derive(Debug, Clone, Deserialize, IntoParams, ToSchema)]
pub struct StudentFilterParams {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub grade: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub section: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedStudentsResponse {
    pub data: Vec<Student>,
    pub meta: PaginationMeta,
}

/// Name of the counter student numbers are drawn from.
pub const STUDENT_NUMBER_COUNTER: &str = "student_number";

/// Formats a counter value as a student number.
pub fn format_student_number(value: i64) -> String {
    format!("STU-{:06}", value)
}
