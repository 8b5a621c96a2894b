//! Academic year models and DTOs.
//!
//! An academic year is identified by a `"YYYY-YYYY"` label, owns an ordered
//! set of terms and carries the assessment weights used for final grades.
//! Exactly one year is current at any time.

use crate::ids::AcademicYearId;
use crate::terms::{ResolvedTerm, TermInput};
use chrono::{DateTime, Utc};
use schoolyard_core::PaginationMeta;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AcademicYear {
    pub id: AcademicYearId,
    /// Year label, e.g. "2025-2026"
    pub label: String,
    pub is_current: bool,
    /// Explicit current term, overriding date-based resolution
    pub current_term_override: Option<i32>,
    pub exam_weight: i32,
    pub quiz_weight: i32,
    pub assignment_weight: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AcademicYear {
    pub fn weights(&self) -> AssessmentWeights {
        AssessmentWeights {
            exam: self.exam_weight,
            quiz: self.quiz_weight,
            assignment: self.assignment_weight,
        }
    }
}

/// Percentage weights per assessment kind. Must sum to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_weight_sum"))]
pub struct AssessmentWeights {
    #[validate(range(min = 0, max = 100))]
    pub exam: i32,
    #[validate(range(min = 0, max = 100))]
    pub quiz: i32,
    #[validate(range(min = 0, max = 100))]
    pub assignment: i32,
}

impl Default for AssessmentWeights {
    fn default() -> Self {
        Self {
            exam: 60,
            quiz: 20,
            assignment: 20,
        }
    }
}

fn validate_weight_sum(weights: &AssessmentWeights) -> Result<(), ValidationError> {
    if weights.exam + weights.quiz + weights.assignment != 100 {
        return Err(ValidationError::new("weights_sum")
            .with_message("assessment weights must sum to 100".into()));
    }
    Ok(())
}

/// DTO for creating an academic year together with its terms.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateAcademicYearDto {
    /// Year label in the form "YYYY-YYYY"
    #[validate(length(equal = 9))]
    pub label: String,
    #[validate(nested)]
    #[serde(default)]
    pub weights: AssessmentWeights,
    /// Ordered terms (2 to 6)
    #[validate(length(min = 2, max = 6))]
    #[validate(nested)]
    pub terms: Vec<TermInput>,
    /// Mark this year as the current one
    #[serde(default)]
    pub is_current: bool,
}

/// DTO for updating weights or the current-term override.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateAcademicYearDto {
    #[validate(nested)]
    pub weights: Option<AssessmentWeights>,
    #[validate(range(min = 1, max = 6))]
    pub current_term_override: Option<i32>,
    /// Remove the override and resolve the current term from dates again
    #[serde(default)]
    pub clear_current_term_override: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AcademicYearWithTerms {
    #[serde(flatten)]
    pub academic_year: AcademicYear,
    pub terms: Vec<ResolvedTerm>,
}

/// The current academic year as seen on a given day.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CurrentAcademicYearResponse {
    pub academic_year: AcademicYear,
    pub current_term: i32,
    /// Resolved range of the current term, when it can be resolved
    pub current_term_range: Option<ResolvedTerm>,
    /// Percentage of the current term elapsed (0-100)
    pub term_progress_percent: Option<u8>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedAcademicYearsResponse {
    pub data: Vec<AcademicYear>,
    pub meta: PaginationMeta,
}
