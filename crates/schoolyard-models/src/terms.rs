//! Term models and DTOs.
//!
//! Terms are stored by month name. Concrete dates are derived from the
//! academic year label unless both explicit dates are set.

use crate::ids::{AcademicYearId, TermId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Term {
    pub id: TermId,
    pub academic_year_id: AcademicYearId,
    /// Ordinal within the year, starting at 1
    pub number: i32,
    pub name: String,
    pub start_month: String,
    pub end_month: String,
    /// Explicit start date overriding the month-derived one
    pub start_date: Option<NaiveDate>,
    /// Explicit end date overriding the month-derived one
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// One term in a term-set edit. Position in the list is the term number.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_explicit_dates"))]
pub struct TermInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 3, max = 9))]
    pub start_month: String,
    #[validate(length(min = 3, max = 9))]
    pub end_month: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

fn validate_explicit_dates(term: &TermInput) -> Result<(), ValidationError> {
    match (term.start_date, term.end_date) {
        (None, None) => Ok(()),
        (Some(start), Some(end)) if start <= end => Ok(()),
        (Some(_), Some(_)) => Err(ValidationError::new("term_dates")
            .with_message("start_date must not be after end_date".into())),
        _ => Err(ValidationError::new("term_dates")
            .with_message("start_date and end_date must be set together".into())),
    }
}

/// Replaces the whole term set of an academic year.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ReplaceTermsDto {
    #[validate(length(min = 2, max = 6))]
    #[validate(nested)]
    pub terms: Vec<TermInput>,
}

/// A term together with its resolved date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ResolvedTerm {
    pub number: i32,
    pub name: String,
    pub start_month: String,
    pub end_month: String,
    /// `None` when a month name cannot be resolved
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(start_date: Option<NaiveDate>, end_date: Option<NaiveDate>) -> TermInput {
        TermInput {
            name: "First Term".to_string(),
            start_month: "September".to_string(),
            end_month: "December".to_string(),
            start_date,
            end_date,
        }
    }

    #[test]
    fn test_term_input_month_only() {
        assert!(input(None, None).validate().is_ok());
    }

    #[test]
    fn test_term_input_explicit_dates() {
        let start = NaiveDate::from_ymd_opt(2025, 9, 8);
        let end = NaiveDate::from_ymd_opt(2025, 12, 19);
        assert!(input(start, end).validate().is_ok());
        assert!(input(end, start).validate().is_err());
        assert!(input(start, None).validate().is_err());
        assert!(input(None, end).validate().is_err());
    }

    #[test]
    fn test_term_input_name_and_month_lengths() {
        let mut term = input(None, None);
        term.name = String::new();
        assert!(term.validate().is_err());

        let mut term = input(None, None);
        term.start_month = "Se".to_string();
        assert!(term.validate().is_err());
    }

    #[test]
    fn test_replace_terms_count() {
        let dto = ReplaceTermsDto {
            terms: vec![input(None, None)],
        };
        assert!(dto.validate().is_err());

        let dto = ReplaceTermsDto {
            terms: vec![input(None, None); 7],
        };
        assert!(dto.validate().is_err());

        let dto = ReplaceTermsDto {
            terms: vec![input(None, None); 3],
        };
        assert!(dto.validate().is_ok());
    }
}
