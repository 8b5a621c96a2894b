//! Content models: announcements, assignments and quizzes.
//!
//! Who sees a content item is described by [`Targeting`]. The variants are
//! mutually exclusive; picking specific students discards any grade or
//! section filter.

use crate::ids::{AcademicYearId, ContentId, UserId};
use chrono::{DateTime, Utc};
use schoolyard_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use std::collections::BTreeSet;
use std::fmt;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

/// Marker value in a grade or section list meaning "no restriction".
pub const ALL_MARKER: &str = "all";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type,
)]
#[sqlx(type_name = "content_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Announcement,
    Assignment,
    Quiz,
}

impl ContentKind {
    /// Assignments and quizzes carry a due date and total points.
    pub fn is_gradable(&self) -> bool {
        matches!(self, ContentKind::Assignment | ContentKind::Quiz)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Announcement => "announcement",
            ContentKind::Assignment => "assignment",
            ContentKind::Quiz => "quiz",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audience of a content item.
///
/// `None` for `grades` or `sections` means that dimension is unrestricted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Targeting {
    AllStudents,
    GradeSection {
        #[serde(default)]
        grades: Option<BTreeSet<String>>,
        #[serde(default)]
        sections: Option<BTreeSet<String>>,
    },
    SpecificStudents {
        student_ids: BTreeSet<UserId>,
    },
}

impl Targeting {
    /// Collapses "all" markers and empty lists into `None`, and a
    /// grade/section filter with no restriction into `AllStudents`.
    pub fn normalized(self) -> Self {
        match self {
            Targeting::GradeSection { grades, sections } => {
                let grades = restriction(grades);
                let sections = restriction(sections);
                if grades.is_none() && sections.is_none() {
                    Targeting::AllStudents
                } else {
                    Targeting::GradeSection { grades, sections }
                }
            }
            other => other,
        }
    }
}

fn restriction<I>(values: Option<I>) -> Option<BTreeSet<String>>
where
    I: IntoIterator<Item = String>,
{
    let set: BTreeSet<String> = values?
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect();

    if set.is_empty() || set.iter().any(|v| v.eq_ignore_ascii_case(ALL_MARKER)) {
        None
    } else {
        Some(set)
    }
}

/// Flat targeting form used by older clients.
///
/// A non-empty `student_ids` wins over everything else.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct TargetingDto {
    #[serde(default)]
    pub target_all: bool,
    #[serde(default)]
    pub grades: Option<Vec<String>>,
    #[serde(default)]
    pub sections: Option<Vec<String>>,
    #[serde(default)]
    pub student_ids: Option<Vec<UserId>>,
}

impl From<TargetingDto> for Targeting {
    fn from(dto: TargetingDto) -> Self {
        if let Some(ids) = dto.student_ids.filter(|ids| !ids.is_empty()) {
            return Targeting::SpecificStudents {
                student_ids: ids.into_iter().collect(),
            };
        }
        if dto.target_all {
            return Targeting::AllStudents;
        }
        Targeting::GradeSection {
            grades: restriction(dto.grades),
            sections: restriction(dto.sections),
        }
        .normalized()
    }
}

/// Targeting as accepted on the wire: the tagged form or the flat one.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum TargetingRequest {
    Tagged(Targeting),
    Flat(TargetingDto),
}

impl TargetingRequest {
    pub fn into_targeting(self) -> Targeting {
        match self {
            TargetingRequest::Tagged(targeting) => targeting.normalized(),
            TargetingRequest::Flat(dto) => dto.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ContentItem {
    pub id: ContentId,
    pub kind: ContentKind,
    pub title: String,
    pub body: Option<String>,
    #[schema(value_type = Targeting)]
    pub targeting: Json<Targeting>,
    pub due_at: Option<DateTime<Utc>>,
    pub total_points: Option<i32>,
    pub academic_year_id: Option<AcademicYearId>,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_content_shape"))]
pub struct CreateContentDto {
    pub kind: ContentKind,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 10000))]
    pub body: Option<String>,
    pub targeting: TargetingRequest,
    pub due_at: Option<DateTime<Utc>>,
    #[validate(range(min = 1, max = 1000))]
    pub total_points: Option<i32>,
    pub academic_year_id: Option<AcademicYearId>,
}

fn validate_content_shape(dto: &CreateContentDto) -> Result<(), ValidationError> {
    let has_due = dto.due_at.is_some();
    let has_points = dto.total_points.is_some();

    if dto.kind.is_gradable() && !(has_due && has_points) {
        return Err(ValidationError::new("content_shape")
            .with_message("assignments and quizzes require due_at and total_points".into()));
    }
    if !dto.kind.is_gradable() && (has_due || has_points) {
        return Err(ValidationError::new("content_shape")
            .with_message("announcements cannot carry due_at or total_points".into()));
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, IntoParams, ToSchema)]
pub struct ContentFilterParams {
    pub kind: Option<ContentKind>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

/// Response for a freshly published content item.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PublishedContent {
    #[serde(flatten)]
    pub content: ContentItem,
    pub recipient_count: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedContentResponse {
    pub data: Vec<ContentItem>,
    pub meta: PaginationMeta,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ContentRecipientsResponse {
    pub content_id: ContentId,
    pub student_ids: Vec<UserId>,
    pub total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(values: &[&str]) -> Option<BTreeSet<String>> {
        Some(values.iter().map(|v| v.to_string()).collect())
    }

    #[test]
    fn test_tagged_targeting_serde() {
        let json = r#"{"mode":"grade_section","grades":["grade5"],"sections":["A","B"]}"#;
        let targeting: Targeting = serde_json::from_str(json).unwrap();
        assert_eq!(
            targeting,
            Targeting::GradeSection {
                grades: set(&["grade5"]),
                sections: set(&["A", "B"]),
            }
        );

        let all = serde_json::to_value(Targeting::AllStudents).unwrap();
        assert_eq!(all, serde_json::json!({"mode": "all_students"}));
    }

    #[test]
    fn test_all_marker_lifts_restriction() {
        let targeting = Targeting::GradeSection {
            grades: set(&["grade5"]),
            sections: set(&["A", "All"]),
        }
        .normalized();
        assert_eq!(
            targeting,
            Targeting::GradeSection {
                grades: set(&["grade5"]),
                sections: None,
            }
        );

        let unrestricted = Targeting::GradeSection {
            grades: set(&[]),
            sections: None,
        }
        .normalized();
        assert_eq!(unrestricted, Targeting::AllStudents);
    }

    #[test]
    fn test_flat_dto_specific_students_take_precedence() {
        let id = UserId::from_u128(7);
        let dto = TargetingDto {
            target_all: true,
            grades: Some(vec!["grade5".to_string()]),
            sections: Some(vec!["A".to_string()]),
            student_ids: Some(vec![id, id]),
        };
        assert_eq!(
            Targeting::from(dto),
            Targeting::SpecificStudents {
                student_ids: BTreeSet::from([id]),
            }
        );
    }

    #[test]
    fn test_flat_dto_empty_student_list_falls_through() {
        let dto = TargetingDto {
            grades: Some(vec!["grade6".to_string()]),
            student_ids: Some(vec![]),
            ..Default::default()
        };
        assert_eq!(
            Targeting::from(dto),
            Targeting::GradeSection {
                grades: set(&["grade6"]),
                sections: None,
            }
        );

        assert_eq!(
            Targeting::from(TargetingDto::default()),
            Targeting::AllStudents
        );
    }

    #[test]
    fn test_targeting_request_accepts_both_forms() {
        let tagged: TargetingRequest =
            serde_json::from_str(r#"{"mode":"all_students"}"#).unwrap();
        assert_eq!(tagged.into_targeting(), Targeting::AllStudents);

        let flat: TargetingRequest =
            serde_json::from_str(r#"{"grades":["grade5"],"sections":["all"]}"#).unwrap();
        assert_eq!(
            flat.into_targeting(),
            Targeting::GradeSection {
                grades: set(&["grade5"]),
                sections: None,
            }
        );
    }

    fn dto(kind: ContentKind, due: bool, points: Option<i32>) -> CreateContentDto {
        CreateContentDto {
            kind,
            title: "Fractions".to_string(),
            body: None,
            targeting: TargetingRequest::Tagged(Targeting::AllStudents),
            due_at: due.then(Utc::now),
            total_points: points,
            academic_year_id: None,
        }
    }

    #[test]
    fn test_content_shape_validation() {
        assert!(dto(ContentKind::Announcement, false, None).validate().is_ok());
        assert!(dto(ContentKind::Announcement, true, None).validate().is_err());
        assert!(dto(ContentKind::Announcement, false, Some(10)).validate().is_err());

        assert!(dto(ContentKind::Quiz, true, Some(20)).validate().is_ok());
        assert!(dto(ContentKind::Quiz, false, Some(20)).validate().is_err());
        assert!(dto(ContentKind::Assignment, true, None).validate().is_err());
        assert!(dto(ContentKind::Assignment, true, Some(0)).validate().is_err());
    }
}
