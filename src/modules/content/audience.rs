//! Audience resolution.
//!
//! Turns a [`Targeting`] into the concrete set of recipient student ids by
//! querying a [`StudentDirectory`]. Resolution happens once, when content is
//! published.

use std::collections::BTreeSet;
use thiserror::Error;
use tracing::instrument;

use schoolyard_models::ids::UserId;
use schoolyard_models::{Targeting, UserRole};

use crate::modules::students::directory::StudentDirectory;

#[derive(Debug, Error)]
pub enum AudienceError {
    #[error("targeting matches no students")]
    EmptyAudience,
    #[error("not valid student ids: {}", format_ids(.0))]
    InvalidStudentReference(Vec<UserId>),
    #[error("student directory unavailable: {0}")]
    Directory(#[from] sqlx::Error),
}

fn format_ids(ids: &[UserId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Resolves `targeting` against `directory`.
///
/// Specific students are checked to exist with the student role and are
/// returned as given; grade and section filters are never consulted for
/// them. Grade and section filters intersect. An empty result is an error.
#[instrument(skip(directory))]
pub async fn resolve_recipients<D>(
    targeting: &Targeting,
    directory: &D,
) -> Result<BTreeSet<UserId>, AudienceError>
where
    D: StudentDirectory + ?Sized,
{
    let recipients: BTreeSet<UserId> = match targeting {
        Targeting::SpecificStudents { student_ids } => {
            let requested: Vec<UserId> = student_ids.iter().copied().collect();
            let found: BTreeSet<UserId> = directory
                .find_users_by_ids(&requested)
                .await?
                .into_iter()
                .filter(|entry| entry.role == UserRole::Student)
                .map(|entry| entry.id)
                .collect();

            let invalid: Vec<UserId> = student_ids
                .iter()
                .filter(|id| !found.contains(id))
                .copied()
                .collect();
            if !invalid.is_empty() {
                return Err(AudienceError::InvalidStudentReference(invalid));
            }

            student_ids.clone()
        }
        Targeting::AllStudents => directory.find_students(None, None).await?.into_iter().collect(),
        Targeting::GradeSection { grades, sections } => directory
            .find_students(grades.as_ref(), sections.as_ref())
            .await?
            .into_iter()
            .collect(),
    };

    if recipients.is_empty() {
        return Err(AudienceError::EmptyAudience);
    }

    Ok(recipients)
}
