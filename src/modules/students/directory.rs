//! Read side of the student directory, as seen by audience resolution.

use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::BTreeSet;
use tracing::instrument;

use schoolyard_models::DirectoryEntry;
use schoolyard_models::ids::UserId;

#[async_trait]
pub trait StudentDirectory: Send + Sync {
    /// Users with the given ids, whatever their role. Unknown ids are
    /// simply absent from the result.
    async fn find_users_by_ids(&self, ids: &[UserId]) -> Result<Vec<DirectoryEntry>, sqlx::Error>;

    /// Students matching every given filter. `None` leaves a dimension
    /// unrestricted.
    async fn find_students(
        &self,
        grades: Option<&BTreeSet<String>>,
        sections: Option<&BTreeSet<String>>,
    ) -> Result<Vec<UserId>, sqlx::Error>;
}

#[async_trait]
impl StudentDirectory for PgPool {
    #[instrument(skip(self))]
    async fn find_users_by_ids(&self, ids: &[UserId]) -> Result<Vec<DirectoryEntry>, sqlx::Error> {
        sqlx::query_as::<_, DirectoryEntry>(
            "SELECT id, role, grade, section FROM users WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(self)
        .await
    }

    #[instrument(skip(self))]
    async fn find_students(
        &self,
        grades: Option<&BTreeSet<String>>,
        sections: Option<&BTreeSet<String>>,
    ) -> Result<Vec<UserId>, sqlx::Error> {
        let grades: Option<Vec<String>> = grades.map(|g| g.iter().cloned().collect());
        let sections: Option<Vec<String>> = sections.map(|s| s.iter().cloned().collect());

        sqlx::query_scalar::<_, UserId>(
            r#"SELECT id FROM users
               WHERE role = 'student'
                 AND ($1::text[] IS NULL OR grade = ANY($1))
                 AND ($2::text[] IS NULL OR section = ANY($2))
               ORDER BY id"#,
        )
        .bind(grades)
        .bind(sections)
        .fetch_all(self)
        .await
    }
}
