use anyhow::anyhow;
use sqlx::PgPool;
use sqlx::types::Json;
use tracing::{info, instrument, warn};

use schoolyard_core::{AppError, PaginationMeta};
use schoolyard_models::ids::{ContentId, UserId};

use crate::metrics::track_content_published;
use crate::modules::content::audience::{AudienceError, resolve_recipients};
use crate::modules::content::model::{
    ContentFilterParams, ContentItem, ContentRecipientsResponse, CreateContentDto,
    PaginatedContentResponse, PublishedContent,
};

/// Empty audiences and bad student references are rejected as input
/// errors; a failing directory is a server error.
pub fn audience_error(err: AudienceError) -> AppError {
    match err {
        AudienceError::Directory(e) => AppError::database(e),
        other => AppError::unprocessable(anyhow!(other)),
    }
}

pub struct ContentService;

impl ContentService {
    /// Publish a content item to the students its targeting resolves to.
    ///
    /// The recipient set is materialised in the same transaction as the
    /// item, so later directory changes do not alter who received it.
    #[instrument(skip(db))]
    pub async fn publish_content(
        db: &PgPool,
        created_by: UserId,
        dto: CreateContentDto,
    ) -> Result<PublishedContent, AppError> {
        if let Some(academic_year_id) = dto.academic_year_id {
            let exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM academic_years WHERE id = $1)",
            )
            .bind(academic_year_id)
            .fetch_one(db)
            .await?;

            if !exists {
                return Err(AppError::unprocessable(anyhow!(
                    "Academic year {} does not exist",
                    academic_year_id
                )));
            }
        }

        let targeting = dto.targeting.into_targeting();
        let recipients = resolve_recipients(&targeting, db)
            .await
            .map_err(audience_error)?;
        let recipient_ids: Vec<UserId> = recipients.into_iter().collect();

        let mut tx = db.begin().await?;

        let content = sqlx::query_as::<_, ContentItem>(
            r#"INSERT INTO content_items (id, kind, title, body, targeting, due_at, total_points, academic_year_id, created_by)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
               RETURNING id, kind, title, body, targeting, due_at, total_points, academic_year_id, created_by, created_at, updated_at"#,
        )
        .bind(ContentId::new())
        .bind(dto.kind)
        .bind(&dto.title)
        .bind(&dto.body)
        .bind(Json(&targeting))
        .bind(dto.due_at)
        .bind(dto.total_points)
        .bind(dto.academic_year_id)
        .bind(created_by)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"INSERT INTO content_recipients (content_id, student_id)
               SELECT $1, UNNEST($2::uuid[])"#,
        )
        .bind(content.id)
        .bind(&recipient_ids)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_foreign_key_violation()
            {
                warn!(content_id = %content.id, "Recipient removed while publishing");
                return AppError::conflict(anyhow!(
                    "A recipient was removed while publishing, please retry"
                ));
            }
            AppError::database(e)
        })?;

        tx.commit().await?;

        track_content_published(content.kind, recipient_ids.len());
        info!(
            content_id = %content.id,
            kind = %content.kind,
            recipients = recipient_ids.len(),
            "Content published"
        );

        Ok(PublishedContent {
            content,
            recipient_count: recipient_ids.len() as i64,
        })
    }

    /// Every content item, newest first.
    #[instrument(skip(db))]
    pub async fn get_content(
        db: &PgPool,
        filters: ContentFilterParams,
    ) -> Result<PaginatedContentResponse, AppError> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM content_items WHERE ($1::content_kind IS NULL OR kind = $1)",
        )
        .bind(filters.kind)
        .fetch_one(db)
        .await?;

        let items = sqlx::query_as::<_, ContentItem>(
            r#"SELECT id, kind, title, body, targeting, due_at, total_points, academic_year_id, created_by, created_at, updated_at
               FROM content_items
               WHERE ($1::content_kind IS NULL OR kind = $1)
               ORDER BY created_at DESC
               LIMIT $2 OFFSET $3"#,
        )
        .bind(filters.kind)
        .bind(filters.pagination.limit())
        .bind(filters.pagination.offset())
        .fetch_all(db)
        .await?;

        Ok(PaginatedContentResponse {
            data: items,
            meta: PaginationMeta::for_offset(&filters.pagination, total),
        })
    }

    /// Content a student received, newest first.
    #[instrument(skip(db))]
    pub async fn get_content_for_student(
        db: &PgPool,
        student_id: UserId,
        filters: ContentFilterParams,
    ) -> Result<PaginatedContentResponse, AppError> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*)
               FROM content_items c
               JOIN content_recipients r ON r.content_id = c.id
               WHERE r.student_id = $1 AND ($2::content_kind IS NULL OR c.kind = $2)"#,
        )
        .bind(student_id)
        .bind(filters.kind)
        .fetch_one(db)
        .await?;

        let items = sqlx::query_as::<_, ContentItem>(
            r#"SELECT c.id, c.kind, c.title, c.body, c.targeting, c.due_at, c.total_points,
                      c.academic_year_id, c.created_by, c.created_at, c.updated_at
               FROM content_items c
               JOIN content_recipients r ON r.content_id = c.id
               WHERE r.student_id = $1 AND ($2::content_kind IS NULL OR c.kind = $2)
               ORDER BY c.created_at DESC
               LIMIT $3 OFFSET $4"#,
        )
        .bind(student_id)
        .bind(filters.kind)
        .bind(filters.pagination.limit())
        .bind(filters.pagination.offset())
        .fetch_all(db)
        .await?;

        Ok(PaginatedContentResponse {
            data: items,
            meta: PaginationMeta::for_offset(&filters.pagination, total),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_content_item(
        db: &PgPool,
        content_id: ContentId,
    ) -> Result<ContentItem, AppError> {
        sqlx::query_as::<_, ContentItem>(
            r#"SELECT id, kind, title, body, targeting, due_at, total_points, academic_year_id, created_by, created_at, updated_at
               FROM content_items
               WHERE id = $1"#,
        )
        .bind(content_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Content not found")))
    }

    #[instrument(skip(db))]
    pub async fn is_recipient(
        db: &PgPool,
        content_id: ContentId,
        student_id: UserId,
    ) -> Result<bool, AppError> {
        let found = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM content_recipients WHERE content_id = $1 AND student_id = $2)",
        )
        .bind(content_id)
        .bind(student_id)
        .fetch_one(db)
        .await?;

        Ok(found)
    }

    /// Fetch a content item as `viewer` may see it. Students only see items
    /// they received; anything else is reported as missing.
    #[instrument(skip(db))]
    pub async fn get_visible_content_item(
        db: &PgPool,
        content_id: ContentId,
        viewer: UserId,
        is_staff: bool,
    ) -> Result<ContentItem, AppError> {
        if !is_staff && !Self::is_recipient(db, content_id, viewer).await? {
            return Err(AppError::not_found(anyhow!("Content not found")));
        }
        Self::get_content_item(db, content_id).await
    }

    #[instrument(skip(db))]
    pub async fn get_recipients(
        db: &PgPool,
        content_id: ContentId,
    ) -> Result<ContentRecipientsResponse, AppError> {
        Self::get_content_item(db, content_id).await?;

        let student_ids = sqlx::query_scalar::<_, UserId>(
            "SELECT student_id FROM content_recipients WHERE content_id = $1 ORDER BY student_id",
        )
        .bind(content_id)
        .fetch_all(db)
        .await?;

        Ok(ContentRecipientsResponse {
            content_id,
            total: student_ids.len() as i64,
            student_ids,
        })
    }

    /// Delete a content item with its questions, recipients and submissions.
    #[instrument(skip(db))]
    pub async fn delete_content(db: &PgPool, content_id: ContentId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM content_items WHERE id = $1")
            .bind(content_id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Content not found")));
        }

        info!(%content_id, "Content deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audience_errors_are_422() {
        assert_eq!(
            audience_error(AudienceError::EmptyAudience).status.as_u16(),
            422
        );

        let err = audience_error(AudienceError::InvalidStudentReference(vec![
            UserId::from_u128(7),
        ]));
        assert_eq!(err.status.as_u16(), 422);
        assert!(
            err.error
                .to_string()
                .contains("00000000-0000-0000-0000-000000000007")
        );
    }

    #[test]
    fn test_directory_failure_is_500() {
        let err = audience_error(AudienceError::Directory(sqlx::Error::PoolTimedOut));
        assert_eq!(err.status.as_u16(), 500);
    }
}
