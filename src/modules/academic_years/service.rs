use anyhow::anyhow;
use chrono::NaiveDate;
use sqlx::{PgConnection, PgPool};
use tracing::{info, instrument};

use schoolyard_core::{AppError, PaginationMeta, PaginationParams};
use schoolyard_models::ids::{AcademicYearId, TermId};

use super::calendar::{
    AcademicYearLabel, CalendarError, TermBounds, YearCalendar, current_term_number,
    resolve_term_range, term_progress_percent, validate_term_set,
};
use super::model::{
    AcademicYear, AcademicYearWithTerms, CreateAcademicYearDto, CurrentAcademicYearResponse,
    PaginatedAcademicYearsResponse, ReplaceTermsDto, ResolvedTerm, Term, TermInput,
    UpdateAcademicYearDto,
};

/// Label, term-set and override problems are the caller's to fix.
pub fn calendar_error(err: CalendarError) -> AppError {
    AppError::unprocessable(anyhow!(err))
}

fn year_write_error(err: sqlx::Error, label: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.is_unique_violation()
    {
        return AppError::conflict(anyhow!(
            "Academic year {} already exists or another year became current",
            label
        ));
    }
    AppError::database(err)
}

/// Resolves every term of a year to its date range.
pub fn resolve_terms(label: &AcademicYearLabel, terms: &[Term]) -> Vec<ResolvedTerm> {
    terms
        .iter()
        .map(|term| {
            let range = resolve_term_range(&TermBounds::from(term), label);
            ResolvedTerm {
                number: term.number,
                name: term.name.clone(),
                start_month: term.start_month.clone(),
                end_month: term.end_month.clone(),
                start_date: range.map(|r| r.start),
                end_date: range.map(|r| r.end),
            }
        })
        .collect()
}

/// Current term, its range and progress for `year` as seen on `today`.
pub fn describe_current(
    academic_year: AcademicYear,
    terms: &[Term],
    today: NaiveDate,
) -> Result<CurrentAcademicYearResponse, CalendarError> {
    let label: AcademicYearLabel = academic_year.label.parse()?;
    let calendar = YearCalendar {
        label,
        current_term_override: academic_year.current_term_override,
        terms: terms.iter().map(TermBounds::from).collect(),
    };

    let current_term = current_term_number(&calendar, today);
    let current_term_range = resolve_terms(&label, terms)
        .into_iter()
        .find(|term| term.number == current_term);

    let term_progress_percent = calendar
        .terms
        .iter()
        .find(|term| term.number == current_term)
        .and_then(|term| resolve_term_range(term, &label))
        .map(|range| term_progress_percent(&range, today));

    Ok(CurrentAcademicYearResponse {
        academic_year,
        current_term,
        current_term_range,
        term_progress_percent,
    })
}

fn stored_label(academic_year: &AcademicYear) -> Result<AcademicYearLabel, AppError> {
    academic_year.label.parse().map_err(AppError::internal)
}

async fn insert_terms(
    conn: &mut PgConnection,
    academic_year_id: AcademicYearId,
    inputs: &[TermInput],
) -> Result<Vec<Term>, sqlx::Error> {
    let mut terms = Vec::with_capacity(inputs.len());

    for (input, number) in inputs.iter().zip(1..) {
        let term = sqlx::query_as::<_, Term>(
            r#"INSERT INTO terms (id, academic_year_id, number, name, start_month, end_month, start_date, end_date)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
               RETURNING id, academic_year_id, number, name, start_month, end_month, start_date, end_date, created_at"#,
        )
        .bind(TermId::new())
        .bind(academic_year_id)
        .bind(number)
        .bind(input.name.trim())
        .bind(input.start_month.trim())
        .bind(input.end_month.trim())
        .bind(input.start_date)
        .bind(input.end_date)
        .fetch_one(&mut *conn)
        .await?;

        terms.push(term);
    }

    Ok(terms)
}

async fn fetch_terms(db: &PgPool, academic_year_id: AcademicYearId) -> Result<Vec<Term>, AppError> {
    let terms = sqlx::query_as::<_, Term>(
        r#"SELECT id, academic_year_id, number, name, start_month, end_month, start_date, end_date, created_at
           FROM terms
           WHERE academic_year_id = $1
           ORDER BY number"#,
    )
    .bind(academic_year_id)
    .fetch_all(db)
    .await?;

    Ok(terms)
}

pub struct AcademicYearService;

impl AcademicYearService {
    /// Create an academic year together with its terms.
    ///
    /// The label must be `YYYY-YYYY` and the terms must form a valid
    /// calendar. When `is_current` is set the previous current year is
    /// unset in the same transaction.
    #[instrument(skip(db))]
    pub async fn create_academic_year(
        db: &PgPool,
        dto: CreateAcademicYearDto,
    ) -> Result<AcademicYearWithTerms, AppError> {
        let label: AcademicYearLabel = dto.label.parse().map_err(calendar_error)?;
        validate_term_set(&TermBounds::from_inputs(&dto.terms)).map_err(calendar_error)?;

        let mut tx = db.begin().await?;

        if dto.is_current {
            sqlx::query(
                "UPDATE academic_years SET is_current = FALSE, updated_at = NOW() WHERE is_current",
            )
            .execute(&mut *tx)
            .await?;
        }

        let academic_year = sqlx::query_as::<_, AcademicYear>(
            r#"INSERT INTO academic_years (id, label, is_current, exam_weight, quiz_weight, assignment_weight)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING id, label, is_current, current_term_override, exam_weight, quiz_weight, assignment_weight, created_at, updated_at"#,
        )
        .bind(AcademicYearId::new())
        .bind(label.to_string())
        .bind(dto.is_current)
        .bind(dto.weights.exam)
        .bind(dto.weights.quiz)
        .bind(dto.weights.assignment)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| year_write_error(e, &dto.label))?;

        let terms = insert_terms(&mut tx, academic_year.id, &dto.terms).await?;

        tx.commit().await?;

        info!(academic_year_id = %academic_year.id, %label, terms = terms.len(), "Academic year created");

        Ok(AcademicYearWithTerms {
            terms: resolve_terms(&label, &terms),
            academic_year,
        })
    }

    #[instrument(skip(db))]
    pub async fn get_academic_years(
        db: &PgPool,
        params: PaginationParams,
    ) -> Result<PaginatedAcademicYearsResponse, AppError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM academic_years")
            .fetch_one(db)
            .await?;

        let years = sqlx::query_as::<_, AcademicYear>(
            r#"SELECT id, label, is_current, current_term_override, exam_weight, quiz_weight, assignment_weight, created_at, updated_at
               FROM academic_years
               ORDER BY label DESC
               LIMIT $1 OFFSET $2"#,
        )
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(db)
        .await?;

        Ok(PaginatedAcademicYearsResponse {
            data: years,
            meta: PaginationMeta::for_offset(&params, total),
        })
    }

    #[instrument(skip(db))]
    pub async fn find_academic_year(
        db: &PgPool,
        academic_year_id: AcademicYearId,
    ) -> Result<AcademicYear, AppError> {
        sqlx::query_as::<_, AcademicYear>(
            r#"SELECT id, label, is_current, current_term_override, exam_weight, quiz_weight, assignment_weight, created_at, updated_at
               FROM academic_years
               WHERE id = $1"#,
        )
        .bind(academic_year_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Academic year not found")))
    }

    #[instrument(skip(db))]
    pub async fn get_academic_year(
        db: &PgPool,
        academic_year_id: AcademicYearId,
    ) -> Result<AcademicYearWithTerms, AppError> {
        let academic_year = Self::find_academic_year(db, academic_year_id).await?;
        let label = stored_label(&academic_year)?;
        let terms = fetch_terms(db, academic_year_id).await?;

        Ok(AcademicYearWithTerms {
            terms: resolve_terms(&label, &terms),
            academic_year,
        })
    }

    /// The current year with its current term as of `today`.
    #[instrument(skip(db))]
    pub async fn get_current_academic_year(
        db: &PgPool,
        today: NaiveDate,
    ) -> Result<CurrentAcademicYearResponse, AppError> {
        let academic_year = sqlx::query_as::<_, AcademicYear>(
            r#"SELECT id, label, is_current, current_term_override, exam_weight, quiz_weight, assignment_weight, created_at, updated_at
               FROM academic_years
               WHERE is_current"#,
        )
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("No current academic year")))?;

        let terms = fetch_terms(db, academic_year.id).await?;

        describe_current(academic_year, &terms, today).map_err(AppError::internal)
    }

    /// Update assessment weights and/or the current-term override.
    #[instrument(skip(db))]
    pub async fn update_academic_year(
        db: &PgPool,
        academic_year_id: AcademicYearId,
        dto: UpdateAcademicYearDto,
    ) -> Result<AcademicYear, AppError> {
        if dto.clear_current_term_override && dto.current_term_override.is_some() {
            return Err(AppError::unprocessable(anyhow!(
                "current_term_override cannot be set and cleared at once"
            )));
        }

        Self::find_academic_year(db, academic_year_id).await?;

        if let Some(number) = dto.current_term_override {
            let exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM terms WHERE academic_year_id = $1 AND number = $2)",
            )
            .bind(academic_year_id)
            .bind(number)
            .fetch_one(db)
            .await?;

            if !exists {
                return Err(AppError::unprocessable(anyhow!(
                    "Term {} does not exist in this academic year",
                    number
                )));
            }
        }

        let weights = dto.weights;
        let academic_year = sqlx::query_as::<_, AcademicYear>(
            r#"UPDATE academic_years
               SET exam_weight = COALESCE($2, exam_weight),
                   quiz_weight = COALESCE($3, quiz_weight),
                   assignment_weight = COALESCE($4, assignment_weight),
                   current_term_override = CASE WHEN $5 THEN NULL
                                                ELSE COALESCE($6, current_term_override) END,
                   updated_at = NOW()
               WHERE id = $1
               RETURNING id, label, is_current, current_term_override, exam_weight, quiz_weight, assignment_weight, created_at, updated_at"#,
        )
        .bind(academic_year_id)
        .bind(weights.map(|w| w.exam))
        .bind(weights.map(|w| w.quiz))
        .bind(weights.map(|w| w.assignment))
        .bind(dto.clear_current_term_override)
        .bind(dto.current_term_override)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Academic year not found")))?;

        Ok(academic_year)
    }

    /// Make this year the only current one.
    #[instrument(skip(db))]
    pub async fn set_current_academic_year(
        db: &PgPool,
        academic_year_id: AcademicYearId,
    ) -> Result<AcademicYear, AppError> {
        let mut tx = db.begin().await?;

        sqlx::query(
            r#"UPDATE academic_years SET is_current = FALSE, updated_at = NOW()
               WHERE is_current AND id <> $1"#,
        )
        .bind(academic_year_id)
        .execute(&mut *tx)
        .await?;

        let academic_year = sqlx::query_as::<_, AcademicYear>(
            r#"UPDATE academic_years SET is_current = TRUE, updated_at = NOW()
               WHERE id = $1
               RETURNING id, label, is_current, current_term_override, exam_weight, quiz_weight, assignment_weight, created_at, updated_at"#,
        )
        .bind(academic_year_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| year_write_error(e, &academic_year_id.to_string()))?
        .ok_or_else(|| AppError::not_found(anyhow!("Academic year not found")))?;

        tx.commit().await?;

        info!(academic_year_id = %academic_year.id, label = %academic_year.label, "Current academic year changed");

        Ok(academic_year)
    }

    /// Replace the whole term set. An override pointing past the new last
    /// term is cleared.
    #[instrument(skip(db))]
    pub async fn replace_terms(
        db: &PgPool,
        academic_year_id: AcademicYearId,
        dto: ReplaceTermsDto,
    ) -> Result<Vec<ResolvedTerm>, AppError> {
        validate_term_set(&TermBounds::from_inputs(&dto.terms)).map_err(calendar_error)?;

        let academic_year = Self::find_academic_year(db, academic_year_id).await?;
        let label = stored_label(&academic_year)?;

        let mut tx = db.begin().await?;

        sqlx::query("DELETE FROM terms WHERE academic_year_id = $1")
            .bind(academic_year_id)
            .execute(&mut *tx)
            .await?;

        let terms = insert_terms(&mut tx, academic_year_id, &dto.terms).await?;

        sqlx::query(
            r#"UPDATE academic_years
               SET current_term_override = NULL, updated_at = NOW()
               WHERE id = $1 AND current_term_override > $2"#,
        )
        .bind(academic_year_id)
        .bind(terms.len() as i32)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(resolve_terms(&label, &terms))
    }

    #[instrument(skip(db))]
    pub async fn get_terms(
        db: &PgPool,
        academic_year_id: AcademicYearId,
    ) -> Result<Vec<ResolvedTerm>, AppError> {
        let academic_year = Self::find_academic_year(db, academic_year_id).await?;
        let label = stored_label(&academic_year)?;
        let terms = fetch_terms(db, academic_year_id).await?;

        Ok(resolve_terms(&label, &terms))
    }
}
