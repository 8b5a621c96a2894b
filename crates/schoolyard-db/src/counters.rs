//! Named monotonic counters kept in the `counters` table.
//!
//! Sequential identifiers (such as student numbers) are drawn from here with a
//! single `INSERT ... ON CONFLICT DO UPDATE ... RETURNING` statement, so two
//! concurrent callers can never observe the same value and a retried call
//! simply takes the next one.

use sqlx::{Executor, Postgres};
use tracing::instrument;

/// Atomically increments the counter `name` and returns the new value.
///
/// The first call for a given name returns `1`.
#[instrument(skip(executor))]
pub async fn next_counter_value<'e, E>(executor: E, name: &str) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar::<_, i64>(
        r#"INSERT INTO counters (name, value) VALUES ($1, 1)
           ON CONFLICT (name) DO UPDATE SET value = counters.value + 1
           RETURNING value"#,
    )
    .bind(name)
    .fetch_one(executor)
    .await
}

/// Atomically reserves `count` consecutive values of counter `name`.
///
/// Returns the first reserved value; the block is `first..first + count`.
#[instrument(skip(executor))]
pub async fn reserve_counter_block<'e, E>(
    executor: E,
    name: &str,
    count: i64,
) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let last = sqlx::query_scalar::<_, i64>(
        r#"INSERT INTO counters (name, value) VALUES ($1, $2)
           ON CONFLICT (name) DO UPDATE SET value = counters.value + $2
           RETURNING value"#,
    )
    .bind(name)
    .bind(count)
    .fetch_one(executor)
    .await?;

    Ok(last - count + 1)
}
