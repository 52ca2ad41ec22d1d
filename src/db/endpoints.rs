use std::collections::HashMap;

use sqlx::PgPool;

use crate::auth::AccountScope;
use crate::models::{Endpoint, EndpointChanges};
use crate::pagination::Pagination;

pub async fn list(
    pool: &PgPool,
    scope: AccountScope,
    page: &Pagination,
) -> Result<Vec<Endpoint>, sqlx::Error> {
    sqlx::query_as::<_, Endpoint>(
        "SELECT * FROM endpoints WHERE account_id = $1 ORDER BY id LIMIT $2 OFFSET $3",
    )
    .bind(scope.account_id())
    .bind(page.sql_limit())
    .bind(page.sql_offset())
    .fetch_all(pool)
    .await
}

pub async fn count(pool: &PgPool, scope: AccountScope) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM endpoints WHERE account_id = $1")
        .bind(scope.account_id())
        .fetch_one(pool)
        .await
}

pub async fn find_by_id<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    scope: AccountScope,
    id: i64,
) -> Result<Option<Endpoint>, sqlx::Error> {
    sqlx::query_as::<_, Endpoint>("SELECT * FROM endpoints WHERE id = $1 AND account_id = $2")
        .bind(id)
        .bind(scope.account_id())
        .fetch_optional(executor)
        .await
}

/// `changes` must already be validated for create.
pub async fn create(
    pool: &PgPool,
    scope: AccountScope,
    changes: &EndpointChanges,
) -> Result<Endpoint, sqlx::Error> {
    sqlx::query_as::<_, Endpoint>(
        "INSERT INTO endpoints (account_id, name, url, active)
         VALUES ($1, $2, $3, COALESCE($4, true)) RETURNING *",
    )
    .bind(scope.account_id())
    .bind(changes.name.as_deref().map(str::trim))
    .bind(changes.url.as_deref().map(str::trim))
    .bind(changes.active)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    scope: AccountScope,
    id: i64,
    changes: &EndpointChanges,
) -> Result<Option<Endpoint>, sqlx::Error> {
    sqlx::query_as::<_, Endpoint>(
        "UPDATE endpoints SET
           name = COALESCE($3, name),
           url = COALESCE($4, url),
           active = COALESCE($5, active),
           updated_at = now()
         WHERE id = $1 AND account_id = $2
         RETURNING *",
    )
    .bind(id)
    .bind(scope.account_id())
    .bind(changes.name.as_deref().map(str::trim))
    .bind(changes.url.as_deref().map(str::trim))
    .bind(changes.active)
    .fetch_optional(pool)
    .await
}

/// Returns whether a row was deleted. The endpoint's filter goes with it.
pub async fn delete(pool: &PgPool, scope: AccountScope, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM endpoints WHERE id = $1 AND account_id = $2")
        .bind(id)
        .bind(scope.account_id())
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// endpoint id -> filter id, for the given endpoints.
pub async fn filter_ids(
    pool: &PgPool,
    scope: AccountScope,
    endpoint_ids: &[i64],
) -> Result<HashMap<i64, i64>, sqlx::Error> {
    let rows = sqlx::query_as::<_, (i64, i64)>(
        "SELECT endpoint_id, id FROM filters
         WHERE account_id = $1 AND endpoint_id = ANY($2)",
    )
    .bind(scope.account_id())
    .bind(endpoint_ids)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().collect())
}
