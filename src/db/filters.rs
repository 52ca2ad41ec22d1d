use std::collections::HashMap;

use sqlx::PgPool;

use crate::auth::AccountScope;
use crate::models::{Filter, FilterWithAssociations, NewFilter};
use crate::pagination::Pagination;

pub async fn list(
    pool: &PgPool,
    scope: AccountScope,
    page: &Pagination,
) -> Result<Vec<FilterWithAssociations>, sqlx::Error> {
    let filters = sqlx::query_as::<_, Filter>(
        "SELECT * FROM filters WHERE account_id = $1 ORDER BY id LIMIT $2 OFFSET $3",
    )
    .bind(scope.account_id())
    .bind(page.sql_limit())
    .bind(page.sql_offset())
    .fetch_all(pool)
    .await?;
    with_associations(pool, filters).await
}

pub async fn count(pool: &PgPool, scope: AccountScope) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM filters WHERE account_id = $1")
        .bind(scope.account_id())
        .fetch_one(pool)
        .await
}

pub async fn find_by_id(
    pool: &PgPool,
    scope: AccountScope,
    id: i64,
) -> Result<Option<FilterWithAssociations>, sqlx::Error> {
    let filter = sqlx::query_as::<_, Filter>(
        "SELECT * FROM filters WHERE id = $1 AND account_id = $2",
    )
    .bind(id)
    .bind(scope.account_id())
    .fetch_optional(pool)
    .await?;
    load_one(pool, filter).await
}

pub async fn find_by_endpoint(
    pool: &PgPool,
    scope: AccountScope,
    endpoint_id: i64,
) -> Result<Option<FilterWithAssociations>, sqlx::Error> {
    let filter = sqlx::query_as::<_, Filter>(
        "SELECT * FROM filters WHERE endpoint_id = $1 AND account_id = $2",
    )
    .bind(endpoint_id)
    .bind(scope.account_id())
    .fetch_optional(pool)
    .await?;
    load_one(pool, filter).await
}

/// Insert the filter and its association rows in one transaction.
///
/// A second filter for the same endpoint fails on the unique `endpoint_id`
/// constraint.
pub async fn create(
    pool: &PgPool,
    scope: AccountScope,
    new_filter: &NewFilter,
) -> Result<FilterWithAssociations, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let filter = sqlx::query_as::<_, Filter>(
        "INSERT INTO filters (account_id, endpoint_id, enabled) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(scope.account_id())
    .bind(new_filter.endpoint_id)
    .bind(new_filter.enabled)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        "INSERT INTO apps_filters (filter_id, app_id) SELECT $1::bigint, UNNEST($2::bigint[])",
    )
    .bind(filter.id)
    .bind(&new_filter.app_ids)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        "INSERT INTO event_types_filters (filter_id, event_type_id) SELECT $1::bigint, UNNEST($2::bigint[])",
    )
    .bind(filter.id)
    .bind(&new_filter.event_type_ids)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        "INSERT INTO filters_levels (filter_id, level_id) SELECT $1::bigint, UNNEST($2::bigint[])",
    )
    .bind(filter.id)
    .bind(&new_filter.level_ids)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(FilterWithAssociations {
        filter,
        app_ids: new_filter.app_ids.clone(),
        event_type_ids: new_filter.event_type_ids.clone(),
        level_ids: new_filter.level_ids.clone(),
    })
}

/// Returns whether a row was deleted. Association rows cascade.
pub async fn delete(pool: &PgPool, scope: AccountScope, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM filters WHERE id = $1 AND account_id = $2")
        .bind(id)
        .bind(scope.account_id())
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

async fn load_one(
    pool: &PgPool,
    filter: Option<Filter>,
) -> Result<Option<FilterWithAssociations>, sqlx::Error> {
    match filter {
        Some(filter) => Ok(with_associations(pool, vec![filter]).await?.pop()),
        None => Ok(None),
    }
}

/// Resolve association ids for a batch of filters with one query per join table.
async fn with_associations(
    pool: &PgPool,
    filters: Vec<Filter>,
) -> Result<Vec<FilterWithAssociations>, sqlx::Error> {
    if filters.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i64> = filters.iter().map(|f| f.id).collect();

    let mut apps = links(
        pool,
        "SELECT filter_id, app_id FROM apps_filters
         WHERE filter_id = ANY($1) ORDER BY app_id",
        &ids,
    )
    .await?;
    let mut event_types = links(
        pool,
        "SELECT filter_id, event_type_id FROM event_types_filters
         WHERE filter_id = ANY($1) ORDER BY event_type_id",
        &ids,
    )
    .await?;
    let mut levels = links(
        pool,
        "SELECT filter_id, level_id FROM filters_levels
         WHERE filter_id = ANY($1) ORDER BY level_id",
        &ids,
    )
    .await?;

    Ok(filters
        .into_iter()
        .map(|filter| FilterWithAssociations {
            app_ids: apps.remove(&filter.id).unwrap_or_default(),
            event_type_ids: event_types.remove(&filter.id).unwrap_or_default(),
            level_ids: levels.remove(&filter.id).unwrap_or_default(),
            filter,
        })
        .collect())
}

async fn links(
    pool: &PgPool,
    sql: &'static str,
    filter_ids: &[i64],
) -> Result<HashMap<i64, Vec<i64>>, sqlx::Error> {
    let rows = sqlx::query_as::<_, (i64, i64)>(sql)
        .bind(filter_ids)
        .fetch_all(pool)
        .await?;
    let mut grouped: HashMap<i64, Vec<i64>> = HashMap::new();
    for (filter_id, other_id) in rows {
        grouped.entry(filter_id).or_default().push(other_id);
    }
    Ok(grouped)
}
