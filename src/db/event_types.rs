use sqlx::PgPool;

use crate::models::EventType;
use crate::pagination::Pagination;

pub async fn list_by_app(
    pool: &PgPool,
    app_id: i64,
    page: &Pagination,
) -> Result<Vec<EventType>, sqlx::Error> {
    sqlx::query_as::<_, EventType>(
        "SELECT * FROM event_types WHERE app_id = $1 ORDER BY id LIMIT $2 OFFSET $3",
    )
    .bind(app_id)
    .bind(page.sql_limit())
    .bind(page.sql_offset())
    .fetch_all(pool)
    .await
}

pub async fn count_by_app(pool: &PgPool, app_id: i64) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM event_types WHERE app_id = $1")
        .bind(app_id)
        .fetch_one(pool)
        .await
}

/// All event types of the given apps, for sideloading.
pub async fn list_for_apps(pool: &PgPool, app_ids: &[i64]) -> Result<Vec<EventType>, sqlx::Error> {
    sqlx::query_as::<_, EventType>(
        "SELECT * FROM event_types WHERE app_id = ANY($1) ORDER BY id",
    )
    .bind(app_ids)
    .fetch_all(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<EventType>, sqlx::Error> {
    sqlx::query_as::<_, EventType>("SELECT * FROM event_types WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_ids(pool: &PgPool, ids: &[i64]) -> Result<Vec<EventType>, sqlx::Error> {
    sqlx::query_as::<_, EventType>("SELECT * FROM event_types WHERE id = ANY($1) ORDER BY id")
        .bind(ids)
        .fetch_all(pool)
        .await
}

/// `(event_type_id, level_id)` links for the given event types.
pub async fn level_links(
    pool: &PgPool,
    event_type_ids: &[i64],
) -> Result<Vec<(i64, i64)>, sqlx::Error> {
    sqlx::query_as::<_, (i64, i64)>(
        "SELECT event_type_id, level_id FROM event_types_levels
         WHERE event_type_id = ANY($1)
         ORDER BY event_type_id, level_id",
    )
    .bind(event_type_ids)
    .fetch_all(pool)
    .await
}

pub async fn create<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    app_id: i64,
    name: &str,
) -> Result<EventType, sqlx::Error> {
    sqlx::query_as::<_, EventType>(
        "INSERT INTO event_types (app_id, name) VALUES ($1, $2) RETURNING *",
    )
    .bind(app_id)
    .bind(name)
    .fetch_one(executor)
    .await
}

pub async fn attach_levels<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    event_type_id: i64,
    level_ids: &[i64],
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO event_types_levels (event_type_id, level_id)
         SELECT $1::bigint, UNNEST($2::bigint[])
         ON CONFLICT DO NOTHING",
    )
    .bind(event_type_id)
    .bind(level_ids)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM event_types WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
