use sqlx::PgPool;

use crate::models::Level;
use crate::pagination::Pagination;

pub async fn list(pool: &PgPool, page: &Pagination) -> Result<Vec<Level>, sqlx::Error> {
    sqlx::query_as::<_, Level>("SELECT * FROM levels ORDER BY id LIMIT $1 OFFSET $2")
        .bind(page.sql_limit())
        .bind(page.sql_offset())
        .fetch_all(pool)
        .await
}

pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM levels")
        .fetch_one(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Level>, sqlx::Error> {
    sqlx::query_as::<_, Level>("SELECT * FROM levels WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_ids(pool: &PgPool, ids: &[i64]) -> Result<Vec<Level>, sqlx::Error> {
    sqlx::query_as::<_, Level>("SELECT * FROM levels WHERE id = ANY($1) ORDER BY id")
        .bind(ids)
        .fetch_all(pool)
        .await
}

pub async fn list_by_event_type(
    pool: &PgPool,
    event_type_id: i64,
) -> Result<Vec<Level>, sqlx::Error> {
    sqlx::query_as::<_, Level>(
        "SELECT l.* FROM levels l
         JOIN event_types_levels etl ON etl.level_id = l.id
         WHERE etl.event_type_id = $1
         ORDER BY l.id",
    )
    .bind(event_type_id)
    .fetch_all(pool)
    .await
}

pub async fn create(pool: &PgPool, title: &str) -> Result<Level, sqlx::Error> {
    sqlx::query_as::<_, Level>("INSERT INTO levels (title) VALUES ($1) RETURNING *")
        .bind(title)
        .fetch_one(pool)
        .await
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM levels WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
