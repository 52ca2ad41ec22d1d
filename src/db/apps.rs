use sqlx::PgPool;

use crate::models::App;
use crate::pagination::Pagination;

pub async fn list(pool: &PgPool, page: &Pagination) -> Result<Vec<App>, sqlx::Error> {
    sqlx::query_as::<_, App>("SELECT * FROM apps ORDER BY id LIMIT $1 OFFSET $2")
        .bind(page.sql_limit())
        .bind(page.sql_offset())
        .fetch_all(pool)
        .await
}

pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM apps")
        .fetch_one(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<App>, sqlx::Error> {
    sqlx::query_as::<_, App>("SELECT * FROM apps WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// The subset of `ids` that exist.
pub async fn existing_ids(pool: &PgPool, ids: &[i64]) -> Result<Vec<i64>, sqlx::Error> {
    sqlx::query_scalar("SELECT id FROM apps WHERE id = ANY($1)")
        .bind(ids)
        .fetch_all(pool)
        .await
}

pub async fn create(pool: &PgPool, name: &str) -> Result<App, sqlx::Error> {
    sqlx::query_as::<_, App>("INSERT INTO apps (name) VALUES ($1) RETURNING *")
        .bind(name)
        .fetch_one(pool)
        .await
}

/// Returns whether a row was deleted. Event types go with it.
pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM apps WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
