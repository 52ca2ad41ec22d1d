use sqlx::PgPool;

use crate::models::{NewUser, User};

pub async fn find_by_username(
    pool: &PgPool,
    account_id: i64,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE account_id = $1 AND username = $2")
        .bind(account_id)
        .bind(username)
        .fetch_optional(pool)
        .await
}

/// Insert-or-fetch keyed by `(account_id, username)`. A concurrent insert of
/// the same user returns the row that won.
pub async fn insert_or_fetch(
    pool: &PgPool,
    account_id: i64,
    user: &NewUser,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "INSERT INTO users (account_id, username, email, first_name, last_name)
         VALUES ($1, $2, $3, $4, $5)
         ON CONFLICT (account_id, username) DO UPDATE SET username = EXCLUDED.username
         RETURNING *",
    )
    .bind(account_id)
    .bind(&user.username)
    .bind(&user.email)
    .bind(&user.first_name)
    .bind(&user.last_name)
    .fetch_one(pool)
    .await
}
