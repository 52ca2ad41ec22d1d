use sqlx::PgPool;

use crate::models::Account;

/// Insert-or-fetch keyed by `account_number`. A known org id is never overwritten.
pub async fn upsert(
    pool: &PgPool,
    account_number: &str,
    org_id: Option<&str>,
) -> Result<Account, sqlx::Error> {
    sqlx::query_as::<_, Account>(
        "INSERT INTO accounts (account_number, org_id) VALUES ($1, $2)
         ON CONFLICT (account_number) DO UPDATE
           SET org_id = COALESCE(accounts.org_id, EXCLUDED.org_id)
         RETURNING *",
    )
    .bind(account_number)
    .bind(org_id)
    .fetch_one(pool)
    .await
}
