use sqlx::PgPool;

use crate::auth::identity::Identity;
use crate::db;
use crate::error::ValidationErrors;
use crate::models::{Account, NewUser, User};

#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    #[error("Could not create user with X-RH-IDENTITY contents: {}", .0.full_messages())]
    Invalid(ValidationErrors),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Map identity claims to a persisted account and user, creating either when absent.
///
/// Both inserts are insert-or-fetch against a unique constraint, so concurrent
/// first requests for the same account converge on one row.
pub async fn resolve(pool: &PgPool, identity: &Identity) -> Result<(Account, User), ProvisionError> {
    let account_number = identity.account_number.trim();
    if account_number.is_empty() {
        let mut errors = ValidationErrors::new();
        errors.add("account_number", "can't be blank");
        tracing::info!("User authentication FAILED - could not create account: {}", errors.full_messages());
        return Err(ProvisionError::Invalid(errors));
    }

    let account = db::accounts::upsert(pool, account_number, identity.org_id()).await?;

    if let Some(username) = identity.username() {
        if let Some(user) = db::users::find_by_username(pool, account.id, username.trim()).await? {
            tracing::info!(
                account_number = %account.account_number,
                username = %user.username,
                "User authentication SUCCESS"
            );
            return Ok((account, user));
        }
    }

    let new_user = NewUser::from_identity(identity);
    if let Err(errors) = new_user.validate() {
        tracing::info!(
            account_number = %account.account_number,
            "User authentication FAILED - could not create user: {}",
            errors.full_messages()
        );
        return Err(ProvisionError::Invalid(errors));
    }

    let user = db::users::insert_or_fetch(pool, account.id, &new_user).await?;
    tracing::info!(
        account_number = %account.account_number,
        username = %user.username,
        "User authentication SUCCESS - creating user"
    );

    Ok((account, user))
}
