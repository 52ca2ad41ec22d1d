use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::auth::AccountScope;
use crate::config::Config;
use crate::error::AppError;
use crate::models::{Account, User};

/// The authenticated caller, resolved once per request by the identity gate.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub account: Account,
    pub user: User,
}

impl CurrentUser {
    pub fn scope(&self) -> AccountScope {
        AccountScope::new(self.account.id)
    }

    /// Apps, event types and levels are shared by every account; only
    /// configured operator accounts may change them.
    pub fn require_catalog_admin(&self, config: &Config) -> Result<(), AppError> {
        if config.is_catalog_admin(&self.account.account_number) {
            Ok(())
        } else {
            tracing::info!(
                account_number = %self.account.account_number,
                username = %self.user.username,
                "Catalog change refused"
            );
            Err(AppError::Forbidden("Catalog admin access required".to_string()))
        }
    }
}

impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| {
                AppError::Unauthorized("X-RH-IDENTITY header should be provided".to_string())
            })
    }
}
