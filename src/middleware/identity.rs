use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::auth::provision::{self, ProvisionError};
use crate::auth::{identity, CurrentUser};
use crate::error::AppError;
use crate::state::SharedState;

/// Authentication gate for every resource route.
///
/// Decodes `X-RH-IDENTITY`, provisions the account and user, and stores the
/// resulting [`CurrentUser`] in the request extensions. Any failure ends the
/// request with a 401 before a handler runs.
pub async fn require_identity(
    State(state): State<SharedState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let identity = identity::from_headers(req.headers()).map_err(|e| {
        tracing::info!("User authentication FAILED: {e}");
        AppError::Unauthorized(e.reason().to_string())
    })?;

    let (account, user) = provision::resolve(&state.pool, &identity)
        .await
        .map_err(|e| match e {
            ProvisionError::Invalid(_) => AppError::Unauthorized(e.to_string()),
            ProvisionError::Database(err) => AppError::Database(err),
        })?;

    req.extensions_mut().insert(CurrentUser { account, user });
    Ok(next.run(req).await)
}
