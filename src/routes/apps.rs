use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::db;
use crate::error::{conflict_on_unique, AppError, ValidationErrors};
use crate::extract::{Params, Payload};
use crate::jsonapi::Document;
use crate::pagination::{PageParams, Pagination};
use crate::serializers;
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct CreateApp {
    pub app: AppParams,
}

#[derive(Deserialize)]
pub struct AppParams {
    pub name: Option<String>,
}

pub async fn list(
    State(state): State<SharedState>,
    Params(params): Params<PageParams>,
) -> Result<Document, AppError> {
    let page = Pagination::from(params);
    let apps = db::apps::list(&state.pool, &page).await?;
    let total = db::apps::count(&state.pool).await?;

    let app_ids: Vec<i64> = apps.iter().map(|a| a.id).collect();
    let event_types = db::event_types::list_for_apps(&state.pool, &app_ids).await?;

    Ok(Document::collection(
        apps.iter()
            .map(|app| serializers::app::resource(app, &event_types))
            .collect(),
    )
    .include(event_types.iter().map(serializers::event_type::resource))
    .meta(page.meta(total)))
}

pub async fn get(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<Document, AppError> {
    let app = db::apps::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("App not found".to_string()))?;
    let event_types = db::event_types::list_for_apps(&state.pool, &[app.id]).await?;

    Ok(
        Document::single(serializers::app::resource(&app, &event_types))
            .include(event_types.iter().map(serializers::event_type::resource)),
    )
}

pub async fn create(
    current: CurrentUser,
    State(state): State<SharedState>,
    Payload(req): Payload<CreateApp>,
) -> Result<(StatusCode, Document), AppError> {
    current.require_catalog_admin(&state.config)?;

    let name = required_name(req.app.name.as_deref(), "name")?;

    let app = db::apps::create(&state.pool, &name)
        .await
        .map_err(conflict_on_unique("An app with this name already exists"))?;

    tracing::info!(
        account_number = %current.account.account_number,
        app_id = app.id,
        name = %app.name,
        "App created"
    );

    Ok((
        StatusCode::CREATED,
        Document::single(serializers::app::resource(&app, &[])),
    ))
}

pub async fn delete(
    current: CurrentUser,
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    current.require_catalog_admin(&state.config)?;

    if !db::apps::delete(&state.pool, id).await? {
        return Err(AppError::NotFound("App not found".to_string()));
    }
    tracing::info!(
        account_number = %current.account.account_number,
        app_id = id,
        "App deleted"
    );
    Ok(StatusCode::NO_CONTENT)
}

/// Trimmed, non-blank, at most 255 characters.
pub(crate) fn required_name(value: Option<&str>, field: &str) -> Result<String, AppError> {
    let mut errors = ValidationErrors::new();
    let value = value.map(str::trim).unwrap_or_default();
    if value.is_empty() {
        errors.add(field, "can't be blank");
    } else if value.chars().count() > 255 {
        errors.add(field, "is too long (maximum is 255 characters)");
    }
    errors.into_result()?;
    Ok(value.to_string())
}
