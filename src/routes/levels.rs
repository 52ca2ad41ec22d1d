use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;

use super::apps::required_name;
use crate::auth::CurrentUser;
use crate::db;
use crate::error::{conflict_on_unique, AppError};
use crate::extract::{Params, Payload};
use crate::jsonapi::Document;
use crate::pagination::{PageParams, Pagination};
use crate::serializers;
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct CreateLevel {
    pub level: LevelParams,
}

#[derive(Deserialize)]
pub struct LevelParams {
    pub title: Option<String>,
}

pub async fn list(
    State(state): State<SharedState>,
    Params(params): Params<PageParams>,
) -> Result<Document, AppError> {
    let page = Pagination::from(params);
    let levels = db::levels::list(&state.pool, &page).await?;
    let total = db::levels::count(&state.pool).await?;

    Ok(
        Document::collection(levels.iter().map(serializers::level::resource).collect())
            .meta(page.meta(total)),
    )
}

pub async fn get(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<Document, AppError> {
    let level = db::levels::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Level not found".to_string()))?;
    Ok(Document::single(serializers::level::resource(&level)))
}

pub async fn create(
    current: CurrentUser,
    State(state): State<SharedState>,
    Payload(req): Payload<CreateLevel>,
) -> Result<(StatusCode, Document), AppError> {
    current.require_catalog_admin(&state.config)?;

    let title = required_name(req.level.title.as_deref(), "title")?;

    let level = db::levels::create(&state.pool, &title)
        .await
        .map_err(conflict_on_unique("A level with this title already exists"))?;

    tracing::info!(
        account_number = %current.account.account_number,
        level_id = level.id,
        title = %level.title,
        "Level created"
    );

    Ok((
        StatusCode::CREATED,
        Document::single(serializers::level::resource(&level)),
    ))
}

pub async fn delete(
    current: CurrentUser,
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    current.require_catalog_admin(&state.config)?;

    if !db::levels::delete(&state.pool, id).await? {
        return Err(AppError::NotFound("Level not found".to_string()));
    }
    tracing::info!(
        account_number = %current.account.account_number,
        level_id = id,
        "Level deleted"
    );
    Ok(StatusCode::NO_CONTENT)
}
