use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;

use super::apps::required_name;
use crate::auth::CurrentUser;
use crate::db;
use crate::error::{conflict_on_unique, AppError, ValidationErrors};
use crate::extract::{Params, Payload};
use crate::jsonapi::Document;
use crate::pagination::{PageParams, Pagination};
use crate::serializers;
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct CreateEventType {
    pub event_type: EventTypeParams,
}

#[derive(Deserialize)]
pub struct EventTypeParams {
    pub name: Option<String>,
    #[serde(default)]
    pub level_ids: Vec<i64>,
}

pub async fn list_by_app(
    State(state): State<SharedState>,
    Path(app_id): Path<i64>,
    Params(params): Params<PageParams>,
) -> Result<Document, AppError> {
    db::apps::find_by_id(&state.pool, app_id)
        .await?
        .ok_or_else(|| AppError::NotFound("App not found".to_string()))?;

    let page = Pagination::from(params);
    let event_types = db::event_types::list_by_app(&state.pool, app_id, &page).await?;
    let total = db::event_types::count_by_app(&state.pool, app_id).await?;

    Ok(Document::collection(
        event_types
            .iter()
            .map(serializers::event_type::resource)
            .collect(),
    )
    .meta(page.meta(total)))
}

pub async fn get(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<Document, AppError> {
    let event_type = db::event_types::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Event type not found".to_string()))?;
    let levels = db::levels::list_by_event_type(&state.pool, event_type.id).await?;

    Ok(
        Document::single(serializers::event_type::with_levels(&event_type, &levels))
            .include(levels.iter().map(serializers::level::resource)),
    )
}

pub async fn create(
    current: CurrentUser,
    State(state): State<SharedState>,
    Path(app_id): Path<i64>,
    Payload(req): Payload<CreateEventType>,
) -> Result<(StatusCode, Document), AppError> {
    current.require_catalog_admin(&state.config)?;

    db::apps::find_by_id(&state.pool, app_id)
        .await?
        .ok_or_else(|| AppError::NotFound("App not found".to_string()))?;

    let name = required_name(req.event_type.name.as_deref(), "name")?;

    let mut level_ids = req.event_type.level_ids;
    level_ids.sort_unstable();
    level_ids.dedup();

    let levels = db::levels::find_by_ids(&state.pool, &level_ids).await?;
    if levels.len() != level_ids.len() {
        let unknown: Vec<String> = level_ids
            .iter()
            .filter(|id| !levels.iter().any(|l| l.id == **id))
            .map(i64::to_string)
            .collect();
        let mut errors = ValidationErrors::new();
        errors.add("level_ids", format!("contains unknown ids: {}", unknown.join(", ")));
        return Err(errors.into());
    }

    let mut tx = state.pool.begin().await?;
    let event_type = db::event_types::create(&mut *tx, app_id, &name)
        .await
        .map_err(conflict_on_unique("An event type with this name already exists for the app"))?;
    db::event_types::attach_levels(&mut *tx, event_type.id, &level_ids).await?;
    tx.commit().await?;

    tracing::info!(
        account_number = %current.account.account_number,
        event_type_id = event_type.id,
        app_id,
        name = %event_type.name,
        "Event type created"
    );

    Ok((
        StatusCode::CREATED,
        Document::single(serializers::event_type::with_levels(&event_type, &levels))
            .include(levels.iter().map(serializers::level::resource)),
    ))
}

pub async fn delete(
    current: CurrentUser,
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    current.require_catalog_admin(&state.config)?;

    if !db::event_types::delete(&state.pool, id).await? {
        return Err(AppError::NotFound("Event type not found".to_string()));
    }
    tracing::info!(
        account_number = %current.account.account_number,
        event_type_id = id,
        "Event type deleted"
    );
    Ok(StatusCode::NO_CONTENT)
}
