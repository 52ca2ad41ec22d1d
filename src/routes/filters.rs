use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;

use crate::auth::{AccountScope, CurrentUser};
use crate::db;
use crate::error::{conflict_on_unique, AppError, ValidationErrors};
use crate::extract::{Params, Payload};
use crate::jsonapi::Document;
use crate::models::{AssociationCatalog, FilterWithAssociations, NewFilter};
use crate::pagination::{PageParams, Pagination};
use crate::serializers;
use crate::state::SharedState;

const ENDPOINT_TAKEN: &str = "Endpoint already has a filter";

#[derive(Deserialize)]
pub struct FilterPayload {
    pub filter: FilterParams,
}

#[derive(Deserialize)]
pub struct FilterParams {
    #[serde(default)]
    pub app_ids: Vec<i64>,
    #[serde(default)]
    pub event_type_ids: Vec<i64>,
    /// Level ids.
    #[serde(default)]
    pub levels: Vec<i64>,
    pub endpoint_id: Option<i64>,
    pub enabled: Option<bool>,
}

pub async fn list(
    current: CurrentUser,
    State(state): State<SharedState>,
    Params(params): Params<PageParams>,
) -> Result<Document, AppError> {
    let scope = current.scope();
    let page = Pagination::from(params);
    let filters = db::filters::list(&state.pool, scope, &page).await?;
    let total = db::filters::count(&state.pool, scope).await?;

    Ok(
        Document::collection(filters.iter().map(serializers::filter::resource).collect())
            .meta(page.meta(total)),
    )
}

pub async fn get(
    current: CurrentUser,
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<Document, AppError> {
    let filter = db::filters::find_by_id(&state.pool, current.scope(), id)
        .await?
        .ok_or_else(|| AppError::NotFound("Filter not found".to_string()))?;
    Ok(Document::single(serializers::filter::resource(&filter)))
}

pub async fn create(
    current: CurrentUser,
    State(state): State<SharedState>,
    Payload(req): Payload<FilterPayload>,
) -> Result<(StatusCode, Document), AppError> {
    let endpoint_id = req.filter.endpoint_id;
    let filter = create_filter(&state, &current, req.filter, endpoint_id).await?;
    Ok((
        StatusCode::CREATED,
        Document::single(serializers::filter::resource(&filter)),
    ))
}

pub async fn delete(
    current: CurrentUser,
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if !db::filters::delete(&state.pool, current.scope(), id).await? {
        return Err(AppError::NotFound("Filter not found".to_string()));
    }

    tracing::info!(
        account_number = %current.account.account_number,
        filter_id = id,
        "Filter deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_for_endpoint(
    current: CurrentUser,
    State(state): State<SharedState>,
    Path(endpoint_id): Path<i64>,
) -> Result<Document, AppError> {
    let scope = current.scope();
    find_endpoint(&state, scope, endpoint_id).await?;

    let filter = db::filters::find_by_endpoint(&state.pool, scope, endpoint_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Filter not found".to_string()))?;
    Ok(Document::single(serializers::filter::resource(&filter)))
}

/// A body `endpoint_id`, when present, must name the endpoint in the path.
pub async fn create_for_endpoint(
    current: CurrentUser,
    State(state): State<SharedState>,
    Path(endpoint_id): Path<i64>,
    Payload(req): Payload<FilterPayload>,
) -> Result<(StatusCode, Document), AppError> {
    find_endpoint(&state, current.scope(), endpoint_id).await?;

    if req.filter.endpoint_id.is_some_and(|id| id != endpoint_id) {
        let mut errors = ValidationErrors::new();
        errors.add("endpoint_id", "does not match the endpoint in the path");
        return Err(errors.into());
    }

    let filter = create_filter(&state, &current, req.filter, Some(endpoint_id)).await?;
    Ok((
        StatusCode::CREATED,
        Document::single(serializers::filter::resource(&filter)),
    ))
}

async fn find_endpoint(
    state: &SharedState,
    scope: AccountScope,
    endpoint_id: i64,
) -> Result<(), AppError> {
    db::endpoints::find_by_id(&state.pool, scope, endpoint_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Endpoint not found".to_string()))?;
    Ok(())
}

async fn create_filter(
    state: &SharedState,
    current: &CurrentUser,
    params: FilterParams,
    endpoint_id: Option<i64>,
) -> Result<FilterWithAssociations, AppError> {
    let scope = current.scope();
    let new_filter = NewFilter::new(
        params.enabled.unwrap_or(true),
        endpoint_id,
        params.app_ids,
        params.event_type_ids,
        params.levels,
    );

    if let Some(endpoint_id) = new_filter.endpoint_id {
        if db::endpoints::find_by_id(&state.pool, scope, endpoint_id)
            .await?
            .is_none()
        {
            let mut errors = ValidationErrors::new();
            errors.add("endpoint_id", "does not exist");
            return Err(errors.into());
        }
        if db::filters::find_by_endpoint(&state.pool, scope, endpoint_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(ENDPOINT_TAKEN.to_string()));
        }
    }

    let catalog = load_catalog(state, &new_filter).await?;
    new_filter.validate(&catalog)?;

    let filter = db::filters::create(&state.pool, scope, &new_filter)
        .await
        .map_err(conflict_on_unique(ENDPOINT_TAKEN))?;

    tracing::info!(
        account_number = %current.account.account_number,
        filter_id = filter.filter.id,
        endpoint_id = ?filter.filter.endpoint_id,
        "Filter created"
    );

    Ok(filter)
}

async fn load_catalog(
    state: &SharedState,
    new_filter: &NewFilter,
) -> Result<AssociationCatalog, AppError> {
    let app_ids = db::apps::existing_ids(&state.pool, &new_filter.app_ids).await?;
    let event_types = db::event_types::find_by_ids(&state.pool, &new_filter.event_type_ids).await?;
    let event_type_levels =
        db::event_types::level_links(&state.pool, &new_filter.event_type_ids).await?;
    let levels = db::levels::find_by_ids(&state.pool, &new_filter.level_ids).await?;

    Ok(AssociationCatalog {
        app_ids: app_ids.into_iter().collect(),
        event_type_apps: event_types.iter().map(|et| (et.id, et.app_id)).collect(),
        event_type_levels: event_type_levels.into_iter().collect(),
        level_ids: levels.iter().map(|l| l.id).collect(),
    })
}
