use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::db;
use crate::error::AppError;
use crate::extract::{Params, Payload};
use crate::jsonapi::Document;
use crate::models::EndpointChanges;
use crate::pagination::{PageParams, Pagination};
use crate::serializers;
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct EndpointPayload {
    pub endpoint: EndpointParams,
}

#[derive(Deserialize)]
pub struct EndpointParams {
    pub name: Option<String>,
    pub url: Option<String>,
    pub active: Option<bool>,
}

impl From<EndpointParams> for EndpointChanges {
    fn from(params: EndpointParams) -> Self {
        EndpointChanges {
            name: params.name,
            url: params.url,
            active: params.active,
        }
    }
}

pub async fn list(
    current: CurrentUser,
    State(state): State<SharedState>,
    Params(params): Params<PageParams>,
) -> Result<Document, AppError> {
    let scope = current.scope();
    let page = Pagination::from(params);
    let endpoints = db::endpoints::list(&state.pool, scope, &page).await?;
    let total = db::endpoints::count(&state.pool, scope).await?;

    let ids: Vec<i64> = endpoints.iter().map(|e| e.id).collect();
    let filter_ids = db::endpoints::filter_ids(&state.pool, scope, &ids).await?;

    Ok(Document::collection(
        endpoints
            .iter()
            .map(|e| serializers::endpoint::resource(e, filter_ids.get(&e.id).copied()))
            .collect(),
    )
    .meta(page.meta(total)))
}

pub async fn get(
    current: CurrentUser,
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<Document, AppError> {
    let scope = current.scope();
    let endpoint = db::endpoints::find_by_id(&state.pool, scope, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Endpoint not found".to_string()))?;
    let filter_ids = db::endpoints::filter_ids(&state.pool, scope, &[endpoint.id]).await?;

    Ok(Document::single(serializers::endpoint::resource(
        &endpoint,
        filter_ids.get(&endpoint.id).copied(),
    )))
}

pub async fn create(
    current: CurrentUser,
    State(state): State<SharedState>,
    Payload(req): Payload<EndpointPayload>,
) -> Result<(StatusCode, Document), AppError> {
    let changes = EndpointChanges::from(req.endpoint);
    changes.validate(true)?;

    let endpoint = db::endpoints::create(&state.pool, current.scope(), &changes).await?;

    tracing::info!(
        account_number = %current.account.account_number,
        endpoint_id = endpoint.id,
        "Endpoint created"
    );

    Ok((
        StatusCode::CREATED,
        Document::single(serializers::endpoint::resource(&endpoint, None)),
    ))
}

pub async fn update(
    current: CurrentUser,
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Payload(req): Payload<EndpointPayload>,
) -> Result<Document, AppError> {
    let scope = current.scope();
    let changes = EndpointChanges::from(req.endpoint);
    changes.validate(false)?;

    let endpoint = db::endpoints::update(&state.pool, scope, id, &changes)
        .await?
        .ok_or_else(|| AppError::NotFound("Endpoint not found".to_string()))?;
    let filter_ids = db::endpoints::filter_ids(&state.pool, scope, &[endpoint.id]).await?;

    tracing::info!(
        account_number = %current.account.account_number,
        endpoint_id = endpoint.id,
        "Endpoint updated"
    );

    Ok(Document::single(serializers::endpoint::resource(
        &endpoint,
        filter_ids.get(&endpoint.id).copied(),
    )))
}

pub async fn delete(
    current: CurrentUser,
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if !db::endpoints::delete(&state.pool, current.scope(), id).await? {
        return Err(AppError::NotFound("Endpoint not found".to_string()));
    }

    tracing::info!(
        account_number = %current.account.account_number,
        endpoint_id = id,
        "Endpoint deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}
