pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod jsonapi;
pub mod middleware;
pub mod models;
pub mod pagination;
pub mod routes;
pub mod serializers;
pub mod state;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::middleware::identity::require_identity;
use crate::state::{AppState, SharedState};

pub fn build_app(pool: PgPool, config: Config) -> Router {
    let base_path = config.base_path();
    let max_body_size = config.max_body_size;

    let state: SharedState = Arc::new(AppState { pool, config });

    // Every resource route sits behind the identity gate; /health does not.
    let api = routes::api_routes().route_layer(axum::middleware::from_fn_with_state(
        state.clone(),
        require_identity,
    ));

    Router::new()
        .nest(&base_path, api)
        .route("/health", axum::routing::get(health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(max_body_size))
                .layer(SetResponseHeaderLayer::overriding(
                    HeaderName::from_static("x-content-type-options"),
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    HeaderName::from_static("x-frame-options"),
                    HeaderValue::from_static("DENY"),
                )),
        )
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
