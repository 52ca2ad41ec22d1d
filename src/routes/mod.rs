pub mod apps;
pub mod endpoints;
pub mod event_types;
pub mod filters;
pub mod levels;

use axum::routing::get;
use axum::Router;

use crate::state::SharedState;

/// Resource routes, relative to the configured `{PATH_PREFIX}/{APP_NAME}` mount.
pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Apps
        .route("/apps", get(apps::list).post(apps::create))
        .route("/apps/{id}", get(apps::get).delete(apps::delete))
        .route(
            "/apps/{id}/event_types",
            get(event_types::list_by_app).post(event_types::create),
        )
        // Event types
        .route(
            "/event_types/{id}",
            get(event_types::get).delete(event_types::delete),
        )
        // Levels
        .route("/levels", get(levels::list).post(levels::create))
        .route("/levels/{id}", get(levels::get).delete(levels::delete))
        // Endpoints
        .route("/endpoints", get(endpoints::list).post(endpoints::create))
        .route(
            "/endpoints/{id}",
            get(endpoints::get)
                .put(endpoints::update)
                .delete(endpoints::delete),
        )
        .route(
            "/endpoints/{id}/filter",
            get(filters::get_for_endpoint).post(filters::create_for_endpoint),
        )
        // Filters
        .route("/filters", get(filters::list).post(filters::create))
        .route("/filters/{id}", get(filters::get).delete(filters::delete))
}
