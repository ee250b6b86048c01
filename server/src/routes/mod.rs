//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the catalog and page-instance REST endpoints under a
//! single Axum router. The builder frontend is an external host; this
//! surface is the persistence collaborator it talks to.

pub mod definitions;
pub mod instances;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the full application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/api/definitions",
            get(definitions::list_definitions).post(definitions::create_definition),
        )
        .route(
            "/api/definitions/{id}",
            get(definitions::get_definition).put(definitions::update_definition),
        )
        .route(
            "/api/pages/{page_id}/instances",
            get(instances::list_instances).post(instances::create_instance),
        )
        .route("/api/pages/{page_id}/instances/move", post(instances::move_instances))
        .route(
            "/api/pages/{page_id}/instances/{id}",
            axum::routing::patch(instances::update_instance).delete(instances::delete_instance),
        )
        .route("/healthz", get(healthz))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
