mod clients;
mod dashboard;
pub mod error;
mod extract;
mod followups;
mod interactions;
mod notes;
pub mod validation;


use axum::{
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Router,
};
use std::any::Any;
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use crate::AppState;

use self::error::ApiError;

pub fn create_router(state: Arc<AppState>) -> Router {
    let dashboard_routes = Router::new()
        .route("/followups", get(dashboard::follow_ups))
        .route("/lead-scoring", get(dashboard::lead_scoring))
        .route("/tags", get(dashboard::tags))
        .route("/timeline", get(dashboard::interaction_timeline));

    let api_routes = Router::new()
        // Clients
        .route(
            "/clients",
            get(clients::list_clients).post(clients::create_client),
        )
        .route(
            "/clients/:id",
            get(clients::get_client).patch(clients::update_client),
        )
        // Interactions
        .route(
            "/interactions",
            get(interactions::list_interactions).post(interactions::create_interaction),
        )
        .route(
            "/interactions/client/:client_id",
            get(interactions::list_client_interactions),
        )
        // Follow-ups
        .route(
            "/followups",
            get(followups::list_follow_ups).post(followups::create_follow_up),
        )
        .route(
            "/followups/client/:client_id",
            get(followups::list_client_follow_ups),
        )
        .route("/followups/:id", patch(followups::update_follow_up))
        // Notes
        .route("/notes", post(notes::create_note))
        .route("/notes/client/:client_id", get(notes::list_client_notes))
        .nest("/dashboard", dashboard_routes);

    let router = Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http());

    let router = if state.config.server.cors_permissive {
        router.layer(CorsLayer::permissive())
    } else {
        router
    };

    router.with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

/// Turn a handler panic into the generic 500 envelope
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic"
    };
    tracing::error!(panic = %detail, "Request handler panicked");
    ApiError::internal("Internal server error").into_response()
}
