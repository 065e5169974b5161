//! Interaction endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::debug;

use crate::db::{Interaction, NewInteraction};
use crate::AppState;

use super::extract::ValidatedJson;
use super::validation::parse_id;

pub async fn list_interactions(State(state): State<Arc<AppState>>) -> Json<Vec<Interaction>> {
    Json(state.storage.read().get_all_interactions())
}

/// Interactions for one client; an unknown or malformed client id yields `[]`
pub async fn list_client_interactions(
    State(state): State<Arc<AppState>>,
    Path(client_id): Path<String>,
) -> Json<Vec<Interaction>> {
    let interactions = match parse_id(&client_id) {
        Some(id) => state.storage.read().get_interactions_by_client(id),
        None => Vec::new(),
    };
    Json(interactions)
}

pub async fn create_interaction(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<NewInteraction>,
) -> (StatusCode, Json<Interaction>) {
    let interaction = state.storage.write().create_interaction(req);
    debug!(
        interaction_id = interaction.id,
        client_id = interaction.client_id,
        kind = interaction.interaction_type.as_str(),
        "Interaction logged"
    );
    (StatusCode::CREATED, Json(interaction))
}
