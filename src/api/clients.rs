//! Client endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::info;

use crate::db::{Client, ClientUpdate, NewClient};
use crate::AppState;

use super::error::ApiError;
use super::extract::ValidatedJson;
use super::validation::parse_id;

/// List all clients in id order
pub async fn list_clients(State(state): State<Arc<AppState>>) -> Json<Vec<Client>> {
    Json(state.storage.read().get_all_clients())
}

pub async fn get_client(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Client>, ApiError> {
    parse_id(&id)
        .and_then(|id| state.storage.read().get_client(id))
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Client not found"))
}

pub async fn create_client(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<NewClient>,
) -> (StatusCode, Json<Client>) {
    let client = state.storage.write().create_client(req);
    info!(client_id = client.id, name = %client.name, "Client created");
    (StatusCode::CREATED, Json(client))
}

/// Partial update; omitted fields keep their current values
pub async fn update_client(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<ClientUpdate>,
) -> Result<Json<Client>, ApiError> {
    let id = parse_id(&id).ok_or_else(|| ApiError::not_found("Client not found"))?;
    let client = state
        .storage
        .write()
        .update_client(id, req)
        .ok_or_else(|| ApiError::not_found("Client not found"))?;

    info!(client_id = client.id, "Client updated");
    Ok(Json(client))
}
