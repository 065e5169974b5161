//! Follow-up endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::info;

use crate::db::{FollowUp, FollowUpUpdate, NewFollowUp};
use crate::AppState;

use super::error::ApiError;
use super::extract::ValidatedJson;
use super::validation::parse_id;

pub async fn list_follow_ups(State(state): State<Arc<AppState>>) -> Json<Vec<FollowUp>> {
    Json(state.storage.read().get_all_follow_ups())
}

pub async fn list_client_follow_ups(
    State(state): State<Arc<AppState>>,
    Path(client_id): Path<String>,
) -> Json<Vec<FollowUp>> {
    let follow_ups = match parse_id(&client_id) {
        Some(id) => state.storage.read().get_follow_ups_by_client(id),
        None => Vec::new(),
    };
    Json(follow_ups)
}

pub async fn create_follow_up(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<NewFollowUp>,
) -> (StatusCode, Json<FollowUp>) {
    let follow_up = state.storage.write().create_follow_up(req);
    info!(
        follow_up_id = follow_up.id,
        client_id = follow_up.client_id,
        scheduled = %follow_up.scheduled_date,
        "Follow-up scheduled"
    );
    (StatusCode::CREATED, Json(follow_up))
}

/// Partial update, typically `{"completed": true}`
pub async fn update_follow_up(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<FollowUpUpdate>,
) -> Result<Json<FollowUp>, ApiError> {
    let id = parse_id(&id).ok_or_else(|| ApiError::not_found("Follow-up not found"))?;
    state
        .storage
        .write()
        .update_follow_up(id, req)
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Follow-up not found"))
}
