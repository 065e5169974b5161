//! Note endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::db::{NewNote, Note};
use crate::AppState;

use super::extract::ValidatedJson;
use super::validation::parse_id;

pub async fn list_client_notes(
    State(state): State<Arc<AppState>>,
    Path(client_id): Path<String>,
) -> Json<Vec<Note>> {
    let notes = match parse_id(&client_id) {
        Some(id) => state.storage.read().get_notes_by_client(id),
        None => Vec::new(),
    };
    Json(notes)
}

pub async fn create_note(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<NewNote>,
) -> (StatusCode, Json<Note>) {
    let note = state.storage.write().create_note(req);
    (StatusCode::CREATED, Json(note))
}
