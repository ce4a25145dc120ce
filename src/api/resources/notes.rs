//! Note endpoints

use axum::extract::{Path, State};

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::note::Note;
use crate::infrastructure::services::CreateNoteRequest;

/// GET /getNotes
pub async fn list_notes(State(state): State<AppState>) -> Result<Json<Vec<Note>>, ApiError> {
    Ok(Json(state.note_service.list().await?))
}

/// GET /getNote/{note_id}
pub async fn get_note(
    State(state): State<AppState>,
    Path(note_id): Path<String>,
) -> Result<Json<Note>, ApiError> {
    Ok(Json(state.note_service.get(&note_id).await?))
}

/// POST /createNote
pub async fn create_note(
    State(state): State<AppState>,
    Json(request): Json<CreateNoteRequest>,
) -> Result<Json<Note>, ApiError> {
    Ok(Json(state.note_service.create(request).await?))
}
