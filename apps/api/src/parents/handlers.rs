use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::parent::ParentRow;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpsertParentRequest {
    pub display_name: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// GET /api/v1/parents/:id
pub async fn handle_get_parent(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ParentRow>, AppError> {
    let parent = state
        .store
        .get_parent(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Parent {id} not found")))?;
    Ok(Json(parent))
}

/// PUT /api/v1/parents/:id
pub async fn handle_upsert_parent(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpsertParentRequest>,
) -> Result<Json<ParentRow>, AppError> {
    let display_name = req.display_name.trim();
    if display_name.is_empty() {
        return Err(AppError::Validation(
            "display_name cannot be empty".to_string(),
        ));
    }
    let email = req
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty());

    let parent = state.store.upsert_parent(id, display_name, email).await?;
    Ok(Json(parent))
}
