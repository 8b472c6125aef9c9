use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::intake::confirmation::{build_confirmation, ConfirmationSummary};
use crate::intake::validation::validate_intake;
use crate::models::intake::IntakeForm;
use crate::models::parent::ParentRow;
use crate::state::AppState;

async fn require_parent(state: &AppState, parent_id: Uuid) -> Result<ParentRow, AppError> {
    state
        .store
        .get_parent(parent_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Parent {parent_id} not found")))
}

/// POST /api/v1/intake
///
/// Stores (or replaces) the parent's intake form and returns the confirmation view.
pub async fn handle_submit_intake(
    State(state): State<AppState>,
    Json(form): Json<IntakeForm>,
) -> Result<Json<ConfirmationSummary>, AppError> {
    let parent = require_parent(&state, form.parent_id).await?;
    validate_intake(&form)?;

    state.store.save_intake(&form).await?;
    info!(
        "Intake submitted for parent {} ({} students)",
        form.parent_id,
        form.students.len()
    );

    Ok(Json(build_confirmation(&parent.display_name, &form)))
}

/// GET /api/v1/intake/:parent_id
pub async fn handle_get_intake(
    State(state): State<AppState>,
    Path(parent_id): Path<Uuid>,
) -> Result<Json<IntakeForm>, AppError> {
    let form = state
        .store
        .get_intake(parent_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No intake form for parent {parent_id}")))?;
    Ok(Json(form))
}

/// GET /api/v1/intake/:parent_id/confirmation
pub async fn handle_get_confirmation(
    State(state): State<AppState>,
    Path(parent_id): Path<Uuid>,
) -> Result<Json<ConfirmationSummary>, AppError> {
    let parent = require_parent(&state, parent_id).await?;
    let form = state
        .store
        .get_intake(parent_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No intake form for parent {parent_id}")))?;
    Ok(Json(build_confirmation(&parent.display_name, &form)))
}
