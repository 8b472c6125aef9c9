//! Axum route handlers for platform recommendations.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::intake::IntakeForm;
use crate::recommendation::catalog::{find_platform, platforms_for, PlatformEntry, Subject};
use crate::recommendation::matcher::{recommend, Recommendation};
use crate::recommendation::preferences::PreferenceBundle;
use crate::recommendation::selection::{SelectionError, SelectionState};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    #[serde(default)]
    pub parent_id: Option<Uuid>,
    #[serde(default)]
    pub subject: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    #[serde(flatten)]
    pub recommendation: Recommendation,
    /// Platform id already on the parent's intake form for this subject.
    pub current_choice: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubjectSummary {
    pub subject: Subject,
    pub name: &'static str,
    pub platform_count: usize,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmSelectionRequest {
    pub parent_id: Uuid,
    pub subject: String,
    pub selected: SelectionState,
}

#[derive(Debug, Deserialize)]
pub struct ToggleSelectionRequest {
    pub subject: String,
    #[serde(default)]
    pub selected: SelectionState,
    pub platform_id: String,
}

#[derive(Debug, Serialize)]
pub struct SelectionResponse {
    pub subject: Subject,
    pub selected: SelectionState,
    /// True only while exactly one platform is selected.
    pub can_confirm: bool,
}

#[derive(Debug, Serialize)]
pub struct ConfirmSelectionResponse {
    pub subject: Subject,
    pub platform: &'static PlatformEntry,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/subjects
pub async fn handle_list_subjects() -> Json<Vec<SubjectSummary>> {
    Json(
        Subject::ALL
            .iter()
            .map(|&subject| SubjectSummary {
                subject,
                name: subject.display_name(),
                platform_count: platforms_for(subject).len(),
            })
            .collect(),
    )
}

/// GET /api/v1/recommendations?parent_id=&subject=
///
/// Unknown or missing subjects fall back to math. Without a parent (or
/// without a stored intake form) every preference takes its default.
pub async fn handle_get_recommendation(
    State(state): State<AppState>,
    Query(params): Query<RecommendationQuery>,
) -> Result<Json<RecommendationResponse>, AppError> {
    let subject = Subject::from_query(params.subject.as_deref().unwrap_or_default());

    let form = match params.parent_id {
        Some(parent_id) => state.store.get_intake(parent_id).await?,
        None => None,
    };
    let prefs = form
        .as_ref()
        .map(PreferenceBundle::from_intake)
        .unwrap_or_default();

    debug!(
        "Recommending {} platforms (requested {:?})",
        subject.key(),
        params.subject
    );

    let recommendation = recommend(subject, &prefs).ok_or_else(|| {
        AppError::NotFound(format!("No platforms catalogued for {}", subject.key()))
    })?;
    let current_choice = form.as_ref().and_then(|f| current_choice(f, subject));

    Ok(Json(RecommendationResponse {
        recommendation,
        current_choice,
    }))
}

/// POST /api/v1/recommendations/selection
///
/// Flips one platform in or out of the current selection and reports whether
/// the result can be confirmed.
pub async fn handle_toggle_selection(
    Json(req): Json<ToggleSelectionRequest>,
) -> Result<Json<SelectionResponse>, AppError> {
    let subject = Subject::from_query(&req.subject);
    if find_platform(subject, &req.platform_id).is_none() {
        return Err(SelectionError::UnknownPlatform {
            subject: subject.key().to_string(),
            platform_id: req.platform_id,
        }
        .into());
    }

    let mut selected = req.selected;
    selected.toggle(&req.platform_id);
    let can_confirm = selected.can_confirm();

    Ok(Json(SelectionResponse {
        subject,
        selected,
        can_confirm,
    }))
}

/// POST /api/v1/recommendations/confirm
///
/// Persists the parent's pick into the intake form. Requires exactly one
/// selected platform from the subject's catalog.
pub async fn handle_confirm_selection(
    State(state): State<AppState>,
    Json(req): Json<ConfirmSelectionRequest>,
) -> Result<Json<ConfirmSelectionResponse>, AppError> {
    let subject = Subject::from_query(&req.subject);
    let platform = req.selected.confirm(subject)?;

    if state.store.get_parent(req.parent_id).await?.is_none() {
        return Err(AppError::NotFound(format!(
            "Parent {} not found",
            req.parent_id
        )));
    }

    let mut form = state
        .store
        .get_intake(req.parent_id)
        .await?
        .unwrap_or_else(|| IntakeForm::empty(req.parent_id));

    // One entry per subject, whatever alias it was originally stored under
    form.platform_choices
        .retain(|key, _| Subject::parse(key) != Some(subject));
    form.platform_choices
        .insert(subject.key().to_string(), platform.id.to_string());
    state.store.save_intake(&form).await?;

    info!(
        "Parent {} confirmed {} for {}",
        req.parent_id,
        platform.id,
        subject.key()
    );

    Ok(Json(ConfirmSelectionResponse { subject, platform }))
}

fn current_choice(form: &IntakeForm, subject: Subject) -> Option<String> {
    form.platform_choices
        .iter()
        .find(|(key, _)| Subject::parse(key) == Some(subject))
        .map(|(_, id)| id.clone())
}
