//! Axum route handlers for the resource library.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::library::collections::{normalize_collection_name, MembershipChange};
use crate::library::resources::normalize_new_resource;
use crate::models::library::{CollectionRow, NewCollection, NewResource, ResourceRow};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ResourceQuery {
    #[serde(default)]
    pub subject: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ParentIdQuery {
    pub parent_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct FavoriteToggleRequest {
    pub parent_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct FavoriteToggleResponse {
    pub resource_id: Uuid,
    pub favorited: bool,
}

#[derive(Debug, Serialize)]
pub struct FavoritesResponse {
    pub parent_id: Uuid,
    pub resource_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct MembershipResponse {
    pub collection: CollectionRow,
    pub change: MembershipChange,
}

#[derive(Debug, Serialize)]
pub struct CollectionResourcesResponse {
    pub collection_id: Uuid,
    pub resource_ids: Vec<Uuid>,
}

/// GET /api/v1/resources?subject=
pub async fn handle_list_resources(
    State(state): State<AppState>,
    Query(params): Query<ResourceQuery>,
) -> Result<Json<Vec<ResourceRow>>, AppError> {
    let subject = params
        .subject
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    Ok(Json(state.store.list_resources(subject).await?))
}

/// POST /api/v1/resources
pub async fn handle_create_resource(
    State(state): State<AppState>,
    Json(req): Json<NewResource>,
) -> Result<(StatusCode, Json<ResourceRow>), AppError> {
    let new = normalize_new_resource(req)?;
    let row = state.store.create_resource(&new).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/v1/resources/:id
pub async fn handle_get_resource(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ResourceRow>, AppError> {
    state
        .store
        .get_resource(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Resource {id} not found")))
}

/// DELETE /api/v1/resources/:id
pub async fn handle_delete_resource(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.store.delete_resource(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Resource {id} not found")))
    }
}

/// GET /api/v1/favorites?parent_id=
pub async fn handle_list_favorites(
    State(state): State<AppState>,
    Query(params): Query<ParentIdQuery>,
) -> Result<Json<FavoritesResponse>, AppError> {
    let resource_ids = state.store.list_favorites(params.parent_id).await?;
    Ok(Json(FavoritesResponse {
        parent_id: params.parent_id,
        resource_ids,
    }))
}

/// POST /api/v1/resources/:id/favorite
pub async fn handle_toggle_favorite(
    State(state): State<AppState>,
    Path(resource_id): Path<Uuid>,
    Json(req): Json<FavoriteToggleRequest>,
) -> Result<Json<FavoriteToggleResponse>, AppError> {
    let favorited = state
        .store
        .toggle_favorite(req.parent_id, resource_id)
        .await?;
    Ok(Json(FavoriteToggleResponse {
        resource_id,
        favorited,
    }))
}

/// GET /api/v1/collections?parent_id=
pub async fn handle_list_collections(
    State(state): State<AppState>,
    Query(params): Query<ParentIdQuery>,
) -> Result<Json<Vec<CollectionRow>>, AppError> {
    Ok(Json(state.store.list_collections(params.parent_id).await?))
}

/// POST /api/v1/collections
pub async fn handle_create_collection(
    State(state): State<AppState>,
    Json(mut req): Json<NewCollection>,
) -> Result<(StatusCode, Json<CollectionRow>), AppError> {
    req.name = normalize_collection_name(&req.name)?;
    let row = state.store.create_collection(&req).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// DELETE /api/v1/collections/:id
pub async fn handle_delete_collection(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.store.delete_collection(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Collection {id} not found")))
    }
}

/// GET /api/v1/collections/:id/resources
pub async fn handle_collection_resources(
    State(state): State<AppState>,
    Path(collection_id): Path<Uuid>,
) -> Result<Json<CollectionResourcesResponse>, AppError> {
    let resource_ids = state.store.collection_resources(collection_id).await?;
    Ok(Json(CollectionResourcesResponse {
        collection_id,
        resource_ids,
    }))
}

/// PUT /api/v1/collections/:id/resources/:resource_id
pub async fn handle_add_to_collection(
    State(state): State<AppState>,
    Path((collection_id, resource_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<MembershipResponse>, AppError> {
    let (collection, change) = state
        .store
        .add_to_collection(collection_id, resource_id)
        .await?;
    Ok(Json(MembershipResponse { collection, change }))
}

/// DELETE /api/v1/collections/:id/resources/:resource_id
pub async fn handle_remove_from_collection(
    State(state): State<AppState>,
    Path((collection_id, resource_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<MembershipResponse>, AppError> {
    let (collection, change) = state
        .store
        .remove_from_collection(collection_id, resource_id)
        .await?;
    Ok(Json(MembershipResponse { collection, change }))
}
