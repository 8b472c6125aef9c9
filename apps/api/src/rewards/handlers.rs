//! Axum route handlers for coins, streaks and reward redemption.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::rewards::{CoinTransaction, RewardAccount};
use crate::rewards::catalog::{find_reward, RewardItem, REWARD_CATALOG};
use crate::rewards::ledger::{AdjustmentKind, CoinAdjustment, StreakUpdate};
use crate::state::AppState;

const DEFAULT_HISTORY_LIMIT: usize = 10;
const MAX_HISTORY_LIMIT: usize = 100;

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoinAction {
    Add,
    Remove,
}

#[derive(Debug, Deserialize)]
pub struct CoinRequest {
    pub action: CoinAction,
    pub amount: i64,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StreakRequest {
    pub days: u32,
}

#[derive(Debug, Deserialize)]
pub struct RedeemRequest {
    pub reward_id: String,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RewardsResponse {
    pub account: RewardAccount,
    pub recent_transactions: Vec<CoinTransaction>,
}

#[derive(Debug, Serialize)]
pub struct AdjustmentResponse {
    pub account: RewardAccount,
    pub transaction: CoinTransaction,
    /// Human-readable confirmation for the client's notification.
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct RedeemResponse {
    pub reward: &'static RewardItem,
    pub account: RewardAccount,
    pub transaction: CoinTransaction,
}

/// GET /api/v1/rewards/catalog
pub async fn handle_reward_catalog() -> Json<&'static [RewardItem]> {
    Json(REWARD_CATALOG)
}

/// GET /api/v1/students/:id/rewards?limit=
pub async fn handle_get_rewards(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<RewardsResponse>, AppError> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .min(MAX_HISTORY_LIMIT);
    let account = state.store.reward_account(student_id).await?;
    let recent_transactions = state.store.recent_transactions(student_id, limit).await?;
    Ok(Json(RewardsResponse {
        account,
        recent_transactions,
    }))
}

/// POST /api/v1/students/:id/coins
///
/// Removing more coins than the student has leaves the balance at zero.
pub async fn handle_adjust_coins(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
    Json(req): Json<CoinRequest>,
) -> Result<Json<AdjustmentResponse>, AppError> {
    let kind = match req.action {
        CoinAction::Add => AdjustmentKind::Add,
        CoinAction::Remove => AdjustmentKind::Remove,
    };
    let adjustment = CoinAdjustment {
        kind,
        amount: req.amount,
        reason: req.reason.unwrap_or_default(),
    };

    let (account, transaction) = state.store.adjust_coins(student_id, &adjustment).await?;
    info!(
        "Student {student_id} coins {:+} -> {}",
        transaction.delta, account.coins
    );

    let message = match kind {
        AdjustmentKind::Add => format!("Added {} coins", transaction.delta),
        _ => format!("Removed {} coins", -transaction.delta),
    };
    Ok(Json(AdjustmentResponse {
        account,
        transaction,
        message,
    }))
}

/// PUT /api/v1/students/:id/streak
pub async fn handle_set_streak(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
    Json(req): Json<StreakRequest>,
) -> Result<Json<RewardAccount>, AppError> {
    let account = state
        .store
        .update_streak(student_id, StreakUpdate::Set(req.days))
        .await?;
    Ok(Json(account))
}

/// DELETE /api/v1/students/:id/streak
pub async fn handle_reset_streak(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
) -> Result<Json<RewardAccount>, AppError> {
    let account = state
        .store
        .update_streak(student_id, StreakUpdate::Reset)
        .await?;
    Ok(Json(account))
}

/// POST /api/v1/students/:id/redeem
pub async fn handle_redeem(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
    Json(req): Json<RedeemRequest>,
) -> Result<Json<RedeemResponse>, AppError> {
    let reward = find_reward(&req.reward_id)
        .ok_or_else(|| AppError::NotFound(format!("Reward '{}' not found", req.reward_id)))?;

    let adjustment = CoinAdjustment {
        kind: AdjustmentKind::Spend,
        amount: reward.cost,
        reason: format!("Redeemed: {}", reward.name),
    };
    let (account, transaction) = state.store.adjust_coins(student_id, &adjustment).await?;
    info!("Student {student_id} redeemed {}", reward.id);

    Ok(Json(RedeemResponse {
        reward,
        account,
        transaction,
    }))
}
