//! Coin ledger rules.
//!
//! Pure functions over `RewardAccount`; both store backends load the account,
//! apply one of these, and persist the result together with the transaction.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::rewards::{CoinTransaction, RewardAccount};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentKind {
    /// Parent grants coins.
    Add,
    /// Parent takes coins away. Clamped at zero.
    Remove,
    /// Student redeems a reward. Must be covered by the balance.
    Spend,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinAdjustment {
    pub kind: AdjustmentKind,
    pub amount: i64,
    pub reason: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("amount must be positive, got {0}")]
    NonPositiveAmount(i64),

    #[error("insufficient coins: balance {balance}, requested {requested}")]
    InsufficientCoins { balance: i64, requested: i64 },
}

/// Applies `adjustment` to `account` in place and returns the transaction
/// describing what actually changed.
pub fn apply_adjustment(
    account: &mut RewardAccount,
    adjustment: &CoinAdjustment,
) -> Result<CoinTransaction, LedgerError> {
    let amount = adjustment.amount;
    if amount <= 0 {
        return Err(LedgerError::NonPositiveAmount(amount));
    }

    let before = account.coins;
    let after = match adjustment.kind {
        AdjustmentKind::Add => before.saturating_add(amount),
        AdjustmentKind::Remove => before.saturating_sub(amount).max(0),
        AdjustmentKind::Spend => {
            if amount > before {
                return Err(LedgerError::InsufficientCoins {
                    balance: before,
                    requested: amount,
                });
            }
            before - amount
        }
    };

    let now = Utc::now();
    account.coins = after;
    account.updated_at = now;

    Ok(CoinTransaction {
        id: Uuid::new_v4(),
        student_id: account.student_id,
        delta: after - before,
        balance_after: after,
        reason: transaction_reason(adjustment),
        created_at: now,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakUpdate {
    Set(u32),
    Reset,
}

pub fn apply_streak(account: &mut RewardAccount, update: StreakUpdate) {
    match update {
        StreakUpdate::Set(days) => set_streak(account, days),
        StreakUpdate::Reset => reset_streak(account),
    }
}

/// Sets the current streak, carrying the longest streak forward.
pub fn set_streak(account: &mut RewardAccount, days: u32) {
    let days = i32::try_from(days).unwrap_or(i32::MAX);
    account.streak_days = days;
    account.longest_streak = account.longest_streak.max(days);
    account.updated_at = Utc::now();
}

pub fn reset_streak(account: &mut RewardAccount) {
    account.streak_days = 0;
    account.updated_at = Utc::now();
}

fn transaction_reason(adjustment: &CoinAdjustment) -> String {
    let reason = adjustment.reason.trim();
    if !reason.is_empty() {
        return reason.to_string();
    }
    match adjustment.kind {
        AdjustmentKind::Add => "Coins added by parent".to_string(),
        AdjustmentKind::Remove => "Coins removed by parent".to_string(),
        AdjustmentKind::Spend => "Reward redeemed".to_string(),
    }
}
