use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Coin and streak counters for one student.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct RewardAccount {
    pub student_id: Uuid,
    /// Never negative.
    pub coins: i64,
    pub streak_days: i32,
    pub longest_streak: i32,
    pub updated_at: DateTime<Utc>,
}

impl RewardAccount {
    pub fn new(student_id: Uuid) -> Self {
        RewardAccount {
            student_id,
            coins: 0,
            streak_days: 0,
            longest_streak: 0,
            updated_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct CoinTransaction {
    pub id: Uuid,
    pub student_id: Uuid,
    /// Applied change, after clamping. Negative for removals and spends.
    pub delta: i64,
    pub balance_after: i64,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}
