//! Persistence — pluggable, trait-based store behind every handler.
//!
//! `PgStore` is the production backend. `MemoryStore` keeps everything in
//! process and is seeded with demo data; tests run against it.
//!
//! `AppState` holds an `Arc<dyn Store>`, chosen at startup via config.

pub mod memory;
pub mod postgres;
pub mod schema;
pub mod seed;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::library::collections::MembershipChange;
use crate::models::intake::IntakeForm;
use crate::models::library::{CollectionRow, NewCollection, NewResource, ResourceRow};
use crate::models::parent::ParentRow;
use crate::models::rewards::{CoinTransaction, RewardAccount};
use crate::rewards::ledger::{CoinAdjustment, StreakUpdate};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait Store: Send + Sync {
    /// "postgres" | "memory", reported by /health.
    fn backend(&self) -> &'static str;

    // Parents

    async fn get_parent(&self, id: Uuid) -> Result<Option<ParentRow>, AppError>;

    async fn upsert_parent(
        &self,
        id: Uuid,
        display_name: &str,
        email: Option<&str>,
    ) -> Result<ParentRow, AppError>;

    // Intake

    /// Inserts the parent's form, or replaces the existing one.
    async fn save_intake(&self, form: &IntakeForm) -> Result<(), AppError>;

    async fn get_intake(&self, parent_id: Uuid) -> Result<Option<IntakeForm>, AppError>;

    // Resources

    async fn list_resources(&self, subject: Option<&str>) -> Result<Vec<ResourceRow>, AppError>;

    async fn get_resource(&self, id: Uuid) -> Result<Option<ResourceRow>, AppError>;

    async fn create_resource(&self, new: &NewResource) -> Result<ResourceRow, AppError>;

    /// Removes the resource with its favorites and collection mappings,
    /// decrementing affected collection counts. Returns false if absent.
    async fn delete_resource(&self, id: Uuid) -> Result<bool, AppError>;

    // Favorites

    async fn list_favorites(&self, parent_id: Uuid) -> Result<Vec<Uuid>, AppError>;

    /// Flips the favorite and returns the new state. NotFound if the
    /// resource does not exist.
    async fn toggle_favorite(&self, parent_id: Uuid, resource_id: Uuid)
        -> Result<bool, AppError>;

    // Collections

    async fn list_collections(&self, parent_id: Uuid) -> Result<Vec<CollectionRow>, AppError>;

    async fn create_collection(&self, new: &NewCollection) -> Result<CollectionRow, AppError>;

    async fn delete_collection(&self, id: Uuid) -> Result<bool, AppError>;

    /// Resource ids in the collection. NotFound if the collection is absent.
    async fn collection_resources(&self, collection_id: Uuid) -> Result<Vec<Uuid>, AppError>;

    /// Adds a mapping. A duplicate is a no-op. NotFound if either side is absent.
    async fn add_to_collection(
        &self,
        collection_id: Uuid,
        resource_id: Uuid,
    ) -> Result<(CollectionRow, MembershipChange), AppError>;

    /// Removes a mapping. An absent mapping is a no-op. NotFound if the
    /// collection is absent.
    async fn remove_from_collection(
        &self,
        collection_id: Uuid,
        resource_id: Uuid,
    ) -> Result<(CollectionRow, MembershipChange), AppError>;

    // Rewards

    /// The student's account, or a zero account if none was written yet.
    async fn reward_account(&self, student_id: Uuid) -> Result<RewardAccount, AppError>;

    async fn adjust_coins(
        &self,
        student_id: Uuid,
        adjustment: &CoinAdjustment,
    ) -> Result<(RewardAccount, CoinTransaction), AppError>;

    async fn update_streak(
        &self,
        student_id: Uuid,
        update: StreakUpdate,
    ) -> Result<RewardAccount, AppError>;

    /// Newest first.
    async fn recent_transactions(
        &self,
        student_id: Uuid,
        limit: usize,
    ) -> Result<Vec<CoinTransaction>, AppError>;
}
