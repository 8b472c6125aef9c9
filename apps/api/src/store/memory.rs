use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::library::collections::{CollectionMembers, MembershipChange};
use crate::library::favorites::FavoriteSet;
use crate::models::intake::IntakeForm;
use crate::models::library::{CollectionRow, NewCollection, NewResource, ResourceRow};
use crate::models::parent::ParentRow;
use crate::models::rewards::{CoinTransaction, RewardAccount};
use crate::rewards::ledger::{apply_adjustment, apply_streak, CoinAdjustment, StreakUpdate};
use crate::store::Store;

#[derive(Default)]
struct MemoryData {
    parents: HashMap<Uuid, ParentRow>,
    intakes: HashMap<Uuid, IntakeForm>,
    resources: HashMap<Uuid, ResourceRow>,
    favorites: HashMap<Uuid, FavoriteSet>,
    collections: HashMap<Uuid, CollectionRow>,
    members: HashMap<Uuid, CollectionMembers>,
    accounts: HashMap<Uuid, RewardAccount>,
    transactions: Vec<CoinTransaction>,
}

/// In-process store. All writes are serialized behind one lock.
#[derive(Default)]
pub struct MemoryStore {
    data: RwLock<MemoryData>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn not_found_collection(id: Uuid) -> AppError {
    AppError::NotFound(format!("Collection {id} not found"))
}

fn not_found_resource(id: Uuid) -> AppError {
    AppError::NotFound(format!("Resource {id} not found"))
}

#[async_trait]
impl Store for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn get_parent(&self, id: Uuid) -> Result<Option<ParentRow>, AppError> {
        Ok(self.data.read().await.parents.get(&id).cloned())
    }

    async fn upsert_parent(
        &self,
        id: Uuid,
        display_name: &str,
        email: Option<&str>,
    ) -> Result<ParentRow, AppError> {
        let mut data = self.data.write().await;
        let created_at = data
            .parents
            .get(&id)
            .map(|p| p.created_at)
            .unwrap_or_else(Utc::now);
        let row = ParentRow {
            id,
            display_name: display_name.to_string(),
            email: email.map(str::to_string),
            created_at,
        };
        data.parents.insert(id, row.clone());
        Ok(row)
    }

    async fn save_intake(&self, form: &IntakeForm) -> Result<(), AppError> {
        let mut data = self.data.write().await;
        let replaced = data.intakes.insert(form.parent_id, form.clone()).is_some();
        debug!(
            "[save_intake] parent {} form {}",
            form.parent_id,
            if replaced { "replaced" } else { "created" }
        );
        Ok(())
    }

    async fn get_intake(&self, parent_id: Uuid) -> Result<Option<IntakeForm>, AppError> {
        Ok(self.data.read().await.intakes.get(&parent_id).cloned())
    }

    async fn list_resources(&self, subject: Option<&str>) -> Result<Vec<ResourceRow>, AppError> {
        let data = self.data.read().await;
        let mut resources: Vec<ResourceRow> = data
            .resources
            .values()
            .filter(|r| subject.map_or(true, |s| r.subject.eq_ignore_ascii_case(s)))
            .cloned()
            .collect();
        resources.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        Ok(resources)
    }

    async fn get_resource(&self, id: Uuid) -> Result<Option<ResourceRow>, AppError> {
        Ok(self.data.read().await.resources.get(&id).cloned())
    }

    async fn create_resource(&self, new: &NewResource) -> Result<ResourceRow, AppError> {
        let row = ResourceRow {
            id: Uuid::new_v4(),
            title: new.title.clone(),
            description: new.description.clone(),
            subject: new.subject.clone(),
            url: new.url.clone(),
            resource_type: new.resource_type.clone(),
            grade_levels: new.grade_levels.clone(),
            created_by: new.created_by,
            created_at: Utc::now(),
        };
        self.data.write().await.resources.insert(row.id, row.clone());
        Ok(row)
    }

    async fn delete_resource(&self, id: Uuid) -> Result<bool, AppError> {
        let mut data = self.data.write().await;
        if data.resources.remove(&id).is_none() {
            return Ok(false);
        }

        for favorites in data.favorites.values_mut() {
            favorites.forget(&id);
        }

        let MemoryData {
            members,
            collections,
            ..
        } = &mut *data;
        for (collection_id, set) in members.iter_mut() {
            let change = set.remove(&id);
            if let Some(collection) = collections.get_mut(collection_id) {
                collection.count += change.count_delta();
            }
        }

        info!("[delete_resource] removed resource {id}");
        Ok(true)
    }

    async fn list_favorites(&self, parent_id: Uuid) -> Result<Vec<Uuid>, AppError> {
        Ok(self
            .data
            .read()
            .await
            .favorites
            .get(&parent_id)
            .map(FavoriteSet::ids)
            .unwrap_or_default())
    }

    async fn toggle_favorite(
        &self,
        parent_id: Uuid,
        resource_id: Uuid,
    ) -> Result<bool, AppError> {
        let mut data = self.data.write().await;
        if !data.resources.contains_key(&resource_id) {
            return Err(not_found_resource(resource_id));
        }
        Ok(data
            .favorites
            .entry(parent_id)
            .or_default()
            .toggle(resource_id))
    }

    async fn list_collections(&self, parent_id: Uuid) -> Result<Vec<CollectionRow>, AppError> {
        let data = self.data.read().await;
        let mut collections: Vec<CollectionRow> = data
            .collections
            .values()
            .filter(|c| c.parent_id == parent_id)
            .cloned()
            .collect();
        collections.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.name.cmp(&b.name)));
        Ok(collections)
    }

    async fn create_collection(&self, new: &NewCollection) -> Result<CollectionRow, AppError> {
        let row = CollectionRow {
            id: Uuid::new_v4(),
            parent_id: new.parent_id,
            name: new.name.clone(),
            description: new.description.clone(),
            count: 0,
            created_at: Utc::now(),
        };
        let mut data = self.data.write().await;
        data.members.insert(row.id, CollectionMembers::default());
        data.collections.insert(row.id, row.clone());
        Ok(row)
    }

    async fn delete_collection(&self, id: Uuid) -> Result<bool, AppError> {
        let mut data = self.data.write().await;
        data.members.remove(&id);
        Ok(data.collections.remove(&id).is_some())
    }

    async fn collection_resources(&self, collection_id: Uuid) -> Result<Vec<Uuid>, AppError> {
        let data = self.data.read().await;
        if !data.collections.contains_key(&collection_id) {
            return Err(not_found_collection(collection_id));
        }
        Ok(data
            .members
            .get(&collection_id)
            .map(CollectionMembers::ids)
            .unwrap_or_default())
    }

    async fn add_to_collection(
        &self,
        collection_id: Uuid,
        resource_id: Uuid,
    ) -> Result<(CollectionRow, MembershipChange), AppError> {
        let mut data = self.data.write().await;
        if !data.collections.contains_key(&collection_id) {
            return Err(not_found_collection(collection_id));
        }
        if !data.resources.contains_key(&resource_id) {
            return Err(not_found_resource(resource_id));
        }

        let change = data.members.entry(collection_id).or_default().add(resource_id);
        let collection = data
            .collections
            .get_mut(&collection_id)
            .ok_or_else(|| not_found_collection(collection_id))?;
        collection.count += change.count_delta();
        Ok((collection.clone(), change))
    }

    async fn remove_from_collection(
        &self,
        collection_id: Uuid,
        resource_id: Uuid,
    ) -> Result<(CollectionRow, MembershipChange), AppError> {
        let mut data = self.data.write().await;
        if !data.collections.contains_key(&collection_id) {
            return Err(not_found_collection(collection_id));
        }

        let change = data
            .members
            .entry(collection_id)
            .or_default()
            .remove(&resource_id);
        let collection = data
            .collections
            .get_mut(&collection_id)
            .ok_or_else(|| not_found_collection(collection_id))?;
        collection.count += change.count_delta();
        Ok((collection.clone(), change))
    }

    async fn reward_account(&self, student_id: Uuid) -> Result<RewardAccount, AppError> {
        Ok(self
            .data
            .read()
            .await
            .accounts
            .get(&student_id)
            .cloned()
            .unwrap_or_else(|| RewardAccount::new(student_id)))
    }

    async fn adjust_coins(
        &self,
        student_id: Uuid,
        adjustment: &CoinAdjustment,
    ) -> Result<(RewardAccount, CoinTransaction), AppError> {
        let mut data = self.data.write().await;
        // Work on a copy so a rejected spend leaves no trace.
        let mut account = data
            .accounts
            .get(&student_id)
            .cloned()
            .unwrap_or_else(|| RewardAccount::new(student_id));
        let transaction = apply_adjustment(&mut account, adjustment)?;

        data.accounts.insert(student_id, account.clone());
        data.transactions.push(transaction.clone());
        Ok((account, transaction))
    }

    async fn update_streak(
        &self,
        student_id: Uuid,
        update: StreakUpdate,
    ) -> Result<RewardAccount, AppError> {
        let mut data = self.data.write().await;
        let account = data
            .accounts
            .entry(student_id)
            .or_insert_with(|| RewardAccount::new(student_id));
        apply_streak(account, update);
        Ok(account.clone())
    }

    async fn recent_transactions(
        &self,
        student_id: Uuid,
        limit: usize,
    ) -> Result<Vec<CoinTransaction>, AppError> {
        let data = self.data.read().await;
        Ok(data
            .transactions
            .iter()
            .rev()
            .filter(|t| t.student_id == student_id)
            .take(limit)
            .cloned()
            .collect())
    }
}
