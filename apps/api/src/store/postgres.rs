use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::library::collections::MembershipChange;
use crate::models::intake::{IntakeForm, IntakeFormRow};
use crate::models::library::{CollectionRow, NewCollection, NewResource, ResourceRow};
use crate::models::parent::ParentRow;
use crate::models::rewards::{CoinTransaction, RewardAccount};
use crate::rewards::ledger::{apply_adjustment, apply_streak, CoinAdjustment, StreakUpdate};
use crate::store::Store;

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Creates the account row if missing and locks it for the rest of the transaction.
async fn lock_account(
    tx: &mut Transaction<'_, Postgres>,
    student_id: Uuid,
) -> Result<RewardAccount, AppError> {
    sqlx::query(
        "INSERT INTO reward_accounts (student_id) VALUES ($1) ON CONFLICT (student_id) DO NOTHING",
    )
    .bind(student_id)
    .execute(&mut **tx)
    .await?;

    Ok(sqlx::query_as::<_, RewardAccount>(
        "SELECT * FROM reward_accounts WHERE student_id = $1 FOR UPDATE",
    )
    .bind(student_id)
    .fetch_one(&mut **tx)
    .await?)
}

async fn write_account(
    tx: &mut Transaction<'_, Postgres>,
    account: &RewardAccount,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        UPDATE reward_accounts
        SET coins = $2, streak_days = $3, longest_streak = $4, updated_at = $5
        WHERE student_id = $1
        "#,
    )
    .bind(account.student_id)
    .bind(account.coins)
    .bind(account.streak_days)
    .bind(account.longest_streak)
    .bind(account.updated_at)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Applies a count change and returns the updated collection row.
async fn bump_collection_count(
    tx: &mut Transaction<'_, Postgres>,
    collection_id: Uuid,
    delta: i32,
) -> Result<CollectionRow, AppError> {
    Ok(sqlx::query_as::<_, CollectionRow>(
        "UPDATE resource_collections SET count = count + $2 WHERE id = $1 RETURNING *",
    )
    .bind(collection_id)
    .bind(delta)
    .fetch_one(&mut **tx)
    .await?)
}

/// Row lock taken on a resource before any collection row is touched.
#[derive(Debug, Clone, Copy)]
enum ResourceLock {
    /// Mapping changes: many may run at once, but not alongside a delete.
    Share,
    /// Resource deletion and favorite toggles.
    Update,
}

/// Locks the resource row. Returns false if it does not exist.
///
/// Every mapping and favorite write takes this lock first, then the
/// collection lock, so the two never deadlock.
async fn lock_resource(
    tx: &mut Transaction<'_, Postgres>,
    resource_id: Uuid,
    lock: ResourceLock,
) -> Result<bool, AppError> {
    let sql = match lock {
        ResourceLock::Share => "SELECT id FROM resources WHERE id = $1 FOR SHARE",
        ResourceLock::Update => "SELECT id FROM resources WHERE id = $1 FOR UPDATE",
    };
    let row: Option<Uuid> = sqlx::query_scalar(sql)
        .bind(resource_id)
        .fetch_optional(&mut **tx)
        .await?;
    Ok(row.is_some())
}

async fn lock_collection(
    tx: &mut Transaction<'_, Postgres>,
    collection_id: Uuid,
) -> Result<(), AppError> {
    sqlx::query("SELECT id FROM resource_collections WHERE id = $1 FOR UPDATE")
        .bind(collection_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Collection {collection_id} not found")))?;
    Ok(())
}

#[async_trait]
impl Store for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn get_parent(&self, id: Uuid) -> Result<Option<ParentRow>, AppError> {
        Ok(
            sqlx::query_as::<_, ParentRow>("SELECT * FROM parents WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn upsert_parent(
        &self,
        id: Uuid,
        display_name: &str,
        email: Option<&str>,
    ) -> Result<ParentRow, AppError> {
        Ok(sqlx::query_as::<_, ParentRow>(
            r#"
            INSERT INTO parents (id, display_name, email)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE
                SET display_name = EXCLUDED.display_name, email = EXCLUDED.email
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(display_name)
        .bind(email)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn save_intake(&self, form: &IntakeForm) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO intake_forms (id, parent_id, data)
            VALUES ($1, $2, $3)
            ON CONFLICT (parent_id) DO UPDATE
                SET data = EXCLUDED.data, updated_at = now()
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(form.parent_id)
        .bind(Json(form))
        .execute(&self.pool)
        .await?;

        info!("Saved intake form for parent {}", form.parent_id);
        Ok(())
    }

    async fn get_intake(&self, parent_id: Uuid) -> Result<Option<IntakeForm>, AppError> {
        let row = sqlx::query_as::<_, IntakeFormRow>(
            "SELECT * FROM intake_forms WHERE parent_id = $1",
        )
        .bind(parent_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|r| r.data.0))
    }

    async fn list_resources(&self, subject: Option<&str>) -> Result<Vec<ResourceRow>, AppError> {
        Ok(sqlx::query_as::<_, ResourceRow>(
            r#"
            SELECT * FROM resources
            WHERE $1::TEXT IS NULL OR lower(subject) = lower($1)
            ORDER BY title, id
            "#,
        )
        .bind(subject)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get_resource(&self, id: Uuid) -> Result<Option<ResourceRow>, AppError> {
        Ok(
            sqlx::query_as::<_, ResourceRow>("SELECT * FROM resources WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn create_resource(&self, new: &NewResource) -> Result<ResourceRow, AppError> {
        Ok(sqlx::query_as::<_, ResourceRow>(
            r#"
            INSERT INTO resources
                (id, title, description, subject, url, resource_type, grade_levels, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new.title)
        .bind(&new.description)
        .bind(&new.subject)
        .bind(&new.url)
        .bind(&new.resource_type)
        .bind(&new.grade_levels)
        .bind(new.created_by)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn delete_resource(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        // Waits out in-flight mapping changes and blocks new ones until commit.
        if !lock_resource(&mut tx, id, ResourceLock::Update).await? {
            return Ok(false);
        }

        // Counts first; the mappings themselves go with the resource (ON DELETE CASCADE).
        sqlx::query(
            r#"
            UPDATE resource_collections c
            SET count = c.count - 1
            FROM resource_collection_mappings m
            WHERE m.collection_id = c.id AND m.resource_id = $1
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        let deleted = sqlx::query("DELETE FROM resources WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;

        if deleted > 0 {
            info!("Deleted resource {id}");
        }
        Ok(deleted > 0)
    }

    async fn list_favorites(&self, parent_id: Uuid) -> Result<Vec<Uuid>, AppError> {
        Ok(sqlx::query_scalar(
            "SELECT resource_id FROM resource_favorites WHERE parent_id = $1 ORDER BY resource_id",
        )
        .bind(parent_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn toggle_favorite(
        &self,
        parent_id: Uuid,
        resource_id: Uuid,
    ) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        // Serializes concurrent toggles of the same resource.
        if !lock_resource(&mut tx, resource_id, ResourceLock::Update).await? {
            return Err(AppError::NotFound(format!("Resource {resource_id} not found")));
        }

        let removed = sqlx::query(
            "DELETE FROM resource_favorites WHERE parent_id = $1 AND resource_id = $2",
        )
        .bind(parent_id)
        .bind(resource_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let favorited = if removed > 0 {
            false
        } else {
            sqlx::query(
                "INSERT INTO resource_favorites (parent_id, resource_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(parent_id)
            .bind(resource_id)
            .execute(&mut *tx)
            .await?;
            true
        };

        tx.commit().await?;
        Ok(favorited)
    }

    async fn list_collections(&self, parent_id: Uuid) -> Result<Vec<CollectionRow>, AppError> {
        Ok(sqlx::query_as::<_, CollectionRow>(
            "SELECT * FROM resource_collections WHERE parent_id = $1 ORDER BY created_at, name",
        )
        .bind(parent_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn create_collection(&self, new: &NewCollection) -> Result<CollectionRow, AppError> {
        Ok(sqlx::query_as::<_, CollectionRow>(
            r#"
            INSERT INTO resource_collections (id, parent_id, name, description)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.parent_id)
        .bind(&new.name)
        .bind(&new.description)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn delete_collection(&self, id: Uuid) -> Result<bool, AppError> {
        let deleted = sqlx::query("DELETE FROM resource_collections WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(deleted > 0)
    }

    async fn collection_resources(&self, collection_id: Uuid) -> Result<Vec<Uuid>, AppError> {
        let exists: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM resource_collections WHERE id = $1")
                .bind(collection_id)
                .fetch_optional(&self.pool)
                .await?;
        if exists.is_none() {
            return Err(AppError::NotFound(format!(
                "Collection {collection_id} not found"
            )));
        }

        Ok(sqlx::query_scalar(
            "SELECT resource_id FROM resource_collection_mappings WHERE collection_id = $1 ORDER BY resource_id",
        )
        .bind(collection_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn add_to_collection(
        &self,
        collection_id: Uuid,
        resource_id: Uuid,
    ) -> Result<(CollectionRow, MembershipChange), AppError> {
        let mut tx = self.pool.begin().await?;
        if !lock_resource(&mut tx, resource_id, ResourceLock::Share).await? {
            return Err(AppError::NotFound(format!("Resource {resource_id} not found")));
        }
        lock_collection(&mut tx, collection_id).await?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO resource_collection_mappings (collection_id, resource_id)
            VALUES ($1, $2)
            ON CONFLICT (collection_id, resource_id) DO NOTHING
            "#,
        )
        .bind(collection_id)
        .bind(resource_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let change = if inserted > 0 {
            MembershipChange::Added
        } else {
            MembershipChange::AlreadyPresent
        };
        let row = bump_collection_count(&mut tx, collection_id, change.count_delta()).await?;

        tx.commit().await?;
        Ok((row, change))
    }

    async fn remove_from_collection(
        &self,
        collection_id: Uuid,
        resource_id: Uuid,
    ) -> Result<(CollectionRow, MembershipChange), AppError> {
        let mut tx = self.pool.begin().await?;
        // A missing resource has no mappings left to remove.
        let resource_exists = lock_resource(&mut tx, resource_id, ResourceLock::Share).await?;
        lock_collection(&mut tx, collection_id).await?;

        let removed = if resource_exists {
            sqlx::query(
                "DELETE FROM resource_collection_mappings WHERE collection_id = $1 AND resource_id = $2",
            )
            .bind(collection_id)
            .bind(resource_id)
            .execute(&mut *tx)
            .await?
            .rows_affected()
        } else {
            0
        };

        let change = if removed > 0 {
            MembershipChange::Removed
        } else {
            MembershipChange::NotPresent
        };
        let row = bump_collection_count(&mut tx, collection_id, change.count_delta()).await?;

        tx.commit().await?;
        Ok((row, change))
    }

    async fn reward_account(&self, student_id: Uuid) -> Result<RewardAccount, AppError> {
        let row = sqlx::query_as::<_, RewardAccount>(
            "SELECT * FROM reward_accounts WHERE student_id = $1",
        )
        .bind(student_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.unwrap_or_else(|| RewardAccount::new(student_id)))
    }

    async fn adjust_coins(
        &self,
        student_id: Uuid,
        adjustment: &CoinAdjustment,
    ) -> Result<(RewardAccount, CoinTransaction), AppError> {
        let mut tx = self.pool.begin().await?;
        let mut account = lock_account(&mut tx, student_id).await?;

        // An Err here drops `tx`, rolling back the lazily created row.
        let transaction = apply_adjustment(&mut account, adjustment)?;

        write_account(&mut tx, &account).await?;
        sqlx::query(
            r#"
            INSERT INTO coin_transactions
                (id, student_id, delta, balance_after, reason, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(transaction.id)
        .bind(transaction.student_id)
        .bind(transaction.delta)
        .bind(transaction.balance_after)
        .bind(&transaction.reason)
        .bind(transaction.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok((account, transaction))
    }

    async fn update_streak(
        &self,
        student_id: Uuid,
        update: StreakUpdate,
    ) -> Result<RewardAccount, AppError> {
        let mut tx = self.pool.begin().await?;
        let mut account = lock_account(&mut tx, student_id).await?;
        apply_streak(&mut account, update);
        write_account(&mut tx, &account).await?;
        tx.commit().await?;
        Ok(account)
    }

    async fn recent_transactions(
        &self,
        student_id: Uuid,
        limit: usize,
    ) -> Result<Vec<CoinTransaction>, AppError> {
        Ok(sqlx::query_as::<_, CoinTransaction>(
            r#"
            SELECT * FROM coin_transactions
            WHERE student_id = $1
            ORDER BY created_at DESC, id
            LIMIT $2
            "#,
        )
        .bind(student_id)
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::db::{create_pool, ensure_schema};

    /// Store backed by `TEST_DATABASE_URL`. Without it these tests are skipped.
    async fn test_store() -> Option<Arc<PgStore>> {
        let url = std::env::var("TEST_DATABASE_URL").ok()?;
        let pool = create_pool(&url, 5).await.unwrap();
        ensure_schema(&pool).await.unwrap();
        Some(Arc::new(PgStore::new(pool)))
    }

    async fn create_test_resource(store: &PgStore) -> ResourceRow {
        store
            .create_resource(&NewResource {
                title: "Fraction Pizza".to_string(),
                description: None,
                subject: "math".to_string(),
                url: None,
                resource_type: "link".to_string(),
                grade_levels: Vec::new(),
                created_by: None,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_delete_resource_waits_for_in_flight_mapping() {
        let Some(store) = test_store().await else {
            eprintln!("TEST_DATABASE_URL not set; skipping");
            return;
        };
        let resource = create_test_resource(&store).await;
        let collection = store
            .create_collection(&NewCollection {
                parent_id: Uuid::new_v4(),
                name: "Pizza Week".to_string(),
                description: None,
            })
            .await
            .unwrap();

        // Same steps as add_to_collection, held open until after the delete starts.
        let mut tx = store.pool.begin().await.unwrap();
        assert!(lock_resource(&mut tx, resource.id, ResourceLock::Share)
            .await
            .unwrap());
        lock_collection(&mut tx, collection.id).await.unwrap();
        sqlx::query(
            "INSERT INTO resource_collection_mappings (collection_id, resource_id) VALUES ($1, $2)",
        )
        .bind(collection.id)
        .bind(resource.id)
        .execute(&mut *tx)
        .await
        .unwrap();
        bump_collection_count(&mut tx, collection.id, 1).await.unwrap();

        let deleter = {
            let store = Arc::clone(&store);
            let id = resource.id;
            tokio::spawn(async move { store.delete_resource(id).await })
        };
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!deleter.is_finished());

        tx.commit().await.unwrap();
        assert!(deleter.await.unwrap().unwrap());

        let count: i32 = sqlx::query_scalar("SELECT count FROM resource_collections WHERE id = $1")
            .bind(collection.id)
            .fetch_one(&store.pool)
            .await
            .unwrap();
        let mappings: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM resource_collection_mappings WHERE collection_id = $1",
        )
        .bind(collection.id)
        .fetch_one(&store.pool)
        .await
        .unwrap();
        assert_eq!(mappings, 0);
        assert_eq!(i64::from(count), mappings);
    }

    #[tokio::test]
    async fn test_concurrent_favorite_toggles_alternate() {
        let Some(store) = test_store().await else {
            eprintln!("TEST_DATABASE_URL not set; skipping");
            return;
        };
        let resource = create_test_resource(&store).await;
        let parent = Uuid::new_v4();

        let (first, second) = tokio::join!(
            store.toggle_favorite(parent, resource.id),
            store.toggle_favorite(parent, resource.id)
        );
        assert_ne!(first.unwrap(), second.unwrap());
        assert!(store.list_favorites(parent).await.unwrap().is_empty());
    }
}
