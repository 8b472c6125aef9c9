use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResourceRow {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub subject: String,
    pub url: Option<String>,
    pub resource_type: String,
    pub grade_levels: Vec<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CollectionRow {
    pub id: Uuid,
    pub parent_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Number of mapping rows. Maintained by the store on add/remove.
    pub count: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewResource {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub subject: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_resource_type")]
    pub resource_type: String,
    #[serde(default)]
    pub grade_levels: Vec<String>,
    #[serde(default)]
    pub created_by: Option<Uuid>,
}

fn default_resource_type() -> String {
    "link".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCollection {
    pub parent_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}
