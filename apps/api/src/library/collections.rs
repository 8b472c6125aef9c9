use std::collections::BTreeSet;

use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;

const MAX_COLLECTION_NAME_LEN: usize = 80;

/// Outcome of adding or removing a resource from a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipChange {
    Added,
    AlreadyPresent,
    Removed,
    NotPresent,
}

impl MembershipChange {
    /// How the collection's `count` moves.
    pub fn count_delta(self) -> i32 {
        match self {
            MembershipChange::Added => 1,
            MembershipChange::Removed => -1,
            MembershipChange::AlreadyPresent | MembershipChange::NotPresent => 0,
        }
    }
}

/// Resource ids mapped into one collection. A resource appears at most once.
#[derive(Debug, Clone, Default)]
pub struct CollectionMembers {
    resources: BTreeSet<Uuid>,
}

impl CollectionMembers {
    pub fn add(&mut self, resource_id: Uuid) -> MembershipChange {
        if self.resources.insert(resource_id) {
            MembershipChange::Added
        } else {
            MembershipChange::AlreadyPresent
        }
    }

    pub fn remove(&mut self, resource_id: &Uuid) -> MembershipChange {
        if self.resources.remove(resource_id) {
            MembershipChange::Removed
        } else {
            MembershipChange::NotPresent
        }
    }

    pub fn ids(&self) -> Vec<Uuid> {
        self.resources.iter().copied().collect()
    }
}

/// Trims and checks a collection name.
pub fn normalize_collection_name(name: &str) -> Result<String, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation(
            "collection name cannot be empty".to_string(),
        ));
    }
    if name.chars().count() > MAX_COLLECTION_NAME_LEN {
        return Err(AppError::Validation(format!(
            "collection name must be at most {MAX_COLLECTION_NAME_LEN} characters"
        )));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_add_is_noop() {
        let id = Uuid::new_v4();
        let mut members = CollectionMembers::default();
        assert_eq!(members.add(id), MembershipChange::Added);
        assert_eq!(members.add(id), MembershipChange::AlreadyPresent);
        assert_eq!(members.ids(), vec![id]);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut members = CollectionMembers::default();
        assert_eq!(members.remove(&Uuid::new_v4()), MembershipChange::NotPresent);
    }

    #[test]
    fn test_count_deltas() {
        assert_eq!(MembershipChange::Added.count_delta(), 1);
        assert_eq!(MembershipChange::Removed.count_delta(), -1);
        assert_eq!(MembershipChange::AlreadyPresent.count_delta(), 0);
        assert_eq!(MembershipChange::NotPresent.count_delta(), 0);
    }

    #[test]
    fn test_collection_name_rules() {
        assert_eq!(normalize_collection_name("  Math games ").unwrap(), "Math games");
        assert!(normalize_collection_name("   ").is_err());
        assert!(normalize_collection_name(&"x".repeat(81)).is_err());
    }
}
