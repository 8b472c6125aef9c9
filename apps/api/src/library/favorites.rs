use std::collections::BTreeSet;

use uuid::Uuid;

/// One parent's favorite resources.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoriteSet {
    resources: BTreeSet<Uuid>,
}

impl FavoriteSet {
    /// Flips membership of `resource_id`. Returns whether it is now a favorite.
    pub fn toggle(&mut self, resource_id: Uuid) -> bool {
        if self.resources.remove(&resource_id) {
            false
        } else {
            self.resources.insert(resource_id);
            true
        }
    }

    /// Drops a deleted resource. Returns whether it was a favorite.
    pub fn forget(&mut self, resource_id: &Uuid) -> bool {
        self.resources.remove(resource_id)
    }

    pub fn ids(&self) -> Vec<Uuid> {
        self.resources.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_twice_restores_membership() {
        let kept = Uuid::new_v4();
        let flipped = Uuid::new_v4();

        let mut set = FavoriteSet::default();
        set.toggle(kept);
        let before = set.clone();

        assert!(set.toggle(flipped));
        assert!(!set.toggle(flipped));
        assert_eq!(set, before);

        // Same from the other direction: starting as a favorite
        assert!(!set.toggle(kept));
        assert!(set.toggle(kept));
        assert_eq!(set, before);
    }

    #[test]
    fn test_forget() {
        let id = Uuid::new_v4();
        let mut set = FavoriteSet::default();
        set.toggle(id);
        assert!(set.forget(&id));
        assert!(!set.forget(&id));
        assert!(set.ids().is_empty());
    }
}
