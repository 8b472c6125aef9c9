use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::recommendation::catalog::{find_platform, PlatformEntry, Subject};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("select exactly one platform to confirm ({0} selected)")]
    NotExactlyOne(usize),

    #[error("platform '{platform_id}' is not offered for {subject}")]
    UnknownPlatform { subject: String, platform_id: String },
}

/// Platforms the parent has ticked on the recommendation screen.
///
/// Travels as a plain JSON array of platform ids; repeats are dropped on the
/// way in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct SelectionState {
    selected: Vec<String>,
}

impl From<Vec<String>> for SelectionState {
    fn from(ids: Vec<String>) -> Self {
        SelectionState::from_ids(ids)
    }
}

impl From<SelectionState> for Vec<String> {
    fn from(state: SelectionState) -> Self {
        state.selected
    }
}

impl SelectionState {
    /// Builds a selection from raw ids, dropping repeats.
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut state = SelectionState::default();
        for id in ids {
            let id = id.into();
            if !state.is_selected(&id) {
                state.selected.push(id);
            }
        }
        state
    }

    /// Flips `platform_id` in or out. Returns whether it is now selected.
    pub fn toggle(&mut self, platform_id: &str) -> bool {
        if let Some(pos) = self.selected.iter().position(|id| id == platform_id) {
            self.selected.remove(pos);
            false
        } else {
            self.selected.push(platform_id.to_string());
            true
        }
    }

    pub fn is_selected(&self, platform_id: &str) -> bool {
        self.selected.iter().any(|id| id == platform_id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Confirmation is only possible with exactly one platform selected.
    pub fn can_confirm(&self) -> bool {
        self.selected.len() == 1
    }

    /// Resolves the single selected platform against the subject's catalog.
    pub fn confirm(&self, subject: Subject) -> Result<&'static PlatformEntry, SelectionError> {
        let [platform_id] = self.selected.as_slice() else {
            return Err(SelectionError::NotExactlyOne(self.len()));
        };
        find_platform(subject, platform_id).ok_or_else(|| SelectionError::UnknownPlatform {
            subject: subject.key().to_string(),
            platform_id: platform_id.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirm_enabled_only_with_exactly_one() {
        let mut state = SelectionState::default();
        assert!(!state.can_confirm());

        state.toggle("math-quest");
        assert!(state.can_confirm());

        state.toggle("math-video-tutor");
        assert!(!state.can_confirm());

        state.toggle("math-quest");
        assert!(state.can_confirm());
        assert!(state.is_selected("math-video-tutor"));
    }

    #[test]
    fn test_toggle_twice_deselects() {
        let mut state = SelectionState::default();
        assert!(state.toggle("math-quest"));
        assert!(!state.toggle("math-quest"));
        assert_eq!(state.len(), 0);
    }

    #[test]
    fn test_confirm_zero_or_many_rejected() {
        assert_eq!(
            SelectionState::default().confirm(Subject::Math),
            Err(SelectionError::NotExactlyOne(0))
        );
        let many = SelectionState::from_ids(["math-quest", "math-video-tutor"]);
        assert_eq!(
            many.confirm(Subject::Math),
            Err(SelectionError::NotExactlyOne(2))
        );
    }

    #[test]
    fn test_from_ids_drops_repeats() {
        let state = SelectionState::from_ids(["math-quest", "math-quest"]);
        assert!(state.can_confirm());
    }

    #[test]
    fn test_deserialize_drops_repeats() {
        let state: SelectionState =
            serde_json::from_value(serde_json::json!(["math-quest", "math-quest"])).unwrap();
        assert_eq!(state.len(), 1);
        assert_eq!(
            serde_json::to_value(&state).unwrap(),
            serde_json::json!(["math-quest"])
        );
    }

    #[test]
    fn test_confirm_resolves_platform() {
        let state = SelectionState::from_ids(["math-quest"]);
        assert_eq!(state.confirm(Subject::Math).unwrap().name, "Math Quest");
    }

    #[test]
    fn test_confirm_rejects_platform_from_other_subject() {
        let state = SelectionState::from_ids(["math-quest"]);
        assert_eq!(
            state.confirm(Subject::Coding),
            Err(SelectionError::UnknownPlatform {
                subject: "coding".to_string(),
                platform_id: "math-quest".to_string()
            })
        );
    }
}
