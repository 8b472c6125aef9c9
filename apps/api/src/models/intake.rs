use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One child on the parent's roster, exactly as entered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StudentEntry {
    pub name: String,
    pub grade_level: String,
}

/// The flat preference record produced by the intake flow.
///
/// Every field except `parent_id` is optional on the wire; absent values
/// deserialize to empty collections or `None`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IntakeForm {
    pub parent_id: Uuid,
    #[serde(default)]
    pub target_gpa: Option<f64>,
    #[serde(default)]
    pub outcome_level: Option<String>,
    #[serde(default)]
    pub schedule_days: Vec<String>,
    #[serde(default)]
    pub schedule_times: Option<String>,
    #[serde(default)]
    pub structure_preference: Option<String>,
    #[serde(default)]
    pub term_structure: Option<String>,
    #[serde(default)]
    pub mentor_tone: Option<String>,
    #[serde(default)]
    pub learning_styles: Vec<String>,
    /// subject key -> platform id
    #[serde(default)]
    pub platform_choices: BTreeMap<String, String>,
    #[serde(default)]
    pub students: Vec<StudentEntry>,
    #[serde(default)]
    pub extracurriculars: Vec<String>,
    #[serde(default)]
    pub oversight_level: Option<String>,
    #[serde(default)]
    pub missed_work_penalty: Option<String>,
    /// Whole currency units per month.
    #[serde(default)]
    pub monthly_budget: Option<u32>,
}

impl IntakeForm {
    /// An empty form for `parent_id`. Every preference takes its default.
    pub fn empty(parent_id: Uuid) -> Self {
        IntakeForm {
            parent_id,
            target_gpa: None,
            outcome_level: None,
            schedule_days: vec![],
            schedule_times: None,
            structure_preference: None,
            term_structure: None,
            mentor_tone: None,
            learning_styles: vec![],
            platform_choices: BTreeMap::new(),
            students: vec![],
            extracurriculars: vec![],
            oversight_level: None,
            missed_work_penalty: None,
            monthly_budget: None,
        }
    }
}

/// Stored intake row. `data` holds the serialized `IntakeForm`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct IntakeFormRow {
    pub id: Uuid,
    pub parent_id: Uuid,
    pub data: sqlx::types::Json<IntakeForm>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_minimal_form_deserializes_with_defaults() {
        let id = Uuid::new_v4();
        let form: IntakeForm = serde_json::from_value(json!({ "parent_id": id })).unwrap();
        assert_eq!(form, IntakeForm::empty(id));
    }

    #[test]
    fn test_roster_order_preserved() {
        let form: IntakeForm = serde_json::from_value(json!({
            "parent_id": Uuid::new_v4(),
            "students": [
                { "name": "Zoë", "grade_level": "3rd" },
                { "name": "Ari", "grade_level": "Kindergarten" }
            ]
        }))
        .unwrap();
        assert_eq!(form.students[0].name, "Zoë");
        assert_eq!(form.students[1].grade_level, "Kindergarten");
    }
}
