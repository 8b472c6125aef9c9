//! The preference bundle the matcher reads, and the defaults that fill its gaps.

use serde::Serialize;

use crate::models::intake::IntakeForm;

pub const DEFAULT_OUTCOME_LEVEL: &str = "balanced";
pub const DEFAULT_DAYS_PER_WEEK: u8 = 5;
pub const DEFAULT_STRUCTURE: &str = "structured";
pub const DEFAULT_TERM_STRUCTURE: &str = "traditional semesters";
pub const DEFAULT_TONE: &str = "encouraging";
pub const NO_GPA_TARGET: &str = "No specific target";

/// Parent preferences relevant to platform matching. Any field may be unset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreferenceBundle {
    pub target_gpa: Option<f64>,
    pub outcome_level: Option<String>,
    pub days_per_week: Option<u8>,
    pub structure_preference: Option<String>,
    pub term_structure: Option<String>,
    pub mentor_tone: Option<String>,
    pub learning_styles: Vec<String>,
}

impl PreferenceBundle {
    pub fn from_intake(form: &IntakeForm) -> Self {
        let days = form.schedule_days.len();
        PreferenceBundle {
            target_gpa: form.target_gpa,
            outcome_level: non_blank(&form.outcome_level),
            days_per_week: (days > 0).then(|| days.min(7) as u8),
            structure_preference: non_blank(&form.structure_preference),
            term_structure: non_blank(&form.term_structure),
            mentor_tone: non_blank(&form.mentor_tone),
            learning_styles: form
                .learning_styles
                .iter()
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    /// Fills every unset field with its hard-coded default.
    pub fn resolve(&self) -> ResolvedPreferences {
        ResolvedPreferences {
            gpa_text: gpa_display(self.target_gpa),
            outcome_level: self
                .outcome_level
                .clone()
                .unwrap_or_else(|| DEFAULT_OUTCOME_LEVEL.to_string()),
            days_per_week: self.days_per_week.unwrap_or(DEFAULT_DAYS_PER_WEEK),
            structure_preference: self
                .structure_preference
                .clone()
                .unwrap_or_else(|| DEFAULT_STRUCTURE.to_string()),
            term_structure: self
                .term_structure
                .clone()
                .unwrap_or_else(|| DEFAULT_TERM_STRUCTURE.to_string()),
            mentor_tone: self
                .mentor_tone
                .clone()
                .unwrap_or_else(|| DEFAULT_TONE.to_string()),
            learning_styles: self.learning_styles.clone(),
            has_gpa_target: self.target_gpa.is_some(),
        }
    }
}

/// Preferences after defaults, ready for display and reason templating.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ResolvedPreferences {
    pub gpa_text: String,
    pub outcome_level: String,
    pub days_per_week: u8,
    pub structure_preference: String,
    pub term_structure: String,
    pub mentor_tone: String,
    pub learning_styles: Vec<String>,
    #[serde(skip)]
    pub has_gpa_target: bool,
}

pub fn gpa_display(target: Option<f64>) -> String {
    match target {
        Some(gpa) => format!("{gpa:.1} GPA"),
        None => NO_GPA_TARGET.to_string(),
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
