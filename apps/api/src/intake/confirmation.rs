//! Confirmation view built from a stored intake form.

use serde::Serialize;
use uuid::Uuid;

use crate::models::intake::{IntakeForm, StudentEntry};
use crate::recommendation::catalog::{find_platform, platforms_for, Subject};
use crate::recommendation::preferences::{
    gpa_display, PreferenceBundle, DEFAULT_DAYS_PER_WEEK,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanSource {
    /// The parent picked this platform.
    Chosen,
    /// No valid pick on file; the top catalog entry stands in.
    Recommended,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanItem {
    pub subject: Subject,
    pub subject_name: &'static str,
    pub platform_id: &'static str,
    pub platform_name: &'static str,
    pub source: PlanSource,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfirmationSummary {
    pub parent_id: Uuid,
    pub parent_name: String,
    /// Exactly as submitted, same order.
    pub students: Vec<StudentEntry>,
    pub gpa_text: String,
    pub outcome_level: String,
    pub schedule: String,
    pub term_structure: String,
    pub mentor_tone: String,
    pub learning_styles: Vec<String>,
    pub extracurriculars: Vec<String>,
    pub oversight_level: Option<String>,
    pub missed_work_penalty: Option<String>,
    pub budget: String,
    pub plan: Vec<PlanItem>,
}

pub fn build_confirmation(parent_name: &str, form: &IntakeForm) -> ConfirmationSummary {
    let prefs = PreferenceBundle::from_intake(form).resolve();

    ConfirmationSummary {
        parent_id: form.parent_id,
        parent_name: parent_name.to_string(),
        students: form.students.clone(),
        gpa_text: gpa_display(form.target_gpa),
        outcome_level: prefs.outcome_level,
        schedule: schedule_text(&form.schedule_days, form.schedule_times.as_deref()),
        term_structure: prefs.term_structure,
        mentor_tone: prefs.mentor_tone,
        learning_styles: form.learning_styles.clone(),
        extracurriculars: form.extracurriculars.clone(),
        oversight_level: form.oversight_level.clone(),
        missed_work_penalty: form.missed_work_penalty.clone(),
        budget: budget_text(form.monthly_budget),
        plan: build_plan(form),
    }
}

/// One plan line per catalog subject.
pub fn build_plan(form: &IntakeForm) -> Vec<PlanItem> {
    Subject::ALL
        .iter()
        .filter_map(|&subject| {
            let chosen = form
                .platform_choices
                .iter()
                .filter(|(key, _)| Subject::parse(key) == Some(subject))
                .find_map(|(_, platform_id)| find_platform(subject, platform_id));

            let (platform, source) = match chosen {
                Some(p) => (p, PlanSource::Chosen),
                None => (platforms_for(subject).first()?, PlanSource::Recommended),
            };

            Some(PlanItem {
                subject,
                subject_name: subject.display_name(),
                platform_id: platform.id,
                platform_name: platform.name,
                source,
            })
        })
        .collect()
}

fn schedule_text(days: &[String], times: Option<&str>) -> String {
    let days_part = if days.is_empty() {
        format!("{DEFAULT_DAYS_PER_WEEK} days/week")
    } else {
        days.join(", ")
    };
    match times.map(str::trim).filter(|t| !t.is_empty()) {
        Some(t) => format!("{days_part} ({t})"),
        None => days_part,
    }
}

fn budget_text(monthly_budget: Option<u32>) -> String {
    match monthly_budget {
        Some(0) => "Free resources only".to_string(),
        Some(amount) => format!("Up to ${amount}/month"),
        None => "No budget set".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Vec<StudentEntry> {
        vec![
            StudentEntry {
                name: "María José".into(),
                grade_level: "7th Grade".into(),
            },
            StudentEntry {
                name: "  Sam ".into(),
                grade_level: "K".into(),
            },
            StudentEntry {
                name: "Ava".into(),
                grade_level: "Pre-K (age 4)".into(),
            },
        ]
    }

    #[test]
    fn test_roster_rendered_verbatim() {
        let mut form = IntakeForm::empty(Uuid::new_v4());
        form.students = roster();
        let summary = build_confirmation("Jordan", &form);
        assert_eq!(summary.students, roster());
    }

    #[test]
    fn test_no_gpa_target_text() {
        let summary = build_confirmation("Jordan", &IntakeForm::empty(Uuid::new_v4()));
        assert_eq!(summary.gpa_text, "No specific target");
        assert_eq!(summary.budget, "No budget set");
        assert_eq!(summary.schedule, "5 days/week");
    }

    #[test]
    fn test_schedule_with_times() {
        assert_eq!(
            schedule_text(&["Mon".into(), "Thu".into()], Some(" afternoons ")),
            "Mon, Thu (afternoons)"
        );
    }

    #[test]
    fn test_budget_text() {
        assert_eq!(budget_text(Some(0)), "Free resources only");
        assert_eq!(budget_text(Some(120)), "Up to $120/month");
    }

    #[test]
    fn test_plan_prefers_valid_choice() {
        let mut form = IntakeForm::empty(Uuid::new_v4());
        form.platform_choices
            .insert("Mathematics".into(), "math-quest".into());
        // Not a science platform: falls back to the recommendation
        form.platform_choices
            .insert("science".into(), "math-quest".into());

        let plan = build_plan(&form);
        assert_eq!(plan.len(), Subject::ALL.len());

        let math = plan.iter().find(|p| p.subject == Subject::Math).unwrap();
        assert_eq!((math.platform_id, math.source), ("math-quest", PlanSource::Chosen));

        let science = plan.iter().find(|p| p.subject == Subject::Science).unwrap();
        assert_eq!(science.source, PlanSource::Recommended);
        assert_eq!(science.platform_id, platforms_for(Subject::Science)[0].id);
    }
}
