//! Preference-to-recommendation matcher.
//!
//! The catalog order is the ranking. The matcher picks the first entry and up
//! to two runner-ups, then explains each with sentences interpolated from the
//! resolved preferences.

use serde::Serialize;

use crate::recommendation::catalog::{platforms_for, PlatformEntry, Subject};
use crate::recommendation::preferences::{PreferenceBundle, ResolvedPreferences};

pub const MAX_RUNNER_UPS: usize = 2;

#[derive(Debug, Clone, Serialize)]
pub struct RecommendedPlatform {
    pub rank: usize,
    pub platform: &'static PlatformEntry,
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub subject: Subject,
    pub subject_name: &'static str,
    pub preferences: ResolvedPreferences,
    pub top: RecommendedPlatform,
    pub runner_ups: Vec<RecommendedPlatform>,
}

/// Returns `None` only if the subject has no catalog entries.
pub fn recommend(subject: Subject, prefs: &PreferenceBundle) -> Option<Recommendation> {
    let resolved = prefs.resolve();
    let (first, rest) = platforms_for(subject).split_first()?;

    let top = RecommendedPlatform {
        rank: 1,
        platform: first,
        reasons: top_reasons(subject, first, &resolved),
    };

    let runner_ups = rest
        .iter()
        .take(MAX_RUNNER_UPS)
        .enumerate()
        .map(|(i, platform)| RecommendedPlatform {
            rank: i + 2,
            platform,
            reasons: runner_up_reasons(platform, &resolved),
        })
        .collect();

    Some(Recommendation {
        subject,
        subject_name: subject.display_name(),
        preferences: resolved,
        top,
        runner_ups,
    })
}

fn top_reasons(
    subject: Subject,
    platform: &PlatformEntry,
    prefs: &ResolvedPreferences,
) -> Vec<String> {
    let mut reasons = vec![format!(
        "{} is the top {} match for your family at {}%.",
        platform.name,
        subject.display_name(),
        platform.match_score
    )];

    if prefs.has_gpa_target {
        reasons.push(format!(
            "Builds toward your {} goal with {} outcomes in mind.",
            prefs.gpa_text, prefs.outcome_level
        ));
    } else {
        reasons.push(format!(
            "GPA goal: {}. Geared toward {} outcomes.",
            prefs.gpa_text, prefs.outcome_level
        ));
    }

    reasons.push(format!(
        "Fits a {}-day school week at a {} pace.",
        prefs.days_per_week, platform.pace
    ));

    if platform
        .structure
        .eq_ignore_ascii_case(&prefs.structure_preference)
    {
        reasons.push(format!(
            "Matches your preference for a {} approach.",
            prefs.structure_preference
        ));
    } else {
        reasons.push(format!(
            "Offers a {} alternative to your {} preference.",
            platform.structure, prefs.structure_preference
        ));
    }

    reasons.push(format!(
        "Works within {} and pairs well with a {} mentor tone.",
        prefs.term_structure, prefs.mentor_tone
    ));

    if let Some(styles) = style_overlap(platform, prefs) {
        reasons.push(format!("Suited to {styles} learners."));
    }

    reasons
}

fn runner_up_reasons(platform: &PlatformEntry, prefs: &ResolvedPreferences) -> Vec<String> {
    let mut reasons = vec![format!(
        "{}% match, best for {}.",
        platform.match_score, platform.best_for
    )];
    if let Some(styles) = style_overlap(platform, prefs) {
        reasons.push(format!("Also suited to {styles} learners."));
    }
    reasons.push(cost_text(platform.monthly_cost));
    reasons
}

/// Learning styles the parent listed that the platform is tagged with, joined
/// for display. `None` when nothing overlaps.
fn style_overlap(platform: &PlatformEntry, prefs: &ResolvedPreferences) -> Option<String> {
    let matched: Vec<&str> = prefs
        .learning_styles
        .iter()
        .filter(|style| platform.tags.iter().any(|t| t.eq_ignore_ascii_case(style)))
        .map(String::as_str)
        .collect();

    match matched.as_slice() {
        [] => None,
        [one] => Some((*one).to_string()),
        [init @ .., last] => Some(format!("{} and {}", init.join(", "), last)),
    }
}

fn cost_text(monthly_cost: u32) -> String {
    if monthly_cost == 0 {
        "Free to use.".to_string()
    } else {
        format!("About ${monthly_cost}/month.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefs_with_styles(styles: &[&str]) -> PreferenceBundle {
        PreferenceBundle {
            learning_styles: styles.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_top_is_first_catalog_entry() {
        let rec = recommend(Subject::Science, &PreferenceBundle::default()).unwrap();
        assert_eq!(rec.top.platform.id, platforms_for(Subject::Science)[0].id);
        assert_eq!(rec.top.rank, 1);
    }

    #[test]
    fn test_at_most_two_runner_ups_in_catalog_order() {
        // Math has four entries; only the next two are returned.
        let rec = recommend(Subject::Math, &PreferenceBundle::default()).unwrap();
        let catalog = platforms_for(Subject::Math);
        assert_eq!(rec.runner_ups.len(), 2);
        assert_eq!(rec.runner_ups[0].platform.id, catalog[1].id);
        assert_eq!(rec.runner_ups[1].platform.id, catalog[2].id);
        assert_eq!(
            rec.runner_ups.iter().map(|r| r.rank).collect::<Vec<_>>(),
            vec![2, 3]
        );
    }

    #[test]
    fn test_unknown_subject_query_recommends_math() {
        let rec =
            recommend(Subject::from_query("astrology"), &PreferenceBundle::default()).unwrap();
        assert_eq!(rec.subject, Subject::Math);
        assert_eq!(rec.top.platform.id, platforms_for(Subject::Math)[0].id);
    }

    #[test]
    fn test_missing_gpa_reads_no_specific_target() {
        let rec = recommend(Subject::Math, &PreferenceBundle::default()).unwrap();
        assert_eq!(rec.preferences.gpa_text, "No specific target");
        assert!(rec.top.reasons.iter().any(|r| r.contains("No specific target")));
    }

    #[test]
    fn test_gpa_target_interpolated() {
        let prefs = PreferenceBundle {
            target_gpa: Some(3.8),
            outcome_level: Some("college prep".into()),
            ..Default::default()
        };
        let rec = recommend(Subject::English, &prefs).unwrap();
        assert!(rec
            .top
            .reasons
            .iter()
            .any(|r| r.contains("3.8 GPA") && r.contains("college prep")));
    }

    #[test]
    fn test_days_and_tone_interpolated() {
        let prefs = PreferenceBundle {
            days_per_week: Some(4),
            mentor_tone: Some("playful".into()),
            ..Default::default()
        };
        let rec = recommend(Subject::History, &prefs).unwrap();
        assert!(rec.top.reasons.iter().any(|r| r.contains("4-day")));
        assert!(rec.top.reasons.iter().any(|r| r.contains("playful mentor tone")));
    }

    #[test]
    fn test_style_reason_only_when_tags_overlap() {
        // Mastery Path Math is tagged visual
        let rec = recommend(Subject::Math, &prefs_with_styles(&["visual", "auditory"])).unwrap();
        assert!(rec.top.reasons.iter().any(|r| r == "Suited to visual learners."));

        let rec = recommend(Subject::Math, &prefs_with_styles(&["kinesthetic"])).unwrap();
        assert!(!rec.top.reasons.iter().any(|r| r.contains("learners")));
    }

    #[test]
    fn test_style_overlap_joins_multiple() {
        let rec = recommend(
            Subject::Math,
            &prefs_with_styles(&["visual", "self-paced", "interactive"]),
        )
        .unwrap();
        assert!(rec
            .top
            .reasons
            .iter()
            .any(|r| r == "Suited to visual, self-paced and interactive learners."));
    }

    #[test]
    fn test_structure_mismatch_phrased_as_alternative() {
        let prefs = PreferenceBundle {
            structure_preference: Some("flexible".into()),
            ..Default::default()
        };
        // Top science entry is structured
        let rec = recommend(Subject::Science, &prefs).unwrap();
        assert!(rec
            .top
            .reasons
            .iter()
            .any(|r| r.contains("structured alternative to your flexible")));
    }

    #[test]
    fn test_runner_up_cost_text() {
        assert_eq!(cost_text(0), "Free to use.");
        assert_eq!(cost_text(30), "About $30/month.");
    }
}
