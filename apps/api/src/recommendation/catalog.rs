//! Compiled-in learning platform catalog.
//!
//! Entries within a subject are authored in descending `match_score` order.
//! That order is the ranking; nothing is scored at runtime.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Subject {
    Math,
    Science,
    English,
    History,
    ForeignLanguage,
    Coding,
}

impl Subject {
    pub const ALL: [Subject; 6] = [
        Subject::Math,
        Subject::Science,
        Subject::English,
        Subject::History,
        Subject::ForeignLanguage,
        Subject::Coding,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Subject::Math => "math",
            Subject::Science => "science",
            Subject::English => "english",
            Subject::History => "history",
            Subject::ForeignLanguage => "foreign_language",
            Subject::Coding => "coding",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Subject::Math => "Math",
            Subject::Science => "Science",
            Subject::English => "English / Language Arts",
            Subject::History => "History / Social Studies",
            Subject::ForeignLanguage => "Foreign Language",
            Subject::Coding => "Coding",
        }
    }

    /// Exact key or alias match, case-insensitive.
    pub fn parse(raw: &str) -> Option<Subject> {
        let normalized = raw.trim().to_lowercase().replace(['-', ' '], "_");
        let subject = match normalized.as_str() {
            "math" | "maths" | "mathematics" => Subject::Math,
            "science" | "sciences" => Subject::Science,
            "english" | "language_arts" | "ela" | "reading" | "writing" => Subject::English,
            "history" | "social_studies" => Subject::History,
            "foreign_language" | "languages" | "language" | "spanish" | "french" => {
                Subject::ForeignLanguage
            }
            "coding" | "programming" | "computer_science" | "cs" => Subject::Coding,
            _ => return None,
        };
        Some(subject)
    }

    /// Like `parse`, but anything unrecognized is treated as math.
    pub fn from_query(raw: &str) -> Subject {
        Subject::parse(raw).unwrap_or(Subject::Math)
    }
}

/// One pre-authored platform entry.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PlatformEntry {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Authored constant, 0 to 100.
    pub match_score: u8,
    /// Learning-style tags, compared against the parent's learning styles.
    pub tags: &'static [&'static str],
    pub pace: &'static str,
    pub structure: &'static str,
    /// Whole currency units per month; 0 means free.
    pub monthly_cost: u32,
    pub best_for: &'static str,
}

const MATH: &[PlatformEntry] = &[
    PlatformEntry {
        id: "math-mastery-path",
        name: "Mastery Path Math",
        description: "Adaptive, mastery-based lessons that only advance once a concept sticks.",
        match_score: 96,
        tags: &["visual", "self-paced", "interactive"],
        pace: "self-paced",
        structure: "structured",
        monthly_cost: 0,
        best_for: "students who need a solid foundation before moving on",
    },
    PlatformEntry {
        id: "math-video-tutor",
        name: "Video Tutor Math",
        description: "Short instructor videos paired with worked examples and daily practice sets.",
        match_score: 91,
        tags: &["visual", "auditory", "video"],
        pace: "teacher-paced",
        structure: "structured",
        monthly_cost: 30,
        best_for: "families who want a teacher-led sequence",
    },
    PlatformEntry {
        id: "math-quest",
        name: "Math Quest",
        description: "Game-based practice with levels, badges and quick feedback.",
        match_score: 84,
        tags: &["gamified", "interactive", "hands-on"],
        pace: "self-paced",
        structure: "flexible",
        monthly_cost: 10,
        best_for: "reluctant learners who respond to challenges",
    },
    PlatformEntry {
        id: "math-manipulatives",
        name: "Hands-On Math Kits",
        description: "Monthly manipulative kits with a printed parent guide.",
        match_score: 78,
        tags: &["hands-on", "kinesthetic"],
        pace: "parent-led",
        structure: "flexible",
        monthly_cost: 25,
        best_for: "younger learners who think with their hands",
    },
];

const SCIENCE: &[PlatformEntry] = &[
    PlatformEntry {
        id: "science-lab-at-home",
        name: "Lab at Home",
        description: "Experiment-driven units with shipped lab supplies and video walkthroughs.",
        match_score: 94,
        tags: &["hands-on", "kinesthetic", "video"],
        pace: "weekly units",
        structure: "structured",
        monthly_cost: 35,
        best_for: "curious students who learn by doing",
    },
    PlatformEntry {
        id: "science-open-courseware",
        name: "Open Science Courseware",
        description: "Free full-year courses with readings, quizzes and simulations.",
        match_score: 88,
        tags: &["reading-writing", "self-paced", "visual"],
        pace: "self-paced",
        structure: "structured",
        monthly_cost: 0,
        best_for: "independent readers preparing for high school science",
    },
    PlatformEntry {
        id: "science-nature-journal",
        name: "Nature Journal",
        description: "Observation-based nature study with journaling prompts.",
        match_score: 80,
        tags: &["hands-on", "reading-writing"],
        pace: "parent-led",
        structure: "flexible",
        monthly_cost: 0,
        best_for: "families who spend time outdoors",
    },
];

const ENGLISH: &[PlatformEntry] = &[
    PlatformEntry {
        id: "english-literature-circle",
        name: "Literature Circle",
        description: "Novel studies with discussion guides, vocabulary and essay prompts.",
        match_score: 93,
        tags: &["reading-writing", "auditory"],
        pace: "weekly units",
        structure: "structured",
        monthly_cost: 20,
        best_for: "strong readers ready for analysis",
    },
    PlatformEntry {
        id: "english-writing-workshop",
        name: "Writing Workshop Online",
        description: "Live small-group writing classes with instructor feedback.",
        match_score: 89,
        tags: &["reading-writing", "interactive", "auditory"],
        pace: "teacher-paced",
        structure: "structured",
        monthly_cost: 45,
        best_for: "students who need feedback on their writing",
    },
    PlatformEntry {
        id: "english-phonics-play",
        name: "Phonics Play",
        description: "Game-based phonics and early reading practice.",
        match_score: 82,
        tags: &["gamified", "visual", "auditory"],
        pace: "self-paced",
        structure: "flexible",
        monthly_cost: 12,
        best_for: "early readers building decoding skills",
    },
];

const HISTORY: &[PlatformEntry] = &[
    PlatformEntry {
        id: "history-living-books",
        name: "Living Books History",
        description: "Chronological history told through narrative books and timelines.",
        match_score: 92,
        tags: &["reading-writing", "visual"],
        pace: "parent-led",
        structure: "flexible",
        monthly_cost: 0,
        best_for: "families who read aloud together",
    },
    PlatformEntry {
        id: "history-documentary",
        name: "Documentary History",
        description: "Documentary-style video lessons with guided notes.",
        match_score: 87,
        tags: &["video", "visual", "auditory"],
        pace: "self-paced",
        structure: "structured",
        monthly_cost: 15,
        best_for: "visual learners who like stories",
    },
    PlatformEntry {
        id: "history-simulations",
        name: "History Simulations",
        description: "Role-play simulations and projects for each era.",
        match_score: 79,
        tags: &["hands-on", "interactive"],
        pace: "weekly units",
        structure: "flexible",
        monthly_cost: 18,
        best_for: "social learners and co-op groups",
    },
];

const FOREIGN_LANGUAGE: &[PlatformEntry] = &[
    PlatformEntry {
        id: "language-live-tutor",
        name: "Live Language Tutor",
        description: "One-on-one video sessions with native speakers.",
        match_score: 95,
        tags: &["auditory", "interactive"],
        pace: "teacher-paced",
        structure: "structured",
        monthly_cost: 60,
        best_for: "students aiming for conversational fluency",
    },
    PlatformEntry {
        id: "language-daily-streak",
        name: "Daily Streak Languages",
        description: "Bite-sized daily lessons with streaks and spaced repetition.",
        match_score: 86,
        tags: &["gamified", "self-paced", "visual"],
        pace: "self-paced",
        structure: "flexible",
        monthly_cost: 0,
        best_for: "building a consistent daily habit",
    },
    PlatformEntry {
        id: "language-immersion-audio",
        name: "Immersion Audio Course",
        description: "Audio-first course built around listening and repetition.",
        match_score: 81,
        tags: &["auditory", "self-paced"],
        pace: "self-paced",
        structure: "structured",
        monthly_cost: 20,
        best_for: "learning in the car or on the go",
    },
];

const CODING: &[PlatformEntry] = &[
    PlatformEntry {
        id: "coding-project-lab",
        name: "Project Lab Coding",
        description: "Build real games and websites step by step in the browser.",
        match_score: 95,
        tags: &["hands-on", "interactive", "self-paced"],
        pace: "self-paced",
        structure: "structured",
        monthly_cost: 25,
        best_for: "students who want to make things",
    },
    PlatformEntry {
        id: "coding-block-playground",
        name: "Block Coding Playground",
        description: "Visual block-based programming puzzles for beginners.",
        match_score: 88,
        tags: &["visual", "gamified"],
        pace: "self-paced",
        structure: "flexible",
        monthly_cost: 0,
        best_for: "first-time programmers",
    },
    PlatformEntry {
        id: "coding-live-bootcamp",
        name: "Teen Code Bootcamp",
        description: "Live cohort classes covering Python and web development.",
        match_score: 83,
        tags: &["interactive", "auditory", "video"],
        pace: "teacher-paced",
        structure: "structured",
        monthly_cost: 80,
        best_for: "older students with a career interest",
    },
];

/// Catalog entries for `subject`, best match first.
pub fn platforms_for(subject: Subject) -> &'static [PlatformEntry] {
    match subject {
        Subject::Math => MATH,
        Subject::Science => SCIENCE,
        Subject::English => ENGLISH,
        Subject::History => HISTORY,
        Subject::ForeignLanguage => FOREIGN_LANGUAGE,
        Subject::Coding => CODING,
    }
}

pub fn find_platform(subject: Subject, platform_id: &str) -> Option<&'static PlatformEntry> {
    platforms_for(subject).iter().find(|p| p.id == platform_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_subject_has_at_least_three_entries() {
        for subject in Subject::ALL {
            assert!(
                platforms_for(subject).len() >= 3,
                "{} has too few platforms",
                subject.key()
            );
        }
    }

    #[test]
    fn test_entries_authored_in_descending_score_order() {
        for subject in Subject::ALL {
            let scores: Vec<u8> = platforms_for(subject).iter().map(|p| p.match_score).collect();
            assert!(
                scores.windows(2).all(|w| w[0] >= w[1]),
                "{} not pre-ranked: {scores:?}",
                subject.key()
            );
            assert!(scores.iter().all(|&s| s <= 100));
        }
    }

    #[test]
    fn test_platform_ids_unique_across_catalog() {
        let mut seen = HashSet::new();
        for subject in Subject::ALL {
            for p in platforms_for(subject) {
                assert!(seen.insert(p.id), "duplicate id {}", p.id);
            }
        }
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!(Subject::parse("Mathematics"), Some(Subject::Math));
        assert_eq!(Subject::parse("language arts"), Some(Subject::English));
        assert_eq!(Subject::parse("Social-Studies"), Some(Subject::History));
        assert_eq!(Subject::parse("spanish"), Some(Subject::ForeignLanguage));
        assert_eq!(Subject::parse(" CS "), Some(Subject::Coding));
        assert_eq!(Subject::parse("foreign_language"), Some(Subject::ForeignLanguage));
    }

    #[test]
    fn test_unknown_subject_falls_back_to_math() {
        assert_eq!(Subject::from_query("underwater basket weaving"), Subject::Math);
        assert_eq!(Subject::from_query(""), Subject::Math);
    }

    #[test]
    fn test_keys_round_trip_through_parse() {
        for subject in Subject::ALL {
            assert_eq!(Subject::parse(subject.key()), Some(subject));
        }
    }

    #[test]
    fn test_find_platform_scoped_to_subject() {
        assert!(find_platform(Subject::Math, "math-quest").is_some());
        assert!(find_platform(Subject::Science, "math-quest").is_none());
    }
}
