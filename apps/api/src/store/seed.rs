//! Demo data loaded into the memory store so a fresh instance has something
//! to show.

use std::collections::BTreeMap;

use anyhow::Result;
use tracing::info;
use uuid::Uuid;

use crate::models::intake::{IntakeForm, StudentEntry};
use crate::models::library::{NewCollection, NewResource};
use crate::rewards::ledger::{AdjustmentKind, CoinAdjustment, StreakUpdate};
use crate::store::Store;

pub const DEMO_PARENT_ID: Uuid = Uuid::from_u128(0x5e3d_0c1a_7b2f_4c8e_9a61_0d4f_2b7e_1c01);
pub const DEMO_STUDENT_ID: Uuid = Uuid::from_u128(0x5e3d_0c1a_7b2f_4c8e_9a61_0d4f_2b7e_5701);

struct DemoResource {
    title: &'static str,
    subject: &'static str,
    resource_type: &'static str,
    url: &'static str,
    grades: &'static [&'static str],
}

const DEMO_RESOURCES: &[DemoResource] = &[
    DemoResource {
        title: "Fraction Strips Printable",
        subject: "math",
        resource_type: "worksheet",
        url: "https://example.org/fraction-strips.pdf",
        grades: &["3rd", "4th"],
    },
    DemoResource {
        title: "Multiplication Facts Song",
        subject: "math",
        resource_type: "video",
        url: "https://example.org/times-tables",
        grades: &["2nd", "3rd"],
    },
    DemoResource {
        title: "Kitchen Chemistry Experiments",
        subject: "science",
        resource_type: "activity",
        url: "https://example.org/kitchen-chemistry",
        grades: &["4th", "5th", "6th"],
    },
    DemoResource {
        title: "Ancient Egypt Timeline",
        subject: "history",
        resource_type: "printable",
        url: "https://example.org/egypt-timeline",
        grades: &["5th", "6th"],
    },
    DemoResource {
        title: "Narrative Writing Prompts",
        subject: "english",
        resource_type: "worksheet",
        url: "https://example.org/writing-prompts",
        grades: &["3rd", "4th", "5th"],
    },
];

/// Writes the demo parent, intake form, library and reward history.
pub async fn seed_demo_data(store: &dyn Store) -> Result<()> {
    store
        .upsert_parent(DEMO_PARENT_ID, "Jordan Rivera", Some("jordan@example.org"))
        .await?;

    let mut platform_choices = BTreeMap::new();
    platform_choices.insert("math".to_string(), "math-quest".to_string());

    let form = IntakeForm {
        target_gpa: Some(3.5),
        outcome_level: Some("college prep".to_string()),
        schedule_days: ["Mon", "Tue", "Wed", "Thu"]
            .iter()
            .map(|d| d.to_string())
            .collect(),
        schedule_times: Some("mornings".to_string()),
        structure_preference: Some("structured".to_string()),
        term_structure: Some("year-round".to_string()),
        mentor_tone: Some("encouraging".to_string()),
        learning_styles: vec!["visual".to_string(), "hands-on".to_string()],
        platform_choices,
        students: vec![
            StudentEntry {
                name: "Ava".to_string(),
                grade_level: "4th".to_string(),
            },
            StudentEntry {
                name: "Leo".to_string(),
                grade_level: "2nd".to_string(),
            },
        ],
        extracurriculars: vec!["Piano".to_string(), "Soccer".to_string()],
        oversight_level: Some("weekly check-ins".to_string()),
        missed_work_penalty: Some("lose screen time".to_string()),
        monthly_budget: Some(150),
        ..IntakeForm::empty(DEMO_PARENT_ID)
    };
    store.save_intake(&form).await?;

    let mut resource_ids = Vec::with_capacity(DEMO_RESOURCES.len());
    for demo in DEMO_RESOURCES {
        let row = store
            .create_resource(&NewResource {
                title: demo.title.to_string(),
                description: None,
                subject: demo.subject.to_string(),
                url: Some(demo.url.to_string()),
                resource_type: demo.resource_type.to_string(),
                grade_levels: demo.grades.iter().map(|g| g.to_string()).collect(),
                created_by: None,
            })
            .await?;
        resource_ids.push(row.id);
    }

    let collection = store
        .create_collection(&NewCollection {
            parent_id: DEMO_PARENT_ID,
            name: "Math Week".to_string(),
            description: Some("Everything for this week's fractions unit".to_string()),
        })
        .await?;
    for id in resource_ids.iter().take(2) {
        store.add_to_collection(collection.id, *id).await?;
    }
    if let Some(first) = resource_ids.first() {
        store.toggle_favorite(DEMO_PARENT_ID, *first).await?;
    }

    for (kind, amount, reason) in [
        (AdjustmentKind::Add, 50, "Finished the fractions unit"),
        (AdjustmentKind::Add, 25, "Read for 30 minutes every day"),
        (AdjustmentKind::Remove, 10, "Skipped morning chores"),
    ] {
        store
            .adjust_coins(
                DEMO_STUDENT_ID,
                &CoinAdjustment {
                    kind,
                    amount,
                    reason: reason.to_string(),
                },
            )
            .await?;
    }
    store
        .update_streak(DEMO_STUDENT_ID, StreakUpdate::Set(6))
        .await?;

    info!(
        "Seeded demo data: parent {DEMO_PARENT_ID}, student {DEMO_STUDENT_ID}, {} resources",
        resource_ids.len()
    );
    Ok(())
}
