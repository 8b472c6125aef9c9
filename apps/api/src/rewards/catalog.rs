use serde::Serialize;

/// Something a student can redeem coins for.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RewardItem {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub cost: i64,
    pub category: &'static str,
}

pub const REWARD_CATALOG: &[RewardItem] = &[
    RewardItem {
        id: "extra-screen-time",
        name: "30 Minutes Screen Time",
        description: "Half an hour of games or shows after lessons.",
        cost: 50,
        category: "privileges",
    },
    RewardItem {
        id: "pick-dinner",
        name: "Pick Tonight's Dinner",
        description: "Choose what the family eats tonight.",
        cost: 75,
        category: "privileges",
    },
    RewardItem {
        id: "late-bedtime",
        name: "Stay Up 30 Minutes Late",
        description: "Push bedtime back half an hour on a weekend.",
        cost: 100,
        category: "privileges",
    },
    RewardItem {
        id: "field-trip",
        name: "Choose a Field Trip",
        description: "Pick the destination for the next field trip.",
        cost: 250,
        category: "experiences",
    },
    RewardItem {
        id: "book-store",
        name: "New Book",
        description: "A trip to the bookstore to pick a new book.",
        cost: 150,
        category: "items",
    },
    RewardItem {
        id: "art-supplies",
        name: "Art Supply Kit",
        description: "A new set of markers, paints or sketchbooks.",
        cost: 200,
        category: "items",
    },
    RewardItem {
        id: "no-chores-day",
        name: "Chore-Free Day",
        description: "Skip regular chores for one day.",
        cost: 300,
        category: "experiences",
    },
];

pub fn find_reward(id: &str) -> Option<&'static RewardItem> {
    REWARD_CATALOG.iter().find(|item| item.id == id)
}
