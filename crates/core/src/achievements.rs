use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

use crate::model::ProgressModel;

/// Badges a learner can unlock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Badge {
    FirstSteps,
    Chatterbox,
    WordMaster,
    PronunciationPro,
    StreakKeeper,
    PointCollector,
}

impl Badge {
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Badge::FirstSteps => "First Steps",
            Badge::Chatterbox => "Chatterbox",
            Badge::WordMaster => "Word Master",
            Badge::PronunciationPro => "Pronunciation Pro",
            Badge::StreakKeeper => "Streak Keeper",
            Badge::PointCollector => "Point Collector",
        }
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

struct BadgeRule {
    badge: Badge,
    description: &'static str,
    unlocked: fn(&ProgressModel) -> bool,
}

const RULES: [BadgeRule; 6] = [
    BadgeRule {
        badge: Badge::FirstSteps,
        description: "Complete your first lesson",
        unlocked: |p| p.lessons_completed() >= 1,
    },
    BadgeRule {
        badge: Badge::Chatterbox,
        description: "Have 5 conversations",
        unlocked: |p| p.conversations_had() >= 5,
    },
    BadgeRule {
        badge: Badge::WordMaster,
        description: "Master 20 words",
        unlocked: |p| p.vocabulary_mastered().len() >= 20,
    },
    BadgeRule {
        badge: Badge::PronunciationPro,
        description: "Score 90+ on pronunciation",
        unlocked: |p| p.pronunciation_scores().iter().any(|&s| s >= 90),
    },
    BadgeRule {
        badge: Badge::StreakKeeper,
        description: "Maintain a 7-day streak",
        unlocked: |p| p.streak_days() >= 7,
    },
    BadgeRule {
        badge: Badge::PointCollector,
        description: "Earn 500 total points",
        unlocked: |p| p.total_points() >= 500,
    },
];

/// A badge with its unlock state, for listing every badge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AchievementStatus {
    pub badge: Badge,
    pub description: &'static str,
    pub unlocked: bool,
}

/// Badges currently unlocked by `progress`. Evaluated fresh on every call.
#[must_use]
pub fn unlocked_badges(progress: &ProgressModel) -> BTreeSet<Badge> {
    RULES
        .iter()
        .filter(|rule| (rule.unlocked)(progress))
        .map(|rule| rule.badge)
        .collect()
}

/// Every badge in table order with its description and unlock state.
#[must_use]
pub fn achievement_board(progress: &ProgressModel) -> Vec<AchievementStatus> {
    RULES
        .iter()
        .map(|rule| AchievementStatus {
            badge: rule.badge,
            description: rule.description,
            unlocked: (rule.unlocked)(progress),
        })
        .collect()
}
