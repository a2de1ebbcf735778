#![forbid(unsafe_code)]

pub mod achievements;
pub mod catalog;
pub mod difficulty;
pub mod error;
pub mod model;
pub mod rewards;
pub mod time;

pub use achievements::{AchievementStatus, Badge, achievement_board, unlocked_badges};
pub use catalog::{CatalogError, ContentCatalog, Intent, LanguagePack, VocabularyCategory};
pub use difficulty::DifficultyTier;
pub use error::Error;
pub use rewards::{RewardConfig, RewardError};
pub use time::Clock;
