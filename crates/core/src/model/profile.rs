use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::difficulty::DifficultyTier;

pub const DEFAULT_NATIVE_LANGUAGE: &str = "English";
pub const DEFAULT_TARGET_LANGUAGE: &str = "Spanish";
pub const DEFAULT_DAILY_GOAL_MINUTES: u32 = 20;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProfileError {
    #[error("daily goal cannot be negative: {0}")]
    NegativeDailyGoal(i64),

    #[error("{field} cannot be empty")]
    EmptyLanguage { field: &'static str },
}

/// Who the learner is and what they are studying.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearnerProfile {
    name: String,
    native_language: String,
    target_language: String,
    level: DifficultyTier,
    daily_goal_minutes: u32,
    interests: Vec<String>,
}

/// Unvalidated profile input, as typed by the learner.
#[derive(Debug, Clone, Default)]
pub struct ProfileDraft {
    pub name: String,
    pub native_language: String,
    pub target_language: String,
    pub level: Option<DifficultyTier>,
    pub daily_goal_minutes: i64,
    pub interests: Vec<String>,
}

impl ProfileDraft {
    /// Validate and normalize the draft.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::NegativeDailyGoal` for a goal below zero and
    /// `ProfileError::EmptyLanguage` when either language is blank.
    pub fn validate(self) -> Result<LearnerProfile, ProfileError> {
        if self.daily_goal_minutes < 0 {
            return Err(ProfileError::NegativeDailyGoal(self.daily_goal_minutes));
        }
        let native_language = self.native_language.trim().to_string();
        if native_language.is_empty() {
            return Err(ProfileError::EmptyLanguage {
                field: "native language",
            });
        }
        let target_language = self.target_language.trim().to_string();
        if target_language.is_empty() {
            return Err(ProfileError::EmptyLanguage {
                field: "target language",
            });
        }

        let mut interests: Vec<String> = Vec::with_capacity(self.interests.len());
        for interest in self.interests {
            let interest = interest.trim().to_string();
            if !interest.is_empty() && !interests.contains(&interest) {
                interests.push(interest);
            }
        }

        Ok(LearnerProfile {
            name: self.name.trim().to_string(),
            native_language,
            target_language,
            level: self.level.unwrap_or(DifficultyTier::Beginner),
            daily_goal_minutes: u32::try_from(self.daily_goal_minutes).unwrap_or(u32::MAX),
            interests,
        })
    }
}

impl LearnerProfile {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn native_language(&self) -> &str {
        &self.native_language
    }

    #[must_use]
    pub fn target_language(&self) -> &str {
        &self.target_language
    }

    /// Self-reported level. The adaptive tier comes from progress instead.
    #[must_use]
    pub fn level(&self) -> DifficultyTier {
        self.level
    }

    #[must_use]
    pub fn daily_goal_minutes(&self) -> u32 {
        self.daily_goal_minutes
    }

    #[must_use]
    pub fn interests(&self) -> &[String] {
        &self.interests
    }
}

impl Default for LearnerProfile {
    fn default() -> Self {
        Self {
            name: String::new(),
            native_language: DEFAULT_NATIVE_LANGUAGE.to_string(),
            target_language: DEFAULT_TARGET_LANGUAGE.to_string(),
            level: DifficultyTier::Beginner,
            daily_goal_minutes: DEFAULT_DAILY_GOAL_MINUTES,
            interests: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ProfileDraft {
        ProfileDraft {
            name: "  Ana ".into(),
            native_language: "English".into(),
            target_language: "French".into(),
            level: Some(DifficultyTier::Intermediate),
            daily_goal_minutes: 30,
            interests: vec!["Travel".into(), " Food ".into(), "Travel".into(), "".into()],
        }
    }

    #[test]
    fn validate_trims_and_dedupes() {
        let profile = draft().validate().unwrap();
        assert_eq!(profile.name(), "Ana");
        assert_eq!(profile.target_language(), "French");
        assert_eq!(profile.level(), DifficultyTier::Intermediate);
        assert_eq!(profile.daily_goal_minutes(), 30);
        assert_eq!(profile.interests(), ["Travel", "Food"]);
    }

    #[test]
    fn negative_daily_goal_is_rejected() {
        let err = ProfileDraft {
            daily_goal_minutes: -5,
            ..draft()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err, ProfileError::NegativeDailyGoal(-5));
    }

    #[test]
    fn zero_daily_goal_is_allowed() {
        let profile = ProfileDraft {
            daily_goal_minutes: 0,
            ..draft()
        }
        .validate()
        .unwrap();
        assert_eq!(profile.daily_goal_minutes(), 0);
    }

    #[test]
    fn blank_target_language_is_rejected() {
        let err = ProfileDraft {
            target_language: "  ".into(),
            ..draft()
        }
        .validate()
        .unwrap_err();
        assert!(matches!(err, ProfileError::EmptyLanguage { .. }));
    }

    #[test]
    fn default_profile_targets_spanish() {
        let profile = LearnerProfile::default();
        assert_eq!(profile.target_language(), "Spanish");
        assert_eq!(profile.daily_goal_minutes(), 20);
    }
}
