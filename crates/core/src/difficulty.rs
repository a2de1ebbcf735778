use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Level score at which a learner leaves the beginner tier.
pub const INTERMEDIATE_THRESHOLD: u64 = 100;
/// Level score at which a learner reaches the advanced tier.
pub const ADVANCED_THRESHOLD: u64 = 300;

/// Adaptive difficulty tier derived from a level score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyTier {
    Beginner,
    Intermediate,
    Advanced,
}

impl DifficultyTier {
    pub const ALL: [DifficultyTier; 3] = [
        DifficultyTier::Beginner,
        DifficultyTier::Intermediate,
        DifficultyTier::Advanced,
    ];

    /// Maps a level score onto a tier.
    ///
    /// Lower bounds are inclusive: 100 is intermediate, 300 is advanced.
    #[must_use]
    pub fn from_level_score(score: u64) -> Self {
        if score < INTERMEDIATE_THRESHOLD {
            Self::Beginner
        } else if score < ADVANCED_THRESHOLD {
            Self::Intermediate
        } else {
            Self::Advanced
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            DifficultyTier::Beginner => "Beginner",
            DifficultyTier::Intermediate => "Intermediate",
            DifficultyTier::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for DifficultyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTierError(String);

impl fmt::Display for ParseTierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown difficulty tier: {}", self.0)
    }
}

impl std::error::Error for ParseTierError {}

impl FromStr for DifficultyTier {
    type Err = ParseTierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            _ => Err(ParseTierError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_boundaries_are_inclusive_on_the_lower_bound() {
        assert_eq!(DifficultyTier::from_level_score(0), DifficultyTier::Beginner);
        assert_eq!(DifficultyTier::from_level_score(99), DifficultyTier::Beginner);
        assert_eq!(
            DifficultyTier::from_level_score(100),
            DifficultyTier::Intermediate
        );
        assert_eq!(
            DifficultyTier::from_level_score(299),
            DifficultyTier::Intermediate
        );
        assert_eq!(DifficultyTier::from_level_score(300), DifficultyTier::Advanced);
        assert_eq!(
            DifficultyTier::from_level_score(u64::MAX),
            DifficultyTier::Advanced
        );
    }

    #[test]
    fn tier_parses_case_insensitively() {
        assert_eq!(
            "Intermediate".parse::<DifficultyTier>().unwrap(),
            DifficultyTier::Intermediate
        );
        assert_eq!(
            " advanced ".parse::<DifficultyTier>().unwrap(),
            DifficultyTier::Advanced
        );
        assert!("expert".parse::<DifficultyTier>().is_err());
    }
}
