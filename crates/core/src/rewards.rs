//! Point awards, loaded as data so bands can change without code changes.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::model::PracticeType;

const BUILTIN_REWARDS_JSON: &str = include_str!("../data/rewards.json");

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RewardError {
    #[error("reward table for {0} has no bands")]
    EmptyTable(PracticeType),

    #[error("reward table for {table}: band threshold {min_score} is above 100")]
    ThresholdOutOfRange { table: PracticeType, min_score: u8 },

    #[error("reward table for {0}: bands must be sorted by descending threshold")]
    UnorderedBands(PracticeType),

    #[error("invalid reward config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("cannot read reward config: {0}")]
    Io(#[from] std::io::Error),
}

/// `score >= min_score` earns `points`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RewardBand {
    pub min_score: u8,
    pub points: u32,
}

/// Score bands for one practice type, checked top-down; `otherwise` applies
/// when no band matches.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RewardTable {
    bands: Vec<RewardBand>,
    otherwise: u32,
}

impl RewardTable {
    #[must_use]
    pub fn new(bands: Vec<RewardBand>, otherwise: u32) -> Self {
        Self { bands, otherwise }
    }

    #[must_use]
    pub fn points_for(&self, score: u8) -> u32 {
        self.bands
            .iter()
            .find(|band| score >= band.min_score)
            .map_or(self.otherwise, |band| band.points)
    }

    #[must_use]
    pub fn bands(&self) -> &[RewardBand] {
        &self.bands
    }

    fn validate(&self, table: PracticeType) -> Result<(), RewardError> {
        if self.bands.is_empty() {
            return Err(RewardError::EmptyTable(table));
        }
        if let Some(band) = self.bands.iter().find(|b| b.min_score > 100) {
            return Err(RewardError::ThresholdOutOfRange {
                table,
                min_score: band.min_score,
            });
        }
        if self
            .bands
            .windows(2)
            .any(|pair| pair[0].min_score <= pair[1].min_score)
        {
            return Err(RewardError::UnorderedBands(table));
        }
        Ok(())
    }
}

/// Points for a correct and an incorrect quiz answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct QuizRewards {
    pub correct: u32,
    pub incorrect: u32,
}

impl QuizRewards {
    #[must_use]
    pub fn points_for(&self, correct: bool) -> u32 {
        if correct { self.correct } else { self.incorrect }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct PronunciationTables {
    word: RewardTable,
    phrase: RewardTable,
    tongue_twister: RewardTable,
    utterance: RewardTable,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VocabularyQuizConfig {
    #[serde(flatten)]
    pub rewards: QuizRewards,
    pub max_questions: usize,
    pub max_options: usize,
}

/// Every point award the engines apply.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RewardConfig {
    pub conversation_message: u32,
    pub word_mastered: u32,
    pub vocabulary_quiz: VocabularyQuizConfig,
    pub cultural_quiz: QuizRewards,
    pronunciation: PronunciationTables,
}

impl RewardConfig {
    /// The reward tables shipped with the crate.
    ///
    /// # Errors
    ///
    /// Returns `RewardError` only if the embedded JSON is broken.
    pub fn builtin() -> Result<Self, RewardError> {
        Self::from_json_str(BUILTIN_REWARDS_JSON)
    }

    /// Parse and validate a JSON reward config.
    ///
    /// # Errors
    ///
    /// Returns `RewardError` if the JSON is malformed or a table is empty,
    /// unordered, or has a threshold above 100.
    pub fn from_json_str(raw: &str) -> Result<Self, RewardError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a reward config from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `RewardError::Io` if the file cannot be read, or any error from
    /// [`RewardConfig::from_json_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RewardError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Table for one practice type.
    #[must_use]
    pub fn pronunciation(&self, practice: PracticeType) -> &RewardTable {
        match practice {
            PracticeType::Word => &self.pronunciation.word,
            PracticeType::Phrase => &self.pronunciation.phrase,
            PracticeType::TongueTwister => &self.pronunciation.tongue_twister,
            PracticeType::Utterance => &self.pronunciation.utterance,
        }
    }

    fn validate(&self) -> Result<(), RewardError> {
        for practice in PracticeType::ALL {
            self.pronunciation(practice).validate(practice)?;
        }
        Ok(())
    }
}
