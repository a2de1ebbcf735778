use std::fmt;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use lingo_core::DifficultyTier;
use lingo_core::model::{PracticeType, ProgressModel, PronunciationAttempt, PronunciationSummary};
use lingo_core::rewards::RewardTable;

use crate::error::LearnerError;

/// Lowest base score the simulator draws.
pub const SIMULATED_BASE_MIN: u8 = 70;
/// Highest score any scorer may return.
pub const MAX_SCORE: u8 = 100;

/// Scores one pronunciation of `subject`.
///
/// Implementations return an integer in `0..=100` and may use the learner's
/// tier to adjust strictness.
pub trait PronunciationScorer: Send {
    fn score(&mut self, subject: &str, tier: DifficultyTier) -> u8;
}

/// Random stand-in for an acoustic scorer.
///
/// Draws a base score in `70..=100`, then lowers it for less advanced tiers:
/// beginners get `max(60, base - 10)`, intermediates `max(70, base - 5)`.
pub struct SimulatedScorer<R = StdRng> {
    rng: R,
}

impl SimulatedScorer<StdRng> {
    /// Scorer seeded from the operating system.
    #[must_use]
    pub fn from_os_rng() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic scorer for reproducible runs.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng + Send> PronunciationScorer for SimulatedScorer<R> {
    fn score(&mut self, _subject: &str, tier: DifficultyTier) -> u8 {
        let base = self.rng.random_range(SIMULATED_BASE_MIN..=MAX_SCORE);
        tier_adjusted(base, tier)
    }
}

impl<R> fmt::Debug for SimulatedScorer<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulatedScorer").finish_non_exhaustive()
    }
}

/// Applies the tier floor to a base score.
#[must_use]
pub fn tier_adjusted(base: u8, tier: DifficultyTier) -> u8 {
    let base = base.min(MAX_SCORE);
    match tier {
        DifficultyTier::Beginner => base.saturating_sub(10).max(60),
        DifficultyTier::Intermediate => base.saturating_sub(5).max(70),
        DifficultyTier::Advanced => base,
    }
}

/// Result of one pronunciation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PronunciationFeedback {
    pub practice_type: PracticeType,
    pub tier: DifficultyTier,
    pub score: u8,
    pub points_awarded: u32,
}

/// Scores attempts and keeps the append-only attempt log.
pub struct PronunciationCoach {
    scorer: Box<dyn PronunciationScorer>,
    attempts: Vec<PronunciationAttempt>,
}

impl PronunciationCoach {
    #[must_use]
    pub fn new(scorer: Box<dyn PronunciationScorer>) -> Self {
        Self {
            scorer,
            attempts: Vec::new(),
        }
    }

    /// Score `subject` at the learner's current tier and credit the result.
    ///
    /// Records the score on `progress`, awards points from `rewards`, and
    /// appends the attempt to the log.
    ///
    /// # Errors
    ///
    /// Returns `LearnerError::InvalidInput` if `subject` is blank.
    pub fn practice(
        &mut self,
        subject: &str,
        practice_type: PracticeType,
        rewards: &RewardTable,
        progress: &mut ProgressModel,
        taken_at: DateTime<Utc>,
    ) -> Result<PronunciationFeedback, LearnerError> {
        let subject = subject.trim();
        if subject.is_empty() {
            return Err(LearnerError::invalid_input("nothing to pronounce"));
        }

        let tier = progress.difficulty_tier();
        let score = self.scorer.score(subject, tier).min(MAX_SCORE);
        let points = rewards.points_for(score);

        progress.record_pronunciation_score(score);
        progress.apply_reward(points);
        self.attempts.push(PronunciationAttempt {
            subject: subject.to_string(),
            practice_type,
            score,
            taken_at,
        });

        info!(%practice_type, %tier, score, points, "pronunciation scored");
        Ok(PronunciationFeedback {
            practice_type,
            tier,
            score,
            points_awarded: points,
        })
    }

    #[must_use]
    pub fn attempts(&self) -> &[PronunciationAttempt] {
        &self.attempts
    }

    #[must_use]
    pub fn summary(&self) -> Option<PronunciationSummary> {
        PronunciationSummary::from_attempts(&self.attempts)
    }
}

impl fmt::Debug for PronunciationCoach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PronunciationCoach")
            .field("attempts_len", &self.attempts.len())
            .finish_non_exhaustive()
    }
}
