use chrono::NaiveDate;
use serde::Serialize;

use crate::difficulty::DifficultyTier;

//
// ─── LEVEL SCORE WEIGHTS ───────────────────────────────────────────────────────
//

pub const LESSON_WEIGHT: u64 = 10;
pub const CONVERSATION_WEIGHT: u64 = 15;
pub const MASTERED_WORD_WEIGHT: u64 = 5;

//
// ─── PROGRESS MODEL ────────────────────────────────────────────────────────────
//

/// Cumulative record of a learner's activity within one session.
///
/// Counters only grow. Transient state (quiz cursors, transcripts) lives in the
/// engines and never resets anything here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProgressModel {
    total_points: u64,
    lessons_completed: u32,
    conversations_had: u32,
    vocabulary_mastered: Vec<String>,
    pronunciation_scores: Vec<u8>,
    streak_days: u32,
    current_streak: u32,
    last_study_day: Option<NaiveDate>,
}

impl ProgressModel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply_reward(&mut self, points: u32) {
        self.total_points = self.total_points.saturating_add(u64::from(points));
    }

    pub fn record_conversation(&mut self) {
        self.conversations_had = self.conversations_had.saturating_add(1);
    }

    pub fn record_lesson_completion(&mut self) {
        self.lessons_completed = self.lessons_completed.saturating_add(1);
    }

    /// Records a mastered word. Returns `false` (and changes nothing) when the
    /// word is already in the list.
    pub fn record_vocabulary_mastery(&mut self, word: &str) -> bool {
        if self.is_mastered(word) {
            return false;
        }
        self.vocabulary_mastered.push(word.to_owned());
        true
    }

    /// Appends a pronunciation score. Scores above 100 are clamped.
    pub fn record_pronunciation_score(&mut self, score: u8) {
        self.pronunciation_scores.push(score.min(100));
    }

    /// Marks `day` as a study day and updates the streaks.
    ///
    /// Same day: no change. Following day: the current run grows by one. Any
    /// other day (a gap, or the first recorded day) starts a new run of 1.
    /// Days earlier than the last recorded day are ignored. `streak_days` is
    /// the best run so far, so like every other counter it never shrinks.
    pub fn record_study_day(&mut self, day: NaiveDate) {
        match self.last_study_day {
            Some(last) if day <= last => return,
            Some(last) if last.succ_opt() == Some(day) => {
                self.current_streak = self.current_streak.saturating_add(1);
            }
            _ => self.current_streak = 1,
        }
        self.last_study_day = Some(day);
        self.streak_days = self.streak_days.max(self.current_streak);
    }

    /// Weighted activity score used to pick the difficulty tier.
    ///
    /// Always recomputed from the counters, never cached.
    #[must_use]
    pub fn level_score(&self) -> u64 {
        u64::from(self.lessons_completed) * LESSON_WEIGHT
            + u64::from(self.conversations_had) * CONVERSATION_WEIGHT
            + self.vocabulary_mastered.len() as u64 * MASTERED_WORD_WEIGHT
            + self.total_points
    }

    #[must_use]
    pub fn difficulty_tier(&self) -> DifficultyTier {
        DifficultyTier::from_level_score(self.level_score())
    }

    #[must_use]
    pub fn is_mastered(&self, word: &str) -> bool {
        self.vocabulary_mastered.iter().any(|w| w == word)
    }

    #[must_use]
    pub fn total_points(&self) -> u64 {
        self.total_points
    }

    #[must_use]
    pub fn lessons_completed(&self) -> u32 {
        self.lessons_completed
    }

    #[must_use]
    pub fn conversations_had(&self) -> u32 {
        self.conversations_had
    }

    /// Mastered words in the order they were mastered.
    #[must_use]
    pub fn vocabulary_mastered(&self) -> &[String] {
        &self.vocabulary_mastered
    }

    #[must_use]
    pub fn pronunciation_scores(&self) -> &[u8] {
        &self.pronunciation_scores
    }

    /// Longest run of consecutive study days.
    #[must_use]
    pub fn streak_days(&self) -> u32 {
        self.streak_days
    }

    /// Run of consecutive study days ending on `last_study_day`.
    #[must_use]
    pub fn current_streak(&self) -> u32 {
        self.current_streak
    }

    #[must_use]
    pub fn last_study_day(&self) -> Option<NaiveDate> {
        self.last_study_day
    }

    /// The last `n` mastered words, oldest first.
    #[must_use]
    pub fn recently_mastered(&self, n: usize) -> &[String] {
        let start = self.vocabulary_mastered.len().saturating_sub(n);
        &self.vocabulary_mastered[start..]
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn level_score_weights_each_counter() {
        let mut progress = ProgressModel::new();
        progress.record_lesson_completion();
        progress.record_conversation();
        progress.record_conversation();
        progress.record_vocabulary_mastery("hola");
        progress.apply_reward(7);

        assert_eq!(progress.level_score(), 10 + 30 + 5 + 7);
        assert_eq!(progress.level_score(), progress.level_score());
    }

    #[test]
    fn vocabulary_mastery_is_idempotent() {
        let mut progress = ProgressModel::new();
        assert!(progress.record_vocabulary_mastery("gracias"));
        assert!(!progress.record_vocabulary_mastery("gracias"));
        assert_eq!(progress.vocabulary_mastered(), ["gracias".to_string()]);
    }

    #[test]
    fn mastery_keeps_insertion_order() {
        let mut progress = ProgressModel::new();
        for word in ["uno", "dos", "tres"] {
            progress.record_vocabulary_mastery(word);
        }
        assert_eq!(progress.vocabulary_mastered()[0], "uno");
        assert_eq!(progress.recently_mastered(2), ["dos", "tres"]);
        assert_eq!(progress.recently_mastered(10).len(), 3);
    }

    #[test]
    fn difficulty_follows_level_score() {
        let mut progress = ProgressModel::new();
        assert_eq!(progress.difficulty_tier(), DifficultyTier::Beginner);
        progress.apply_reward(100);
        assert_eq!(progress.difficulty_tier(), DifficultyTier::Intermediate);
        progress.apply_reward(200);
        assert_eq!(progress.difficulty_tier(), DifficultyTier::Advanced);
    }

    #[test]
    fn pronunciation_scores_are_clamped() {
        let mut progress = ProgressModel::new();
        progress.record_pronunciation_score(120);
        assert_eq!(progress.pronunciation_scores(), [100]);
    }

    #[test]
    fn streak_extends_on_consecutive_days_and_restarts_after_gap() {
        let mut progress = ProgressModel::new();
        progress.record_study_day(day(1));
        progress.record_study_day(day(1));
        assert_eq!(progress.streak_days(), 1);

        progress.record_study_day(day(2));
        progress.record_study_day(day(3));
        assert_eq!(progress.streak_days(), 3);
        assert_eq!(progress.current_streak(), 3);

        progress.record_study_day(day(2));
        assert_eq!(progress.current_streak(), 3);

        progress.record_study_day(day(6));
        assert_eq!(progress.current_streak(), 1);
        assert_eq!(progress.streak_days(), 3);
        assert_eq!(progress.last_study_day(), Some(day(6)));
    }

    #[test]
    fn streak_counter_never_decreases_after_a_gap() {
        let mut progress = ProgressModel::new();
        let start = day(1);
        for offset in 0..7 {
            progress.record_study_day(start + chrono::Duration::days(offset));
        }
        assert_eq!(progress.streak_days(), 7);

        let before = progress.clone();
        progress.record_study_day(day(10));

        assert_eq!(progress.streak_days(), 7);
        assert_eq!(progress.current_streak(), 1);
        assert!(progress.streak_days() >= before.streak_days());
        assert!(progress.total_points() >= before.total_points());
        assert!(progress.vocabulary_mastered().len() >= before.vocabulary_mastered().len());

        // A new run only raises the counter once it beats the old best.
        for offset in 1..8 {
            progress.record_study_day(day(10) + chrono::Duration::days(offset));
        }
        assert_eq!(progress.current_streak(), 8);
        assert_eq!(progress.streak_days(), 8);
    }
}
