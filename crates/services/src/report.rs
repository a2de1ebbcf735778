//! Serializable progress report for a presentation layer or an export.

use serde::Serialize;

use lingo_core::DifficultyTier;
use lingo_core::achievements::AchievementStatus;
use lingo_core::model::{ProgressModel, PronunciationSummary, SessionId};

use crate::quiz::{QuizKind, QuizSnapshot};
use crate::session::LearnerSession;
use crate::vocabulary::VocabularyProgress;

/// Everything the progress dashboard shows, captured at one moment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionReport {
    pub session: SessionId,
    pub learner: String,
    pub target_language: String,
    pub level_score: u64,
    pub tier: DifficultyTier,
    pub progress: ProgressModel,
    pub achievements: Vec<AchievementStatus>,
    pub quizzes: Vec<QuizSnapshot>,
    /// `None` when the target language is missing from the catalog.
    pub vocabulary: Option<VocabularyProgress>,
    pub pronunciation: Option<PronunciationSummary>,
}

impl SessionReport {
    #[must_use]
    pub fn capture(session: &LearnerSession) -> Self {
        let profile = session.profile();
        Self {
            session: session.id(),
            learner: profile.name().to_string(),
            target_language: profile.target_language().to_string(),
            level_score: session.level_score(),
            tier: session.difficulty_tier(),
            progress: session.progress_snapshot(),
            achievements: session.achievement_board(),
            quizzes: [QuizKind::Vocabulary, QuizKind::Cultural]
                .into_iter()
                .map(|kind| session.quiz_state(kind))
                .collect(),
            vocabulary: session.vocabulary_progress().ok(),
            pronunciation: session.pronunciation_summary(),
        }
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns the serializer error; the report holds only plain data, so this
    /// does not fail in practice.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use lingo_core::time::fixed_clock;
    use lingo_core::{ContentCatalog, RewardConfig};
    use serde_json::Value;

    fn session() -> LearnerSession {
        LearnerSession::new(
            Arc::new(ContentCatalog::builtin().unwrap()),
            Arc::new(RewardConfig::builtin().unwrap()),
        )
        .with_clock(fixed_clock())
        .with_seed(5)
    }

    #[test]
    fn report_reflects_progress() {
        let mut session = session();
        session.send_message("hola").unwrap();
        session.mark_word_mastered("Hola").unwrap();

        let report = SessionReport::capture(&session);

        assert_eq!(report.level_score, 50);
        assert_eq!(report.tier, DifficultyTier::Beginner);
        assert_eq!(report.achievements.len(), 6);
        assert_eq!(report.quizzes.len(), 2);
        assert_eq!(report.vocabulary.unwrap().mastered, 1);
        assert!(report.pronunciation.is_none());
    }

    #[test]
    fn json_uses_snake_case_names() {
        let mut session = session();
        session.start_quiz(QuizKind::Cultural).unwrap();

        let json = SessionReport::capture(&session).to_json().unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["tier"], "beginner");
        assert_eq!(value["target_language"], "Spanish");
        assert_eq!(value["progress"]["total_points"], 0);
        assert_eq!(value["quizzes"][1]["kind"], "cultural");
        assert_eq!(value["quizzes"][1]["phase"], "in_progress");
        assert_eq!(value["achievements"][0]["badge"], "first_steps");
    }
}
