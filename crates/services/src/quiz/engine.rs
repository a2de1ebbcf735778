use std::fmt;

use lingo_core::model::{ProgressModel, Question};
use lingo_core::rewards::QuizRewards;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::LearnerError;

//
// ─── KIND / PHASE ──────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizKind {
    /// Meanings of vocabulary terms. Completing one counts as a lesson.
    Vocabulary,
    /// Cultural knowledge questions with explanations.
    Cultural,
}

impl fmt::Display for QuizKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuizKind::Vocabulary => f.write_str("vocabulary"),
            QuizKind::Cultural => f.write_str("cultural"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizPhase {
    NotStarted,
    InProgress,
    Completed,
}

//
// ─── RESULTS ───────────────────────────────────────────────────────────────────
//

/// Feedback for one submitted answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub correct_option: String,
    pub explanation: Option<String>,
    pub points_awarded: u32,
    pub completed: bool,
}

/// Final score of a completed quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuizResult {
    pub score: usize,
    pub total: usize,
}

impl QuizResult {
    #[must_use]
    pub fn is_perfect(&self) -> bool {
        self.score == self.total
    }
}

/// Read-only view of a quiz for presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizSnapshot {
    pub kind: QuizKind,
    pub phase: QuizPhase,
    pub cursor: usize,
    pub score: usize,
    pub total: usize,
    pub current: Option<Question>,
}

//
// ─── ENGINE ────────────────────────────────────────────────────────────────────
//

/// Steps through a fixed list of questions, scoring as it goes.
///
/// `NotStarted -> InProgress -> Completed`, and back to `NotStarted` on restart.
#[derive(Debug, Clone)]
pub struct QuizEngine {
    kind: QuizKind,
    rewards: QuizRewards,
    questions: Vec<Question>,
    cursor: usize,
    score: usize,
    phase: QuizPhase,
}

impl QuizEngine {
    #[must_use]
    pub fn new(kind: QuizKind, rewards: QuizRewards) -> Self {
        Self {
            kind,
            rewards,
            questions: Vec::new(),
            cursor: 0,
            score: 0,
            phase: QuizPhase::NotStarted,
        }
    }

    /// Begin a run over `questions`, discarding any previous run.
    ///
    /// # Errors
    ///
    /// Returns `LearnerError::InvalidState` if `questions` is empty.
    pub fn start(&mut self, questions: Vec<Question>) -> Result<(), LearnerError> {
        if questions.is_empty() {
            return Err(LearnerError::InvalidState("cannot start a quiz without questions"));
        }
        info!(kind = %self.kind, questions = questions.len(), "quiz started");
        self.questions = questions;
        self.cursor = 0;
        self.score = 0;
        self.phase = QuizPhase::InProgress;
        Ok(())
    }

    /// Answer the question under the cursor and advance.
    ///
    /// Awards points for the answer; a vocabulary quiz that reaches its end
    /// also records one completed lesson.
    ///
    /// # Errors
    ///
    /// Returns `LearnerError::InvalidState` when no quiz is in progress and
    /// `LearnerError::InvalidInput` when `answer_index` is not an option.
    pub fn submit(
        &mut self,
        answer_index: usize,
        progress: &mut ProgressModel,
    ) -> Result<AnswerOutcome, LearnerError> {
        if self.phase != QuizPhase::InProgress {
            return Err(LearnerError::InvalidState("no quiz in progress"));
        }
        let question = self
            .questions
            .get(self.cursor)
            .ok_or(LearnerError::InvalidState("no quiz in progress"))?;
        if answer_index >= question.options().len() {
            return Err(LearnerError::invalid_input(format!(
                "answer {answer_index} is out of range for {} options",
                question.options().len()
            )));
        }

        let correct = question.is_correct(answer_index);
        let correct_option = question.correct_option().to_string();
        let explanation = question.explanation().map(str::to_string);
        let points = self.rewards.points_for(correct);

        if correct {
            self.score += 1;
        }
        self.cursor += 1;
        progress.apply_reward(points);

        let completed = self.cursor == self.questions.len();
        if completed {
            self.phase = QuizPhase::Completed;
            if self.kind == QuizKind::Vocabulary {
                progress.record_lesson_completion();
            }
            info!(
                kind = %self.kind,
                score = self.score,
                total = self.questions.len(),
                "quiz completed"
            );
        } else {
            debug!(kind = %self.kind, cursor = self.cursor, correct, "quiz answer");
        }

        Ok(AnswerOutcome {
            correct,
            correct_option,
            explanation,
            points_awarded: points,
            completed,
        })
    }

    /// Return to `NotStarted`, dropping questions, cursor and score.
    ///
    /// Points and lessons already credited are kept.
    pub fn restart(&mut self) {
        debug!(kind = %self.kind, "quiz reset");
        self.questions.clear();
        self.cursor = 0;
        self.score = 0;
        self.phase = QuizPhase::NotStarted;
    }

    #[must_use]
    pub fn kind(&self) -> QuizKind {
        self.kind
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        match self.phase {
            QuizPhase::InProgress => self.questions.get(self.cursor),
            QuizPhase::NotStarted | QuizPhase::Completed => None,
        }
    }

    /// Final score, once the quiz is completed.
    #[must_use]
    pub fn result(&self) -> Option<QuizResult> {
        (self.phase == QuizPhase::Completed).then_some(QuizResult {
            score: self.score,
            total: self.questions.len(),
        })
    }

    #[must_use]
    pub fn snapshot(&self) -> QuizSnapshot {
        QuizSnapshot {
            kind: self.kind,
            phase: self.phase,
            cursor: self.cursor,
            score: self.score,
            total: self.total(),
            current: self.current_question().cloned(),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
