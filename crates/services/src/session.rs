use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use tracing::{debug, info};

use lingo_core::achievements::{self, AchievementStatus, Badge};
use lingo_core::catalog::{
    CatalogError, ContentCatalog, LanguagePack, Scenario, VocabularyCategory,
};
use lingo_core::model::{
    LearnerProfile, PracticeType, ProfileDraft, ProgressModel, PronunciationAttempt,
    PronunciationSummary, SessionId, Turn,
};
use lingo_core::{Clock, DifficultyTier, RewardConfig};

use crate::conversation::{ConversationEngine, Exchange, IntentClassifier, KeywordClassifier};
use crate::error::LearnerError;
use crate::pronunciation::{
    PronunciationCoach, PronunciationFeedback, PronunciationScorer, SimulatedScorer,
};
use crate::quiz::{
    self, AnswerOutcome, QuizEngine, QuizKind, QuizPhase, QuizResult, QuizSnapshot,
};
use crate::vocabulary::{Flashcard, VocabularyCursors, VocabularyProgress};

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Everything one learner does in one sitting.
///
/// Owns the progress model and every engine that feeds it. All commands
/// validate before mutating, so a rejected command leaves the session as it
/// was.
pub struct LearnerSession {
    id: SessionId,
    clock: Clock,
    catalog: Arc<ContentCatalog>,
    rewards: Arc<RewardConfig>,
    profile: LearnerProfile,
    progress: ProgressModel,
    conversation: ConversationEngine,
    vocabulary_quiz: QuizEngine,
    cultural_quiz: QuizEngine,
    active_quiz: Option<QuizKind>,
    pronunciation: PronunciationCoach,
    custom_scorer: bool,
    category: VocabularyCategory,
    cursors: VocabularyCursors,
    rng: StdRng,
}

impl LearnerSession {
    /// Fresh session with the default profile, keyword classifier and
    /// simulated scorer.
    #[must_use]
    pub fn new(catalog: Arc<ContentCatalog>, rewards: Arc<RewardConfig>) -> Self {
        let classifier = KeywordClassifier::new(catalog.intent_keywords());
        let vocabulary_quiz = QuizEngine::new(QuizKind::Vocabulary, rewards.vocabulary_quiz.rewards);
        let cultural_quiz = QuizEngine::new(QuizKind::Cultural, rewards.cultural_quiz);
        Self {
            id: SessionId::generate(),
            clock: Clock::system(),
            catalog,
            rewards,
            profile: LearnerProfile::default(),
            progress: ProgressModel::new(),
            conversation: ConversationEngine::new(Box::new(classifier)),
            vocabulary_quiz,
            cultural_quiz,
            active_quiz: None,
            pronunciation: PronunciationCoach::new(Box::new(SimulatedScorer::from_os_rng())),
            custom_scorer: false,
            category: VocabularyCategory::Greetings,
            cursors: VocabularyCursors::new(),
            rng: StdRng::from_os_rng(),
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: SessionId) -> Self {
        self.id = id;
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Swap the time source, e.g. to move a simulated clock to the next day.
    pub fn set_clock(&mut self, clock: Clock) {
        self.clock = clock;
    }

    /// Seed option shuffling and the simulated scorer for reproducible runs.
    ///
    /// A scorer injected with [`LearnerSession::with_scorer`] is kept either
    /// way round; only the built-in simulator is reseeded.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        if !self.custom_scorer {
            self.pronunciation = PronunciationCoach::new(Box::new(SimulatedScorer::seeded(seed)));
        }
        self
    }

    #[must_use]
    pub fn with_scorer(mut self, scorer: Box<dyn PronunciationScorer>) -> Self {
        self.pronunciation = PronunciationCoach::new(scorer);
        self.custom_scorer = true;
        self
    }

    #[must_use]
    pub fn with_classifier(mut self, classifier: Box<dyn IntentClassifier>) -> Self {
        self.conversation = ConversationEngine::new(classifier);
        self
    }

    #[must_use]
    pub fn with_profile(mut self, profile: LearnerProfile) -> Self {
        self.profile = profile;
        self
    }

    //
    // ─── QUERIES ───────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn profile(&self) -> &LearnerProfile {
        &self.profile
    }

    /// Copy of the progress model at this moment.
    #[must_use]
    pub fn progress_snapshot(&self) -> ProgressModel {
        self.progress.clone()
    }

    #[must_use]
    pub fn progress(&self) -> &ProgressModel {
        &self.progress
    }

    #[must_use]
    pub fn level_score(&self) -> u64 {
        self.progress.level_score()
    }

    #[must_use]
    pub fn difficulty_tier(&self) -> DifficultyTier {
        self.progress.difficulty_tier()
    }

    #[must_use]
    pub fn achievements(&self) -> BTreeSet<Badge> {
        achievements::unlocked_badges(&self.progress)
    }

    #[must_use]
    pub fn achievement_board(&self) -> Vec<AchievementStatus> {
        achievements::achievement_board(&self.progress)
    }

    #[must_use]
    pub fn transcript(&self) -> &[Turn] {
        self.conversation.transcript()
    }

    #[must_use]
    pub fn quiz_state(&self, kind: QuizKind) -> QuizSnapshot {
        self.quiz(kind).snapshot()
    }

    /// The quiz that `submit_quiz_answer` currently targets.
    #[must_use]
    pub fn active_quiz(&self) -> Option<QuizKind> {
        self.active_quiz
    }

    #[must_use]
    pub fn quiz_result(&self, kind: QuizKind) -> Option<QuizResult> {
        self.quiz(kind).result()
    }

    /// Scenarios suited to the learner's current adaptive tier.
    #[must_use]
    pub fn scenarios(&self) -> &[Scenario] {
        self.catalog.scenarios(self.difficulty_tier())
    }

    #[must_use]
    pub fn conversation_scenario(&self) -> Option<&Scenario> {
        self.conversation.scenario()
    }

    /// # Errors
    ///
    /// Returns `LearnerError::ContentUnavailable` for an unsupported target language.
    pub fn cultural_tips(&self) -> Result<&[String], LearnerError> {
        Ok(self.language()?.cultural_tips())
    }

    /// One cultural tip picked at random.
    ///
    /// # Errors
    ///
    /// Returns `LearnerError::ContentUnavailable` for an unsupported target
    /// language or a language without tips.
    pub fn random_cultural_tip(&mut self) -> Result<String, LearnerError> {
        let catalog = Arc::clone(&self.catalog);
        let pack = catalog.language(self.profile.target_language())?;
        let tip = pack.cultural_tips().choose(&mut self.rng).cloned();
        tip.ok_or_else(|| {
            CatalogError::TipsUnavailable {
                language: pack.name().to_string(),
            }
            .into()
        })
    }

    #[must_use]
    pub fn selected_category(&self) -> VocabularyCategory {
        self.category
    }

    /// The flashcard under the cursor in the selected category.
    ///
    /// # Errors
    ///
    /// Returns `LearnerError::ContentUnavailable` if the language or category is missing.
    pub fn current_flashcard(&self) -> Result<Flashcard, LearnerError> {
        let entries = self.language()?.vocabulary(self.category)?;
        let index = self.cursors.position(self.category, entries.len());
        let entry = entries[index].clone();
        Ok(Flashcard {
            category: self.category,
            index,
            total: entries.len(),
            mastered: self.progress.is_mastered(&entry.term),
            entry,
        })
    }

    /// # Errors
    ///
    /// Returns `LearnerError::ContentUnavailable` for an unsupported target language.
    pub fn vocabulary_progress(&self) -> Result<VocabularyProgress, LearnerError> {
        let total = self.language()?.total_words();
        Ok(VocabularyProgress {
            mastered: self.progress.vocabulary_mastered().len(),
            total,
        })
    }

    /// The last `n` mastered words, oldest first.
    #[must_use]
    pub fn recently_mastered(&self, n: usize) -> &[String] {
        self.progress.recently_mastered(n)
    }

    /// Every vocabulary term of the target language, for word practice.
    ///
    /// # Errors
    ///
    /// Returns `LearnerError::ContentUnavailable` for an unsupported target language.
    pub fn practice_words(&self) -> Result<Vec<&str>, LearnerError> {
        Ok(self.language()?.all_terms().collect())
    }

    #[must_use]
    pub fn common_phrases(&self) -> &[String] {
        self.catalog.common_phrases()
    }

    /// # Errors
    ///
    /// Returns `LearnerError::ContentUnavailable` for an unsupported target language.
    pub fn tongue_twisters(&self) -> Result<&[String], LearnerError> {
        Ok(self.language()?.tongue_twisters())
    }

    #[must_use]
    pub fn pronunciation_attempts(&self) -> &[PronunciationAttempt] {
        self.pronunciation.attempts()
    }

    #[must_use]
    pub fn pronunciation_summary(&self) -> Option<PronunciationSummary> {
        self.pronunciation.summary()
    }

    //
    // ─── COMMANDS ──────────────────────────────────────────────────────────────
    //

    /// Replace the learner profile. Progress is untouched.
    ///
    /// # Errors
    ///
    /// Returns `LearnerError::InvalidInput` if the draft fails validation.
    pub fn set_profile(&mut self, draft: ProfileDraft) -> Result<(), LearnerError> {
        let profile = draft.validate()?;
        info!(
            session = %self.id,
            target = profile.target_language(),
            "profile updated"
        );
        self.profile = profile;
        Ok(())
    }

    /// Send a message to the conversation partner.
    ///
    /// # Errors
    ///
    /// Returns `LearnerError::ContentUnavailable` if the target language has no
    /// replies, or `LearnerError::InvalidInput` for a blank message.
    pub fn send_message(&mut self, text: &str) -> Result<Exchange, LearnerError> {
        let catalog = Arc::clone(&self.catalog);
        let pack = catalog.language(self.profile.target_language())?;
        let exchange = self.conversation.send(
            text,
            pack.replies(),
            &mut self.progress,
            self.rewards.conversation_message,
        )?;
        self.mark_study_day();
        Ok(exchange)
    }

    pub fn clear_conversation(&mut self) {
        self.conversation.clear();
    }

    /// Pick one of the scenarios offered for the current tier.
    ///
    /// # Errors
    ///
    /// Returns `LearnerError::InvalidInput` if no scenario has that title.
    pub fn select_scenario(&mut self, title: &str) -> Result<(), LearnerError> {
        let scenario = self
            .scenarios()
            .iter()
            .find(|s| s.title.eq_ignore_ascii_case(title.trim()))
            .cloned()
            .ok_or_else(|| LearnerError::invalid_input(format!("unknown scenario: {title}")))?;
        self.conversation.set_scenario(scenario);
        Ok(())
    }

    /// Score a pronunciation attempt and apply the reward for its practice type.
    ///
    /// # Errors
    ///
    /// Returns `LearnerError::InvalidInput` if `subject` is blank.
    pub fn record_pronunciation_attempt(
        &mut self,
        subject: &str,
        practice_type: PracticeType,
    ) -> Result<PronunciationFeedback, LearnerError> {
        let feedback = self.pronunciation.practice(
            subject,
            practice_type,
            self.rewards.pronunciation(practice_type),
            &mut self.progress,
            self.clock.now(),
        )?;
        self.mark_study_day();
        Ok(feedback)
    }

    /// Build questions for `kind` from the catalog and start that quiz.
    ///
    /// The vocabulary quiz draws from the selected category. Starting a quiz
    /// makes it the target of `submit_quiz_answer`; a different quiz left in
    /// progress can no longer be answered, so it is reset to not-started.
    ///
    /// # Errors
    ///
    /// Returns `LearnerError::ContentUnavailable` if the language or category
    /// has no usable content.
    pub fn start_quiz(&mut self, kind: QuizKind) -> Result<(), LearnerError> {
        let catalog = Arc::clone(&self.catalog);
        let pack = catalog.language(self.profile.target_language())?;
        let questions = match kind {
            QuizKind::Vocabulary => {
                let config = &self.rewards.vocabulary_quiz;
                quiz::vocabulary_questions(
                    pack.vocabulary(self.category)?,
                    config.max_questions,
                    config.max_options,
                    &mut self.rng,
                )?
            }
            QuizKind::Cultural => quiz::cultural_questions(pack.cultural_quiz(), &mut self.rng)?,
        };
        self.quiz_mut(kind).start(questions)?;
        if let Some(previous) = self.active_quiz.filter(|&previous| previous != kind) {
            let abandoned = self.quiz_mut(previous);
            if abandoned.phase() == QuizPhase::InProgress {
                abandoned.restart();
            }
        }
        self.active_quiz = Some(kind);
        Ok(())
    }

    /// Answer the current question of the active quiz.
    ///
    /// # Errors
    ///
    /// Returns `LearnerError::InvalidState` if no quiz is in progress and
    /// `LearnerError::InvalidInput` for an out-of-range answer.
    pub fn submit_quiz_answer(&mut self, answer_index: usize) -> Result<AnswerOutcome, LearnerError> {
        let kind = self
            .active_quiz
            .ok_or(LearnerError::InvalidState("no quiz in progress"))?;
        let engine = match kind {
            QuizKind::Vocabulary => &mut self.vocabulary_quiz,
            QuizKind::Cultural => &mut self.cultural_quiz,
        };
        let outcome = engine.submit(answer_index, &mut self.progress)?;
        self.mark_study_day();
        Ok(outcome)
    }

    /// Reset the quiz of `kind` to not-started. Points already earned stay.
    pub fn restart_quiz(&mut self, kind: QuizKind) {
        self.quiz_mut(kind).restart();
        if self.active_quiz == Some(kind) {
            self.active_quiz = None;
        }
    }

    /// Mark a word as mastered, awarding points the first time only.
    ///
    /// Returns whether the word was newly mastered.
    ///
    /// # Errors
    ///
    /// Returns `LearnerError::InvalidInput` if `word` is blank.
    pub fn mark_word_mastered(&mut self, word: &str) -> Result<bool, LearnerError> {
        let word = word.trim();
        if word.is_empty() {
            return Err(LearnerError::invalid_input("word cannot be empty"));
        }
        let newly = self.progress.record_vocabulary_mastery(word);
        if newly {
            self.progress.apply_reward(self.rewards.word_mastered);
            self.mark_study_day();
            debug!(word, "word mastered");
        }
        Ok(newly)
    }

    /// Switch the flashcard and vocabulary quiz category.
    ///
    /// # Errors
    ///
    /// Returns `LearnerError::ContentUnavailable` if the target language lacks it.
    pub fn select_category(&mut self, category: VocabularyCategory) -> Result<(), LearnerError> {
        self.language()?.vocabulary(category)?;
        self.category = category;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `LearnerError::ContentUnavailable` if the language or category is missing.
    pub fn next_flashcard(&mut self) -> Result<Flashcard, LearnerError> {
        let len = self.language()?.vocabulary(self.category)?.len();
        self.cursors.next(self.category, len);
        self.current_flashcard()
    }

    /// # Errors
    ///
    /// Returns `LearnerError::ContentUnavailable` if the language or category is missing.
    pub fn previous_flashcard(&mut self) -> Result<Flashcard, LearnerError> {
        let len = self.language()?.vocabulary(self.category)?.len();
        self.cursors.previous(self.category, len);
        self.current_flashcard()
    }

    //
    // ─── HELPERS ───────────────────────────────────────────────────────────────
    //

    fn language(&self) -> Result<&LanguagePack, LearnerError> {
        Ok(self.catalog.language(self.profile.target_language())?)
    }

    fn quiz(&self, kind: QuizKind) -> &QuizEngine {
        match kind {
            QuizKind::Vocabulary => &self.vocabulary_quiz,
            QuizKind::Cultural => &self.cultural_quiz,
        }
    }

    fn quiz_mut(&mut self, kind: QuizKind) -> &mut QuizEngine {
        match kind {
            QuizKind::Vocabulary => &mut self.vocabulary_quiz,
            QuizKind::Cultural => &mut self.cultural_quiz,
        }
    }

    fn mark_study_day(&mut self) {
        self.progress.record_study_day(self.clock.today());
    }
}

impl fmt::Debug for LearnerSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LearnerSession")
            .field("id", &self.id)
            .field("target_language", &self.profile.target_language())
            .field("level_score", &self.progress.level_score())
            .field("transcript_len", &self.conversation.transcript().len())
            .field("active_quiz", &self.active_quiz)
            .field(
                "quiz_phases",
                &(self.vocabulary_quiz.phase(), self.cultural_quiz.phase()),
            )
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
