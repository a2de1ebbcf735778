use std::collections::VecDeque;
use std::sync::Arc;

use lingo_core::catalog::{Intent, VocabularyCategory};
use lingo_core::model::{PracticeType, ProfileDraft};
use lingo_core::time::fixed_clock;
use lingo_core::{Badge, ContentCatalog, DifficultyTier, RewardConfig};
use services::{
    LearnerError, LearnerSession, PronunciationScorer, QuizKind, QuizPhase, SessionRegistry,
    SessionReport,
};

/// Returns queued scores in order, then a flat 75.
struct ScriptedScorer(VecDeque<u8>);

impl PronunciationScorer for ScriptedScorer {
    fn score(&mut self, _subject: &str, _tier: DifficultyTier) -> u8 {
        self.0.pop_front().unwrap_or(75)
    }
}

fn content() -> (Arc<ContentCatalog>, Arc<RewardConfig>) {
    (
        Arc::new(ContentCatalog::builtin().unwrap()),
        Arc::new(RewardConfig::builtin().unwrap()),
    )
}

fn french_learner() -> ProfileDraft {
    ProfileDraft {
        name: "  Robin ".into(),
        native_language: "English".into(),
        target_language: "French".into(),
        level: Some(DifficultyTier::Beginner),
        daily_goal_minutes: 30,
        interests: vec!["food".into(), "travel".into()],
    }
}

#[test]
fn full_learning_session() {
    let (catalog, rewards) = content();
    let mut session = LearnerSession::new(Arc::clone(&catalog), rewards)
        .with_clock(fixed_clock())
        .with_seed(7)
        .with_scorer(Box::new(ScriptedScorer(VecDeque::from([95, 40]))));
    session.set_profile(french_learner()).unwrap();
    assert_eq!(session.profile().name(), "Robin");

    let exchange = session.send_message("Bonjour, ça va?").unwrap();
    let french = catalog.language("French").unwrap();
    assert_eq!(exchange.intent, Intent::Greeting);
    assert_eq!(exchange.reply, french.replies().reply(Intent::Greeting));

    let word = session
        .record_pronunciation_attempt("croissant", PracticeType::Word)
        .unwrap();
    assert_eq!(word.points_awarded, 25);
    let utterance = session
        .record_pronunciation_attempt("Je voudrais un café", PracticeType::Utterance)
        .unwrap();
    assert_eq!(utterance.points_awarded, 5);
    assert!(session.achievements().contains(&Badge::PronunciationPro));

    let words: Vec<String> = session
        .practice_words()
        .unwrap()
        .into_iter()
        .take(20)
        .map(str::to_string)
        .collect();
    for word in &words {
        assert!(session.mark_word_mastered(word).unwrap());
    }
    assert!(session.achievements().contains(&Badge::WordMaster));

    session.select_category(VocabularyCategory::Colors).unwrap();
    session.start_quiz(QuizKind::Vocabulary).unwrap();
    while let Some(question) = session.quiz_state(QuizKind::Vocabulary).current {
        session.submit_quiz_answer(question.correct_index()).unwrap();
    }
    assert_eq!(
        session.quiz_state(QuizKind::Vocabulary).phase,
        QuizPhase::Completed
    );

    let progress = session.progress_snapshot();
    assert_eq!(progress.total_points(), 10 + 25 + 5 + 20 * 20 + 5 * 5);
    assert_eq!(progress.lessons_completed(), 1);
    assert_eq!(progress.streak_days(), 1);
    assert_eq!(session.level_score(), 465 + 10 + 15 + 5 * 20);
    assert_eq!(session.difficulty_tier(), DifficultyTier::Advanced);
    assert!(!session.achievements().contains(&Badge::PointCollector));
    assert_eq!(session.scenarios()[0].title, "Business Meeting");

    let summary = session.pronunciation_summary().unwrap();
    assert_eq!(summary.attempts, 2);
    assert!((summary.average - 67.5).abs() < f64::EPSILON);

    let report = SessionReport::capture(&session);
    assert_eq!(report.learner, "Robin");
    assert_eq!(report.vocabulary.unwrap().mastered, 20);
    assert!(report.to_json().unwrap().contains("\"word_master\""));
}

#[test]
fn rejected_commands_leave_state_untouched() {
    let (catalog, rewards) = content();
    let mut session = LearnerSession::new(catalog, rewards).with_clock(fixed_clock());
    session.send_message("hola").unwrap();
    let before = session.progress_snapshot();

    assert!(matches!(
        session.send_message("   "),
        Err(LearnerError::InvalidInput(_))
    ));
    assert!(matches!(
        session.submit_quiz_answer(1),
        Err(LearnerError::InvalidState(_))
    ));
    session.start_quiz(QuizKind::Cultural).unwrap();
    assert!(matches!(
        session.submit_quiz_answer(99),
        Err(LearnerError::InvalidInput(_))
    ));
    assert!(matches!(
        session.record_pronunciation_attempt("", PracticeType::Phrase),
        Err(LearnerError::InvalidInput(_))
    ));

    assert_eq!(session.progress_snapshot(), before);
    assert_eq!(session.transcript().len(), 2);
    assert_eq!(session.quiz_state(QuizKind::Cultural).cursor, 0);
}

#[test]
fn registry_keeps_learners_apart() {
    let (catalog, rewards) = content();
    let registry = SessionRegistry::new();
    let alice = registry.create(Arc::clone(&catalog), Arc::clone(&rewards));
    let bob = registry.create(catalog, rewards);

    registry
        .with_session(alice, |s| s.send_message("where is the station?").map(|_| ()))
        .unwrap();
    let err = registry
        .with_session(bob, |s| {
            let mut draft = french_learner();
            draft.target_language = "Klingon".into();
            s.set_profile(draft)?;
            s.send_message("hello")
        })
        .unwrap_err();
    assert!(matches!(err, LearnerError::ContentUnavailable(_)));

    let alice_chats = registry
        .with_session(alice, |s| Ok(s.progress().conversations_had()))
        .unwrap();
    let bob_chats = registry
        .with_session(bob, |s| Ok(s.progress().conversations_had()))
        .unwrap();
    assert_eq!((alice_chats, bob_chats), (1, 0));

    let busy = registry
        .with_session(alice, |_| registry.with_session(alice, |_| Ok(())))
        .unwrap_err();
    assert!(matches!(busy, LearnerError::SessionBusy(_)));
}

#[test]
fn study_streak_follows_the_calendar() {
    let (catalog, rewards) = content();
    let mut clock = fixed_clock();
    let mut session = LearnerSession::new(catalog, rewards).with_clock(clock);

    session.send_message("hola").unwrap();
    session.send_message("comida").unwrap();
    assert_eq!(session.progress().streak_days(), 1);

    for _ in 0..6 {
        clock.advance(chrono::Duration::days(1));
        session.set_clock(clock);
        session.mark_word_mastered(&format!("word-{}", session.progress().streak_days())).unwrap();
    }
    assert_eq!(session.progress().streak_days(), 7);
    assert!(session.achievements().contains(&Badge::StreakKeeper));

    clock.advance(chrono::Duration::days(3));
    session.set_clock(clock);
    session.send_message("hello").unwrap();
    assert_eq!(session.progress().current_streak(), 1);
    assert_eq!(session.progress().streak_days(), 7);
    assert!(session.achievements().contains(&Badge::StreakKeeper));
    assert_eq!(session.progress().last_study_day(), Some(session.clock().today()));
}
