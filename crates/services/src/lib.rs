#![forbid(unsafe_code)]

pub mod conversation;
pub mod error;
pub mod pronunciation;
pub mod quiz;
pub mod registry;
pub mod report;
pub mod session;
pub mod vocabulary;

pub use lingo_core::Clock;

pub use conversation::{ConversationEngine, ConversationState, Exchange, IntentClassifier, KeywordClassifier};
pub use error::LearnerError;
pub use pronunciation::{PronunciationCoach, PronunciationFeedback, PronunciationScorer, SimulatedScorer};
pub use quiz::{AnswerOutcome, QuizEngine, QuizKind, QuizPhase, QuizResult, QuizSnapshot};
pub use registry::SessionRegistry;
pub use report::SessionReport;
pub use session::LearnerSession;
pub use vocabulary::{Flashcard, VocabularyCursors, VocabularyProgress};
