mod builder;
mod engine;

pub use builder::{cultural_questions, vocabulary_questions};
pub use engine::{AnswerOutcome, QuizEngine, QuizKind, QuizPhase, QuizResult, QuizSnapshot};
