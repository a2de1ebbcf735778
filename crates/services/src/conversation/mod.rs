mod classifier;
mod engine;

pub use classifier::{IntentClassifier, KeywordClassifier};
pub use engine::{ConversationEngine, ConversationState, Exchange};
