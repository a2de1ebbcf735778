use std::fmt;

use lingo_core::catalog::{Intent, ReplySet, Scenario};
use lingo_core::model::{ProgressModel, Turn};
use tracing::debug;

use super::classifier::IntentClassifier;
use crate::error::LearnerError;

/// Whether a conversation has any lines yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationState {
    Idle,
    Active,
}

/// Outcome of one learner message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub intent: Intent,
    pub reply: String,
    pub points_awarded: u32,
}

/// Multi-turn conversation with a scripted partner.
///
/// Owns the transcript; progress updates go to the caller's `ProgressModel`.
pub struct ConversationEngine {
    classifier: Box<dyn IntentClassifier>,
    transcript: Vec<Turn>,
    scenario: Option<Scenario>,
}

impl ConversationEngine {
    #[must_use]
    pub fn new(classifier: Box<dyn IntentClassifier>) -> Self {
        Self {
            classifier,
            transcript: Vec::new(),
            scenario: None,
        }
    }

    #[must_use]
    pub fn state(&self) -> ConversationState {
        if self.transcript.is_empty() {
            ConversationState::Idle
        } else {
            ConversationState::Active
        }
    }

    #[must_use]
    pub fn transcript(&self) -> &[Turn] {
        &self.transcript
    }

    #[must_use]
    pub fn scenario(&self) -> Option<&Scenario> {
        self.scenario.as_ref()
    }

    pub fn set_scenario(&mut self, scenario: Scenario) {
        debug!(scenario = %scenario.title, "conversation scenario selected");
        self.scenario = Some(scenario);
    }

    /// Classify `utterance`, reply from `replies`, and credit the learner.
    ///
    /// Appends the learner line and the reply, counts one conversation, and
    /// awards `points`.
    ///
    /// # Errors
    ///
    /// Returns `LearnerError::InvalidInput` for a blank utterance; nothing is
    /// recorded in that case.
    pub fn send(
        &mut self,
        utterance: &str,
        replies: &ReplySet,
        progress: &mut ProgressModel,
        points: u32,
    ) -> Result<Exchange, LearnerError> {
        let utterance = utterance.trim();
        if utterance.is_empty() {
            return Err(LearnerError::invalid_input("message cannot be empty"));
        }

        let intent = self.classifier.classify(utterance);
        let reply = replies.reply(intent).to_string();

        self.transcript.push(Turn::learner(utterance));
        self.transcript.push(Turn::partner(reply.clone()));
        progress.record_conversation();
        progress.apply_reward(points);

        debug!(?intent, turns = self.transcript.len(), "conversation exchange");
        Ok(Exchange {
            intent,
            reply,
            points_awarded: points,
        })
    }

    /// Drop the transcript. Progress already credited stays.
    pub fn clear(&mut self) {
        debug!(turns = self.transcript.len(), "conversation cleared");
        self.transcript.clear();
    }
}

impl fmt::Debug for ConversationEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversationEngine")
            .field("transcript_len", &self.transcript.len())
            .field("scenario", &self.scenario.as_ref().map(|s| s.title.as_str()))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::KeywordClassifier;
    use lingo_core::ContentCatalog;
    use lingo_core::model::Speaker;

    fn setup() -> (ConversationEngine, ContentCatalog) {
        let catalog = ContentCatalog::builtin().unwrap();
        let engine =
            ConversationEngine::new(Box::new(KeywordClassifier::new(catalog.intent_keywords())));
        (engine, catalog)
    }

    #[test]
    fn send_appends_both_lines_and_credits_progress() {
        let (mut engine, catalog) = setup();
        let replies = catalog.language("Spanish").unwrap().replies();
        let mut progress = ProgressModel::new();
        assert_eq!(engine.state(), ConversationState::Idle);

        let exchange = engine.send("hola", replies, &mut progress, 10).unwrap();

        assert_eq!(exchange.intent, Intent::Greeting);
        assert_eq!(exchange.reply, replies.greeting);
        assert_eq!(engine.state(), ConversationState::Active);
        assert_eq!(engine.transcript().len(), 2);
        assert_eq!(engine.transcript()[0].speaker, Speaker::Learner);
        assert_eq!(engine.transcript()[1].speaker, Speaker::Partner);
        assert_eq!(progress.conversations_had(), 1);
        assert_eq!(progress.total_points(), 10);
    }

    #[test]
    fn replies_follow_the_language_pack() {
        let (mut engine, catalog) = setup();
        let mut progress = ProgressModel::new();
        let french = catalog.language("French").unwrap().replies();
        let exchange = engine
            .send("où est la gare?", french, &mut progress, 10)
            .unwrap();
        assert_eq!(exchange.intent, Intent::Directions);
        assert_eq!(exchange.reply, french.directions);
    }

    #[test]
    fn blank_message_changes_nothing() {
        let (mut engine, catalog) = setup();
        let replies = catalog.language("Spanish").unwrap().replies();
        let mut progress = ProgressModel::new();

        let err = engine.send("   ", replies, &mut progress, 10).unwrap_err();

        assert!(matches!(err, LearnerError::InvalidInput(_)));
        assert!(engine.transcript().is_empty());
        assert_eq!(progress, ProgressModel::new());
    }

    #[test]
    fn clear_keeps_progress() {
        let (mut engine, catalog) = setup();
        let replies = catalog.language("German").unwrap().replies();
        let mut progress = ProgressModel::new();
        engine.send("hallo", replies, &mut progress, 10).unwrap();
        engine.send("essen", replies, &mut progress, 10).unwrap();

        engine.clear();

        assert_eq!(engine.state(), ConversationState::Idle);
        assert_eq!(progress.conversations_had(), 2);
        assert_eq!(progress.total_points(), 20);
    }
}
