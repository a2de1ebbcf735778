use serde::Serialize;

/// Who said a line in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    Learner,
    Partner,
}

/// One line of a conversation transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Turn {
    pub speaker: Speaker,
    pub text: String,
}

impl Turn {
    #[must_use]
    pub fn learner(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Learner,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn partner(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Partner,
            text: text.into(),
        }
    }
}
