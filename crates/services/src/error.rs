//! Shared error types for the services crate.

use thiserror::Error;

use lingo_core::catalog::CatalogError;
use lingo_core::model::{ProfileError, QuestionError, SessionId};

/// Errors emitted by the learner-facing engines.
///
/// Every variant is recoverable; a rejected command leaves all state as it was.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LearnerError {
    /// Content for the requested language or category is missing from the catalog.
    #[error("content unavailable: {0}")]
    ContentUnavailable(#[source] CatalogError),

    #[error("invalid state: {0}")]
    InvalidState(&'static str),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("session {0} is busy with another request")]
    SessionBusy(SessionId),

    #[error("unknown session {0}")]
    UnknownSession(SessionId),
}

impl LearnerError {
    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

impl From<CatalogError> for LearnerError {
    fn from(err: CatalogError) -> Self {
        Self::ContentUnavailable(err)
    }
}

impl From<ProfileError> for LearnerError {
    fn from(err: ProfileError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

impl From<QuestionError> for LearnerError {
    fn from(err: QuestionError) -> Self {
        // Malformed questions come from catalog content, not from the learner.
        Self::ContentUnavailable(CatalogError::InvalidContent(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_language_maps_to_content_unavailable() {
        let err: LearnerError = CatalogError::LanguageUnavailable {
            language: "Italian".into(),
        }
        .into();
        assert!(matches!(err, LearnerError::ContentUnavailable(_)));
        assert!(err.to_string().contains("Italian"));
    }

    #[test]
    fn profile_errors_are_invalid_input() {
        let err: LearnerError = ProfileError::NegativeDailyGoal(-1).into();
        assert!(matches!(err, LearnerError::InvalidInput(_)));
    }
}
