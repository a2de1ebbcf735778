use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("a question needs at least two options, got {0}")]
    TooFewOptions(usize),

    #[error("duplicate option: {0}")]
    DuplicateOption(String),

    #[error("correct index {index} is out of range for {len} options")]
    CorrectIndexOutOfRange { index: usize, len: usize },
}

/// A multiple-choice question.
///
/// `options` are stored in the order shown to the learner; `correct_index`
/// always refers to that order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    prompt: String,
    options: Vec<String>,
    correct_index: usize,
    explanation: Option<String>,
}

impl Question {
    /// Build a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` for an empty prompt, fewer than two options,
    /// repeated options, or a correct index outside the options.
    pub fn new(
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_index: usize,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if options.len() < 2 {
            return Err(QuestionError::TooFewOptions(options.len()));
        }
        for (i, option) in options.iter().enumerate() {
            if options[..i].contains(option) {
                return Err(QuestionError::DuplicateOption(option.clone()));
            }
        }
        if correct_index >= options.len() {
            return Err(QuestionError::CorrectIndexOutOfRange {
                index: correct_index,
                len: options.len(),
            });
        }

        Ok(Self {
            prompt,
            options,
            correct_index,
            explanation: None,
        })
    }

    #[must_use]
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    #[must_use]
    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_index]
    }

    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    #[must_use]
    pub fn is_correct(&self, answer_index: usize) -> bool {
        answer_index == self.correct_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn valid_question_reports_correct_option() {
        let q = Question::new("2 + 2?", opts(&["3", "4", "5"]), 1).unwrap();
        assert_eq!(q.correct_option(), "4");
        assert!(q.is_correct(1));
        assert!(!q.is_correct(0));
    }

    #[test]
    fn rejects_single_option() {
        let err = Question::new("?", opts(&["only"]), 0).unwrap_err();
        assert_eq!(err, QuestionError::TooFewOptions(1));
    }

    #[test]
    fn rejects_duplicate_options() {
        let err = Question::new("?", opts(&["a", "b", "a"]), 0).unwrap_err();
        assert_eq!(err, QuestionError::DuplicateOption("a".into()));
    }

    #[test]
    fn rejects_out_of_range_correct_index() {
        let err = Question::new("?", opts(&["a", "b"]), 2).unwrap_err();
        assert_eq!(err, QuestionError::CorrectIndexOutOfRange { index: 2, len: 2 });
    }

    #[test]
    fn explanation_is_optional() {
        let q = Question::new("?", opts(&["a", "b"]), 0).unwrap();
        assert_eq!(q.explanation(), None);
        let q = q.with_explanation("because");
        assert_eq!(q.explanation(), Some("because"));
    }
}
