mod ids;
mod profile;
mod progress;
mod pronunciation;
mod question;
mod transcript;

pub use ids::{ParseIdError, SessionId};
pub use profile::{
    DEFAULT_DAILY_GOAL_MINUTES, DEFAULT_NATIVE_LANGUAGE, DEFAULT_TARGET_LANGUAGE, LearnerProfile,
    ProfileDraft, ProfileError,
};
pub use progress::ProgressModel;
pub use pronunciation::{
    PracticeType, PronunciationAttempt, PronunciationSummary, PronunciationTrend, SUMMARY_WINDOW,
};
pub use question::{Question, QuestionError};
pub use transcript::{Speaker, Turn};
