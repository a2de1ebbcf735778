use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of material being pronounced. Each kind has its own reward table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PracticeType {
    Word,
    Phrase,
    TongueTwister,
    /// A line typed in the conversation view.
    Utterance,
}

impl PracticeType {
    pub const ALL: [PracticeType; 4] = [
        PracticeType::Word,
        PracticeType::Phrase,
        PracticeType::TongueTwister,
        PracticeType::Utterance,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PracticeType::Word => "word",
            PracticeType::Phrase => "phrase",
            PracticeType::TongueTwister => "tongue_twister",
            PracticeType::Utterance => "utterance",
        }
    }
}

impl fmt::Display for PracticeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One scored pronunciation attempt. Attempts are only ever appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PronunciationAttempt {
    pub subject: String,
    pub practice_type: PracticeType,
    pub score: u8,
    pub taken_at: DateTime<Utc>,
}

/// Coarse feedback over recent pronunciation scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PronunciationTrend {
    Excellent,
    Good,
    NeedsFocus,
}

impl PronunciationTrend {
    #[must_use]
    pub fn from_average(average: f64) -> Self {
        if average >= 85.0 {
            Self::Excellent
        } else if average >= 70.0 {
            Self::Good
        } else {
            Self::NeedsFocus
        }
    }
}

/// Average and trend over the most recent attempts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PronunciationSummary {
    pub attempts: usize,
    pub average: f64,
    pub trend: PronunciationTrend,
}

/// How many recent attempts feed the summary.
pub const SUMMARY_WINDOW: usize = 10;

impl PronunciationSummary {
    /// Summarize the last `SUMMARY_WINDOW` attempts, or `None` if there are none.
    #[must_use]
    pub fn from_attempts(attempts: &[PronunciationAttempt]) -> Option<Self> {
        let recent = &attempts[attempts.len().saturating_sub(SUMMARY_WINDOW)..];
        if recent.is_empty() {
            return None;
        }
        let total: u32 = recent.iter().map(|a| u32::from(a.score)).sum();
        let average = f64::from(total) / recent.len() as f64;
        Some(Self {
            attempts: recent.len(),
            average,
            trend: PronunciationTrend::from_average(average),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn attempt(score: u8) -> PronunciationAttempt {
        PronunciationAttempt {
            subject: "hola".into(),
            practice_type: PracticeType::Word,
            score,
            taken_at: fixed_now(),
        }
    }

    #[test]
    fn summary_is_none_without_attempts() {
        assert!(PronunciationSummary::from_attempts(&[]).is_none());
    }

    #[test]
    fn summary_only_looks_at_recent_window() {
        let mut attempts: Vec<_> = (0..5).map(|_| attempt(10)).collect();
        attempts.extend((0..SUMMARY_WINDOW).map(|_| attempt(90)));

        let summary = PronunciationSummary::from_attempts(&attempts).unwrap();
        assert_eq!(summary.attempts, SUMMARY_WINDOW);
        assert!((summary.average - 90.0).abs() < f64::EPSILON);
        assert_eq!(summary.trend, PronunciationTrend::Excellent);
    }

    #[test]
    fn trend_bands() {
        assert_eq!(PronunciationTrend::from_average(85.0), PronunciationTrend::Excellent);
        assert_eq!(PronunciationTrend::from_average(70.0), PronunciationTrend::Good);
        assert_eq!(PronunciationTrend::from_average(69.9), PronunciationTrend::NeedsFocus);
    }
}
