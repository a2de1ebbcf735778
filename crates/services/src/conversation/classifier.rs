use lingo_core::catalog::{Intent, IntentKeywords};

/// Maps a learner utterance onto an intent bucket.
///
/// Implementations must always return an intent; `Intent::Fallback` covers
/// anything unrecognised.
pub trait IntentClassifier: Send + Sync {
    fn classify(&self, utterance: &str) -> Intent;
}

/// Case-insensitive substring matching against ordered keyword buckets.
///
/// Buckets are checked greeting, food, directions; the first bucket with a
/// matching keyword wins.
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    buckets: Vec<(Intent, Vec<String>)>,
}

impl KeywordClassifier {
    #[must_use]
    pub fn new(keywords: &IntentKeywords) -> Self {
        let buckets = keywords
            .ordered()
            .into_iter()
            .map(|(intent, words)| {
                let words = words
                    .iter()
                    .map(|w| w.trim().to_lowercase())
                    .filter(|w| !w.is_empty())
                    .collect();
                (intent, words)
            })
            .collect();
        Self { buckets }
    }
}

impl IntentClassifier for KeywordClassifier {
    fn classify(&self, utterance: &str) -> Intent {
        let lowered = utterance.to_lowercase();
        self.buckets
            .iter()
            .find(|(_, words)| words.iter().any(|w| lowered.contains(w.as_str())))
            .map_or(Intent::Fallback, |(intent, _)| *intent)
    }
}
