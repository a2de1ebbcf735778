//! Static, read-only content keyed by target language.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

use crate::difficulty::DifficultyTier;

const BUILTIN_CATALOG_JSON: &str = include_str!("../data/catalog.json");

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("no content available for language {language}")]
    LanguageUnavailable { language: String },

    #[error("no {category} vocabulary available for {language}")]
    CategoryUnavailable {
        language: String,
        category: VocabularyCategory,
    },

    #[error("no cultural tips available for {language}")]
    TipsUnavailable { language: String },

    #[error("invalid catalog content: {0}")]
    InvalidContent(String),

    #[error("invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("cannot read catalog: {0}")]
    Io(#[from] std::io::Error),
}

//
// ─── VOCABULARY ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VocabularyCategory {
    Greetings,
    Basics,
    Questions,
    Family,
    Numbers,
    Colors,
    Food,
}

impl VocabularyCategory {
    pub const ALL: [VocabularyCategory; 7] = [
        VocabularyCategory::Greetings,
        VocabularyCategory::Basics,
        VocabularyCategory::Questions,
        VocabularyCategory::Family,
        VocabularyCategory::Numbers,
        VocabularyCategory::Colors,
        VocabularyCategory::Food,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            VocabularyCategory::Greetings => "greetings",
            VocabularyCategory::Basics => "basics",
            VocabularyCategory::Questions => "questions",
            VocabularyCategory::Family => "family",
            VocabularyCategory::Numbers => "numbers",
            VocabularyCategory::Colors => "colors",
            VocabularyCategory::Food => "food",
        }
    }

    /// Position in [`VocabularyCategory::ALL`].
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for VocabularyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VocabularyCategory {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| CatalogError::InvalidContent(format!("unknown category: {s}")))
    }
}

/// A term in the target language with its meaning in the learner's language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    pub term: String,
    pub meaning: String,
}

//
// ─── CONVERSATION CONTENT ──────────────────────────────────────────────────────
//

/// Intent buckets, in classification priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Greeting,
    Food,
    Directions,
    Fallback,
}

/// Keywords for every bucket except the fallback.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IntentKeywords {
    pub greeting: Vec<String>,
    pub food: Vec<String>,
    pub directions: Vec<String>,
}

impl IntentKeywords {
    /// Keyword buckets in priority order.
    #[must_use]
    pub fn ordered(&self) -> [(Intent, &[String]); 3] {
        [
            (Intent::Greeting, self.greeting.as_slice()),
            (Intent::Food, self.food.as_slice()),
            (Intent::Directions, self.directions.as_slice()),
        ]
    }
}

/// Scripted partner replies for one language.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReplySet {
    pub greeting: String,
    pub food: String,
    pub directions: String,
    pub fallback: String,
}

impl ReplySet {
    #[must_use]
    pub fn reply(&self, intent: Intent) -> &str {
        match intent {
            Intent::Greeting => &self.greeting,
            Intent::Food => &self.food,
            Intent::Directions => &self.directions,
            Intent::Fallback => &self.fallback,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub title: String,
    pub context: String,
}

//
// ─── QUIZ CONTENT ──────────────────────────────────────────────────────────────
//

/// A cultural quiz question as authored, before option shuffling.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CulturalQuestion {
    pub prompt: String,
    pub options: Vec<String>,
    pub correct: usize,
    pub explanation: String,
}

//
// ─── LANGUAGE PACK ─────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Deserialize)]
pub struct LanguagePack {
    #[serde(skip)]
    name: String,
    vocabulary: BTreeMap<VocabularyCategory, Vec<VocabularyEntry>>,
    cultural_tips: Vec<String>,
    replies: ReplySet,
    #[serde(default)]
    cultural_quiz: Vec<CulturalQuestion>,
    #[serde(default)]
    tongue_twisters: Vec<String>,
}

impl LanguagePack {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Entries for one category.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::CategoryUnavailable` if the category is missing or empty.
    pub fn vocabulary(&self, category: VocabularyCategory) -> Result<&[VocabularyEntry], CatalogError> {
        self.vocabulary
            .get(&category)
            .filter(|entries| !entries.is_empty())
            .map(Vec::as_slice)
            .ok_or_else(|| CatalogError::CategoryUnavailable {
                language: self.name.clone(),
                category,
            })
    }

    /// Categories that have at least one entry.
    pub fn categories(&self) -> impl Iterator<Item = VocabularyCategory> + '_ {
        self.vocabulary
            .iter()
            .filter(|(_, entries)| !entries.is_empty())
            .map(|(category, _)| *category)
    }

    /// Every term across categories, in category order.
    pub fn all_terms(&self) -> impl Iterator<Item = &str> {
        self.vocabulary
            .values()
            .flat_map(|entries| entries.iter().map(|e| e.term.as_str()))
    }

    #[must_use]
    pub fn total_words(&self) -> usize {
        self.vocabulary.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn contains_term(&self, term: &str) -> bool {
        self.all_terms().any(|t| t == term)
    }

    #[must_use]
    pub fn cultural_tips(&self) -> &[String] {
        &self.cultural_tips
    }

    #[must_use]
    pub fn replies(&self) -> &ReplySet {
        &self.replies
    }

    #[must_use]
    pub fn cultural_quiz(&self) -> &[CulturalQuestion] {
        &self.cultural_quiz
    }

    #[must_use]
    pub fn tongue_twisters(&self) -> &[String] {
        &self.tongue_twisters
    }

    fn validate(&self) -> Result<(), CatalogError> {
        for (i, question) in self.cultural_quiz.iter().enumerate() {
            if question.correct >= question.options.len() {
                return Err(CatalogError::InvalidContent(format!(
                    "{} cultural question {} marks option {} correct but has {} options",
                    self.name,
                    i + 1,
                    question.correct,
                    question.options.len()
                )));
            }
        }
        Ok(())
    }
}

//
// ─── CATALOG ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Deserialize)]
pub struct ContentCatalog {
    languages: BTreeMap<String, LanguagePack>,
    intent_keywords: IntentKeywords,
    scenarios: BTreeMap<DifficultyTier, Vec<Scenario>>,
    #[serde(default)]
    common_phrases: Vec<String>,
}

impl ContentCatalog {
    /// The catalog shipped with the crate.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` only if the embedded JSON is broken.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json_str(BUILTIN_CATALOG_JSON)
    }

    /// Parse and validate a catalog from JSON.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` for malformed JSON and
    /// `CatalogError::InvalidContent` for inconsistent content.
    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        let mut catalog: Self = serde_json::from_str(raw)?;
        for (name, pack) in &mut catalog.languages {
            pack.name.clone_from(name);
        }
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load a catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Io` if the file cannot be read, or any error from
    /// [`ContentCatalog::from_json_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Content for a target language.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::LanguageUnavailable` if the language is not in the catalog.
    pub fn language(&self, name: &str) -> Result<&LanguagePack, CatalogError> {
        self.languages
            .get(name)
            .ok_or_else(|| CatalogError::LanguageUnavailable {
                language: name.to_string(),
            })
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.languages.keys().map(String::as_str)
    }

    #[must_use]
    pub fn intent_keywords(&self) -> &IntentKeywords {
        &self.intent_keywords
    }

    #[must_use]
    pub fn scenarios(&self, tier: DifficultyTier) -> &[Scenario] {
        self.scenarios.get(&tier).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn common_phrases(&self) -> &[String] {
        &self.common_phrases
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if self.languages.is_empty() {
            return Err(CatalogError::InvalidContent("catalog has no languages".into()));
        }
        for tier in DifficultyTier::ALL {
            if self.scenarios(tier).is_empty() {
                return Err(CatalogError::InvalidContent(format!(
                    "no conversation scenarios for {tier}"
                )));
            }
        }
        for pack in self.languages.values() {
            pack.validate()?;
        }
        Ok(())
    }
}
