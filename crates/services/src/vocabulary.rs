use lingo_core::catalog::{VocabularyCategory, VocabularyEntry};
use serde::Serialize;

const CATEGORY_COUNT: usize = VocabularyCategory::ALL.len();

/// Flashcard position for each vocabulary category.
///
/// Positions are clamped to the category length when read, so a cursor left
/// behind by a larger catalog never points past the end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VocabularyCursors {
    positions: [usize; CATEGORY_COUNT],
}

impl VocabularyCursors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn position(&self, category: VocabularyCategory, len: usize) -> usize {
        self.positions[category.index()].min(len.saturating_sub(1))
    }

    /// Step forward, stopping at the last entry.
    pub fn next(&mut self, category: VocabularyCategory, len: usize) -> usize {
        let next = (self.position(category, len) + 1).min(len.saturating_sub(1));
        self.positions[category.index()] = next;
        next
    }

    /// Step back, stopping at the first entry.
    pub fn previous(&mut self, category: VocabularyCategory, len: usize) -> usize {
        let previous = self.position(category, len).saturating_sub(1);
        self.positions[category.index()] = previous;
        previous
    }
}

/// The flashcard currently shown for a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flashcard {
    pub category: VocabularyCategory,
    pub index: usize,
    pub total: usize,
    pub entry: VocabularyEntry,
    pub mastered: bool,
}

impl Flashcard {
    #[must_use]
    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.total
    }
}

/// Mastered words against the size of the target language's vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VocabularyProgress {
    pub mastered: usize,
    pub total: usize,
}

impl VocabularyProgress {
    /// Fraction mastered in `0.0..=1.0`.
    #[must_use]
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.mastered as f64 / self.total as f64).min(1.0)
        }
    }
}
