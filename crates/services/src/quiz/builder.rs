use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};

use lingo_core::catalog::{CatalogError, CulturalQuestion, VocabularyEntry};
use lingo_core::model::{Question, QuestionError};

use crate::error::LearnerError;

/// Builds meaning questions for a sample of vocabulary entries.
///
/// Picks up to `max_questions` distinct entries. Each question offers the
/// entry's meaning plus up to `max_options - 1` other meanings from the same
/// list, shuffled once here; the stored correct index refers to the shuffled
/// order.
///
/// # Errors
///
/// Returns `LearnerError::ContentUnavailable` when the list has fewer than two
/// distinct meanings to choose from.
pub fn vocabulary_questions<R: Rng + ?Sized>(
    entries: &[VocabularyEntry],
    max_questions: usize,
    max_options: usize,
    rng: &mut R,
) -> Result<Vec<Question>, LearnerError> {
    let mut meanings: Vec<&str> = Vec::with_capacity(entries.len());
    for entry in entries {
        if !meanings.contains(&entry.meaning.as_str()) {
            meanings.push(&entry.meaning);
        }
    }
    if meanings.len() < 2 {
        return Err(CatalogError::InvalidContent(
            "a vocabulary quiz needs at least two distinct meanings".into(),
        )
        .into());
    }

    let distractor_count = max_options.max(2) - 1;
    entries
        .choose_multiple(rng, max_questions)
        .map(|entry| -> Result<Question, LearnerError> {
            let mut distractors: Vec<&str> = meanings
                .iter()
                .copied()
                .filter(|m| *m != entry.meaning)
                .collect();
            distractors.shuffle(rng);
            distractors.truncate(distractor_count);
            let question = shuffled_question(
                format!("What does '{}' mean?", entry.term),
                &entry.meaning,
                &distractors,
                rng,
            )?;
            Ok(question)
        })
        .collect()
}

/// Turns authored cultural questions into shuffled questions with explanations.
///
/// # Errors
///
/// Returns `LearnerError::ContentUnavailable` when there are no questions or
/// one of them is malformed.
pub fn cultural_questions<R: Rng + ?Sized>(
    authored: &[CulturalQuestion],
    rng: &mut R,
) -> Result<Vec<Question>, LearnerError> {
    if authored.is_empty() {
        return Err(CatalogError::InvalidContent("no cultural quiz questions".into()).into());
    }

    authored
        .iter()
        .map(|q| -> Result<Question, LearnerError> {
            let correct = q.options.get(q.correct).ok_or_else(|| {
                QuestionError::CorrectIndexOutOfRange {
                    index: q.correct,
                    len: q.options.len(),
                }
            })?;
            let distractors: Vec<&str> = q
                .options
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != q.correct)
                .map(|(_, option)| option.as_str())
                .collect();
            let question = shuffled_question(q.prompt.clone(), correct, &distractors, rng)?
                .with_explanation(q.explanation.clone());
            Ok(question)
        })
        .collect()
}

fn shuffled_question<R: Rng + ?Sized>(
    prompt: String,
    correct: &str,
    distractors: &[&str],
    rng: &mut R,
) -> Result<Question, QuestionError> {
    let mut options: Vec<String> = Vec::with_capacity(distractors.len() + 1);
    options.push(correct.to_string());
    options.extend(distractors.iter().map(|d| (*d).to_string()));
    options.shuffle(rng);

    let correct_index = options
        .iter()
        .position(|o| o == correct)
        .ok_or(QuestionError::CorrectIndexOutOfRange {
            index: options.len(),
            len: options.len(),
        })?;
    Question::new(prompt, options, correct_index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingo_core::{ContentCatalog, VocabularyCategory};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn entry(term: &str, meaning: &str) -> VocabularyEntry {
        VocabularyEntry {
            term: term.into(),
            meaning: meaning.into(),
        }
    }

    #[test]
    fn vocabulary_questions_point_at_the_shown_meaning() {
        let catalog = ContentCatalog::builtin().unwrap();
        let colors = catalog
            .language("Spanish")
            .unwrap()
            .vocabulary(VocabularyCategory::Colors)
            .unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        let questions = vocabulary_questions(colors, 5, 4, &mut rng).unwrap();

        assert_eq!(questions.len(), 5);
        let mut prompts: Vec<_> = questions.iter().map(Question::prompt).collect();
        prompts.dedup();
        assert_eq!(prompts.len(), 5);
        for q in &questions {
            assert_eq!(q.options().len(), 4);
            let term = q
                .prompt()
                .trim_start_matches("What does '")
                .trim_end_matches("' mean?");
            let expected = colors.iter().find(|e| e.term == term).unwrap();
            assert_eq!(q.correct_option(), expected.meaning);
        }
    }

    #[test]
    fn small_category_limits_question_and_option_counts() {
        let entries = vec![entry("sí", "yes"), entry("no", "no")];
        let mut rng = StdRng::seed_from_u64(1);
        let questions = vocabulary_questions(&entries, 5, 4, &mut rng).unwrap();
        assert_eq!(questions.len(), 2);
        assert!(questions.iter().all(|q| q.options().len() == 2));
    }

    #[test]
    fn single_meaning_cannot_make_a_quiz() {
        let entries = vec![entry("hola", "hello"), entry("buenas", "hello")];
        let mut rng = StdRng::seed_from_u64(1);
        let err = vocabulary_questions(&entries, 5, 4, &mut rng).unwrap_err();
        assert!(matches!(err, LearnerError::ContentUnavailable(_)));
    }

    #[test]
    fn cultural_questions_remap_correct_index_after_shuffle() {
        let catalog = ContentCatalog::builtin().unwrap();
        let authored = catalog.language("French").unwrap().cultural_quiz();

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let questions = cultural_questions(authored, &mut rng).unwrap();
            for (built, source) in questions.iter().zip(authored) {
                assert_eq!(built.correct_option(), source.options[source.correct]);
                assert_eq!(built.explanation(), Some(source.explanation.as_str()));
                let mut shown = built.options().to_vec();
                let mut original = source.options.clone();
                shown.sort();
                original.sort();
                assert_eq!(shown, original);
            }
        }
    }

    #[test]
    fn no_cultural_questions_is_unavailable() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = cultural_questions(&[], &mut rng).unwrap_err();
        assert!(matches!(err, LearnerError::ContentUnavailable(_)));
    }
}
