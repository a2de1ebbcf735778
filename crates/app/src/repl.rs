//! Line commands for the terminal driver.

use std::io::{self, Write};

use thiserror::Error;

use lingo_core::catalog::VocabularyCategory;
use lingo_core::model::{PracticeType, Speaker};
use services::{LearnerError, LearnerSession, QuizKind, QuizPhase, SessionReport};

#[derive(Debug, Error)]
pub enum ReplError {
    #[error(transparent)]
    Learner(#[from] LearnerError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    Unknown(String),
    MissingArgument(&'static str),
    BadArgument { command: &'static str, raw: String },
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Unknown(word) => write!(f, "unknown command '{word}', try 'help'"),
            ParseError::MissingArgument(usage) => write!(f, "usage: {usage}"),
            ParseError::BadArgument { command, raw } => {
                write!(f, "{command}: cannot understand '{raw}'")
            }
        }
    }
}

impl std::error::Error for ParseError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Say(String),
    Clear,
    Scenarios,
    Scenario(String),
    Tip,
    Category(VocabularyCategory),
    Card,
    Next,
    Previous,
    Master(Option<String>),
    Quiz(QuizKind),
    Answer(usize),
    Restart(QuizKind),
    Practice(PracticeType, String),
    Twisters,
    Phrases,
    Progress,
    Badges,
    Report,
    Quit,
}

impl Command {
    /// `Ok(None)` for a blank line.
    pub fn parse(line: &str) -> Result<Option<Self>, ParseError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        let command = match word.to_ascii_lowercase().as_str() {
            "help" | "?" => Self::Help,
            "say" => Self::Say(required(rest, "say <message>")?.to_string()),
            "clear" => Self::Clear,
            "scenarios" => Self::Scenarios,
            "scenario" => Self::Scenario(required(rest, "scenario <title>")?.to_string()),
            "tip" => Self::Tip,
            "category" => {
                let raw = required(rest, "category <name>")?;
                Self::Category(raw.parse().map_err(|_| ParseError::BadArgument {
                    command: "category",
                    raw: raw.to_string(),
                })?)
            }
            "card" => Self::Card,
            "next" => Self::Next,
            "prev" | "previous" => Self::Previous,
            "master" => Self::Master((!rest.is_empty()).then(|| rest.to_string())),
            "quiz" => Self::Quiz(quiz_kind(required(rest, "quiz <vocabulary|cultural>")?, "quiz")?),
            "answer" => {
                let raw = required(rest, "answer <option number>")?;
                let number: usize = raw.parse().map_err(|_| ParseError::BadArgument {
                    command: "answer",
                    raw: raw.to_string(),
                })?;
                // Options are shown starting at 1.
                let index = number.checked_sub(1).ok_or(ParseError::BadArgument {
                    command: "answer",
                    raw: raw.to_string(),
                })?;
                Self::Answer(index)
            }
            "restart" => Self::Restart(quiz_kind(
                required(rest, "restart <vocabulary|cultural>")?,
                "restart",
            )?),
            "practice" => {
                let usage = "practice <word|phrase|twister|utterance> <text>";
                let (kind, text) = required(rest, usage)?
                    .split_once(char::is_whitespace)
                    .ok_or(ParseError::MissingArgument(usage))?;
                Self::Practice(practice_type(kind)?, text.trim().to_string())
            }
            "twisters" => Self::Twisters,
            "phrases" => Self::Phrases,
            "progress" => Self::Progress,
            "badges" => Self::Badges,
            "report" => Self::Report,
            "quit" | "exit" => Self::Quit,
            other => return Err(ParseError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }
}

fn required<'a>(rest: &'a str, usage: &'static str) -> Result<&'a str, ParseError> {
    if rest.is_empty() {
        Err(ParseError::MissingArgument(usage))
    } else {
        Ok(rest)
    }
}

fn quiz_kind(raw: &str, command: &'static str) -> Result<QuizKind, ParseError> {
    match raw.to_ascii_lowercase().as_str() {
        "vocabulary" | "vocab" => Ok(QuizKind::Vocabulary),
        "cultural" | "culture" => Ok(QuizKind::Cultural),
        _ => Err(ParseError::BadArgument {
            command,
            raw: raw.to_string(),
        }),
    }
}

fn practice_type(raw: &str) -> Result<PracticeType, ParseError> {
    match raw.to_ascii_lowercase().as_str() {
        "word" => Ok(PracticeType::Word),
        "phrase" => Ok(PracticeType::Phrase),
        "twister" | "tongue_twister" => Ok(PracticeType::TongueTwister),
        "utterance" | "free" => Ok(PracticeType::Utterance),
        _ => Err(ParseError::BadArgument {
            command: "practice",
            raw: raw.to_string(),
        }),
    }
}

/// Words listed under "recently mastered".
const RECENT_WORDS: usize = 5;

const HELP: &str = "\
say <message>            talk to your conversation partner
clear                    clear the conversation
scenarios | scenario <t> list or pick a role-play scenario
tip                      show a cultural tip
category <name>          pick a vocabulary category
card | next | prev       browse flashcards
master [word]            mark a word (default: current card) as mastered
quiz <vocabulary|cultural>
answer <n>               answer the current quiz question
restart <vocabulary|cultural>
practice <word|phrase|twister|utterance> <text>
twisters | phrases       practice material
progress | badges        your progress and achievements
report                   progress report as JSON
quit";

/// Run one command against the session, writing its output to `out`.
///
/// # Errors
///
/// Returns `ReplError::Learner` for a rejected command, which leaves the
/// session unchanged, and `ReplError::Io` if `out` fails.
pub fn execute(
    session: &mut LearnerSession,
    command: Command,
    out: &mut impl Write,
) -> Result<Flow, ReplError> {
    match command {
        Command::Help => writeln!(out, "{HELP}")?,
        Command::Say(text) => {
            let exchange = session.send_message(&text)?;
            writeln!(out, "partner: {}", exchange.reply)?;
            writeln!(out, "(+{} points)", exchange.points_awarded)?;
        }
        Command::Clear => {
            session.clear_conversation();
            writeln!(out, "conversation cleared")?;
        }
        Command::Scenarios => {
            writeln!(out, "{} scenarios:", session.difficulty_tier())?;
            for scenario in session.scenarios() {
                writeln!(out, "  {}: {}", scenario.title, scenario.context)?;
            }
        }
        Command::Scenario(title) => {
            session.select_scenario(&title)?;
            if let Some(scenario) = session.conversation_scenario() {
                writeln!(out, "scenario: {}", scenario.context)?;
            }
        }
        Command::Tip => writeln!(out, "tip: {}", session.random_cultural_tip()?)?,
        Command::Category(category) => {
            session.select_category(category)?;
            let card = session.current_flashcard()?;
            write_card(out, &card)?;
        }
        Command::Card => write_card(out, &session.current_flashcard()?)?,
        Command::Next => write_card(out, &session.next_flashcard()?)?,
        Command::Previous => write_card(out, &session.previous_flashcard()?)?,
        Command::Master(word) => {
            let word = match word {
                Some(word) => word,
                None => session.current_flashcard()?.entry.term,
            };
            if session.mark_word_mastered(&word)? {
                writeln!(out, "mastered '{word}'")?;
            } else {
                writeln!(out, "'{word}' was already mastered")?;
            }
            let vocabulary = session.vocabulary_progress()?;
            writeln!(
                out,
                "vocabulary: {}/{} ({:.0}%)",
                vocabulary.mastered,
                vocabulary.total,
                vocabulary.ratio() * 100.0
            )?;
        }
        Command::Quiz(kind) => {
            session.start_quiz(kind)?;
            write_question(out, session, kind)?;
        }
        Command::Answer(index) => {
            let outcome = session.submit_quiz_answer(index)?;
            if outcome.correct {
                writeln!(out, "correct! (+{} points)", outcome.points_awarded)?;
            } else {
                writeln!(
                    out,
                    "not quite, it was '{}' (+{} points)",
                    outcome.correct_option, outcome.points_awarded
                )?;
            }
            if let Some(explanation) = &outcome.explanation {
                writeln!(out, "{explanation}")?;
            }
            if let Some(kind) = session.active_quiz() {
                if outcome.completed {
                    if let Some(result) = session.quiz_result(kind) {
                        writeln!(out, "quiz complete: {}/{}", result.score, result.total)?;
                        if result.is_perfect() {
                            writeln!(out, "perfect score!")?;
                        }
                    }
                } else {
                    write_question(out, session, kind)?;
                }
            }
        }
        Command::Restart(kind) => {
            session.restart_quiz(kind);
            writeln!(out, "{kind} quiz reset")?;
        }
        Command::Practice(practice_type, text) => {
            let feedback = session.record_pronunciation_attempt(&text, practice_type)?;
            writeln!(
                out,
                "{} score: {} at {} level (+{} points)",
                feedback.practice_type, feedback.score, feedback.tier, feedback.points_awarded
            )?;
            if let Some(summary) = session.pronunciation_summary() {
                writeln!(
                    out,
                    "recent average {:.1} over {} attempts ({:?})",
                    summary.average, summary.attempts, summary.trend
                )?;
            }
        }
        Command::Twisters => {
            for twister in session.tongue_twisters()? {
                writeln!(out, "  {twister}")?;
            }
        }
        Command::Phrases => {
            for phrase in session.common_phrases() {
                writeln!(out, "  {phrase}")?;
            }
        }
        Command::Progress => {
            let progress = session.progress();
            writeln!(
                out,
                "level {} ({}), {} points",
                session.level_score(),
                session.difficulty_tier(),
                progress.total_points()
            )?;
            writeln!(
                out,
                "lessons {}, conversations {}, words {}, streak {} days (best {})",
                progress.lessons_completed(),
                progress.conversations_had(),
                progress.vocabulary_mastered().len(),
                progress.current_streak(),
                progress.streak_days()
            )?;
            let recent = session.recently_mastered(RECENT_WORDS);
            if !recent.is_empty() {
                writeln!(out, "recently mastered: {}", recent.join(", "))?;
            }
            for turn in session.transcript() {
                let who = match turn.speaker {
                    Speaker::Learner => "you",
                    Speaker::Partner => "partner",
                };
                writeln!(out, "  {who}: {}", turn.text)?;
            }
        }
        Command::Badges => {
            for status in session.achievement_board() {
                let mark = if status.unlocked { "x" } else { " " };
                writeln!(
                    out,
                    "[{mark}] {}: {}",
                    status.badge.title(),
                    status.description
                )?;
            }
        }
        Command::Report => writeln!(out, "{}", SessionReport::capture(session).to_json()?)?,
        Command::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

fn write_card(out: &mut impl Write, card: &services::Flashcard) -> io::Result<()> {
    writeln!(
        out,
        "[{} {}/{}] {} = {}{}",
        card.category,
        card.index + 1,
        card.total,
        card.entry.term,
        card.entry.meaning,
        if card.mastered { " (mastered)" } else { "" }
    )
}

fn write_question(
    out: &mut impl Write,
    session: &LearnerSession,
    kind: QuizKind,
) -> io::Result<()> {
    let snapshot = session.quiz_state(kind);
    if snapshot.phase != QuizPhase::InProgress {
        return Ok(());
    }
    if let Some(question) = snapshot.current {
        writeln!(
            out,
            "Q{}/{}: {}",
            snapshot.cursor + 1,
            snapshot.total,
            question.prompt()
        )?;
        for (i, option) in question.options().iter().enumerate() {
            writeln!(out, "  {}. {option}", i + 1)?;
        }
    }
    Ok(())
}
