mod repl;

use std::fmt;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use lingo_core::model::ProfileDraft;
use lingo_core::{ContentCatalog, RewardConfig};
use services::LearnerSession;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::repl::{Command, Flow, ReplError};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidSeed { raw: String },
    EmptyValue { flag: &'static str },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidSeed { raw } => write!(f, "invalid --seed value: {raw}"),
            ArgsError::EmptyValue { flag } => write!(f, "{flag} cannot be empty"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    let value = args.next().ok_or(ArgsError::MissingValue { flag })?;
    if value.trim().is_empty() {
        return Err(ArgsError::EmptyValue { flag });
    }
    Ok(value)
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  lingo [--catalog <path>] [--rewards <path>] [--name <name>]");
    eprintln!("        [--language <target>] [--seed <u64>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  built-in catalog and reward tables, target language Spanish");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  LINGO_CATALOG, LINGO_REWARDS, LINGO_LANGUAGE, LINGO_LOG");
}

#[derive(Debug, Default)]
struct Args {
    catalog: Option<PathBuf>,
    rewards: Option<PathBuf>,
    name: Option<String>,
    language: Option<String>,
    seed: Option<u64>,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Option<Self>, ArgsError> {
        let env = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());
        let mut parsed = Self {
            catalog: env("LINGO_CATALOG").map(PathBuf::from),
            rewards: env("LINGO_REWARDS").map(PathBuf::from),
            language: env("LINGO_LANGUAGE"),
            ..Self::default()
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--catalog" => parsed.catalog = Some(require_value(args, "--catalog")?.into()),
                "--rewards" => parsed.rewards = Some(require_value(args, "--rewards")?.into()),
                "--name" => parsed.name = Some(require_value(args, "--name")?),
                "--language" => parsed.language = Some(require_value(args, "--language")?),
                "--seed" => {
                    let value = require_value(args, "--seed")?;
                    let seed = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidSeed { raw: value.clone() })?;
                    parsed.seed = Some(seed);
                }
                "--help" | "-h" => return Ok(None),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Some(parsed))
    }
}

fn init_tracing() {
    let filter = std::env::var("LINGO_LOG")
        .ok()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_content(args: &Args) -> Result<(ContentCatalog, RewardConfig), lingo_core::Error> {
    let catalog = match &args.catalog {
        Some(path) => ContentCatalog::from_path(path)?,
        None => ContentCatalog::builtin()?,
    };
    let rewards = match &args.rewards {
        Some(path) => RewardConfig::from_path(path)?,
        None => RewardConfig::builtin()?,
    };
    Ok((catalog, rewards))
}

fn build_session(args: &Args) -> Result<LearnerSession, Box<dyn std::error::Error>> {
    let (catalog, rewards) = load_content(args)?;
    info!(
        languages = catalog.languages().count(),
        catalog = ?args.catalog,
        rewards = ?args.rewards,
        "content loaded"
    );

    let mut session = LearnerSession::new(Arc::new(catalog), Arc::new(rewards));
    if let Some(seed) = args.seed {
        session = session.with_seed(seed);
    }

    if args.name.is_some() || args.language.is_some() {
        let current = session.profile().clone();
        let draft = ProfileDraft {
            name: args.name.clone().unwrap_or_else(|| current.name().to_string()),
            native_language: current.native_language().to_string(),
            target_language: args
                .language
                .clone()
                .unwrap_or_else(|| current.target_language().to_string()),
            level: Some(current.level()),
            daily_goal_minutes: i64::from(current.daily_goal_minutes()),
            interests: current.interests().to_vec(),
        };
        session.set_profile(draft)?;
    }
    Ok(session)
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let Some(args) = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?
    else {
        print_usage();
        return Ok(());
    };

    init_tracing();
    let mut session = build_session(&args)?;

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    writeln!(
        stdout,
        "Learning {} at {} level. Type 'help' for commands.",
        session.profile().target_language(),
        session.difficulty_tier()
    )?;

    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                writeln!(stdout, "{err}")?;
                continue;
            }
        };
        match repl::execute(&mut session, command, &mut stdout) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            // Rejected commands change nothing; report and keep going.
            Err(ReplError::Learner(err)) => writeln!(stdout, "error: {err}")?,
            Err(err) => return Err(err.into()),
        }
    }

    info!(session = %session.id(), points = session.progress().total_points(), "session ended");
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
