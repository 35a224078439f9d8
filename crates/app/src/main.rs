use std::fmt;
use std::sync::Arc;

use quiz_core::model::{Difficulty, QuizId, SessionPolicy};
use services::{
    AppServices, CatalogQuery, Clock, SessionEnd, SessionRunner, SessionUpdate, SortOrder,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

mod input;
mod presentation;
mod render;

use presentation::TerminalPresentation;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidNumber { flag: &'static str, raw: String },
    InvalidSort { raw: String },
    InvalidDifficulty { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidNumber { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
            ArgsError::InvalidSort { raw } => write!(f, "invalid --sort value: {raw}"),
            ArgsError::InvalidDifficulty { raw } => write!(f, "invalid --difficulty value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_number<T: std::str::FromStr>(raw: String, flag: &'static str) -> Result<T, ArgsError> {
    raw.trim()
        .parse()
        .map_err(|_| ArgsError::InvalidNumber { flag, raw })
}

fn env_number<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- list [--search <term>] [--sort popular|rating|newest|title]");
    eprintln!("                           [--page <n>] [--category <name>]...");
    eprintln!("                           [--difficulty <level>]... [--json]");
    eprintln!("  cargo run -p app -- categories");
    eprintln!("  cargo run -p app -- take [--quiz-id <id>] [--max-violations <n>]");
    eprintln!("                           [--start-attempts <n>] [--headless] [--json]");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_ID, QUIZ_MAX_VIOLATIONS, QUIZ_START_ATTEMPTS, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    List,
    Categories,
    Take,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "list" => Some(Self::List),
            "categories" => Some(Self::Categories),
            "take" => Some(Self::Take),
            _ => None,
        }
    }
}

struct ListArgs {
    query: CatalogQuery,
    json: bool,
}

impl ListArgs {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut query = CatalogQuery::default();
        let mut json = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--search" => query.search = Some(require_value(args, "--search")?),
                "--sort" => {
                    let raw = require_value(args, "--sort")?;
                    query.sort = raw
                        .parse::<SortOrder>()
                        .map_err(|_| ArgsError::InvalidSort { raw })?;
                }
                "--page" => query.page = parse_number(require_value(args, "--page")?, "--page")?,
                "--category" => query.categories.push(require_value(args, "--category")?),
                "--difficulty" => {
                    let raw = require_value(args, "--difficulty")?;
                    let level = raw
                        .parse::<Difficulty>()
                        .map_err(|_| ArgsError::InvalidDifficulty { raw })?;
                    query.difficulties.push(level);
                }
                "--json" => json = true,
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { query, json })
    }
}

struct TakeArgs {
    quiz_id: QuizId,
    max_violations: u32,
    start_attempts: u32,
    headless: bool,
    json: bool,
}

impl TakeArgs {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut quiz_id = env_number::<u64>("QUIZ_ID").map_or(QuizId::new(1), QuizId::new);
        let mut max_violations = env_number("QUIZ_MAX_VIOLATIONS")
            .unwrap_or(SessionPolicy::DEFAULT_MAX_VIOLATIONS);
        let mut start_attempts = env_number("QUIZ_START_ATTEMPTS")
            .unwrap_or(SessionPolicy::DEFAULT_MAX_START_ATTEMPTS);
        let mut headless = false;
        let mut json = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--quiz-id" => {
                    let raw = require_value(args, "--quiz-id")?;
                    quiz_id = QuizId::new(parse_number(raw, "--quiz-id")?);
                }
                "--max-violations" => {
                    max_violations =
                        parse_number(require_value(args, "--max-violations")?, "--max-violations")?;
                }
                "--start-attempts" => {
                    start_attempts =
                        parse_number(require_value(args, "--start-attempts")?, "--start-attempts")?;
                }
                "--headless" => headless = true,
                "--json" => json = true,
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            quiz_id,
            max_violations,
            start_attempts,
            headless,
            json,
        })
    }
}

async fn list(args: ListArgs) -> Result<(), Box<dyn std::error::Error>> {
    let services = AppServices::sample(Clock::system(), SessionPolicy::default())?;
    let page = services.catalog().search(&args.query).await?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&page)?);
    } else {
        render::catalog(&page);
    }
    Ok(())
}

async fn categories() -> Result<(), Box<dyn std::error::Error>> {
    let services = AppServices::sample(Clock::system(), SessionPolicy::default())?;
    render::categories(&services.catalog().categories().await?);
    Ok(())
}

async fn take(args: TakeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let policy = SessionPolicy::new(args.max_violations, args.start_attempts)?;
    let services = AppServices::sample(Clock::system(), policy)?;
    let sessions = services.sessions();

    let presentation = TerminalPresentation::new(args.headless);
    let mut session = sessions.open(args.quiz_id, Box::new(presentation)).await?;
    let quiz = Arc::clone(session.quiz());
    render::briefing(&quiz, policy.max_violations());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        println!("Press Enter to start the quiz in exam mode.");
        if lines.next_line().await?.is_none() {
            return Ok(());
        }
        match session.start() {
            Ok(()) => break,
            Err(err) if err.is_retryable() => println!("Exam mode is required: {err}"),
            Err(err) => return Err(err.into()),
        }
    }
    println!("{}", input::HELP);

    let (commands_tx, commands) = mpsc::channel(16);
    let input_task = tokio::spawn(async move {
        while let Ok(Some(line)) = lines.next_line().await {
            if line.trim().eq_ignore_ascii_case("help") {
                println!("{}", input::HELP);
                continue;
            }
            match input::parse_command(&line) {
                Ok(command) => {
                    if commands_tx.send(command).await.is_err() {
                        break;
                    }
                }
                Err(reason) => println!("? {reason} (type `help`)"),
            }
        }
    });

    let (updates_tx, mut updates) = mpsc::unbounded_channel::<SessionUpdate>();
    let render_quiz = Arc::clone(&quiz);
    let render_task = tokio::spawn(async move {
        let mut view = render::SessionView::default();
        while let Some(update) = updates.recv().await {
            view.update(&render_quiz, &update);
        }
    });

    let runner = SessionRunner::new(updates_tx);
    let outcome = runner.run(&mut session, commands).await?;
    log::debug!("attempt {} finished: {outcome}", session.attempt_id());
    drop(runner);
    input_task.abort();
    render_task.await?;

    match sessions.finish(&session).await? {
        SessionEnd::Recorded { result, .. } => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                render::result(&result);
                render::stats(&services.results().stats(args.quiz_id).await?);
            }
        }
        SessionEnd::Discarded => println!("Quiz abandoned; nothing was recorded."),
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Default behavior: list the catalog when no subcommand is provided.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::List,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::List,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let report = |e: ArgsError| {
        eprintln!("{e}");
        print_usage();
        e
    };
    match cmd {
        Command::List => list(ListArgs::parse(&mut iter).map_err(report)?).await,
        Command::Categories => match iter.next() {
            None => categories().await,
            Some(arg) => Err(report(ArgsError::UnknownArg(arg)).into()),
        },
        Command::Take => take(TakeArgs::parse(&mut iter).map_err(report)?).await,
    }
}

#[tokio::main]
async fn main() {
    pretty_env_logger::init();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
