use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use flashcards_core::model::SetId;
use flashcards_core::quiz::QuizSize;
use services::{Clock, LibraryService, QuizService, StudyService};
use storage::repository::Storage;

mod console;
mod library;
mod quiz;
mod study;

use console::Console;

const DEFAULT_DB_URL: &str = "sqlite:flashcards.sqlite3";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    UnknownCommand(String),
    MissingSet { command: &'static str },
    InvalidSetId { raw: String },
    InvalidSize { raw: String },
    InvalidSeed { raw: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown command: {cmd}"),
            ArgsError::MissingSet { command } => write!(f, "{command} requires --set <id>"),
            ArgsError::InvalidSetId { raw } => write!(f, "invalid --set value: {raw}"),
            ArgsError::InvalidSize { raw } => {
                write!(f, "invalid --size value (expected {}): {raw}", size_choices())
            }
            ArgsError::InvalidSeed { raw } => write!(f, "invalid --seed value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
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

fn parse_seed(raw: String) -> Result<u64, ArgsError> {
    raw.trim()
        .parse()
        .map_err(|_| ArgsError::InvalidSeed { raw })
}

/// Accepted `--size` values, led by the suggested presets.
fn size_choices() -> String {
    let presets: Vec<String> = QuizSize::PRESETS.iter().map(ToString::to_string).collect();
    format!("{}, any positive number, or 'all'", presets.join(", "))
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    List {
        search: Option<String>,
    },
    Quiz {
        set_id: SetId,
        size: QuizSize,
        seed: Option<u64>,
    },
    Study {
        set_id: SetId,
        shuffle: bool,
        seed: Option<u64>,
    },
}

/// Values taken from the environment before flags are applied.
#[derive(Debug, Clone, Default)]
struct EnvDefaults {
    db_url: Option<String>,
    seed: Option<String>,
}

impl EnvDefaults {
    fn from_env() -> Self {
        Self {
            db_url: std::env::var("FLASHCARDS_DB_URL").ok(),
            seed: std::env::var("FLASHCARDS_SEED").ok(),
        }
    }
}

#[derive(Debug)]
struct Args {
    db_url: String,
    command: Command,
}

impl Args {
    fn parse(
        mut args: impl Iterator<Item = String>,
        env: EnvDefaults,
    ) -> Result<Self, ArgsError> {
        let name = args.next().unwrap_or_else(|| "list".into());
        let command_name: &'static str = match name.as_str() {
            "list" => "list",
            "quiz" => "quiz",
            "study" => "study",
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            _ => return Err(ArgsError::UnknownCommand(name)),
        };

        let mut db_url = env.db_url.unwrap_or_else(|| DEFAULT_DB_URL.into());
        let mut seed = env.seed.map(parse_seed).transpose()?;
        let mut set_id: Option<SetId> = None;
        let mut size = QuizSize::default();
        let mut shuffle = false;
        let mut search: Option<String> = None;

        while let Some(arg) = args.next() {
            match (command_name, arg.as_str()) {
                (_, "--db") => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = value;
                }
                ("quiz" | "study", "--set") => {
                    let value = require_value(&mut args, "--set")?;
                    set_id = Some(
                        SetId::new(value.clone())
                            .map_err(|_| ArgsError::InvalidSetId { raw: value })?,
                    );
                }
                ("quiz" | "study", "--seed") => {
                    seed = Some(parse_seed(require_value(&mut args, "--seed")?)?);
                }
                ("quiz", "--size") => {
                    let value = require_value(&mut args, "--size")?;
                    size = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidSize { raw: value.clone() })?;
                }
                ("study", "--shuffle") => shuffle = true,
                ("list", "--search") => search = Some(require_value(&mut args, "--search")?),
                (_, "--help" | "-h") => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let command = match command_name {
            "quiz" => Command::Quiz {
                set_id: set_id.ok_or(ArgsError::MissingSet { command: "quiz" })?,
                size,
                seed,
            },
            "study" => Command::Study {
                set_id: set_id.ok_or(ArgsError::MissingSet { command: "study" })?,
                shuffle,
                seed,
            },
            _ => Command::List { search },
        };

        Ok(Self {
            db_url: normalize_sqlite_url(db_url),
            command,
        })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- list  [--search <text>] [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- quiz  --set <id> [--size <n>|all] [--seed <n>] [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- study --set <id> [--shuffle] [--seed <n>] [--db <sqlite_url>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!("  --size all ({})", size_choices());
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  FLASHCARDS_DB_URL, FLASHCARDS_SEED, RUST_LOG");
}

fn is_memory_url(raw: &str) -> bool {
    raw == "sqlite::memory:" || raw.contains("mode=memory")
}

fn normalize_sqlite_url(raw: String) -> String {
    if is_memory_url(&raw) || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim();
    let path = Path::new(trimmed.strip_prefix("sqlite:").unwrap_or(trimmed));
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// Make sure the database file's directory exists; `SQLite` creates the file.
fn prepare_sqlite_dir(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if is_memory_url(db_url) {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    if let Some(parent) = Path::new(path).parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let parsed = Args::parse(std::env::args().skip(1), EnvDefaults::from_env()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    // Open + migrate SQLite here so core and services stay storage-agnostic.
    prepare_sqlite_dir(&parsed.db_url)?;
    let storage = Storage::sqlite(&parsed.db_url).await?;
    log::debug!("using database {}", parsed.db_url);
    let clock = Clock::default();

    let stdin = io::stdin();
    let mut console = Console::new(stdin.lock(), io::stdout());

    match parsed.command {
        Command::List { search } => {
            let library = LibraryService::new(storage.sets);
            library::run(console.out(), &library, search.as_deref(), clock.now()).await
        }
        Command::Quiz { set_id, size, seed } => {
            let mut service = QuizService::new(clock, storage.sets);
            if let Some(seed) = seed {
                service = service.with_seed(seed);
            }
            quiz::run(&mut console, &service, &set_id, size).await
        }
        Command::Study {
            set_id,
            shuffle,
            seed,
        } => {
            let mut service = StudyService::new(clock, storage.sets);
            if let Some(seed) = seed {
                service = service.with_seed(seed);
            }
            study::run(&mut console, &service, &set_id, shuffle).await
        }
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
