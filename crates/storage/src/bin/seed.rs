use std::fmt;

use prep_core::model::{QuestionRecord, TopicId};
use storage::repository::{QuestionRepository as _, Storage};

/// Demo question set bundled with the seeder. Real deployments load their
/// own sets through `QuestionRepository::replace_questions`.
const SAMPLE_QUESTIONS: &str = include_str!("../../assets/sample_questions.json");

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    topic: TopicId,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidTopic { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidTopic { raw } => write!(f, "invalid --topic value: {raw}"),
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

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut db_url =
            std::env::var("PREP_DB_URL").unwrap_or_else(|_| "sqlite:dev.sqlite3".into());
        let mut topic_raw = std::env::var("PREP_TOPIC").unwrap_or_else(|_| "angular".into());

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = value;
                }
                "--topic" => {
                    topic_raw = require_value(&mut args, "--topic")?;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let topic = TopicId::new(topic_raw.clone())
            .map_err(|_| ArgsError::InvalidTopic { raw: topic_raw })?;

        Ok(Self { db_url, topic })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>    SQLite URL (default: sqlite:dev.sqlite3)");
    eprintln!("  --topic <topic>      Topic to seed (default: angular)");
    eprintln!("  -h, --help           Show this help");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!("  PREP_DB_URL, PREP_TOPIC");
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let records: Vec<QuestionRecord> = serde_json::from_str(SAMPLE_QUESTIONS)?;

    let storage = Storage::sqlite(&args.db_url).await?;
    storage
        .questions
        .replace_questions(&args.topic, &records)
        .await?;

    println!(
        "Seeded topic '{}' with {} questions into {}",
        args.topic,
        records.len(),
        args.db_url
    );

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
