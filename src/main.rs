//! Crash Analytics - answers the vehicle crash questions over the crash data archive
//!
//! Loads the person, unit, charge and damage tables with Polars and prints one line per question.

mod analytics;
mod config;
mod data;
mod report;

use analytics::CrashAnalytics;
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use config::AnalyticsConfig;
use data::ArchiveLoader;
use report::{AnalyticsReport, Question};
use std::path::PathBuf;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Answer the crash questions (all of them unless --question is given)
    Run {
        /// Question number 1-10; repeat to run several
        #[arg(long = "question", short = 'q')]
        questions: Vec<u8>,
    },
    /// Show shape and columns of every configured table in the archive
    Inspect,
}

#[derive(Debug, Parser)]
#[command(name = "crash_analytics", version, about = "Vehicle crash dataset analytics")]
struct Cli {
    /// Config file (YAML)
    #[arg(long, global = true, default_value = "config/config.yaml")]
    config: PathBuf,
    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    #[command(subcommand)]
    command: Option<Command>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = AnalyticsConfig::load(&cli.config)
        .with_context(|| format!("loading config {}", cli.config.display()))?;
    log::info!(
        "Config loaded: {} category lists",
        config.category_names().count()
    );

    match cli.command.unwrap_or(Command::Run {
        questions: Vec::new(),
    }) {
        Command::Run { questions } => run(&config, &questions, cli.format),
        Command::Inspect => inspect(&config, cli.format),
    }
}

fn selected_questions(numbers: &[u8]) -> Result<Vec<Question>> {
    if numbers.is_empty() {
        return Ok(Question::ALL.to_vec());
    }
    numbers
        .iter()
        .map(|&n| match Question::from_number(n) {
            Some(q) => Ok(q),
            None => bail!("unknown question {n}, expected 1-10"),
        })
        .collect()
}

fn run(config: &AnalyticsConfig, numbers: &[u8], format: OutputFormat) -> Result<()> {
    let questions = selected_questions(numbers)?;

    let mut loader = ArchiveLoader::open(&config.paths.archive)
        .with_context(|| format!("opening archive {}", config.paths.archive.display()))?;
    let tables = loader
        .load_tables(&config.paths, &config.columns)
        .context("loading crash tables")?;
    for (name, rows) in tables.row_counts() {
        log::info!("{name}: {rows} rows");
    }

    let analytics = CrashAnalytics::new(&tables, config);
    let report = AnalyticsReport::run(&analytics, &questions).context("running analytics")?;

    match format {
        OutputFormat::Text => println!("{}", report.render_text()),
        OutputFormat::Json => println!("{}", report.render_json()?),
    }
    Ok(())
}

fn inspect(config: &AnalyticsConfig, format: OutputFormat) -> Result<()> {
    let mut loader = ArchiveLoader::open(&config.paths.archive)
        .with_context(|| format!("opening archive {}", config.paths.archive.display()))?;
    log::info!("Archive entries: {}", loader.entry_names().join(", "));
    let tables = loader.load_all(&config.paths).context("loading archive tables")?;

    match format {
        OutputFormat::Text => {
            for (name, df) in &tables {
                let columns: Vec<String> =
                    df.get_column_names().iter().map(|s| s.to_string()).collect();
                println!("{name}: {} rows x {} columns", df.height(), df.width());
                println!("  {}", columns.join(", "));
            }
        }
        OutputFormat::Json => {
            let summary: Vec<serde_json::Value> = tables
                .iter()
                .map(|(name, df)| {
                    serde_json::json!({
                        "table": name,
                        "rows": df.height(),
                        "columns": df
                            .get_column_names()
                            .iter()
                            .map(|s| s.to_string())
                            .collect::<Vec<_>>(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }
    Ok(())
}
