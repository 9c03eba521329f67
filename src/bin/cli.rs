//! SQLi Sim CLI.
//!
//! Runs raw statements against a freshly seeded in-memory store.

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::*;
use sqli_sim::config::{Config, OutputFormat, CONFIG_ENV};
use sqli_sim::query::{classify, StatementKind};
use sqli_sim::{otel, Database, Row, RunResult};
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sqli-sim")]
#[command(about = "In-memory query simulator with reproducible SQL injection behaviour", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file
    #[arg(long, global = true, env = CONFIG_ENV)]
    config: Option<PathBuf>,

    /// Output format (overrides config)
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch every row of a statement
    Query {
        /// Raw SQL statement
        sql: String,
    },

    /// Fetch the first row of a statement
    Get {
        /// Raw SQL statement
        sql: String,
    },

    /// Execute a mutating statement
    Run {
        /// Raw SQL statement
        sql: String,
    },

    /// Execute one statement per line against the same store
    Script {
        /// Script file (default: stdin)
        file: Option<PathBuf>,
    },

    /// Show row counts of the seeded store
    Stats,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(format) = cli.format {
        config.output = format;
    }
    otel::init_tracing(&config);

    let db = Database::open();

    match cli.command {
        Commands::Query { sql } => print_rows(&db.prepare(sql).all(), config.output)?,

        Commands::Get { sql } => match db.prepare(sql).get() {
            Some(row) => print_rows(&[row], config.output)?,
            None => println!("{}", "No row".yellow()),
        },

        Commands::Run { sql } => print_run_result(db.prepare(sql).run(), config.output)?,

        Commands::Script { file } => {
            let reader: Box<dyn BufRead> = match file {
                Some(path) => Box::new(BufReader::new(
                    std::fs::File::open(&path)
                        .with_context(|| format!("opening {}", path.display()))?,
                )),
                None => Box::new(BufReader::new(io::stdin())),
            };
            run_script(&db, reader, config.output)?;
        }

        Commands::Stats => {
            let counts = db.snapshot().counts();
            match config.output {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&counts)?),
                OutputFormat::Table => {
                    println!("{}", "Relations:".cyan().bold());
                    println!("  {} users: {}", "•".green(), counts.users);
                    println!("  {} products: {}", "•".green(), counts.products);
                    println!("  {} orders: {}", "•".green(), counts.orders);
                }
            }
        }
    }

    Ok(())
}

fn run_script(db: &Database, reader: Box<dyn BufRead>, output: OutputFormat) -> anyhow::Result<()> {
    for line in reader.lines() {
        let line = line?;
        let sql = line.trim();
        if sql.is_empty() || sql.starts_with("--") {
            continue;
        }

        if output == OutputFormat::Table {
            println!("{} {}", "→".cyan(), sql.bright_white());
        }

        match classify(sql).kind {
            StatementKind::Insert => print_run_result(db.prepare(sql).run(), output)?,
            _ => print_rows(&db.prepare(sql).all(), output)?,
        }
    }
    Ok(())
}

fn print_rows(rows: &[Row], output: OutputFormat) -> anyhow::Result<()> {
    if output == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("{}", "No rows".yellow());
        return Ok(());
    }

    println!("{} {} row(s):", "✓".green(), rows.len());
    for row in rows {
        let value = serde_json::to_value(row)?;
        let fields: Vec<String> = value
            .as_object()
            .map(|obj| {
                obj.iter()
                    .filter(|(key, _)| key.as_str() != "id")
                    .map(|(key, v)| match v.as_str() {
                        Some(s) => format!("{}={}", key, s),
                        None => format!("{}={}", key, v),
                    })
                    .collect()
            })
            .unwrap_or_default();
        println!("  {} {}", format!("#{}", row.id()).cyan().bold(), fields.join(" ").dimmed());
    }
    Ok(())
}

fn print_run_result(result: RunResult, output: OutputFormat) -> anyhow::Result<()> {
    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Table if result.changes == 0 => {
            println!("{} 0 rows changed", "•".yellow());
        }
        OutputFormat::Table => println!(
            "{} {} row changed (lastInsertRowid: {})",
            "✓".green(),
            result.changes,
            result.last_insert_rowid
        ),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_config_flag_reads_env() {
        let cmd = Cli::command();
        let config = cmd
            .get_arguments()
            .find(|arg| arg.get_id() == "config")
            .unwrap();
        assert_eq!(config.get_env(), Some(std::ffi::OsStr::new(CONFIG_ENV)));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "sqli-sim",
            "query",
            "SELECT * FROM users",
            "--config",
            "/tmp/sim.json",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("/tmp/sim.json")));
        assert_eq!(cli.format, Some(OutputFormat::Json));
        assert!(matches!(cli.command, Commands::Query { ref sql } if sql == "SELECT * FROM users"));
    }
}
