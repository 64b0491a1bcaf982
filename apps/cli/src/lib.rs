//! # tabsplit: Receipt-to-Split Command Line
//!
//! Thin orchestration around `tabsplit-core`: reads files, runs the OCR
//! engine, prints reports. All arithmetic lives in the core crate.
//!
//! ## Typical Session
//! ```text
//! $ tabsplit scan receipt.jpg --person Alice --person Bob --bill-out bill.toml
//! $ $EDITOR bill.toml            # assign items, pick the payer
//! $ tabsplit split bill.toml
//! Alice paid $33.00
//! ...
//! ```
//!
//! ## Startup
//! ```text
//! parse args ──► load config ──► init tracing (stderr) ──► dispatch
//!                                                            │
//!                            stdout ◄── Ok(output) ◄─────────┤
//!                 stderr + exit 1/2 ◄── Err(AppError) ◄──────┘
//! ```

pub mod bill_file;
pub mod commands;
pub mod config;
pub mod error;
pub mod ocr;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::commands::scan::ScanRequest;
use crate::config::{AppConfig, OutputFormat};
use crate::error::{AppError, AppResult};
use crate::ocr::CommandRecognizer;

// =============================================================================
// Command Line
// =============================================================================

#[derive(Debug, Parser)]
#[command(name = "tabsplit")]
#[command(about = "Split a restaurant bill from a receipt photo")]
#[command(version)]
pub struct Cli {
    /// Config file (default: platform config dir/config.toml)
    #[arg(long, global = true, env = "TABSPLIT_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// More logging on stderr (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Parse OCR text into a receipt
    #[command(after_help = "\
Examples:
  tesseract receipt.jpg stdout | tabsplit parse
  tabsplit parse --input receipt.txt --json")]
    Parse {
        /// Text file (omit to read stdin)
        #[arg(long, short = 'i')]
        input: Option<PathBuf>,

        /// Print JSON instead of a report
        #[arg(long)]
        json: bool,
    },

    /// Recognize a receipt photo and parse it
    #[command(after_help = "\
Examples:
  tabsplit scan receipt.jpg
  tabsplit scan receipt.png --person Alice --person Bob --bill-out bill.toml")]
    Scan {
        /// Receipt image (.jpg, .jpeg or .png)
        image: PathBuf,

        /// Participant name for the draft bill. Repeatable.
        #[arg(long = "person", short = 'p', value_name = "NAME")]
        people: Vec<String>,

        /// Write a draft bill file to complete and pass to `split`
        #[arg(long, value_name = "FILE")]
        bill_out: Option<PathBuf>,

        /// Print JSON instead of a report
        #[arg(long)]
        json: bool,
    },

    /// Compute who owes what from a bill file
    Split {
        /// Bill file (TOML)
        bill: PathBuf,

        /// Print JSON instead of a report
        #[arg(long)]
        json: bool,
    },

    /// Show the effective configuration
    Config {
        /// Print only the config file path
        #[arg(long)]
        path: bool,
    },
}

impl Commands {
    /// `--json` wins over the configured format.
    fn output_format(&self, config: &AppConfig) -> OutputFormat {
        match self {
            Commands::Parse { json: true, .. }
            | Commands::Scan { json: true, .. }
            | Commands::Split { json: true, .. } => OutputFormat::Json,
            _ => config.output.format,
        }
    }
}

// =============================================================================
// Entry Point
// =============================================================================

/// Parses arguments, runs the command and maps the outcome to an exit code.
pub async fn main_entry() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.clone()) {
        Ok((config, fallback)) => {
            init_tracing(&config.logging.filter, cli.verbose);
            if let Some(err) = fallback {
                warn!("Failed to load config: {}. Using defaults.", err);
            }
            config
        }
        Err(err) => {
            init_tracing(&AppConfig::default().logging.filter, cli.verbose);
            eprintln!("Error: {}", err);
            return ExitCode::from(err.exit_code());
        }
    };

    let format = cli.command.output_format(&config);

    match run(cli, &config, format).await {
        Ok(output) => {
            print!("{}", output);
            if !output.ends_with('\n') {
                println!();
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            report_error(&err, format);
            ExitCode::from(err.exit_code())
        }
    }
}

/// Runs one command and returns what to print.
pub async fn run(cli: Cli, config: &AppConfig, format: OutputFormat) -> AppResult<String> {
    info!(version = env!("CARGO_PKG_VERSION"), "tabsplit starting");

    match cli.command {
        Commands::Parse { input, .. } => commands::parse::run(input.as_deref(), format),
        Commands::Scan {
            image,
            people,
            bill_out,
            ..
        } => {
            let recognizer = CommandRecognizer::new(config.ocr.clone());
            let request = ScanRequest {
                people: &people,
                bill_out: bill_out.as_deref(),
                format,
            };
            commands::scan::run(&recognizer, &image, &config.ocr, request).await
        }
        Commands::Split { bill, .. } => commands::split::run(&bill, format),
        Commands::Config { path } => commands::config::run(config, cli.config.as_deref(), path),
    }
}

/// An explicit `--config` must load; a broken default file falls back to
/// defaults and hands the error back for a warning.
fn load_config(explicit: Option<PathBuf>) -> AppResult<(AppConfig, Option<AppError>)> {
    match explicit {
        Some(path) => Ok((AppConfig::load(Some(path))?, None)),
        None => match AppConfig::load(None) {
            Ok(config) => Ok((config, None)),
            Err(err) => Ok((AppConfig::default(), Some(err))),
        },
    }
}

/// Initializes tracing on stderr so stdout stays clean for reports and JSON.
///
/// `RUST_LOG` wins; otherwise `-v` / `-vv`, otherwise the configured filter.
fn init_tracing(configured: &str, verbose: u8) {
    let fallback = match verbose {
        0 => configured.to_string(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn report_error(err: &AppError, format: OutputFormat) {
    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(&err.to_report()) {
            Ok(json) => println!("{}", json),
            Err(_) => eprintln!("Error: {}", err),
        },
        OutputFormat::Text => eprintln!("Error: {}", err),
    }
}
