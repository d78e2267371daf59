//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `phish_scan` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger and scoring context initialization
//! - Printing verdicts as JSON and mapping failures to exit codes
//!
//! All core functionality is implemented in the library crate.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::error;

use phish_scan::config::DEFAULT_MODEL_DIR;
use phish_scan::initialization::{init_logger_with, init_scan_context};
use phish_scan::{
    extract, CommandTextExtractor, Config, LogFormat, LogLevel, ScanContext, ScanError,
    ScanOutcome,
};

/// Scores URLs, QR codes, emails and documents for phishing risk.
#[derive(Debug, Parser)]
#[command(name = "phish_scan", version, about)]
struct Cli {
    /// Directory holding the exported model artifacts
    #[arg(long, global = true, env = "PHISH_SCAN_MODEL_DIR", default_value = DEFAULT_MODEL_DIR)]
    model_dir: PathBuf,

    /// Command that prints the text of a document, e.g. "pdftotext {path} -"
    #[arg(long, global = true, env = "PHISH_SCAN_EXTRACTOR_CMD")]
    extractor_cmd: Option<String>,

    /// Log level
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// Log format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Plain)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(flatten)]
    Scan(ScanCommand),
    /// Print the feature vector of a URL without scoring it
    Features {
        /// URL to inspect
        url: String,
    },
}

/// Commands that need the scoring artifacts.
#[derive(Debug, Subcommand)]
enum ScanCommand {
    /// Score a URL from its structural features
    Url {
        /// URL to score (a scheme is added when missing)
        url: String,
    },
    /// Score a URL from its link text
    Link {
        /// URL to score
        url: String,
    },
    /// Decode a QR image and score the URL it contains
    Qr {
        /// PNG or JPEG image
        image: PathBuf,
    },
    /// Score an email from its body and sender domain
    Email {
        /// Sender domain, e.g. "paypal.com"
        #[arg(long)]
        domain: String,
        /// Message body (read from stdin when neither --body nor --body-file is given)
        #[arg(long, conflicts_with = "body_file")]
        body: Option<String>,
        /// File holding the message body
        #[arg(long)]
        body_file: Option<PathBuf>,
    },
    /// Extract the text of a PDF or DOCX and score it
    Doc {
        /// PDF or DOCX file
        file: PathBuf,
    },
}

impl From<&Cli> for Config {
    fn from(cli: &Cli) -> Self {
        Config {
            model_dir: cli.model_dir.clone(),
            log_level: cli.log_level.clone(),
            log_format: cli.log_format.clone(),
            extractor_command: cli.extractor_cmd.clone(),
        }
    }
}

fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = Config::from(&cli);

    init_logger_with(config.log_level.clone().into(), config.log_format.clone())
        .context("Failed to initialize logger")?;

    let command = match &cli.command {
        Command::Features { url } => {
            println!("{}", serde_json::to_string_pretty(&extract(url))?);
            return Ok(());
        }
        Command::Scan(command) => command,
    };

    let context = init_scan_context(&config.model_dir).with_context(|| {
        format!(
            "Failed to load scoring artifacts from {}",
            config.model_dir.display()
        )
    })?;

    let extractor = match (command, config.extractor_command.as_deref()) {
        (ScanCommand::Doc { .. }, Some(extractor_cmd)) => Some(
            CommandTextExtractor::new(extractor_cmd)
                .context("Invalid document extractor command")?,
        ),
        (ScanCommand::Doc { .. }, None) => anyhow::bail!(
            "Document scanning needs --extractor-cmd or PHISH_SCAN_EXTRACTOR_CMD"
        ),
        _ => None,
    };

    match run(&context, command, extractor.as_ref()) {
        Ok(outcome) => {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            Ok(())
        }
        Err(e) => {
            let category = e.category();
            error!("{}: {}", category, e);
            println!("{}", serde_json::to_string_pretty(&e.to_payload())?);
            process::exit(category.exit_code());
        }
    }
}

fn run(
    context: &ScanContext,
    command: &ScanCommand,
    extractor: Option<&CommandTextExtractor>,
) -> Result<ScanOutcome, ScanError> {
    match command {
        ScanCommand::Url { url } => context.scan_url(url).map(ScanOutcome::from),
        ScanCommand::Link { url } => context.scan_link(url).map(ScanOutcome::from),
        ScanCommand::Qr { image } => {
            let bytes = read_input(image)?;
            context.scan_qr(&file_name(image), &bytes)
        }
        ScanCommand::Email {
            domain,
            body,
            body_file,
        } => {
            let body = match (body, body_file) {
                (Some(body), _) => body.clone(),
                (None, Some(path)) => String::from_utf8_lossy(&read_input(path)?).into_owned(),
                (None, None) => {
                    let mut body = String::new();
                    std::io::stdin()
                        .read_to_string(&mut body)
                        .map_err(|e| ScanError::InvalidInput(format!("Cannot read stdin: {e}")))?;
                    body
                }
            };
            context.scan_email(&body, domain).map(ScanOutcome::from)
        }
        ScanCommand::Doc { file } => {
            let bytes = read_input(file)?;
            let extractor = extractor.ok_or_else(|| {
                ScanError::Extraction("no document extractor configured".to_string())
            })?;
            context
                .scan_document(&file_name(file), &bytes, extractor)
                .map(ScanOutcome::from)
        }
    }
}

fn read_input(path: &Path) -> Result<Vec<u8>, ScanError> {
    std::fs::read(path)
        .map_err(|e| ScanError::InvalidInput(format!("Cannot read {}: {}", path.display(), e)))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
