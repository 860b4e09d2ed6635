//! # Lectern
//!
//! Command line and HTTP front for the course progress model.

use clap::{Parser, Subcommand};
use lectern::api::{self, ApiError, DEFAULT_HOST, DEFAULT_PORT, ServerConfig};
use lectern::cli::{
    CliError, cmd_certificate_format, cmd_certificate_generate, cmd_next, cmd_report,
};
use lectern_core::{CountingMode, SystemClock};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "lectern", version, about = "Course progress and certificate tooling")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Progress report for a course snapshot and a progress record
    Report {
        #[arg(long)]
        course: PathBuf,
        #[arg(long)]
        progress: PathBuf,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
        /// Count raw markers instead of distinct lectures
        #[arg(long)]
        raw_count: bool,
    },

    /// The next lecture to take
    Next {
        #[arg(long)]
        course: PathBuf,
        #[arg(long)]
        progress: PathBuf,
        #[arg(long)]
        json: bool,
    },

    /// Certificate identifier tools
    Certificate {
        #[command(subcommand)]
        action: CertificateAction,
    },

    /// Run the HTTP server
    Serve {
        #[arg(long, env = "LECTERN_HOST", default_value = DEFAULT_HOST)]
        host: String,
        #[arg(long, env = "LECTERN_PORT", default_value_t = DEFAULT_PORT)]
        port: u16,
    },
}

#[derive(Debug, Subcommand)]
enum CertificateAction {
    /// Generate a new identifier
    Generate {
        #[arg(long)]
        learner: String,
        #[arg(long)]
        course: String,
        /// Issue time in milliseconds since the Unix epoch (defaults to now)
        #[arg(long)]
        at: Option<u64>,
        #[arg(long)]
        json: bool,
    },

    /// Display form of a stored identifier
    Format { id: String },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Debug, thiserror::Error)]
enum RunError {
    #[error(transparent)]
    Cli(#[from] CliError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Run a command; `None` means nothing to print.
async fn run_command(command: Command) -> Result<Option<String>, RunError> {
    let output = match command {
        Command::Report {
            course,
            progress,
            json,
            raw_count,
        } => {
            let mode = if raw_count {
                CountingMode::Raw
            } else {
                CountingMode::Distinct
            };
            cmd_report(&course, &progress, json, mode)?
        }
        Command::Next {
            course,
            progress,
            json,
        } => cmd_next(&course, &progress, json)?,
        Command::Certificate { action } => match action {
            CertificateAction::Generate {
                learner,
                course,
                at,
                json,
            } => cmd_certificate_generate(&learner, &course, at, json, &SystemClock)?,
            CertificateAction::Format { id } => cmd_certificate_format(&id),
        },
        Command::Serve { host, port } => {
            api::serve(ServerConfig { host, port }).await?;
            return Ok(None);
        }
    };
    Ok(Some(output))
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let args = Cli::parse();

    match run_command(args.command).await {
        Ok(Some(output)) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Ok(None) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
