//! `casebook` — crash/PR knowledge base on top of a remote LLM.
//!
//! ```text
//! casebook [analyze|match] [--config casebook.toml] [--workdir DIR]
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use casebook_cli::config::{GeneralConfig, LogFormat};
use casebook_cli::{CasebookConfig, Mode, RunError, Workspace, analyze, matcher};
use casebook_llm::{HttpTransport, RetryPolicy, RetryingTransport};

#[derive(Parser, Debug)]
#[command(
    name = "casebook",
    about = "Turn crash reports and their fixing PRs into a searchable case base",
    version
)]
struct Cli {
    /// Workflow to run
    #[arg(value_enum, ignore_case = true, default_value_t = Mode::Analyze)]
    mode: Mode,

    /// Path to a casebook.toml (defaults are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding inputs and receiving outputs (defaults to the current directory)
    #[arg(short, long)]
    workdir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.config.as_deref() {
        Some(path) => match CasebookConfig::from_file(path) {
            Ok(config) => config,
            Err(err) => return fail(&err),
        },
        None => CasebookConfig::default(),
    };
    init_tracing(&config.general);

    match run(cli, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "casebook run failed");
            fail(&err)
        }
    }
}

async fn run(cli: Cli, config: &CasebookConfig) -> Result<(), RunError> {
    let api_key = config.api_key(|var| std::env::var(var).ok())?;

    let root = match cli.workdir {
        Some(dir) => dir,
        None => std::env::current_dir().map_err(|e| RunError::Config(e.to_string()))?,
    };
    let workspace = Workspace::new(root, config);

    let transport = RetryingTransport::new(
        HttpTransport::new(&config.llm, api_key)?,
        RetryPolicy::from(&config.llm.retry),
    );

    match cli.mode {
        Mode::Analyze => {
            let report = analyze::run(&transport, config, &workspace).await?;
            println!("=== CASE (FULL) ===");
            println!("{}", report.pretty_case()?);
            println!("\nSaved:");
            println!("- {}", report.saved.latest.display());
            println!("- {}", report.saved.archived.display());
            println!("- {}", report.saved.minimal.display());
        }
        Mode::Match => {
            let report = matcher::run(&transport, config, &workspace).await?;
            println!("=== SIMILAR CASES ===");
            println!("{}", report.chat);
            println!("\nSaved to: {}", report.saved.display());
        }
    }
    Ok(())
}

fn init_tracing(general: &GeneralConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&general.log_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    match general.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

fn fail(err: &RunError) -> ExitCode {
    eprintln!("ERROR: {err}");
    ExitCode::from(err.exit_code())
}
