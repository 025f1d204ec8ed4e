mod cli;
mod report;
mod rows;

use clap::Parser;
use cli::Cli;
use rows::ImportError;
use std::fs::File;
use std::io::{self, Write};
use std::process::ExitCode;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
enum RunError {
    #[error("cannot open {path}: {source}")]
    Open { path: String, source: io::Error },

    #[error("delimiter must be a single ASCII character, got '{0}'")]
    Delimiter(char),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error("failed to write report: {0}")]
    Output(#[from] io::Error),
}

fn run<W: Write>(cli: &Cli, out: &mut W) -> Result<report::Summary, RunError> {
    if !cli.delimiter.is_ascii() {
        return Err(RunError::Delimiter(cli.delimiter));
    }

    let file = File::open(&cli.file).map_err(|source| RunError::Open {
        path: cli.file.display().to_string(),
        source,
    })?;
    info!("📂 Reading {}", cli.file.display());

    let rows = rows::read_rows(file, cli.delimiter as u8)?;
    report::write_report(out, &rows, cli.limit)?;

    Ok(report::Summary::from_rows(&rows))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let stdout = io::stdout();

    match run(&cli, &mut stdout.lock()) {
        Ok(summary) => {
            info!("✅ Parsed {} rows ({} invalid)", summary.total, summary.invalid);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("❌ {}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
