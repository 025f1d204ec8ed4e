use clap::Parser;
use std::path::PathBuf;

/// Parse an order export and print what an import would see. Nothing is
/// written to the database.
#[derive(Parser, Debug)]
#[command(name = "frplus-import", version)]
pub struct Cli {
    /// CSV file to inspect
    pub file: PathBuf,

    /// Field delimiter
    #[arg(short, long, env = "IMPORT_DELIMITER", default_value_t = ',')]
    pub delimiter: char,

    /// Print at most this many valid rows
    #[arg(short, long)]
    pub limit: Option<usize>,
}
