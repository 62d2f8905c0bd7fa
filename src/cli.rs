//! Command-line interface definitions

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tradeport")]
#[command(
    version,
    about = "Multi-market trade spreadsheet importer for a portfolio backend"
)]
#[command(
    long_about = "Import trades from CSV/Excel spreadsheets: rows are validated, \
classified (asset type, venue, settlement currency) and normalized, then the \
selected valid rows are submitted to the portfolio backend in one batch."
)]
pub struct Cli {
    /// Disable colorized/ANSI output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Import trades from a CSV or Excel file
    Import {
        /// Path to the CSV or Excel file
        file: String,

        /// Preview only, don't submit to the backend
        #[arg(short, long)]
        dry_run: bool,

        /// Row numbers to exclude from the batch (comma separated)
        #[arg(long, value_delimiter = ',')]
        exclude: Vec<usize>,

        /// Don't attach the import note to submitted trades
        #[arg(long)]
        no_note: bool,
    },
}
