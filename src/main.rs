use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};
use tracing::info;

use tradeport::classify::tables::DEFAULT_TABLES;
use tradeport::cli::{Cli, Commands};
use tradeport::config::Config;
use tradeport::import;
use tradeport::submit::client::{StoreClient, SubmitOutcome};
use tradeport::submit::{display_errors, ImportSession};
use tradeport::utils::{format_amount, format_quantity};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    if cli.no_color {
        colored::control::set_override(false);
    }

    match cli.command {
        Commands::Import {
            file,
            dry_run,
            exclude,
            no_note,
        } => handle_import(&file, dry_run, &exclude, !no_note).await,
    }
}

#[derive(Tabled)]
struct RowPreview {
    #[tabled(rename = "Row")]
    row: usize,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "Type")]
    asset_type: String,
    #[tabled(rename = "Currency")]
    currency: String,
    #[tabled(rename = "Quantity")]
    quantity: String,
    #[tabled(rename = "Price")]
    price: String,
}

async fn handle_import(
    file_path: &str,
    dry_run: bool,
    exclude: &[usize],
    attach_note: bool,
) -> Result<()> {
    info!("Importing trades from: {}", file_path);

    let rows = import::load_rows(file_path)?;
    let preview = import::build_preview(rows, &DEFAULT_TABLES);
    let mut session = ImportSession::new(preview);
    for row_number in exclude {
        session.deselect(*row_number);
    }

    let valid = session.rows().iter().filter(|r| r.is_valid()).count();
    let invalid = session.rows().len() - valid;
    println!(
        "\n{} Found {} rows ({} valid, {} invalid)\n",
        "✓".green().bold(),
        session.rows().len(),
        valid,
        invalid
    );

    let table_rows: Vec<RowPreview> = session
        .rows()
        .iter()
        .take(20)
        .map(|row| {
            let status = if !row.is_valid() {
                "invalid".red().to_string()
            } else if session.is_selected(row.row_number()) {
                "selected".green().to_string()
            } else {
                "skipped".yellow().to_string()
            };
            match &row.draft {
                Some(draft) => RowPreview {
                    row: row.row_number(),
                    status,
                    date: draft
                        .timestamp
                        .map(|t| t.format("%Y-%m-%d").to_string())
                        .unwrap_or_else(|| "(now)".to_string()),
                    action: draft.action.to_string(),
                    symbol: draft.symbol.clone(),
                    asset_type: draft.asset_type.to_string(),
                    currency: draft.currency.clone(),
                    quantity: format!("{} {}", format_quantity(draft.quantity), draft.unit),
                    price: format_amount(draft.price, &draft.currency),
                },
                None => RowPreview {
                    row: row.row_number(),
                    status,
                    date: row.raw.date.clone().unwrap_or_default(),
                    action: row.raw.action.clone().unwrap_or_default(),
                    symbol: row.raw.symbol.clone().unwrap_or_default(),
                    asset_type: String::new(),
                    currency: String::new(),
                    quantity: row.raw.quantity.clone().unwrap_or_default(),
                    price: row.raw.price.clone().unwrap_or_default(),
                },
            }
        })
        .collect();

    let table = Table::new(table_rows).with(Style::rounded()).to_string();
    println!("{}", table);
    if session.rows().len() > 20 {
        println!("\n... and {} more rows", session.rows().len() - 20);
    }

    for row in session.rows().iter().filter(|r| !r.is_valid()) {
        println!(
            "  {} row {}: {}",
            "✗".red(),
            row.row_number(),
            row.outcome.errors().join("; ")
        );
    }

    if dry_run {
        println!(
            "\n{} Dry run - nothing submitted ({} rows would be sent)",
            "ℹ".blue().bold(),
            session.selected_count()
        );
        return Ok(());
    }

    if session.selected_count() == 0 {
        println!("\n{} No valid rows selected, nothing to submit", "ℹ".blue().bold());
        return Ok(());
    }

    let config = Config::load()?;
    let store = StoreClient::new(&config);
    let outcome = session.submit(&store, attach_note).await?;

    match outcome {
        SubmitOutcome::Accepted { count, errors } => {
            println!("\n{} Import complete!", "✓".green().bold());
            println!("  Accepted: {}", count.to_string().green());
            if !errors.is_empty() {
                println!("  Store reported issues:");
                for line in display_errors(&errors) {
                    println!("    {}", line.yellow());
                }
            }
        }
        SubmitOutcome::Rejected { errors } => {
            println!("\n{} Store rejected the batch:", "✗".red().bold());
            for line in display_errors(&errors) {
                println!("  {}", line.red());
            }
        }
        SubmitOutcome::Transport { message } => {
            println!("\n{} {}", "✗".red().bold(), message.red());
        }
    }

    Ok(())
}
