//! Import module - spreadsheet row parsing and the preview pipeline
//!
//! Turns tabular input into raw rows, runs validation and classification
//! per row, and produces the preview the orchestrator works from. Each
//! stage is a pure function of its input plus the injected tables.

pub mod csv_source;
pub mod excel_source;
pub mod validation;

use anyhow::{anyhow, Result};
use std::path::Path;
use tracing::info;

use crate::classify::tables::ClassifierTables;
use crate::classify::Classifier;
use crate::error::ImportError;
use crate::models::TransactionDraft;
use validation::{validate_row, ValidationOutcome};

/// Expected column headers, matched case-sensitively against the header
/// row. The margin column has historical alternate spellings.
pub const EXPECTED_HEADERS: [&str; 10] = [
    "Date", "Action", "Symbol", "Market", "Quantity", "Price", "Fees", "Currency", "Leverage",
    "Initial Margin",
];

/// One parsed row: original field text keyed by expected column.
///
/// Immutable once parsed; `row_number` is 1-based, matches the source
/// position, and is the sole correlation key across the pipeline.
#[derive(Debug, Clone, Default)]
pub struct RawImportRow {
    pub row_number: usize,
    pub date: Option<String>,
    pub action: Option<String>,
    pub symbol: Option<String>,
    pub market: Option<String>,
    pub quantity: Option<String>,
    pub price: Option<String>,
    pub fees: Option<String>,
    pub currency: Option<String>,
    pub leverage: Option<String>,
    pub initial_margin: Option<String>,
}

impl RawImportRow {
    pub fn new(row_number: usize) -> Self {
        Self {
            row_number,
            ..Default::default()
        }
    }

    /// Store a cell under its header. Unexpected headers are ignored;
    /// blank cells stay missing.
    pub fn set_field(&mut self, header: &str, value: &str) {
        if value.trim().is_empty() {
            return;
        }
        let slot = match header {
            "Date" => &mut self.date,
            "Action" => &mut self.action,
            "Symbol" => &mut self.symbol,
            "Market" => &mut self.market,
            "Quantity" => &mut self.quantity,
            "Price" => &mut self.price,
            "Fees" => &mut self.fees,
            "Currency" => &mut self.currency,
            "Leverage" => &mut self.leverage,
            "Initial Margin" | "InitialMargin" | "initial_margin" => &mut self.initial_margin,
            _ => return,
        };
        *slot = Some(value.to_string());
    }

    /// True when no cell holds non-whitespace content
    pub fn is_empty(&self) -> bool {
        [
            &self.date,
            &self.action,
            &self.symbol,
            &self.market,
            &self.quantity,
            &self.price,
            &self.fees,
            &self.currency,
            &self.leverage,
            &self.initial_margin,
        ]
        .iter()
        .all(|f| f.is_none())
    }
}

/// One row of the import preview: the raw text, its validation outcome,
/// and the classified draft (present iff the row is valid)
#[derive(Debug, Clone)]
pub struct PreviewRow {
    pub raw: RawImportRow,
    pub outcome: ValidationOutcome,
    pub draft: Option<TransactionDraft>,
}

impl PreviewRow {
    pub fn is_valid(&self) -> bool {
        self.outcome.is_valid()
    }

    pub fn row_number(&self) -> usize {
        self.raw.row_number
    }
}

/// Load raw rows from a file, dispatching on extension
pub fn load_rows<P: AsRef<Path>>(path: P) -> Result<Vec<RawImportRow>> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .ok_or_else(|| anyhow!("File has no extension"))?
        .to_lowercase();

    info!("Importing trade file: {:?} (type: {})", path, extension);

    match extension.as_str() {
        "csv" | "txt" => csv_source::parse_csv(path),
        "xlsx" | "xls" => excel_source::parse_excel(path),
        _ => Err(ImportError::UnsupportedFormat(extension).into()),
    }
}

/// Run validation and classification over every raw row, in order
pub fn build_preview(rows: Vec<RawImportRow>, tables: &ClassifierTables) -> Vec<PreviewRow> {
    let classifier = Classifier::new(tables);
    let preview: Vec<PreviewRow> = rows
        .into_iter()
        .map(|raw| {
            let outcome = validate_row(&raw);
            let draft = if outcome.is_valid() {
                classifier.classify(&raw)
            } else {
                None
            };
            PreviewRow { raw, outcome, draft }
        })
        .collect();

    let valid = preview.iter().filter(|r| r.is_valid()).count();
    info!("Classified {} rows ({} valid)", preview.len(), valid);
    preview
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::tables::ClassifierTables;

    #[test]
    fn test_unexpected_headers_are_ignored() {
        let mut row = RawImportRow::new(1);
        row.set_field("Broker Reference", "xyz");
        assert!(row.is_empty());
    }

    #[test]
    fn test_header_matching_is_case_sensitive() {
        let mut row = RawImportRow::new(1);
        row.set_field("date", "2025-01-01");
        assert!(row.date.is_none());
        row.set_field("Date", "2025-01-01");
        assert_eq!(row.date.as_deref(), Some("2025-01-01"));
    }

    #[test]
    fn test_margin_header_alternates() {
        for spelling in ["Initial Margin", "InitialMargin", "initial_margin"] {
            let mut row = RawImportRow::new(1);
            row.set_field(spelling, "2500");
            assert_eq!(row.initial_margin.as_deref(), Some("2500"));
        }
    }

    #[test]
    fn test_blank_cells_stay_missing() {
        let mut row = RawImportRow::new(1);
        row.set_field("Symbol", "   ");
        assert!(row.symbol.is_none());
    }

    #[test]
    fn test_preview_draft_present_iff_valid() {
        let mut good = RawImportRow::new(1);
        for (h, v) in [
            ("Date", "2025-01-01"),
            ("Action", "buy"),
            ("Symbol", "btc"),
            ("Quantity", "0.5"),
            ("Price", "50000"),
        ] {
            good.set_field(h, v);
        }
        let mut bad = RawImportRow::new(2);
        bad.set_field("Symbol", "ETH");

        let tables = ClassifierTables::default();
        let preview = build_preview(vec![good, bad], &tables);
        assert!(preview[0].is_valid());
        assert!(preview[0].draft.is_some());
        assert_eq!(preview[0].draft.as_ref().unwrap().symbol, "BTC");
        assert!(!preview[1].is_valid());
        assert!(preview[1].draft.is_none());
    }
}
