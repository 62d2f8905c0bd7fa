//! CSV row parser
//!
//! Reads a header-first delimited file into raw import rows in source
//! order. Structural failure aborts the whole parse: once the reader
//! reports a malformed record no partial row data can be trusted.

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use super::RawImportRow;
use crate::error::ImportError;

/// Parse a CSV trade file into raw rows
pub fn parse_csv<P: AsRef<Path>>(file_path: P) -> Result<Vec<RawImportRow>> {
    let path = file_path.as_ref();
    info!("Parsing CSV trade file: {:?}", path);
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open CSV file {:?}", path))?;
    parse_csv_reader(file)
}

/// Parse CSV content from any reader (used directly by tests)
pub fn parse_csv_reader<R: Read>(input: R) -> Result<Vec<RawImportRow>> {
    let mut reader = ReaderBuilder::new()
        .flexible(true) // tolerate ragged rows; missing cells become missing fields
        .from_reader(input);

    let headers = reader
        .headers()
        .context("Failed to read CSV header row")?
        .clone();
    debug!("CSV headers: {:?}", headers);

    let header_names: Vec<String> = headers.iter().map(|h| h.trim().to_string()).collect();

    let mut rows = Vec::new();
    let mut row_number = 0usize;

    for record in reader.records() {
        // structural failure aborts: no partial row data can be trusted
        let record = record.map_err(|e| ImportError::Parse(e.to_string()))?;

        // Empty rows are skipped and do not consume a row number
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        row_number += 1;
        let mut row = RawImportRow::new(row_number);
        for (idx, cell) in record.iter().enumerate() {
            if let Some(header) = header_names.get(idx) {
                row.set_field(header, cell);
            }
        }
        rows.push(row);
    }

    info!("Parsed {} rows from CSV", rows.len());
    Ok(rows)
}
