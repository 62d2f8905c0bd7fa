//! Excel row parser
//!
//! Reads the first worksheet of an XLSX export into raw import rows using
//! the same header contract as the CSV parser. An unreadable workbook
//! aborts the whole parse.

use anyhow::{anyhow, Context, Result};
use calamine::{open_workbook, Data, DataType, Reader, Xlsx};
use std::path::Path;
use tracing::{debug, info};

use super::RawImportRow;

/// Parse an Excel trade file into raw rows
pub fn parse_excel<P: AsRef<Path>>(file_path: P) -> Result<Vec<RawImportRow>> {
    let path = file_path.as_ref();
    info!("Parsing Excel trade file: {:?}", path);

    let mut workbook: Xlsx<_> = open_workbook(path).context("Failed to open Excel file")?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| anyhow!("Workbook has no sheets"))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .context("Failed to read worksheet")?;

    let mut rows_iter = range.rows();
    let header = rows_iter
        .next()
        .ok_or_else(|| anyhow!("Worksheet is empty, expected a header row"))?;
    let header_names: Vec<String> = header
        .iter()
        .map(|cell| cell.to_string().trim().to_string())
        .collect();
    debug!("Excel headers: {:?}", header_names);

    let mut rows = Vec::new();
    let mut row_number = 0usize;

    for sheet_row in rows_iter {
        if sheet_row.iter().all(cell_is_blank) {
            continue;
        }

        row_number += 1;
        let mut row = RawImportRow::new(row_number);
        for (idx, cell) in sheet_row.iter().enumerate() {
            if let (Some(header), Some(text)) = (header_names.get(idx), cell_text(cell)) {
                row.set_field(header, &text);
            }
        }
        rows.push(row);
    }

    info!("Parsed {} rows from Excel", rows.len());
    Ok(rows)
}

fn cell_is_blank(cell: &Data) -> bool {
    cell.is_empty() || cell.to_string().trim().is_empty()
}

/// Cell content as the text the validator/classifier will see
fn cell_text(cell: &Data) -> Option<String> {
    if cell.is_empty() {
        return None;
    }
    let text = cell.to_string();
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_text_skips_empty_cells() {
        assert_eq!(cell_text(&Data::Empty), None);
        assert_eq!(cell_text(&Data::String("  ".to_string())), None);
        assert_eq!(
            cell_text(&Data::String("BTC".to_string())),
            Some("BTC".to_string())
        );
    }

    #[test]
    fn test_numeric_cells_render_as_plain_numbers() {
        assert_eq!(cell_text(&Data::Float(50000.0)), Some("50000".to_string()));
        assert_eq!(cell_text(&Data::Float(0.5)), Some("0.5".to_string()));
        assert_eq!(cell_text(&Data::Int(100)), Some("100".to_string()));
    }
}
