//! Bulk import orchestrator
//!
//! Maintains the user-adjustable selection over the classified preview,
//! builds the submittable batch (valid rows intersected with the
//! selection), and drives the single outbound submission call. Exactly
//! one submission can be in flight; re-submission and file replacement
//! are refused until it resolves.

pub mod client;

use chrono::Utc;
use std::collections::BTreeSet;
use tracing::info;

use crate::error::ImportError;
use crate::import::PreviewRow;
use client::{CreateTransactionRequest, StoreClient, SubmitOutcome};

/// Fixed note attached to submitted drafts when the import-note flag is on
pub const IMPORT_NOTE: &str = "Imported from spreadsheet";

/// How many store errors are shown verbatim before truncation
const MAX_DISPLAYED_ERRORS: usize = 5;

/// One import session: the classified preview plus selection state
#[derive(Debug, Default)]
pub struct ImportSession {
    rows: Vec<PreviewRow>,
    selection: BTreeSet<usize>,
    in_flight: bool,
}

impl ImportSession {
    /// Start a session; the default selection is every valid row
    pub fn new(rows: Vec<PreviewRow>) -> Self {
        let selection = rows
            .iter()
            .filter(|r| r.is_valid())
            .map(|r| r.row_number())
            .collect();
        Self {
            rows,
            selection,
            in_flight: false,
        }
    }

    pub fn rows(&self) -> &[PreviewRow] {
        &self.rows
    }

    pub fn is_selected(&self, row_number: usize) -> bool {
        self.selection.contains(&row_number)
    }

    pub fn selected_count(&self) -> usize {
        self.selection.len()
    }

    /// Toggle a row's inclusion. Invalid rows cannot be selected, so
    /// toggling them is a no-op; returns whether anything changed.
    pub fn toggle(&mut self, row_number: usize) -> bool {
        let valid = self
            .rows
            .iter()
            .any(|r| r.row_number() == row_number && r.is_valid());
        if !valid {
            return false;
        }
        if !self.selection.remove(&row_number) {
            self.selection.insert(row_number);
        }
        true
    }

    pub fn deselect(&mut self, row_number: usize) {
        self.selection.remove(&row_number);
    }

    /// Replace the preview with rows from a new file. Selection state does
    /// not survive a re-parse; refused while a submission is pending.
    pub fn replace_rows(&mut self, rows: Vec<PreviewRow>) -> Result<(), ImportError> {
        if self.in_flight {
            return Err(ImportError::SubmissionInFlight);
        }
        *self = Self::new(rows);
        Ok(())
    }

    /// Build the submittable batch: drafts whose row is both valid and
    /// selected, in row order, with the note set or cleared per the flag.
    pub fn batch(&self, attach_note: bool) -> Vec<CreateTransactionRequest> {
        self.rows
            .iter()
            .filter(|r| r.is_valid() && self.selection.contains(&r.row_number()))
            .filter_map(|r| r.draft.as_ref())
            .map(|draft| CreateTransactionRequest {
                // Unparseable dates fall back to the submission-time instant
                timestamp: draft.timestamp.unwrap_or_else(Utc::now),
                action: draft.action.clone(),
                symbol: draft.symbol.clone(),
                asset_type: draft.asset_type,
                quantity: draft.quantity,
                price: draft.price,
                fees: draft.fees,
                market: draft.venue.clone(),
                currency: Some(draft.currency.clone()),
                leverage: draft.leverage,
                initial_margin: draft.initial_margin,
                notes: attach_note.then(|| IMPORT_NOTE.to_string()),
            })
            .collect()
    }

    /// Submit the selected rows as one batch. The preview and selection
    /// stay untouched whatever the store answers; no automatic retry.
    pub async fn submit(
        &mut self,
        store: &StoreClient,
        attach_note: bool,
    ) -> Result<SubmitOutcome, ImportError> {
        if self.in_flight {
            return Err(ImportError::SubmissionInFlight);
        }
        let batch = self.batch(attach_note);
        info!("Submitting batch of {} transactions", batch.len());

        self.in_flight = true;
        let outcome = store.submit_batch(&batch).await;
        self.in_flight = false;
        Ok(outcome)
    }
}

/// Store/transport errors formatted for display: the first five verbatim,
/// then a `+N more` indicator.
pub fn display_errors(errors: &[String]) -> Vec<String> {
    let mut lines: Vec<String> = errors.iter().take(MAX_DISPLAYED_ERRORS).cloned().collect();
    if errors.len() > MAX_DISPLAYED_ERRORS {
        lines.push(format!("+{} more", errors.len() - MAX_DISPLAYED_ERRORS));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::tables::ClassifierTables;
    use crate::import::{build_preview, RawImportRow};
    use rust_decimal_macros::dec;

    fn raw(row_number: usize, fields: &[(&str, &str)]) -> RawImportRow {
        let mut row = RawImportRow::new(row_number);
        for (header, value) in fields {
            row.set_field(header, value);
        }
        row
    }

    fn session() -> ImportSession {
        let tables = ClassifierTables::default();
        let rows = vec![
            raw(
                1,
                &[
                    ("Date", "2025-01-01"),
                    ("Action", "buy"),
                    ("Symbol", "BTC"),
                    ("Market", "binance"),
                    ("Quantity", "0.5"),
                    ("Price", "50000"),
                    ("Fees", "10"),
                ],
            ),
            // invalid: missing price
            raw(
                2,
                &[
                    ("Date", "2025-01-02"),
                    ("Action", "sell"),
                    ("Symbol", "PTT"),
                    ("Quantity", "100"),
                ],
            ),
            raw(
                3,
                &[
                    ("Date", "2025-01-03"),
                    ("Action", "buy"),
                    ("Symbol", "AAPL"),
                    ("Market", "nasdaq"),
                    ("Quantity", "10"),
                    ("Price", "180"),
                ],
            ),
        ];
        ImportSession::new(build_preview(rows, &tables))
    }

    #[test]
    fn test_default_selection_is_all_valid_rows() {
        let s = session();
        assert!(s.is_selected(1));
        assert!(!s.is_selected(2));
        assert!(s.is_selected(3));
        assert_eq!(s.selected_count(), 2);
    }

    #[test]
    fn test_toggling_invalid_row_is_a_no_op() {
        let mut s = session();
        assert!(!s.toggle(2));
        assert!(!s.is_selected(2));
        assert_eq!(s.batch(false).len(), 2);
    }

    #[test]
    fn test_batch_is_subset_of_valid_rows() {
        let mut s = session();
        assert!(s.toggle(3));
        let batch = s.batch(false);
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].symbol, "BTC");
        assert_eq!(batch[0].quantity, dec!(0.5));
        assert_eq!(batch[0].fees, dec!(10));
        assert_eq!(batch[0].currency.as_deref(), Some("USDT"));
    }

    #[test]
    fn test_note_flag_sets_or_clears_notes() {
        let s = session();
        for req in s.batch(true) {
            assert_eq!(req.notes.as_deref(), Some(IMPORT_NOTE));
        }
        for req in s.batch(false) {
            assert!(req.notes.is_none());
        }
    }

    #[test]
    fn test_replace_rows_resets_selection() {
        let mut s = session();
        s.deselect(1);
        let tables = ClassifierTables::default();
        let rows = vec![raw(
            1,
            &[
                ("Date", "2025-02-01"),
                ("Action", "buy"),
                ("Symbol", "ETH"),
                ("Quantity", "1"),
                ("Price", "3000"),
            ],
        )];
        s.replace_rows(build_preview(rows, &tables)).unwrap();
        assert!(s.is_selected(1));
        assert_eq!(s.rows().len(), 1);
    }

    #[test]
    fn test_error_display_truncates_after_five() {
        let errors: Vec<String> = (1..=8).map(|i| format!("error {i}")).collect();
        let lines = display_errors(&errors);
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[4], "error 5");
        assert_eq!(lines[5], "+3 more");

        let few = vec!["one".to_string()];
        assert_eq!(display_errors(&few), few);
    }
}
