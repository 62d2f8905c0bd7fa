//! Structural and numeric row validation
//!
//! Collects every issue a row has instead of failing on the first one, so
//! a row can report multiple simultaneous problems. Validation is
//! independent of classification; a row is valid iff its error list is
//! empty.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::RawImportRow;
use crate::error::Result;

/// Accumulated validation errors for one row
#[derive(Debug, Clone, Default)]
pub struct ValidationOutcome {
    errors: Vec<String>,
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    fn push(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }
}

/// Parse a decimal from user-entered text, tolerating thousands separators
/// and surrounding whitespace ("50,000.5" -> 50000.5)
pub fn parse_decimal(text: &str) -> Result<Decimal> {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| *c != ',' && *c != ' ')
        .collect();
    Decimal::from_str(&cleaned)
        .map_err(|e| anyhow::anyhow!("invalid number {:?}: {}", text, e))
}

/// Validate one row. Every applicable check runs even after an earlier
/// one fails; errors accumulate rather than short-circuit.
pub fn validate_row(row: &RawImportRow) -> ValidationOutcome {
    let mut outcome = ValidationOutcome::default();

    for (value, field) in [
        (&row.date, "Date"),
        (&row.action, "Action"),
        (&row.symbol, "Symbol"),
        (&row.quantity, "Quantity"),
        (&row.price, "Price"),
    ] {
        if value.as_deref().map_or(true, |v| v.trim().is_empty()) {
            outcome.push(format!("Missing {field}"));
        }
    }

    if let Some(text) = row.quantity.as_deref().filter(|t| !t.trim().is_empty()) {
        match parse_decimal(text) {
            Ok(q) if q > Decimal::ZERO => {}
            Ok(_) => outcome.push("Quantity must be greater than zero"),
            Err(_) => outcome.push("Quantity must be a number"),
        }
    }

    if let Some(text) = row.price.as_deref().filter(|t| !t.trim().is_empty()) {
        match parse_decimal(text) {
            Ok(p) if p > Decimal::ZERO => {}
            Ok(_) => outcome.push("Price must be greater than zero"),
            Err(_) => outcome.push("Price must be a number"),
        }
    }

    // Fees default to 0 when absent; when present they must parse and be >= 0
    if let Some(text) = row.fees.as_deref().filter(|t| !t.trim().is_empty()) {
        match parse_decimal(text) {
            Ok(f) if f >= Decimal::ZERO => {}
            Ok(_) => outcome.push("Fees cannot be negative"),
            Err(_) => outcome.push("Fees must be a number"),
        }
    }

    outcome
}
