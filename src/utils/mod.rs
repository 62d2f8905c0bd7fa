//! Formatting utilities for display of monetary amounts and quantities
//!
//! Pure functions over canonical currency codes; no formatting decision
//! feeds back into classification or submission.

use rust_decimal::Decimal;

/// Format an amount for a canonical currency code: symbol-prefixed for
/// known fiat codes, code-suffixed otherwise ("฿1,234.56", "$180.00",
/// "1,234.56 USDT").
pub fn format_amount(value: Decimal, currency: &str) -> String {
    let number = group_thousands(value, 2);
    match currency.to_uppercase().as_str() {
        "THB" => format!("฿{number}"),
        "USD" => format!("${number}"),
        "EUR" => format!("€{number}"),
        code => format!("{number} {code}"),
    }
}

/// Format a quantity, trimming trailing fraction zeros ("0.50000000" ->
/// "0.5", "100.000" -> "100")
pub fn format_quantity(value: Decimal) -> String {
    value.normalize().to_string()
}

/// Render with comma thousands separators and a fixed number of decimal
/// places
fn group_thousands(value: Decimal, places: u32) -> String {
    let is_negative = value < Decimal::ZERO;
    let rounded = value.abs().round_dp(places);
    let text = format!("{:.1$}", rounded, places as usize);
    let (integer_part, decimal_part) = match text.split_once('.') {
        Some((i, d)) => (i, Some(d)),
        None => (text.as_str(), None),
    };

    let grouped: String = integer_part
        .chars()
        .rev()
        .enumerate()
        .flat_map(|(i, c)| {
            if i > 0 && i % 3 == 0 {
                vec![',', c]
            } else {
                vec![c]
            }
        })
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();

    let sign = if is_negative { "-" } else { "" };
    match decimal_part {
        Some(d) => format!("{sign}{grouped}.{d}"),
        None => format!("{sign}{grouped}"),
    }
}
