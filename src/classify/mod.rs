//! Classifier - infers asset type, venue and settlement currency
//!
//! Resolves ambiguous, often-missing signals through fixed precedence
//! chains. The currency cascade is represented as an ordered slice of
//! named rules so the precedence order is data, not buried control flow,
//! and each rule is testable on its own.

pub mod tables;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use tracing::debug;

use crate::import::validation::parse_decimal;
use crate::import::RawImportRow;
use crate::models::{AssetType, TradeAction, TransactionDraft};
use crate::units::{self, UnitContext};
use tables::ClassifierTables;

/// Signals the currency cascade consumes.
///
/// `asset_type` is the venue-derived type (or one supplied explicitly by
/// the caller), never the symbol-refined one: a THB-denominated spot-gold
/// row must stay domestic, which rule 6 would otherwise override.
#[derive(Debug, Clone)]
pub struct CurrencySignals<'a> {
    pub explicit_currency: Option<&'a str>,
    pub venue: Option<&'a str>,
    pub asset_type: AssetType,
    pub symbol: &'a str,
}

type CurrencyRule = fn(&CurrencySignals, &ClassifierTables) -> Option<String>;

/// The settlement-currency precedence chain, evaluated top to bottom.
/// First applicable rule wins; rule 10 guarantees a terminal default.
pub const CURRENCY_RULES: &[(&str, CurrencyRule)] = &[
    ("explicit non-baseline currency", rule_explicit_non_baseline),
    ("global crypto venue", rule_global_crypto_venue),
    ("global fiat venue", rule_global_fiat_venue),
    ("domestic venue", rule_domestic_venue),
    ("crypto asset type", rule_crypto_asset),
    ("foreign stock or gold asset type", rule_foreign_or_gold_asset),
    ("crypto ticker", rule_crypto_ticker),
    ("usd-quoted metal/stable ticker", rule_metal_usd_ticker),
    ("explicit currency", rule_explicit_any),
    ("system default", rule_default),
];

fn explicit<'a>(signals: &CurrencySignals<'a>) -> Option<&'a str> {
    signals
        .explicit_currency
        .map(str::trim)
        .filter(|c| !c.is_empty())
}

// An explicit non-baseline currency is a strong, trusted signal. The
// baseline is also the implicit default, so its mere presence is not
// treated as deliberate and only wins as a late fallback (rule 9).
fn rule_explicit_non_baseline(signals: &CurrencySignals, tables: &ClassifierTables) -> Option<String> {
    explicit(signals)
        .filter(|c| !c.eq_ignore_ascii_case(tables.baseline_currency()))
        .map(str::to_uppercase)
}

fn rule_global_crypto_venue(signals: &CurrencySignals, tables: &ClassifierTables) -> Option<String> {
    signals
        .venue
        .filter(|v| tables.is_global_crypto_venue(v))
        .map(|_| tables.currencies.stable_coin.clone())
}

fn rule_global_fiat_venue(signals: &CurrencySignals, tables: &ClassifierTables) -> Option<String> {
    signals
        .venue
        .filter(|v| tables.is_global_fiat_venue(v))
        .map(|_| tables.currencies.global_fiat.clone())
}

fn rule_domestic_venue(signals: &CurrencySignals, tables: &ClassifierTables) -> Option<String> {
    signals
        .venue
        .filter(|v| tables.is_domestic_venue(v))
        .map(|_| tables.currencies.domestic_fiat.clone())
}

fn rule_crypto_asset(signals: &CurrencySignals, tables: &ClassifierTables) -> Option<String> {
    (signals.asset_type == AssetType::Crypto).then(|| tables.currencies.stable_coin.clone())
}

fn rule_foreign_or_gold_asset(signals: &CurrencySignals, tables: &ClassifierTables) -> Option<String> {
    matches!(signals.asset_type, AssetType::ForeignStock | AssetType::Gold)
        .then(|| tables.currencies.global_fiat.clone())
}

fn rule_crypto_ticker(signals: &CurrencySignals, tables: &ClassifierTables) -> Option<String> {
    tables
        .is_crypto_ticker(signals.symbol)
        .then(|| tables.currencies.stable_coin.clone())
}

fn rule_metal_usd_ticker(signals: &CurrencySignals, tables: &ClassifierTables) -> Option<String> {
    tables
        .is_metal_usd_ticker(signals.symbol)
        .then(|| tables.currencies.global_fiat.clone())
}

fn rule_explicit_any(signals: &CurrencySignals, _tables: &ClassifierTables) -> Option<String> {
    explicit(signals).map(str::to_uppercase)
}

fn rule_default(_signals: &CurrencySignals, tables: &ClassifierTables) -> Option<String> {
    Some(tables.baseline_currency().to_string())
}

/// Infer the settlement currency; pure function of its signals.
pub fn infer_currency(signals: &CurrencySignals, tables: &ClassifierTables) -> String {
    for (name, rule) in CURRENCY_RULES {
        if let Some(currency) = rule(signals, tables) {
            debug!("currency for {} resolved to {} by rule '{}'", signals.symbol, currency, name);
            return currency;
        }
    }
    // rule 10 always matches
    tables.baseline_currency().to_string()
}

/// Asset-type precedence: crypto venue/ticker, derivatives venue, foreign
/// equity venue, then the domestic stock default.
pub fn infer_asset_type(venue: Option<&str>, symbol: &str, tables: &ClassifierTables) -> AssetType {
    let venue_is = |pred: fn(&ClassifierTables, &str) -> bool| venue.is_some_and(|v| pred(tables, v));

    if venue_is(ClassifierTables::is_crypto_venue) || tables.is_crypto_ticker(symbol) {
        AssetType::Crypto
    } else if venue_is(ClassifierTables::is_derivatives_venue) {
        AssetType::TfexFuture
    } else if venue_is(ClassifierTables::is_foreign_equity_venue) {
        AssetType::ForeignStock
    } else {
        AssetType::Stock
    }
}

/// Metal-symbol refinement, applied after currency inference
pub fn refine_asset_type(base: AssetType, symbol: &str, tables: &ClassifierTables) -> AssetType {
    if base != AssetType::Stock {
        return base;
    }
    if tables.is_gold_symbol(symbol) {
        AssetType::Gold
    } else if tables.is_commodity_symbol(symbol) {
        AssetType::Commodity
    } else {
        base
    }
}

/// Lenient multi-format date parsing; `None` means the submission-time
/// timestamp gets substituted later.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(Utc.from_utc_datetime(&dt));
        }
    }
    for fmt in ["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d", "%d-%m-%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(text, fmt) {
            return Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?));
        }
    }
    None
}

/// Classifier over an injected table set
pub struct Classifier<'t> {
    tables: &'t ClassifierTables,
}

impl<'t> Classifier<'t> {
    pub fn new(tables: &'t ClassifierTables) -> Self {
        Self { tables }
    }

    /// Derive the canonical draft from a raw row.
    ///
    /// Returns `None` when a required field is missing or numerically
    /// malformed; the validator reports those rows, so for valid rows
    /// this always produces a draft.
    pub fn classify(&self, row: &RawImportRow) -> Option<TransactionDraft> {
        let symbol = row.symbol.as_deref()?.trim().to_uppercase();
        if symbol.is_empty() {
            return None;
        }
        let action = TradeAction::parse(row.action.as_deref()?);
        let quantity = parse_decimal(row.quantity.as_deref()?).ok()?;
        let price = parse_decimal(row.price.as_deref()?).ok()?;
        if quantity <= Decimal::ZERO || price <= Decimal::ZERO {
            return None;
        }
        let fees = row
            .fees
            .as_deref()
            .and_then(|t| parse_decimal(t).ok())
            .unwrap_or(Decimal::ZERO);

        let venue = row
            .market
            .as_deref()
            .map(|m| m.trim().to_lowercase())
            .filter(|m| !m.is_empty());

        let base_type = infer_asset_type(venue.as_deref(), &symbol, self.tables);
        let currency = infer_currency(
            &CurrencySignals {
                explicit_currency: row.currency.as_deref(),
                venue: venue.as_deref(),
                asset_type: base_type,
                symbol: &symbol,
            },
            self.tables,
        );
        let asset_type = refine_asset_type(base_type, &symbol, self.tables);

        // No unit column in the tabular input: quantities arrive in the
        // context's base unit, so the factor is 1 and only the canonical
        // unit name is attached.
        let ctx = UnitContext::for_currency(&currency, &self.tables.currencies.domestic_fiat);
        let (quantity, price, unit) = units::normalize(quantity, price, None, asset_type, ctx);

        Some(TransactionDraft {
            timestamp: row.date.as_deref().and_then(parse_timestamp),
            action,
            symbol,
            asset_type,
            venue,
            currency,
            quantity,
            price,
            fees,
            unit,
            leverage: row.leverage.as_deref().and_then(|t| parse_decimal(t).ok()),
            initial_margin: row
                .initial_margin
                .as_deref()
                .and_then(|t| parse_decimal(t).ok()),
            notes: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables() -> ClassifierTables {
        ClassifierTables::default()
    }

    fn signals<'a>(
        currency: Option<&'a str>,
        venue: Option<&'a str>,
        asset_type: AssetType,
        symbol: &'a str,
    ) -> CurrencySignals<'a> {
        CurrencySignals {
            explicit_currency: currency,
            venue,
            asset_type,
            symbol,
        }
    }

    #[test]
    fn test_explicit_non_baseline_currency_wins_over_venue() {
        let t = tables();
        let s = signals(Some("eur"), Some("binance"), AssetType::Crypto, "BTC");
        assert_eq!(infer_currency(&s, &t), "EUR");
    }

    #[test]
    fn test_crypto_venue_resolves_stable_coin() {
        let t = tables();
        let s = signals(Some(""), Some("binance"), AssetType::Crypto, "BTC");
        assert_eq!(infer_currency(&s, &t), "USDT");
    }

    #[test]
    fn test_explicit_currency_without_other_signals() {
        let t = tables();
        let s = signals(Some("EUR"), None, AssetType::Stock, "AAPL");
        assert_eq!(infer_currency(&s, &t), "EUR");
    }

    #[test]
    fn test_baseline_currency_not_trusted_over_crypto_heuristic() {
        let t = tables();
        let s = signals(Some("THB"), None, AssetType::Crypto, "BTC");
        assert_eq!(infer_currency(&s, &t), "USDT");
    }

    #[test]
    fn test_baseline_currency_honored_as_late_fallback() {
        let t = tables();
        let s = signals(Some("THB"), None, AssetType::Stock, "XAU");
        assert_eq!(infer_currency(&s, &t), "THB");
    }

    #[test]
    fn test_domestic_venue_is_terminal() {
        let t = tables();
        // Bitkub is a crypto exchange, but a domestic one: THB, not USDT
        let s = signals(None, Some("bitkub"), AssetType::Crypto, "BTC");
        assert_eq!(infer_currency(&s, &t), "THB");
    }

    #[test]
    fn test_foreign_stock_defaults_to_global_fiat() {
        let t = tables();
        let s = signals(None, None, AssetType::ForeignStock, "AAPL");
        assert_eq!(infer_currency(&s, &t), "USD");
    }

    #[test]
    fn test_tokenized_gold_quotes_in_usd() {
        let t = tables();
        let s = signals(None, None, AssetType::Stock, "PAXG");
        assert_eq!(infer_currency(&s, &t), "USD");
    }

    #[test]
    fn test_no_signals_falls_back_to_default() {
        let t = tables();
        let s = signals(None, None, AssetType::Stock, "PTT");
        assert_eq!(infer_currency(&s, &t), "THB");
    }

    #[test]
    fn test_asset_type_from_venue() {
        let t = tables();
        assert_eq!(infer_asset_type(Some("binance"), "FOO", &t), AssetType::Crypto);
        assert_eq!(infer_asset_type(Some("tfex"), "S50Z25", &t), AssetType::TfexFuture);
        assert_eq!(infer_asset_type(Some("nasdaq"), "AAPL", &t), AssetType::ForeignStock);
        assert_eq!(infer_asset_type(Some("set"), "PTT", &t), AssetType::Stock);
        assert_eq!(infer_asset_type(None, "PTT", &t), AssetType::Stock);
    }

    #[test]
    fn test_asset_type_from_crypto_ticker_without_venue() {
        let t = tables();
        assert_eq!(infer_asset_type(None, "BTC", &t), AssetType::Crypto);
    }

    #[test]
    fn test_metal_symbol_refinement() {
        let t = tables();
        assert_eq!(refine_asset_type(AssetType::Stock, "XAU", &t), AssetType::Gold);
        assert_eq!(refine_asset_type(AssetType::Stock, "XAG", &t), AssetType::Commodity);
        assert_eq!(refine_asset_type(AssetType::Stock, "PTT", &t), AssetType::Stock);
        // Venue-derived types are never overridden by the symbol
        assert_eq!(refine_asset_type(AssetType::Crypto, "XAU", &t), AssetType::Crypto);
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert!(parse_timestamp("2025-01-01").is_some());
        assert!(parse_timestamp("2025-01-01T10:30:00Z").is_some());
        assert!(parse_timestamp("15/03/2025").is_some());
        assert!(parse_timestamp("not a date").is_none());
    }
}
