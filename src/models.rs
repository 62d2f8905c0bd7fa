//! Canonical transaction types shared across the pipeline

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Asset classification resolved by the classifier cascade
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
    Stock,
    #[serde(rename = "tfex-future")]
    TfexFuture,
    Crypto,
    ForeignStock,
    Gold,
    Commodity,
}

impl AssetType {
    /// Gold and physical commodities carry a weight unit; everything else
    /// is counted in shares/contracts/coins.
    pub fn is_unit_bearing(&self) -> bool {
        matches!(self, AssetType::Gold | AssetType::Commodity)
    }
}

impl std::fmt::Display for AssetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetType::Stock => write!(f, "stock"),
            AssetType::TfexFuture => write!(f, "tfex-future"),
            AssetType::Crypto => write!(f, "crypto"),
            AssetType::ForeignStock => write!(f, "foreign_stock"),
            AssetType::Gold => write!(f, "gold"),
            AssetType::Commodity => write!(f, "commodity"),
        }
    }
}

/// Normalized trade action.
///
/// `b`/`buy` and `s`/`sell` collapse to the canonical verbs; every other
/// token is carried through lower-cased so new store-side vocabulary
/// (long/short/close_long/close_short, or whatever comes next) does not
/// require a client release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TradeAction {
    Buy,
    Sell,
    Long,
    Short,
    CloseLong,
    CloseShort,
    Other(String),
}

impl TradeAction {
    /// Case-insensitive normalization of the raw action text
    pub fn parse(input: &str) -> Self {
        match input.trim().to_lowercase().as_str() {
            "b" | "buy" => TradeAction::Buy,
            "s" | "sell" => TradeAction::Sell,
            "long" => TradeAction::Long,
            "short" => TradeAction::Short,
            "close_long" => TradeAction::CloseLong,
            "close_short" => TradeAction::CloseShort,
            other => TradeAction::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TradeAction::Buy => "buy",
            TradeAction::Sell => "sell",
            TradeAction::Long => "long",
            TradeAction::Short => "short",
            TradeAction::CloseLong => "close_long",
            TradeAction::CloseShort => "close_short",
            TradeAction::Other(s) => s,
        }
    }
}

impl std::fmt::Display for TradeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for TradeAction {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Canonical transaction derived from one raw import row.
///
/// Produced once by the classifier; the orchestrator only ever touches the
/// note field at submission time.
#[derive(Debug, Clone)]
pub struct TransactionDraft {
    /// None when the source date text did not parse; the submission-time
    /// timestamp is substituted instead of rejecting the row.
    pub timestamp: Option<DateTime<Utc>>,
    pub action: TradeAction,
    pub symbol: String,
    pub asset_type: AssetType,
    pub venue: Option<String>,
    pub currency: String,
    pub quantity: Decimal,
    pub price: Decimal,
    pub fees: Decimal,
    /// Canonical unit the quantity is expressed in after normalization
    pub unit: String,
    pub leverage: Option<Decimal>,
    pub initial_margin: Option<Decimal>,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_synonyms() {
        assert_eq!(TradeAction::parse("b"), TradeAction::Buy);
        assert_eq!(TradeAction::parse("BUY"), TradeAction::Buy);
        assert_eq!(TradeAction::parse("s"), TradeAction::Sell);
        assert_eq!(TradeAction::parse("Sell"), TradeAction::Sell);
    }

    #[test]
    fn test_action_futures_vocabulary() {
        assert_eq!(TradeAction::parse("Long"), TradeAction::Long);
        assert_eq!(TradeAction::parse("close_short"), TradeAction::CloseShort);
    }

    #[test]
    fn test_unknown_action_passes_through_lowercased() {
        assert_eq!(
            TradeAction::parse("  Transfer_In "),
            TradeAction::Other("transfer_in".to_string())
        );
    }

    #[test]
    fn test_action_serializes_as_token() {
        let json = serde_json::to_string(&TradeAction::CloseLong).unwrap();
        assert_eq!(json, "\"close_long\"");
        let json = serde_json::to_string(&TradeAction::Other("airdrop".into())).unwrap();
        assert_eq!(json, "\"airdrop\"");
    }

    #[test]
    fn test_asset_type_wire_names() {
        assert_eq!(serde_json::to_string(&AssetType::TfexFuture).unwrap(), "\"tfex-future\"");
        assert_eq!(serde_json::to_string(&AssetType::ForeignStock).unwrap(), "\"foreign_stock\"");
        assert_eq!(AssetType::Gold.to_string(), "gold");
    }

    #[test]
    fn test_unit_bearing_types() {
        assert!(AssetType::Gold.is_unit_bearing());
        assert!(AssetType::Commodity.is_unit_bearing());
        assert!(!AssetType::Stock.is_unit_bearing());
        assert!(!AssetType::Crypto.is_unit_bearing());
    }
}
