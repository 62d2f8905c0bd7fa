//! Static classification tables
//!
//! Venue and ticker lookup tables used by the classifier and the unit
//! engine. Built once and injected, so tests can substitute their own
//! tables instead of poking at ambient state.

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Global singleton table set used by the CLI path.
pub static DEFAULT_TABLES: Lazy<ClassifierTables> = Lazy::new(ClassifierTables::default);

/// Baseline currency codes for the three settlement contexts
#[derive(Debug, Clone)]
pub struct CurrencyCodes {
    /// Domestic fiat, also the system-wide default ("baseline") currency
    pub domestic_fiat: String,
    /// Fiat code global venues settle in
    pub global_fiat: String,
    /// Stable-coin ticker global crypto venues settle in
    pub stable_coin: String,
}

impl Default for CurrencyCodes {
    fn default() -> Self {
        Self {
            domestic_fiat: "THB".to_string(),
            global_fiat: "USD".to_string(),
            stable_coin: "USDT".to_string(),
        }
    }
}

/// Immutable venue/ticker lookup tables.
///
/// Venue names are stored lower-cased, symbols upper-cased; the accessor
/// methods normalize their argument the same way.
#[derive(Debug, Clone)]
pub struct ClassifierTables {
    /// Crypto exchanges settling in the stable coin
    pub global_crypto_venues: HashSet<String>,
    /// Equity/metal venues settling in the global fiat
    pub global_fiat_venues: HashSet<String>,
    /// Domestic venues settling in the domestic fiat
    pub domestic_venues: HashSet<String>,
    /// Every known crypto exchange, global or domestic
    pub crypto_venues: HashSet<String>,
    /// The derivatives exchange
    pub derivatives_venue: String,
    /// Foreign equity exchanges
    pub foreign_equity_venues: HashSet<String>,
    /// Well-known crypto tickers
    pub crypto_tickers: HashSet<String>,
    /// Globally-quoted tokenized-metal and stable tickers (USD-denominated).
    /// Plain XAU is deliberately absent: spot gold with no venue is domestic
    /// gold quoted per baht-weight.
    pub metal_usd_tickers: HashSet<String>,
    /// Symbols classified as gold
    pub gold_symbols: HashSet<String>,
    /// Symbols classified as other physical commodities
    pub commodity_symbols: HashSet<String>,
    pub currencies: CurrencyCodes,
}

fn set(items: &[&str]) -> HashSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for ClassifierTables {
    fn default() -> Self {
        let global_crypto = ["binance", "okx", "htx", "kucoin", "bybit"];
        let domestic_crypto = ["bitkub"];
        let foreign_equity = [
            "nyse", "nasdaq", "amex", "lse", "euronext", "xetra", "hkex", "tse", "sgx", "krx",
        ];
        let metal_venues = ["comex", "lbma"];

        let mut crypto_venues = set(&global_crypto);
        crypto_venues.insert("coinbase".to_string());
        crypto_venues.extend(domestic_crypto.iter().map(|s| s.to_string()));

        let mut global_fiat_venues = set(&foreign_equity);
        global_fiat_venues.extend(metal_venues.iter().map(|s| s.to_string()));
        // Coinbase settles in USD, not USDT
        global_fiat_venues.insert("coinbase".to_string());

        let mut domestic_venues = set(&["set", "mai", "tfex"]);
        domestic_venues.extend(domestic_crypto.iter().map(|s| s.to_string()));

        Self {
            global_crypto_venues: set(&global_crypto),
            global_fiat_venues,
            domestic_venues,
            crypto_venues,
            derivatives_venue: "tfex".to_string(),
            foreign_equity_venues: set(&foreign_equity),
            crypto_tickers: set(&["BTC", "ETH", "SOL", "XRP", "BNB", "ADA", "DOGE"]),
            metal_usd_tickers: set(&["PAXG", "XAUT", "GLD", "USDC", "DAI"]),
            gold_symbols: set(&["XAU", "GOLD", "GOLD96.5", "GOLD99.99"]),
            commodity_symbols: set(&["XAG", "SILVER", "XPT", "WTI", "BRENT"]),
            currencies: CurrencyCodes::default(),
        }
    }
}

impl ClassifierTables {
    pub fn is_global_crypto_venue(&self, venue: &str) -> bool {
        self.global_crypto_venues.contains(&venue.to_lowercase())
    }

    pub fn is_global_fiat_venue(&self, venue: &str) -> bool {
        self.global_fiat_venues.contains(&venue.to_lowercase())
    }

    pub fn is_domestic_venue(&self, venue: &str) -> bool {
        self.domestic_venues.contains(&venue.to_lowercase())
    }

    pub fn is_crypto_venue(&self, venue: &str) -> bool {
        self.crypto_venues.contains(&venue.to_lowercase())
    }

    pub fn is_derivatives_venue(&self, venue: &str) -> bool {
        venue.eq_ignore_ascii_case(&self.derivatives_venue)
    }

    pub fn is_foreign_equity_venue(&self, venue: &str) -> bool {
        self.foreign_equity_venues.contains(&venue.to_lowercase())
    }

    pub fn is_crypto_ticker(&self, symbol: &str) -> bool {
        self.crypto_tickers.contains(&symbol.to_uppercase())
    }

    pub fn is_metal_usd_ticker(&self, symbol: &str) -> bool {
        self.metal_usd_tickers.contains(&symbol.to_uppercase())
    }

    pub fn is_gold_symbol(&self, symbol: &str) -> bool {
        self.gold_symbols.contains(&symbol.to_uppercase())
    }

    pub fn is_commodity_symbol(&self, symbol: &str) -> bool {
        self.commodity_symbols.contains(&symbol.to_uppercase())
    }

    /// The baseline currency: the system-wide default fiat code
    pub fn baseline_currency(&self) -> &str {
        &self.currencies.domestic_fiat
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_venue_lookups_are_case_insensitive() {
        let tables = ClassifierTables::default();
        assert!(tables.is_global_crypto_venue("Binance"));
        assert!(tables.is_global_crypto_venue("OKX"));
        assert!(tables.is_domestic_venue("SET"));
        assert!(tables.is_foreign_equity_venue("Nasdaq"));
        assert!(!tables.is_global_crypto_venue("nyse"));
    }

    #[test]
    fn test_coinbase_is_crypto_but_settles_in_fiat() {
        let tables = ClassifierTables::default();
        assert!(tables.is_crypto_venue("coinbase"));
        assert!(!tables.is_global_crypto_venue("coinbase"));
        assert!(tables.is_global_fiat_venue("coinbase"));
    }

    #[test]
    fn test_bitkub_is_domestic_crypto() {
        let tables = ClassifierTables::default();
        assert!(tables.is_crypto_venue("bitkub"));
        assert!(tables.is_domestic_venue("bitkub"));
        assert!(!tables.is_global_crypto_venue("bitkub"));
    }

    #[test]
    fn test_spot_gold_is_not_a_usd_metal_ticker() {
        let tables = ClassifierTables::default();
        assert!(tables.is_gold_symbol("xau"));
        assert!(!tables.is_metal_usd_ticker("XAU"));
        assert!(tables.is_metal_usd_ticker("PAXG"));
    }
}
