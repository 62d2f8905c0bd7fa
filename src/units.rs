//! Unit conversion engine for unit-bearing assets
//!
//! Gold and physical commodities are quantified in weight units; everything
//! else has an identity conversion. The canonical base unit depends on the
//! settlement-currency context: domestic (THB) trades normalize to the Thai
//! baht-weight, everything else to the troy ounce.

use once_cell::sync::Lazy;
use rust_decimal::Decimal;

use crate::models::AssetType;

// Physical constants, in grams
static GRAMS_PER_TROY_OZ: Lazy<Decimal> = Lazy::new(|| Decimal::new(311_034_768, 7));
static GRAMS_PER_BAHT: Lazy<Decimal> = Lazy::new(|| Decimal::new(15_244, 3));
static GRAMS_PER_SALUNG: Lazy<Decimal> = Lazy::new(|| Decimal::new(3_811, 3));
static GRAMS_PER_KG: Lazy<Decimal> = Lazy::new(|| Decimal::new(1_000, 0));

/// Factors from each recognized unit into the baht-weight (1 baht = 4 salung)
static DOMESTIC_FACTORS: Lazy<Vec<(&'static str, Decimal)>> = Lazy::new(|| {
    vec![
        ("baht", Decimal::ONE),
        ("salung", *GRAMS_PER_SALUNG / *GRAMS_PER_BAHT),
        ("gram", Decimal::ONE / *GRAMS_PER_BAHT),
        ("g", Decimal::ONE / *GRAMS_PER_BAHT),
        ("kilogram", *GRAMS_PER_KG / *GRAMS_PER_BAHT),
        ("kg", *GRAMS_PER_KG / *GRAMS_PER_BAHT),
        ("oz", *GRAMS_PER_TROY_OZ / *GRAMS_PER_BAHT),
        ("troy_oz", *GRAMS_PER_TROY_OZ / *GRAMS_PER_BAHT),
    ]
});

/// Factors from each recognized unit into the troy ounce
static GLOBAL_FACTORS: Lazy<Vec<(&'static str, Decimal)>> = Lazy::new(|| {
    vec![
        ("oz", Decimal::ONE),
        ("troy_oz", Decimal::ONE),
        ("gram", Decimal::ONE / *GRAMS_PER_TROY_OZ),
        ("g", Decimal::ONE / *GRAMS_PER_TROY_OZ),
        ("kilogram", *GRAMS_PER_KG / *GRAMS_PER_TROY_OZ),
        ("kg", *GRAMS_PER_KG / *GRAMS_PER_TROY_OZ),
        ("baht", *GRAMS_PER_BAHT / *GRAMS_PER_TROY_OZ),
        ("salung", *GRAMS_PER_SALUNG / *GRAMS_PER_TROY_OZ),
    ]
});

/// Which canonical base unit applies, selected by settlement currency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitContext {
    /// Domestic fiat settlement: base unit is the baht-weight
    Domestic,
    /// Global fiat / stable-coin settlement: base unit is the troy ounce
    Global,
}

impl UnitContext {
    pub fn for_currency(currency: &str, domestic_fiat: &str) -> Self {
        if currency.eq_ignore_ascii_case(domestic_fiat) {
            UnitContext::Domestic
        } else {
            UnitContext::Global
        }
    }

    pub fn base_unit(&self) -> &'static str {
        match self {
            UnitContext::Domestic => "baht",
            UnitContext::Global => "oz",
        }
    }

    fn factors(&self) -> &'static [(&'static str, Decimal)] {
        match self {
            UnitContext::Domestic => &DOMESTIC_FACTORS[..],
            UnitContext::Global => &GLOBAL_FACTORS[..],
        }
    }
}

/// Multiplier converting a quantity in `unit` to the context's base unit.
///
/// Non-unit-bearing asset types and unrecognized unit names both yield 1;
/// an unknown unit is treated as already canonical rather than an error.
pub fn factor_to_base(unit: &str, asset_type: AssetType, ctx: UnitContext) -> Decimal {
    if !asset_type.is_unit_bearing() {
        return Decimal::ONE;
    }
    let unit = unit.trim().to_lowercase();
    ctx.factors()
        .iter()
        .find(|(name, _)| *name == unit)
        .map(|(_, factor)| *factor)
        .unwrap_or(Decimal::ONE)
}

/// Canonical unit name for an asset type in a context
pub fn canonical_unit(asset_type: AssetType, ctx: UnitContext) -> &'static str {
    if asset_type.is_unit_bearing() {
        ctx.base_unit()
    } else {
        "share"
    }
}

/// Normalize a (quantity, price-per-unit) pair to the canonical base unit.
///
/// The price moves inversely to the quantity so row value is preserved:
/// 1 kg of gold at P per kg becomes ~32.15 oz at P/32.15 per oz.
pub fn normalize(
    quantity: Decimal,
    price: Decimal,
    unit: Option<&str>,
    asset_type: AssetType,
    ctx: UnitContext,
) -> (Decimal, Decimal, String) {
    let canonical = canonical_unit(asset_type, ctx);
    let unit = unit.unwrap_or(canonical);
    let factor = factor_to_base(unit, asset_type, ctx);
    (quantity * factor, price / factor, canonical.to_string())
}

/// Ordered unit list backing the unit-toggle control
const METAL_UNITS: [&str; 6] = ["baht", "salung", "gram", "kilogram", "oz", "troy_oz"];

/// Next unit name in the fixed per-asset-type cycle; unknown current units
/// reset to the first entry.
pub fn next_unit(asset_type: AssetType, current: &str) -> &'static str {
    if !asset_type.is_unit_bearing() {
        return "share";
    }
    let current = current.trim().to_lowercase();
    match METAL_UNITS.iter().position(|u| *u == current) {
        Some(idx) => METAL_UNITS[(idx + 1) % METAL_UNITS.len()],
        None => METAL_UNITS[0],
    }
}
