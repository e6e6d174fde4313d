//! # Cost Resolver
//!
//! Turns "what does one unit of X cost" into a number, never failing.
//!
//! ## Resolution Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      resolve_cost()                                     │
//! │                                                                         │
//! │  1. Catalog item configured on the quotation?                          │
//! │     └── unit_cost / yield_factor   (yield <= 0 counts as 1)            │
//! │                                                                         │
//! │  2. Fallback constant in the system constant table?                    │
//! │     └── e.g. PRECIO_HIELO_20KG = 95.00                                 │
//! │                                                                         │
//! │  3. Hardcoded default                                                  │
//! │     └── e.g. 90.00                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The constant table is an in-memory snapshot ([`CostCatalog`]); the
//! database layer loads it once and hands it over, so resolution is pure.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::money::Money;
use crate::types::CatalogItem;

// =============================================================================
// Cost Catalog
// =============================================================================

/// Read access to the fallback constant table.
pub trait CostCatalog {
    /// Returns the stored value for `key`, if present.
    fn fallback_constant(&self, key: &str) -> Option<Decimal>;
}

impl CostCatalog for HashMap<String, Decimal> {
    fn fallback_constant(&self, key: &str) -> Option<Decimal> {
        self.get(key).copied()
    }
}

impl CostCatalog for BTreeMap<String, Decimal> {
    fn fallback_constant(&self, key: &str) -> Option<Decimal> {
        self.get(key).copied()
    }
}

impl<C: CostCatalog + ?Sized> CostCatalog for &C {
    fn fallback_constant(&self, key: &str) -> Option<Decimal> {
        (**self).fallback_constant(key)
    }
}

/// A catalog with no stored constants; every lookup uses the default.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyCatalog;

impl CostCatalog for EmptyCatalog {
    fn fallback_constant(&self, _key: &str) -> Option<Decimal> {
        None
    }
}

// =============================================================================
// Cost Keys
// =============================================================================

/// A resource whose unit cost comes from the catalog or a fallback constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostKey {
    /// One 20 kg bag of ice.
    Ice,
    /// One 2 L mixer (soft drink).
    Mixer,
    Water,
    /// One bottle of national liquor.
    NationalLiquor,
    /// One bottle of premium liquor.
    PremiumLiquor,
    /// One bartender for the event.
    Bartender,
    /// One bar assistant for the event.
    Assistant,
}

impl CostKey {
    pub const ALL: [CostKey; 7] = [
        CostKey::Ice,
        CostKey::Mixer,
        CostKey::Water,
        CostKey::NationalLiquor,
        CostKey::PremiumLiquor,
        CostKey::Bartender,
        CostKey::Assistant,
    ];

    /// Key in the system constant table.
    pub const fn constant_key(&self) -> &'static str {
        match self {
            CostKey::Ice => "PRECIO_HIELO_20KG",
            CostKey::Mixer => "PRECIO_REFRESCO_2L",
            CostKey::Water => "PRECIO_AGUA_GAL",
            CostKey::NationalLiquor => "PRECIO_ALC_NAC",
            CostKey::PremiumLiquor => "PRECIO_ALC_PREM",
            CostKey::Bartender => "COSTO_BARMAN",
            CostKey::Assistant => "COSTO_AUXILIAR",
        }
    }

    /// Hardcoded default used when the constant table has no entry.
    pub const fn default_cost(&self) -> Money {
        match self {
            CostKey::Ice => Money::from_units(90),
            CostKey::Mixer => Money::from_units(22),
            CostKey::Water => Money::from_units(10),
            CostKey::NationalLiquor => Money::from_units(380),
            CostKey::PremiumLiquor => Money::from_units(1150),
            CostKey::Bartender => Money::from_units(1200),
            CostKey::Assistant => Money::from_units(800),
        }
    }

    /// Resolves this resource's exact unit cost.
    pub fn resolve<C: CostCatalog + ?Sized>(&self, catalog: &C, item: Option<&CatalogItem>) -> Decimal {
        resolve_cost(catalog, item, self.constant_key(), self.default_cost())
    }
}

impl fmt::Display for CostKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.constant_key())
    }
}

// =============================================================================
// Resolution
// =============================================================================

/// Resolves a unit cost.
///
/// The result is not rounded: a case that yields 3 bottles costs exactly a
/// third per bottle, and callers round once after multiplying by the count
/// (see [`Money::for_count`]).
///
/// ## Rules
/// - Configured item: `unit_cost / yield_factor`, a yield <= 0 counts as 1
/// - Else the fallback constant for `fallback_key`
/// - Else `fallback_default`
///
/// ## Example
/// ```rust
/// use barra_core::cost::{resolve_cost, EmptyCatalog};
/// use barra_core::money::Money;
///
/// let cost = resolve_cost(&EmptyCatalog, None, "PRECIO_HIELO_20KG", Money::from_units(90));
/// assert_eq!(Money::from_decimal(cost), Money::from_units(90));
/// ```
pub fn resolve_cost<C: CostCatalog + ?Sized>(
    catalog: &C,
    configured_item: Option<&CatalogItem>,
    fallback_key: &str,
    fallback_default: Money,
) -> Decimal {
    if let Some(item) = configured_item {
        let yield_factor = if item.yield_factor > Decimal::ZERO {
            item.yield_factor
        } else {
            Decimal::ONE
        };
        return item.unit_cost().to_decimal() / yield_factor;
    }

    catalog
        .fallback_constant(fallback_key)
        .unwrap_or_else(|| fallback_default.to_decimal())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn item(unit_cost_cents: i64, yield_factor: Decimal) -> CatalogItem {
        CatalogItem {
            id: "item-1".to_string(),
            name: "Hielo 20kg".to_string(),
            unit: "bolsa".to_string(),
            unit_cost_cents,
            yield_factor,
        }
    }

    #[test]
    fn test_defaults_without_catalog() {
        for key in CostKey::ALL {
            assert_eq!(key.resolve(&EmptyCatalog, None), key.default_cost().to_decimal());
        }
        assert_eq!(CostKey::Ice.default_cost(), Money::from_units(90));
        assert_eq!(CostKey::PremiumLiquor.default_cost(), Money::from_units(1150));
    }

    #[test]
    fn test_fallback_constant_overrides_default() {
        let mut constants = HashMap::new();
        constants.insert("PRECIO_HIELO_20KG".to_string(), Decimal::new(9550, 2));

        assert_eq!(CostKey::Ice.resolve(&constants, None), Decimal::new(9550, 2));
        // Other keys still use their defaults
        assert_eq!(CostKey::Mixer.resolve(&constants, None), Decimal::new(22, 0));
    }

    #[test]
    fn test_catalog_item_wins_over_constant() {
        let mut constants = BTreeMap::new();
        constants.insert("PRECIO_ALC_NAC".to_string(), Decimal::new(400, 0));

        let bottle = item(36_000, Decimal::ONE);
        assert_eq!(
            CostKey::NationalLiquor.resolve(&constants, Some(&bottle)),
            Decimal::new(360, 0)
        );
    }

    #[test]
    fn test_yield_factor_divides_cost() {
        // A 12-pack bought at $264 yields 12 usable units
        let pack = item(26_400, Decimal::new(12, 0));
        assert_eq!(CostKey::Mixer.resolve(&EmptyCatalog, Some(&pack)), Decimal::new(22, 0));

        // Yield below one inflates the per-unit cost
        let half = item(1_000, Decimal::new(5, 1));
        assert_eq!(CostKey::Water.resolve(&EmptyCatalog, Some(&half)), Decimal::new(20, 0));
    }

    #[test]
    fn test_uneven_yield_is_not_rounded() {
        // $1000 case of 3 bottles
        let case = item(100_000, Decimal::new(3, 0));
        let unit = CostKey::NationalLiquor.resolve(&EmptyCatalog, Some(&case));

        assert_eq!(unit.round_dp(2), Decimal::new(33_333, 2));
        assert!(unit > Decimal::new(33_333, 2));
        assert_ne!(Money::from_decimal(unit).times(47), Money::for_count(unit, 47));
        assert_eq!(Money::for_count(unit, 47), Money::from_cents(1_566_667));
    }

    #[test]
    fn test_zero_yield_same_as_one() {
        let zero = item(9_000, Decimal::ZERO);
        let one = item(9_000, Decimal::ONE);
        let negative = item(9_000, Decimal::new(-3, 0));

        let expected = CostKey::Ice.resolve(&EmptyCatalog, Some(&one));
        assert_eq!(CostKey::Ice.resolve(&EmptyCatalog, Some(&zero)), expected);
        assert_eq!(CostKey::Ice.resolve(&EmptyCatalog, Some(&negative)), expected);
    }
}
