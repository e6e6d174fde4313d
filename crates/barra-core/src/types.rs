//! # Domain Types
//!
//! Core domain types used by the bar estimator.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────────────┐   ┌──────────────────┐   ┌────────────────┐  │
//! │  │ EventBarConfiguration│   │   CatalogItem    │   │ QuotationLine  │  │
//! │  │  ──────────────────  │   │  ──────────────  │   │  ────────────  │  │
//! │  │  guest_count         │   │  unit_cost_cents │   │  description   │  │
//! │  │  service_hours       │──►│  yield_factor    │   │  quantity      │  │
//! │  │  climate             │   └──────────────────┘   │  unit_price    │  │
//! │  │  profit_factor       │                          └────────────────┘  │
//! │  │  categories ─────────┼──► CategorySelection (six BarOption toggles) │
//! │  │  supplies            │                                              │
//! │  └──────────────────────┘                                              │
//! │                                                                         │
//! │  BarOption:   what the customer picked (six toggles)                   │
//! │  BarCategory: how the price is broken down (five buckets; both         │
//! │               cocktail options share the Cocktail bucket)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};
use ts_rs::TS;

use crate::error::CoreError;
use crate::money::Money;

// =============================================================================
// Climate
// =============================================================================

/// Event climate. Drives ice demand and drinking pace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Climate {
    /// Daytime / hot venue.
    Hot,
    /// Evening or air-conditioned venue.
    #[default]
    Cool,
    /// Extreme heat.
    Extreme,
}

impl Climate {
    /// Returns true for climates that get the heat tag on the quotation line.
    pub fn is_warm(&self) -> bool {
        matches!(self, Climate::Hot | Climate::Extreme)
    }
}

impl fmt::Display for Climate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Climate::Hot => write!(f, "hot"),
            Climate::Cool => write!(f, "cool"),
            Climate::Extreme => write!(f, "extreme"),
        }
    }
}

impl std::str::FromStr for Climate {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hot" | "calor" => Ok(Climate::Hot),
            "cool" | "fresco" | "normal" => Ok(Climate::Cool),
            "extreme" | "extremo" => Ok(Climate::Extreme),
            other => Err(CoreError::UnknownClimate(other.to_string())),
        }
    }
}

// =============================================================================
// Bar Options (customer toggles)
// =============================================================================

/// A beverage option the customer can enable for the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum BarOption {
    SoftDrinks,
    Beer,
    NationalLiquor,
    PremiumLiquor,
    BasicCocktails,
    PremiumCocktails,
}

impl BarOption {
    /// All options, in form order.
    pub const ALL: [BarOption; 6] = [
        BarOption::SoftDrinks,
        BarOption::Beer,
        BarOption::NationalLiquor,
        BarOption::PremiumLiquor,
        BarOption::BasicCocktails,
        BarOption::PremiumCocktails,
    ];

    /// The breakdown bucket this option's cost lands in.
    pub const fn category(&self) -> BarCategory {
        match self {
            BarOption::SoftDrinks => BarCategory::SoftDrinks,
            BarOption::Beer => BarCategory::Beer,
            BarOption::NationalLiquor => BarCategory::NationalLiquor,
            BarOption::PremiumLiquor => BarCategory::PremiumLiquor,
            BarOption::BasicCocktails | BarOption::PremiumCocktails => BarCategory::Cocktail,
        }
    }
}

/// The set of enabled bar options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CategorySelection {
    #[serde(default)]
    pub soft_drinks: bool,
    #[serde(default)]
    pub beer: bool,
    #[serde(default)]
    pub national_liquor: bool,
    #[serde(default)]
    pub premium_liquor: bool,
    #[serde(default)]
    pub basic_cocktails: bool,
    #[serde(default)]
    pub premium_cocktails: bool,
}

impl CategorySelection {
    /// Selection with nothing enabled.
    pub const fn none() -> Self {
        CategorySelection {
            soft_drinks: false,
            beer: false,
            national_liquor: false,
            premium_liquor: false,
            basic_cocktails: false,
            premium_cocktails: false,
        }
    }

    /// Builds a selection from a list of options.
    ///
    /// ## Example
    /// ```rust
    /// use barra_core::{BarOption, CategorySelection};
    ///
    /// let sel = CategorySelection::from_options(&[BarOption::Beer, BarOption::NationalLiquor]);
    /// assert!(sel.beer && sel.national_liquor);
    /// assert!(!sel.soft_drinks);
    /// ```
    pub fn from_options(options: &[BarOption]) -> Self {
        options
            .iter()
            .fold(CategorySelection::none(), |sel, opt| sel.with(*opt))
    }

    /// Returns a copy with `option` enabled.
    pub fn with(mut self, option: BarOption) -> Self {
        *self.flag_mut(option) = true;
        self
    }

    /// Checks whether an option is enabled.
    pub fn is_enabled(&self, option: BarOption) -> bool {
        match option {
            BarOption::SoftDrinks => self.soft_drinks,
            BarOption::Beer => self.beer,
            BarOption::NationalLiquor => self.national_liquor,
            BarOption::PremiumLiquor => self.premium_liquor,
            BarOption::BasicCocktails => self.basic_cocktails,
            BarOption::PremiumCocktails => self.premium_cocktails,
        }
    }

    fn flag_mut(&mut self, option: BarOption) -> &mut bool {
        match option {
            BarOption::SoftDrinks => &mut self.soft_drinks,
            BarOption::Beer => &mut self.beer,
            BarOption::NationalLiquor => &mut self.national_liquor,
            BarOption::PremiumLiquor => &mut self.premium_liquor,
            BarOption::BasicCocktails => &mut self.basic_cocktails,
            BarOption::PremiumCocktails => &mut self.premium_cocktails,
        }
    }

    /// Enabled options, in form order.
    pub fn enabled(&self) -> impl Iterator<Item = BarOption> + '_ {
        BarOption::ALL
            .into_iter()
            .filter(move |opt| self.is_enabled(*opt))
    }

    /// True when at least one option is enabled.
    pub fn any(&self) -> bool {
        self.enabled().next().is_some()
    }

    /// True when either cocktail option is enabled.
    pub fn has_cocktails(&self) -> bool {
        self.basic_cocktails || self.premium_cocktails
    }
}

// =============================================================================
// Bar Category (breakdown buckets)
// =============================================================================

/// A bucket of the per-category price breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum BarCategory {
    SoftDrinks,
    Beer,
    NationalLiquor,
    PremiumLiquor,
    Cocktail,
}

impl BarCategory {
    /// All buckets. This order decides ties when picking the largest bucket.
    pub const ALL: [BarCategory; 5] = [
        BarCategory::SoftDrinks,
        BarCategory::Beer,
        BarCategory::NationalLiquor,
        BarCategory::PremiumLiquor,
        BarCategory::Cocktail,
    ];
}

/// A value per breakdown bucket.
///
/// ## Why not a map?
/// Every bucket is always present, so a missing or misspelled key cannot
/// exist. Serializes as a JSON object keyed by bucket name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PerCategory<T> {
    pub soft_drinks: T,
    pub beer: T,
    pub national_liquor: T,
    pub premium_liquor: T,
    pub cocktail: T,
}

impl<T> PerCategory<T> {
    /// Iterates `(bucket, value)` pairs in [`BarCategory::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (BarCategory, &T)> + '_ {
        BarCategory::ALL.into_iter().map(move |cat| (cat, &self[cat]))
    }

    /// Builds a record by evaluating `f` for every bucket.
    pub fn from_fn(mut f: impl FnMut(BarCategory) -> T) -> Self {
        PerCategory {
            soft_drinks: f(BarCategory::SoftDrinks),
            beer: f(BarCategory::Beer),
            national_liquor: f(BarCategory::NationalLiquor),
            premium_liquor: f(BarCategory::PremiumLiquor),
            cocktail: f(BarCategory::Cocktail),
        }
    }
}

impl PerCategory<Money> {
    /// Sum of all buckets.
    pub fn total(&self) -> Money {
        self.iter().map(|(_, m)| *m).sum()
    }
}

impl<T> Index<BarCategory> for PerCategory<T> {
    type Output = T;

    fn index(&self, category: BarCategory) -> &T {
        match category {
            BarCategory::SoftDrinks => &self.soft_drinks,
            BarCategory::Beer => &self.beer,
            BarCategory::NationalLiquor => &self.national_liquor,
            BarCategory::PremiumLiquor => &self.premium_liquor,
            BarCategory::Cocktail => &self.cocktail,
        }
    }
}

impl<T> IndexMut<BarCategory> for PerCategory<T> {
    fn index_mut(&mut self, category: BarCategory) -> &mut T {
        match category {
            BarCategory::SoftDrinks => &mut self.soft_drinks,
            BarCategory::Beer => &mut self.beer,
            BarCategory::NationalLiquor => &mut self.national_liquor,
            BarCategory::PremiumLiquor => &mut self.premium_liquor,
            BarCategory::Cocktail => &mut self.cocktail,
        }
    }
}

// =============================================================================
// Catalog Item
// =============================================================================

/// A supply configured in the catalog (ice bag, bottle, staff shift, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CatalogItem {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name (e.g. "Hielo 20kg").
    pub name: String,

    /// Unit of measure as purchased (kg, pza, botella, turno).
    pub unit: String,

    /// Purchase cost per unit in cents.
    pub unit_cost_cents: i64,

    /// How many usable units one purchased unit yields.
    /// Zero or negative means "not set" and counts as 1.
    #[ts(as = "String")]
    pub yield_factor: Decimal,
}

impl CatalogItem {
    /// Returns the purchase cost as Money.
    #[inline]
    pub fn unit_cost(&self) -> Money {
        Money::from_cents(self.unit_cost_cents)
    }
}

/// The catalog item configured for each resource, when any.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SupplySelection {
    #[serde(default)]
    pub ice: Option<CatalogItem>,
    #[serde(default)]
    pub soft_drink: Option<CatalogItem>,
    #[serde(default)]
    pub water: Option<CatalogItem>,
    #[serde(default)]
    pub national_liquor: Option<CatalogItem>,
    #[serde(default)]
    pub premium_liquor: Option<CatalogItem>,
    #[serde(default)]
    pub bartender: Option<CatalogItem>,
    #[serde(default)]
    pub assistant: Option<CatalogItem>,
}

// =============================================================================
// Event Bar Configuration
// =============================================================================

/// Everything the estimator needs to know about one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EventBarConfiguration {
    /// Number of guests (pax).
    pub guest_count: i64,

    /// Bar service duration in hours.
    pub service_hours: i64,

    pub climate: Climate,

    /// Multiplier applied to total cost to get the suggested price.
    #[ts(as = "String")]
    pub profit_factor: Decimal,

    #[serde(default)]
    pub categories: CategorySelection,

    #[serde(default)]
    pub supplies: SupplySelection,
}

impl EventBarConfiguration {
    /// Creates a configuration with no options enabled and no catalog items.
    pub fn new(guest_count: i64, service_hours: i64, climate: Climate, profit_factor: Decimal) -> Self {
        EventBarConfiguration {
            guest_count,
            service_hours,
            climate,
            profit_factor,
            categories: CategorySelection::none(),
            supplies: SupplySelection::default(),
        }
    }

    /// Sets the enabled options.
    pub fn with_options(mut self, options: &[BarOption]) -> Self {
        self.categories = CategorySelection::from_options(options);
        self
    }

    /// Sets the configured catalog items.
    pub fn with_supplies(mut self, supplies: SupplySelection) -> Self {
        self.supplies = supplies;
        self
    }
}

// =============================================================================
// Quotation Line Item
// =============================================================================

/// A line item on a quotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct QuotationLineItem {
    pub id: String,
    pub quotation_id: String,
    pub description: String,
    pub quantity: i64,
    /// Unit price in cents.
    pub unit_price_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl QuotationLineItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_climate_from_str_accepts_aliases() {
        assert_eq!("calor".parse::<Climate>().unwrap(), Climate::Hot);
        assert_eq!("HOT".parse::<Climate>().unwrap(), Climate::Hot);
        assert_eq!("fresco".parse::<Climate>().unwrap(), Climate::Cool);
        assert_eq!("extremo".parse::<Climate>().unwrap(), Climate::Extreme);
        assert!("tropical".parse::<Climate>().is_err());
    }

    #[test]
    fn test_climate_default_is_cool() {
        assert_eq!(Climate::default(), Climate::Cool);
        assert!(!Climate::Cool.is_warm());
        assert!(Climate::Extreme.is_warm());
    }

    #[test]
    fn test_selection_helpers() {
        let none = CategorySelection::none();
        assert!(!none.any());

        let sel = CategorySelection::from_options(&[BarOption::SoftDrinks, BarOption::PremiumCocktails]);
        assert!(sel.any());
        assert!(sel.has_cocktails());
        assert_eq!(
            sel.enabled().collect::<Vec<_>>(),
            vec![BarOption::SoftDrinks, BarOption::PremiumCocktails]
        );
    }

    #[test]
    fn test_cocktail_options_share_a_bucket() {
        assert_eq!(BarOption::BasicCocktails.category(), BarCategory::Cocktail);
        assert_eq!(BarOption::PremiumCocktails.category(), BarCategory::Cocktail);
    }

    #[test]
    fn test_per_category_index_and_total() {
        let mut costs: PerCategory<Money> = PerCategory::default();
        costs[BarCategory::Beer] = Money::from_units(10);
        costs[BarCategory::Cocktail] += Money::from_units(5);
        assert_eq!(costs.beer, Money::from_units(10));
        assert_eq!(costs.total(), Money::from_units(15));

        let order: Vec<_> = costs.iter().map(|(c, _)| c).collect();
        assert_eq!(order, BarCategory::ALL.to_vec());
    }

    #[test]
    fn test_per_category_serializes_as_object() {
        let costs = PerCategory::from_fn(|_| 1i64);
        let json = serde_json::to_value(costs).unwrap();
        assert_eq!(json["national_liquor"], 1);
        assert_eq!(json.as_object().unwrap().len(), 5);
    }
}
