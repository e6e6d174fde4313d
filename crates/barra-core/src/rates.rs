//! # Bar Rate Table
//!
//! Every conversion constant the estimator uses, in one injectable table.
//!
//! ## Sections
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         BarRates                                        │
//! │                                                                         │
//! │  climate   hot / cool / extreme → thermal factor, drinks per hour      │
//! │  weights   share of drinks per enabled option                          │
//! │  yields    drinks per bottle / caguama, mixer liters per drink         │
//! │  ice       kg per drink, bag size, cooling capacity per bag            │
//! │  staff     guests per bartender, bartenders per assistant              │
//! │  fixed     beer, gin and garnish costs (not read from the catalog)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! Every section has defaults, so a config only lists what it changes.
//! A climate profile is replaced as a whole:
//! ```toml
//! [rates.climate.hot]
//! thermal_factor = 1.4
//! drinks_per_person_per_hour = 1.6
//!
//! [rates.fixed]
//! beer_unit_cost = 4500   # cents
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::Climate;

// =============================================================================
// Climate
// =============================================================================

/// How a climate changes ice demand and drinking pace.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClimateProfile {
    /// Multiplier on every kilogram of ice.
    pub thermal_factor: f64,
    /// Drinks each guest takes per hour of service.
    pub drinks_per_person_per_hour: f64,
}

/// Climate profiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClimateRates {
    pub hot: ClimateProfile,
    pub cool: ClimateProfile,
    pub extreme: ClimateProfile,
}

impl Default for ClimateRates {
    fn default() -> Self {
        ClimateRates {
            hot: ClimateProfile {
                thermal_factor: 1.3,
                drinks_per_person_per_hour: 1.5,
            },
            cool: ClimateProfile {
                thermal_factor: 1.0,
                drinks_per_person_per_hour: 1.3,
            },
            extreme: ClimateProfile {
                thermal_factor: 1.6,
                drinks_per_person_per_hour: 1.8,
            },
        }
    }
}

impl ClimateRates {
    /// Returns the profile for a climate.
    pub fn profile(&self, climate: Climate) -> ClimateProfile {
        match climate {
            Climate::Hot => self.hot,
            Climate::Cool => self.cool,
            Climate::Extreme => self.extreme,
        }
    }
}

// =============================================================================
// Weights
// =============================================================================

/// Relative share of the total drinks each enabled option takes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryWeights {
    pub beer: f64,
    pub national_liquor: f64,
    pub premium_liquor: f64,
    pub basic_cocktails: f64,
    pub premium_cocktails: f64,
    /// Soft drinks when they are the only option.
    pub soft_drinks_only: f64,
    /// Soft drinks alongside anything else.
    pub soft_drinks_mixed: f64,
}

impl Default for CategoryWeights {
    fn default() -> Self {
        CategoryWeights {
            beer: 55.0,
            national_liquor: 35.0,
            premium_liquor: 25.0,
            basic_cocktails: 20.0,
            premium_cocktails: 15.0,
            soft_drinks_only: 100.0,
            soft_drinks_mixed: 15.0,
        }
    }
}

// =============================================================================
// Yields
// =============================================================================

/// Drinks per container and mixer per drink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YieldRates {
    /// Drinks poured from one spirit bottle.
    pub drinks_per_bottle: f64,
    /// Drinks served from one caguama.
    pub drinks_per_beer: f64,
    pub mixer_liters_national: f64,
    pub mixer_liters_premium: f64,
    pub mixer_liters_basic_cocktail: f64,
    pub mixer_liters_soft_drink: f64,
    /// Share of premium cocktails that are gin based.
    pub gin_share_premium_cocktail: f64,
}

impl Default for YieldRates {
    fn default() -> Self {
        YieldRates {
            drinks_per_bottle: 16.0,
            drinks_per_beer: 3.0,
            mixer_liters_national: 0.200,
            mixer_liters_premium: 0.180,
            mixer_liters_basic_cocktail: 0.100,
            mixer_liters_soft_drink: 0.355,
            gin_share_premium_cocktail: 0.3,
        }
    }
}

// =============================================================================
// Ice & Water
// =============================================================================

/// Ice demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IceRates {
    /// Ice served inside each drink.
    pub kg_per_drink: f64,
    /// Size of one purchased bag.
    pub bag_kg: f64,
    /// Caguamas one bag keeps cold.
    pub beer_units_per_bag: f64,
    /// Liters of mixer/water one bag keeps cold.
    pub liters_per_bag: f64,
}

impl Default for IceRates {
    fn default() -> Self {
        IceRates {
            kg_per_drink: 0.25,
            bag_kg: 20.0,
            beer_units_per_bag: 30.0,
            liters_per_bag: 60.0,
        }
    }
}

// =============================================================================
// Staff
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaffRates {
    pub guests_per_bartender: u32,
    /// Used instead when any cocktail option is enabled.
    pub guests_per_bartender_cocktails: u32,
    pub bartenders_per_assistant: u32,
}

impl Default for StaffRates {
    fn default() -> Self {
        StaffRates {
            guests_per_bartender: 50,
            guests_per_bartender_cocktails: 40,
            bartenders_per_assistant: 2,
        }
    }
}

// =============================================================================
// Fixed Costs
// =============================================================================

/// Costs that are not looked up in the catalog. Values are in cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixedCosts {
    pub beer_unit_cost: Money,
    pub gin_bottle_cost: Money,
    /// Fruit/syrup per basic cocktail.
    pub basic_cocktail_garnish: Money,
    /// Fruit/coffee per premium cocktail.
    pub premium_cocktail_garnish: Money,
}

impl Default for FixedCosts {
    fn default() -> Self {
        FixedCosts {
            beer_unit_cost: Money::from_units(42),
            gin_bottle_cost: Money::from_units(550),
            basic_cocktail_garnish: Money::from_units(15),
            premium_cocktail_garnish: Money::from_units(28),
        }
    }
}

// =============================================================================
// Bar Rates
// =============================================================================

/// The full rate table handed to the estimator.
///
/// ## Example
/// ```rust
/// use barra_core::rates::BarRates;
///
/// let rates = BarRates::default();
/// assert_eq!(rates.yields.drinks_per_bottle, 16.0);
/// assert!(rates.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarRates {
    pub climate: ClimateRates,
    pub weights: CategoryWeights,
    pub yields: YieldRates,
    pub ice: IceRates,
    pub staff: StaffRates,
    pub fixed: FixedCosts,
    /// Drinking water per guest; also cooled with the mixers.
    pub water_liters_per_guest: f64,
}

impl BarRates {
    /// Checks the table before it reaches the estimator.
    ///
    /// ## Rules
    /// - Divisors (bottle/caguama yields, bag sizes, staff ratios) must be > 0
    /// - Every other number must be finite and >= 0
    pub fn validate(&self) -> CoreResult<()> {
        let positive = [
            ("yields.drinks_per_bottle", self.yields.drinks_per_bottle),
            ("yields.drinks_per_beer", self.yields.drinks_per_beer),
            ("ice.bag_kg", self.ice.bag_kg),
            ("ice.beer_units_per_bag", self.ice.beer_units_per_bag),
            ("ice.liters_per_bag", self.ice.liters_per_bag),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(CoreError::invalid_rate(field, "must be positive"));
            }
        }

        let staff = [
            ("staff.guests_per_bartender", self.staff.guests_per_bartender),
            (
                "staff.guests_per_bartender_cocktails",
                self.staff.guests_per_bartender_cocktails,
            ),
            ("staff.bartenders_per_assistant", self.staff.bartenders_per_assistant),
        ];
        for (field, value) in staff {
            if value == 0 {
                return Err(CoreError::invalid_rate(field, "must be positive"));
            }
        }

        let mut non_negative = vec![
            ("yields.mixer_liters_national", self.yields.mixer_liters_national),
            ("yields.mixer_liters_premium", self.yields.mixer_liters_premium),
            (
                "yields.mixer_liters_basic_cocktail",
                self.yields.mixer_liters_basic_cocktail,
            ),
            ("yields.mixer_liters_soft_drink", self.yields.mixer_liters_soft_drink),
            (
                "yields.gin_share_premium_cocktail",
                self.yields.gin_share_premium_cocktail,
            ),
            ("ice.kg_per_drink", self.ice.kg_per_drink),
            ("water_liters_per_guest", self.water_liters_per_guest),
            ("weights.beer", self.weights.beer),
            ("weights.national_liquor", self.weights.national_liquor),
            ("weights.premium_liquor", self.weights.premium_liquor),
            ("weights.basic_cocktails", self.weights.basic_cocktails),
            ("weights.premium_cocktails", self.weights.premium_cocktails),
            ("weights.soft_drinks_only", self.weights.soft_drinks_only),
            ("weights.soft_drinks_mixed", self.weights.soft_drinks_mixed),
        ];
        for (name, profile) in [
            ("climate.hot", self.climate.hot),
            ("climate.cool", self.climate.cool),
            ("climate.extreme", self.climate.extreme),
        ] {
            non_negative.push((name, profile.thermal_factor));
            non_negative.push((name, profile.drinks_per_person_per_hour));
        }
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(CoreError::invalid_rate(field, "must be a non-negative number"));
            }
        }

        let fixed = [
            ("fixed.beer_unit_cost", self.fixed.beer_unit_cost),
            ("fixed.gin_bottle_cost", self.fixed.gin_bottle_cost),
            ("fixed.basic_cocktail_garnish", self.fixed.basic_cocktail_garnish),
            ("fixed.premium_cocktail_garnish", self.fixed.premium_cocktail_garnish),
        ];
        for (field, value) in fixed {
            if value.is_negative() {
                return Err(CoreError::invalid_rate(field, "must not be negative"));
            }
        }

        Ok(())
    }
}

impl Default for BarRates {
    fn default() -> Self {
        BarRates {
            climate: ClimateRates::default(),
            weights: CategoryWeights::default(),
            yields: YieldRates::default(),
            ice: IceRates::default(),
            staff: StaffRates::default(),
            fixed: FixedCosts::default(),
            water_liters_per_guest: 0.6,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
