//! # Bar Cost Estimator
//!
//! Derives quantities, costs and a suggested price for an event's bar.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  EventBarConfiguration                                                  │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  1. eligible?  (any option enabled, guests > 0)  ── no ──► None         │
//! │  2. unit costs (CostKey::resolve against the catalog snapshot)          │
//! │  3. climate profile → thermal factor, drinks per person per hour        │
//! │  4. total drinks = guests × hours × drinks/person/hour                  │
//! │  5. weights of enabled options → drinks per option                      │
//! │  6. per option: bottles / caguamas / garnish / mixer liters             │
//! │  7. ice: consumption + cooling, × thermal factor → 20 kg bags           │
//! │  8. water: guests × 0.6 L                                               │
//! │  9. staff: bartenders per 40/50 guests, assistants per 2 bartenders    │
//! │ 10. totals: alcohol + supplies + staff, × profit factor                 │
//! │ 11. breakdown (see allocation.rs)                                       │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  BarCostEstimate                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Quantities are `f64` until they become whole counts, which always round
//! up. Every amount is converted to cents once.
//!
//! ## Usage
//! ```rust
//! use barra_core::{estimate, BarOption, Climate, EmptyCatalog, EventBarConfiguration};
//! use rust_decimal::Decimal;
//!
//! let event = EventBarConfiguration::new(100, 5, Climate::Hot, Decimal::new(13, 1))
//!     .with_options(&[BarOption::Beer, BarOption::NationalLiquor]);
//!
//! let result = estimate(&event, &EmptyCatalog).unwrap();
//! assert_eq!(result.beer_units, 153);
//! assert_eq!(result.national_bottles, 19);
//! assert_eq!(result.breakdown.total(), result.suggested_price);
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::allocation::allocate_breakdown;
use crate::cost::{CostCatalog, CostKey};
use crate::money::Money;
use crate::rates::BarRates;
use crate::types::{BarCategory, BarOption, EventBarConfiguration, PerCategory};

// =============================================================================
// Estimate
// =============================================================================

/// The estimator's output. Recomputed on every call, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BarCostEstimate {
    /// Drinks served over the whole event.
    pub total_drinks: f64,

    /// National spirit bottles (includes basic cocktail bottles).
    pub national_bottles: u64,
    /// Premium spirit bottles (includes gin for premium cocktails).
    pub premium_bottles: u64,
    /// Caguamas.
    pub beer_units: u64,
    pub mixer_liters: u64,
    pub water_liters: u64,

    /// Ice served in drinks, after the thermal factor.
    pub consumption_ice_kg: f64,
    /// Ice used to keep beer, mixers and water cold, after the thermal factor.
    pub cooling_ice_kg: f64,
    /// 20 kg bags.
    pub ice_bags: u64,

    pub bartenders: u64,
    pub assistants: u64,

    pub alcohol_cost: Money,
    pub ice_cost: Money,
    pub mixer_cost: Money,
    pub water_cost: Money,
    /// Fruit, syrup and coffee for cocktails.
    pub garnish_cost: Money,
    /// Ice + mixers + water + garnish.
    pub supplies_cost: Money,
    pub staff_cost: Money,
    pub total_cost: Money,

    pub suggested_price: Money,
    #[ts(as = "String")]
    pub profit_factor: Decimal,

    /// Suggested price split per bucket; sums to `suggested_price`.
    pub breakdown: PerCategory<Money>,
}

impl BarCostEstimate {
    /// National plus premium bottles.
    pub fn total_bottles(&self) -> u64 {
        self.national_bottles + self.premium_bottles
    }

    /// Ice demand for reports, e.g. `"243kg Consumo + 184kg Frío"`.
    ///
    /// Kilograms are truncated.
    pub fn ice_summary(&self) -> String {
        format!(
            "{}kg Consumo + {}kg Frío",
            self.consumption_ice_kg.trunc() as i64,
            self.cooling_ice_kg.trunc() as i64
        )
    }

    /// Mixers and drinking water together.
    pub fn mixers_and_water_cost(&self) -> Money {
        self.mixer_cost + self.water_cost
    }
}

// =============================================================================
// Estimator
// =============================================================================

/// Unit costs resolved once per estimate, kept exact until priced.
#[derive(Debug, Clone, Copy)]
struct UnitCosts {
    ice: Decimal,
    mixer: Decimal,
    water: Decimal,
    national: Decimal,
    premium: Decimal,
    bartender: Decimal,
    assistant: Decimal,
}

/// Running totals while walking the enabled options.
#[derive(Debug, Default)]
struct Tally {
    national_bottles: u64,
    premium_bottles: u64,
    beer_units: u64,
    mixer_liters: f64,
    alcohol_cost: Money,
    garnish_cost: Money,
    pure: PerCategory<Money>,
}

/// Computes bar estimates from a rate table and a fallback constant snapshot.
///
/// Pure and synchronous; share it freely between tasks.
#[derive(Debug, Clone)]
pub struct BarCostEstimator<C> {
    rates: BarRates,
    catalog: C,
}

impl<C: CostCatalog> BarCostEstimator<C> {
    /// Creates an estimator. Validate `rates` first when they come from config.
    pub fn new(rates: BarRates, catalog: C) -> Self {
        BarCostEstimator { rates, catalog }
    }

    /// Creates an estimator with the default rate table.
    pub fn with_default_rates(catalog: C) -> Self {
        Self::new(BarRates::default(), catalog)
    }

    pub fn rates(&self) -> &BarRates {
        &self.rates
    }

    /// Estimates the bar for one event.
    ///
    /// Returns `None` when no option is enabled or the guest count is not
    /// positive.
    pub fn estimate(&self, config: &EventBarConfiguration) -> Option<BarCostEstimate> {
        let selection = &config.categories;
        if !selection.any() || config.guest_count <= 0 {
            return None;
        }

        let rates = &self.rates;
        let supplies = &config.supplies;
        let catalog = &self.catalog;
        let unit = UnitCosts {
            ice: CostKey::Ice.resolve(catalog, supplies.ice.as_ref()),
            mixer: CostKey::Mixer.resolve(catalog, supplies.soft_drink.as_ref()),
            water: CostKey::Water.resolve(catalog, supplies.water.as_ref()),
            national: CostKey::NationalLiquor.resolve(catalog, supplies.national_liquor.as_ref()),
            premium: CostKey::PremiumLiquor.resolve(catalog, supplies.premium_liquor.as_ref()),
            bartender: CostKey::Bartender.resolve(catalog, supplies.bartender.as_ref()),
            assistant: CostKey::Assistant.resolve(catalog, supplies.assistant.as_ref()),
        };

        let guests = config.guest_count as f64;
        let hours = config.service_hours.max(0) as f64;
        let profile = rates.climate.profile(config.climate);
        let total_drinks = guests * hours * profile.drinks_per_person_per_hour;

        // ---------------------------------------------------------------------
        // Drinks per option
        // ---------------------------------------------------------------------
        let weights = self.weights(config);
        let weight_sum: f64 = weights.iter().map(|(_, w)| w).sum();
        let weight_sum = if weight_sum > 0.0 { weight_sum } else { 1.0 };

        let mut tally = Tally::default();
        for (option, weight) in weights {
            let drinks = total_drinks * (weight / weight_sum);
            self.pour(option, drinks, &unit, &mut tally);
        }

        let mixer_liters = ceil_count(tally.mixer_liters);
        let mixer_cost = Money::for_count(unit.mixer, mixer_liters);

        // ---------------------------------------------------------------------
        // Ice & water
        // ---------------------------------------------------------------------
        let ice = &rates.ice;
        let mut cooling = 0.0;
        if tally.beer_units > 0 {
            cooling += (tally.beer_units as f64 / ice.beer_units_per_bag) * ice.bag_kg;
        }
        let liters_to_cool = mixer_liters as f64 + guests * rates.water_liters_per_guest;
        cooling += (liters_to_cool / ice.liters_per_bag) * ice.bag_kg;

        let consumption_ice_kg = total_drinks * ice.kg_per_drink * profile.thermal_factor;
        let cooling_ice_kg = cooling * profile.thermal_factor;
        let ice_bags = ceil_count((consumption_ice_kg + cooling_ice_kg) / ice.bag_kg);
        let ice_cost = Money::for_count(unit.ice, ice_bags);

        let water_liters = ceil_count(guests * rates.water_liters_per_guest);
        let water_cost = Money::for_count(unit.water, water_liters);

        let supplies_cost = water_cost + ice_cost + mixer_cost + tally.garnish_cost;

        // ---------------------------------------------------------------------
        // Staff
        // ---------------------------------------------------------------------
        let staff = &rates.staff;
        let guests_per_bartender = if selection.has_cocktails() {
            staff.guests_per_bartender_cocktails
        } else {
            staff.guests_per_bartender
        };
        let bartenders = div_ceil(config.guest_count as u64, guests_per_bartender);
        let mut assistants = div_ceil(bartenders, staff.bartenders_per_assistant);
        if bartenders >= 1 && assistants == 0 {
            assistants = 1;
        }
        let staff_cost =
            Money::for_count(unit.bartender, bartenders) + Money::for_count(unit.assistant, assistants);

        // ---------------------------------------------------------------------
        // Totals & breakdown
        // ---------------------------------------------------------------------
        let total_cost = tally.alcohol_cost + supplies_cost + staff_cost;
        let suggested_price = total_cost.scale(config.profit_factor);

        // Soft drinks carry the whole mixer bill in the breakdown, even though
        // liquor buckets already include their own mixer share.
        tally.pure[BarCategory::SoftDrinks] += mixer_cost;
        let common = staff_cost + ice_cost + water_cost;
        let breakdown = allocate_breakdown(&tally.pure, common, config.profit_factor, suggested_price);

        debug!(
            guests = config.guest_count,
            hours = config.service_hours,
            climate = %config.climate,
            total_drinks,
            total_cost = %total_cost,
            suggested_price = %suggested_price,
            "Bar estimate computed"
        );

        Some(BarCostEstimate {
            total_drinks,
            national_bottles: tally.national_bottles,
            premium_bottles: tally.premium_bottles,
            beer_units: tally.beer_units,
            mixer_liters,
            water_liters,
            consumption_ice_kg,
            cooling_ice_kg,
            ice_bags,
            bartenders,
            assistants,
            alcohol_cost: tally.alcohol_cost,
            ice_cost,
            mixer_cost,
            water_cost,
            garnish_cost: tally.garnish_cost,
            supplies_cost,
            staff_cost,
            total_cost,
            suggested_price,
            profit_factor: config.profit_factor,
            breakdown,
        })
    }

    /// Weights of the enabled options, in form order.
    fn weights(&self, config: &EventBarConfiguration) -> Vec<(BarOption, f64)> {
        let w = &self.rates.weights;
        let mut weights: Vec<(BarOption, f64)> = config
            .categories
            .enabled()
            .filter_map(|option| {
                let weight = match option {
                    BarOption::Beer => w.beer,
                    BarOption::NationalLiquor => w.national_liquor,
                    BarOption::PremiumLiquor => w.premium_liquor,
                    BarOption::BasicCocktails => w.basic_cocktails,
                    BarOption::PremiumCocktails => w.premium_cocktails,
                    BarOption::SoftDrinks => return None,
                };
                Some((option, weight))
            })
            .collect();

        if config.categories.soft_drinks {
            let weight = if weights.is_empty() {
                w.soft_drinks_only
            } else {
                w.soft_drinks_mixed
            };
            weights.push((BarOption::SoftDrinks, weight));
        }
        weights
    }

    /// Adds the bottles, garnish and mixer one option needs for `drinks`.
    fn pour(&self, option: BarOption, drinks: f64, unit: &UnitCosts, tally: &mut Tally) {
        let yields = &self.rates.yields;
        let fixed = &self.rates.fixed;
        let bucket = option.category();

        match option {
            BarOption::Beer => {
                let units = ceil_count(drinks / yields.drinks_per_beer);
                let cost = fixed.beer_unit_cost.times(units);
                tally.beer_units += units;
                tally.alcohol_cost += cost;
                tally.pure[bucket] += cost;
            }
            BarOption::NationalLiquor | BarOption::PremiumLiquor => {
                let (bottle_cost, liters_per_drink) = if option == BarOption::NationalLiquor {
                    (unit.national, yields.mixer_liters_national)
                } else {
                    (unit.premium, yields.mixer_liters_premium)
                };
                let bottles = ceil_count(drinks / yields.drinks_per_bottle);
                let cost = Money::for_count(bottle_cost, bottles);
                if option == BarOption::NationalLiquor {
                    tally.national_bottles += bottles;
                } else {
                    tally.premium_bottles += bottles;
                }
                tally.alcohol_cost += cost;

                let liters = drinks * liters_per_drink;
                tally.mixer_liters += liters;
                tally.pure[bucket] += cost + Money::for_quantity(unit.mixer, liters);
            }
            BarOption::BasicCocktails => {
                let garnish = fixed.basic_cocktail_garnish.times_quantity(drinks);
                let bottles = ceil_count(drinks / yields.drinks_per_bottle);
                let cost = Money::for_count(unit.national, bottles);
                tally.garnish_cost += garnish;
                tally.national_bottles += bottles;
                tally.alcohol_cost += cost;
                tally.pure[bucket] += garnish + cost;
                tally.mixer_liters += drinks * yields.mixer_liters_basic_cocktail;
            }
            BarOption::PremiumCocktails => {
                let garnish = fixed.premium_cocktail_garnish.times_quantity(drinks);
                let gin_bottles =
                    ceil_count(drinks * yields.gin_share_premium_cocktail / yields.drinks_per_bottle);
                let cost = fixed.gin_bottle_cost.times(gin_bottles);
                tally.garnish_cost += garnish;
                tally.premium_bottles += gin_bottles;
                tally.alcohol_cost += cost;
                tally.pure[bucket] += garnish + cost;
            }
            BarOption::SoftDrinks => {
                tally.mixer_liters += drinks * yields.mixer_liters_soft_drink;
            }
        }
    }
}

/// Estimates with the default rate table.
pub fn estimate<C: CostCatalog>(config: &EventBarConfiguration, catalog: C) -> Option<BarCostEstimate> {
    BarCostEstimator::with_default_rates(catalog).estimate(config)
}

/// Rounds a non-negative quantity up to a whole count.
fn ceil_count(quantity: f64) -> u64 {
    if quantity.is_finite() && quantity > 0.0 {
        quantity.ceil() as u64
    } else {
        0
    }
}

fn div_ceil(value: u64, per: u32) -> u64 {
    let per = u64::from(per.max(1));
    value.div_ceil(per)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::EmptyCatalog;
    use crate::types::{CatalogItem, Climate, SupplySelection};
    use std::collections::HashMap;

    fn event(guests: i64, hours: i64, climate: Climate, options: &[BarOption]) -> EventBarConfiguration {
        EventBarConfiguration::new(guests, hours, climate, Decimal::new(13, 1)).with_options(options)
    }

    fn beer_and_national() -> BarCostEstimate {
        let config = event(100, 5, Climate::Hot, &[BarOption::Beer, BarOption::NationalLiquor]);
        estimate(&config, EmptyCatalog).unwrap()
    }

    #[test]
    fn test_no_options_is_none() {
        let config = event(100, 5, Climate::Hot, &[]);
        assert!(estimate(&config, EmptyCatalog).is_none());
    }

    #[test]
    fn test_zero_or_negative_guests_is_none() {
        let config = event(0, 5, Climate::Cool, &[BarOption::Beer]);
        assert!(estimate(&config, EmptyCatalog).is_none());

        let config = event(-3, 5, Climate::Cool, &[BarOption::Beer]);
        assert!(estimate(&config, EmptyCatalog).is_none());
    }

    #[test]
    fn test_beer_and_national_quantities() {
        let e = beer_and_national();
        assert_eq!(e.total_drinks, 750.0);
        assert_eq!(e.beer_units, 153);
        assert_eq!(e.national_bottles, 19);
        assert_eq!(e.premium_bottles, 0);
        assert_eq!(e.total_bottles(), 19);
        // 58.33 L of national mixer, rounded up
        assert_eq!(e.mixer_liters, 59);
        assert_eq!(e.water_liters, 60);
        assert_eq!(e.ice_bags, 22);
        assert_eq!(e.bartenders, 2);
        assert_eq!(e.assistants, 1);
    }

    #[test]
    fn test_beer_and_national_costs() {
        let e = beer_and_national();
        // 153 × 42.00 + 19 × 380.00
        assert_eq!(e.alcohol_cost, Money::from_units(6426 + 7220));
        assert_eq!(e.mixer_cost, Money::from_units(59 * 22));
        assert_eq!(e.water_cost, Money::from_units(600));
        assert_eq!(e.ice_cost, Money::from_units(22 * 90));
        assert!(e.garnish_cost.is_zero());
        assert_eq!(e.supplies_cost, Money::from_units(600 + 1980 + 1298));
        assert_eq!(e.staff_cost, Money::from_units(2 * 1200 + 800));
        assert_eq!(e.total_cost, Money::from_units(20_724));
        assert_eq!(e.suggested_price, Money::from_cents(2_694_120));
        assert_eq!(e.mixers_and_water_cost(), Money::from_units(1898));
    }

    #[test]
    fn test_beer_and_national_breakdown_reconciles() {
        let e = beer_and_national();
        assert_eq!(e.breakdown.total(), e.suggested_price);
        assert!(e.breakdown.premium_liquor.is_zero());
        assert!(e.breakdown.cocktail.is_zero());
        // Soft drinks still carry the mixer bill
        assert!(e.breakdown.soft_drinks.is_positive());
    }

    #[test]
    fn test_ice_summary_truncates() {
        let e = beer_and_national();
        // 187.5 × 1.3 = 243.75 and (102 + 39.67) × 1.3 = 184.17
        assert_eq!(e.ice_summary(), "243kg Consumo + 184kg Frío");
    }

    #[test]
    fn test_soft_drinks_only_takes_all_drinks() {
        // 40 × 4 × 1.3 = 208 drinks, all soft drinks: 208 × 0.355 = 73.84 L
        let config = event(40, 4, Climate::Cool, &[BarOption::SoftDrinks]);
        let e = estimate(&config, EmptyCatalog).unwrap();
        assert_eq!(e.mixer_liters, 74);
        assert!(e.alcohol_cost.is_zero());
        assert_eq!(e.breakdown.soft_drinks, e.suggested_price);
    }

    #[test]
    fn test_soft_drinks_weight_drops_with_other_options() {
        let alone = estimate(&event(40, 4, Climate::Cool, &[BarOption::SoftDrinks]), EmptyCatalog).unwrap();
        let mixed = estimate(
            &event(40, 4, Climate::Cool, &[BarOption::SoftDrinks, BarOption::Beer]),
            EmptyCatalog,
        )
        .unwrap();
        // 208 × 15/70 × 0.355 = 15.82 L
        assert_eq!(mixed.mixer_liters, 16);
        assert!(mixed.mixer_liters < alone.mixer_liters);
    }

    #[test]
    fn test_bottles_round_up() {
        // 37 drinks at 16 per bottle need 3 bottles
        let rates = BarRates::default();
        let mut config = event(1, 1, Climate::Cool, &[BarOption::NationalLiquor]);
        config.guest_count = 37;
        let mut custom = rates.clone();
        custom.climate.cool.drinks_per_person_per_hour = 1.0;
        let e = BarCostEstimator::new(custom, EmptyCatalog).estimate(&config).unwrap();
        assert_eq!(e.total_drinks, 37.0);
        assert_eq!(e.national_bottles, 3);
    }

    #[test]
    fn test_cocktails_change_staff_ratio() {
        let plain = estimate(&event(120, 5, Climate::Cool, &[BarOption::Beer]), EmptyCatalog).unwrap();
        assert_eq!(plain.bartenders, 3);
        assert_eq!(plain.assistants, 2);

        let cocktails = estimate(
            &event(120, 5, Climate::Cool, &[BarOption::Beer, BarOption::BasicCocktails]),
            EmptyCatalog,
        )
        .unwrap();
        assert_eq!(cocktails.bartenders, 3);

        let cocktails = estimate(
            &event(121, 5, Climate::Cool, &[BarOption::PremiumCocktails]),
            EmptyCatalog,
        )
        .unwrap();
        assert_eq!(cocktails.bartenders, 4);
        assert_eq!(cocktails.assistants, 2);
    }

    #[test]
    fn test_premium_cocktails_use_gin_and_no_mixer() {
        // 100 × 4 × 1.3 = 520 drinks; gin 520 × 0.3 / 16 = 9.75 → 10 bottles
        let e = estimate(&event(100, 4, Climate::Cool, &[BarOption::PremiumCocktails]), EmptyCatalog).unwrap();
        assert_eq!(e.premium_bottles, 10);
        assert_eq!(e.national_bottles, 0);
        assert_eq!(e.mixer_liters, 0);
        assert_eq!(e.alcohol_cost, Money::from_units(5500));
        assert_eq!(e.garnish_cost, Money::from_units(520 * 28));
    }

    #[test]
    fn test_basic_cocktails_use_national_bottles() {
        // 520 drinks → 33 bottles, 52 L of mixer, garnish 520 × 15
        let e = estimate(&event(100, 4, Climate::Cool, &[BarOption::BasicCocktails]), EmptyCatalog).unwrap();
        assert_eq!(e.national_bottles, 33);
        assert_eq!(e.mixer_liters, 52);
        assert_eq!(e.garnish_cost, Money::from_units(7800));
        assert_eq!(e.breakdown.total(), e.suggested_price);
    }

    #[test]
    fn test_configured_items_and_constants() {
        let mut constants = HashMap::new();
        constants.insert("COSTO_BARMAN".to_string(), Decimal::new(1500, 0));

        let bottle = CatalogItem {
            id: "nac".to_string(),
            name: "Tequila nacional".to_string(),
            unit: "botella".to_string(),
            unit_cost_cents: 40_000,
            yield_factor: Decimal::ZERO,
        };
        let config = event(100, 5, Climate::Hot, &[BarOption::NationalLiquor]).with_supplies(SupplySelection {
            national_liquor: Some(bottle),
            ..SupplySelection::default()
        });

        let e = estimate(&config, &constants).unwrap();
        // 750 drinks of national → 47 bottles at 400.00
        assert_eq!(e.national_bottles, 47);
        assert_eq!(e.alcohol_cost, Money::from_units(47 * 400));
        assert_eq!(e.staff_cost, Money::from_units(2 * 1500 + 800));
    }

    #[test]
    fn test_uneven_yield_rounds_once_per_line() {
        // A $1000 case that pours 3 bottles: 47 bottles cost 1000 × 47 / 3
        let case = CatalogItem {
            id: "caja".to_string(),
            name: "Tequila nacional (caja 3)".to_string(),
            unit: "caja".to_string(),
            unit_cost_cents: 100_000,
            yield_factor: Decimal::new(3, 0),
        };
        let config = EventBarConfiguration::new(100, 5, Climate::Hot, Decimal::ONE)
            .with_options(&[BarOption::NationalLiquor])
            .with_supplies(SupplySelection {
                national_liquor: Some(case),
                ..SupplySelection::default()
            });

        let e = estimate(&config, EmptyCatalog).unwrap();
        assert_eq!(e.national_bottles, 47);
        assert_eq!(e.alcohol_cost, Money::from_cents(1_566_667));
        assert_eq!(e.breakdown.total(), e.suggested_price);
    }

    #[test]
    fn test_huge_guest_count_saturates() {
        let config = event(3_000_000_000_000_000, 5, Climate::Hot, &[BarOption::Beer]);
        let e = estimate(&config, EmptyCatalog).unwrap();

        assert_eq!(e.alcohol_cost.cents(), i64::MAX);
        assert_eq!(e.total_cost.cents(), i64::MAX);
        assert_eq!(e.suggested_price.cents(), i64::MAX);
    }

    #[test]
    fn test_config_is_not_mutated() {
        let config = event(80, 6, Climate::Extreme, &BarOption::ALL);
        let before = config.clone();
        let _ = estimate(&config, EmptyCatalog);
        assert_eq!(config, before);
    }
}
