//! Properties that must hold for every option combination.

use barra_core::allocation::RECONCILIATION_TOLERANCE;
use barra_core::{
    BarCostEstimate, BarCostEstimator, BarOption, BarRates, Climate, EmptyCatalog,
    EventBarConfiguration,
};
use rust_decimal::Decimal;

/// Every non-empty subset of the six options.
fn option_subsets() -> Vec<Vec<BarOption>> {
    (1u32..64)
        .map(|mask| {
            BarOption::ALL
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, opt)| *opt)
                .collect()
        })
        .collect()
}

fn run(guests: i64, hours: i64, climate: Climate, options: &[BarOption]) -> BarCostEstimate {
    let estimator = BarCostEstimator::new(BarRates::default(), EmptyCatalog);
    let config = EventBarConfiguration::new(guests, hours, climate, Decimal::new(135, 2))
        .with_options(options);
    estimator.estimate(&config).unwrap()
}

fn counts(e: &BarCostEstimate) -> [u64; 8] {
    [
        e.national_bottles,
        e.premium_bottles,
        e.beer_units,
        e.ice_bags,
        e.mixer_liters,
        e.water_liters,
        e.bartenders,
        e.assistants,
    ]
}

#[test]
fn test_breakdown_reconciles_for_every_combination() {
    let subsets = option_subsets();
    assert_eq!(subsets.len(), 63);

    for climate in [Climate::Hot, Climate::Cool, Climate::Extreme] {
        for options in &subsets {
            for guests in [1, 37, 150] {
                let e = run(guests, 5, climate, options);
                let gap = (e.suggested_price - e.breakdown.total()).abs();
                assert!(
                    gap <= RECONCILIATION_TOLERANCE,
                    "{:?} {:?} {} guests: gap {}",
                    climate,
                    options,
                    guests,
                    gap
                );
            }
        }
    }
}

#[test]
fn test_counts_never_decrease_with_more_guests() {
    for options in option_subsets() {
        let mut previous = counts(&run(1, 6, Climate::Hot, &options));
        for guests in 2..=120 {
            let current = counts(&run(guests, 6, Climate::Hot, &options));
            for (before, after) in previous.iter().zip(current.iter()) {
                assert!(after >= before, "{:?} at {} guests", options, guests);
            }
            previous = current;
        }
    }
}

#[test]
fn test_disabled_buckets_get_nothing() {
    let e = run(90, 5, Climate::Cool, &[BarOption::PremiumLiquor]);
    assert!(e.breakdown.beer.is_zero());
    assert!(e.breakdown.national_liquor.is_zero());
    assert!(e.breakdown.cocktail.is_zero());
    assert!(e.breakdown.premium_liquor.is_positive());
}

#[test]
fn test_always_at_least_one_bartender_and_assistant() {
    for options in option_subsets() {
        let e = run(1, 1, Climate::Cool, &options);
        assert_eq!(e.bartenders, 1);
        assert_eq!(e.assistants, 1);
    }
}

#[test]
fn test_total_is_sum_of_parts() {
    for options in option_subsets() {
        let e = run(75, 5, Climate::Extreme, &options);
        assert_eq!(
            e.supplies_cost,
            e.ice_cost + e.mixer_cost + e.water_cost + e.garnish_cost
        );
        assert_eq!(e.total_cost, e.alcohol_cost + e.supplies_cost + e.staff_cost);
        assert_eq!(e.total_cost.scale(e.profit_factor), e.suggested_price);
    }
}
