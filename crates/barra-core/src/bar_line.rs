//! # Bar Line Planning
//!
//! Decides what should happen to a quotation's "Servicio de Barra" line.
//!
//! The decision is pure: given the line currently stored (if any) and the
//! latest estimate (if any), [`plan`] returns one [`BarLineAction`]. The
//! database layer carries it out.
//!
//! ```text
//! ┌──────────────────┬────────────────────┬───────────────────────────────┐
//! │ existing line    │ estimate           │ action                        │
//! ├──────────────────┼────────────────────┼───────────────────────────────┤
//! │ none             │ none               │ Unchanged                     │
//! │ some             │ none               │ Delete                        │
//! │ none             │ some               │ Create (qty 1)                │
//! │ some             │ some, drifted      │ Update (qty 1)                │
//! │ some             │ some, same         │ Unchanged                     │
//! └──────────────────┴────────────────────┴───────────────────────────────┘
//!
//! drifted = |price − suggested| > 0.50  or  description differs
//! ```

use serde::{Deserialize, Serialize};

use crate::estimator::BarCostEstimate;
use crate::money::Money;
use crate::types::{EventBarConfiguration, QuotationLineItem};

/// Every bar line description starts with this.
pub const BAR_LINE_PREFIX: &str = "Servicio de Barra";

/// Price changes up to this amount do not rewrite the line.
pub const PRICE_TOLERANCE: Money = Money::from_cents(50);

/// Builds the line description for an event.
///
/// ## Example
/// ```rust
/// use barra_core::bar_line::describe;
/// use barra_core::{BarOption, Climate, EventBarConfiguration};
/// use rust_decimal::Decimal;
///
/// let event = EventBarConfiguration::new(100, 5, Climate::Hot, Decimal::ONE)
///     .with_options(&[BarOption::Beer, BarOption::NationalLiquor]);
/// assert_eq!(
///     describe(&event),
///     "Servicio de Barra [Cerveza/Nacional] 🔥 | 100 Pax - 5 Hrs"
/// );
/// ```
pub fn describe(config: &EventBarConfiguration) -> String {
    let sel = &config.categories;
    let parts: Vec<&str> = [
        (sel.beer, "Cerveza"),
        (sel.national_liquor, "Nacional"),
        (sel.premium_liquor, "Premium"),
        (sel.basic_cocktails, "Cocteles"),
        (sel.premium_cocktails, "Mixología"),
    ]
    .into_iter()
    .filter_map(|(on, label)| on.then_some(label))
    .collect();

    let info = if parts.is_empty() {
        "Básico".to_string()
    } else {
        parts.join("/")
    };
    let tag = if config.climate.is_warm() { "🔥" } else { "" };

    format!(
        "{} [{}] {} | {} Pax - {} Hrs",
        BAR_LINE_PREFIX, info, tag, config.guest_count, config.service_hours
    )
}

/// True when a line item is the bar line.
pub fn is_bar_line(item: &QuotationLineItem) -> bool {
    item.description.starts_with(BAR_LINE_PREFIX)
}

/// What to do with the bar line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum BarLineAction {
    Create {
        description: String,
        unit_price: Money,
    },
    Update {
        id: String,
        description: String,
        unit_price: Money,
    },
    Delete {
        id: String,
    },
    Unchanged,
}

impl BarLineAction {
    /// True when carrying out the action writes to the store.
    pub fn is_write(&self) -> bool {
        !matches!(self, BarLineAction::Unchanged)
    }
}

/// Plans the bar line change.
pub fn plan(
    existing: Option<&QuotationLineItem>,
    estimate: Option<&BarCostEstimate>,
    description: String,
) -> BarLineAction {
    match (existing, estimate) {
        (None, None) => BarLineAction::Unchanged,
        (Some(line), None) => BarLineAction::Delete {
            id: line.id.clone(),
        },
        (None, Some(est)) => BarLineAction::Create {
            description,
            unit_price: est.suggested_price,
        },
        (Some(line), Some(est)) => {
            let drift = (line.unit_price() - est.suggested_price).abs();
            if drift > PRICE_TOLERANCE || line.description != description {
                BarLineAction::Update {
                    id: line.id.clone(),
                    description,
                    unit_price: est.suggested_price,
                }
            } else {
                BarLineAction::Unchanged
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::EmptyCatalog;
    use crate::estimator::estimate;
    use crate::types::{BarOption, Climate};
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn config(options: &[BarOption], climate: Climate) -> EventBarConfiguration {
        EventBarConfiguration::new(80, 4, climate, Decimal::new(15, 1)).with_options(options)
    }

    fn line(description: &str, price_cents: i64) -> QuotationLineItem {
        let now = Utc::now();
        QuotationLineItem {
            id: "line-1".to_string(),
            quotation_id: "q-1".to_string(),
            description: description.to_string(),
            quantity: 1,
            unit_price_cents: price_cents,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_describe_basic_without_heat() {
        let cfg = config(&[BarOption::SoftDrinks], Climate::Cool);
        assert_eq!(describe(&cfg), "Servicio de Barra [Básico]  | 80 Pax - 4 Hrs");
    }

    #[test]
    fn test_describe_all_parts() {
        let cfg = config(&BarOption::ALL, Climate::Extreme);
        assert_eq!(
            describe(&cfg),
            "Servicio de Barra [Cerveza/Nacional/Premium/Cocteles/Mixología] 🔥 | 80 Pax - 4 Hrs"
        );
    }

    #[test]
    fn test_is_bar_line() {
        assert!(is_bar_line(&line("Servicio de Barra [Cerveza]  | 1 Pax - 1 Hrs", 0)));
        assert!(!is_bar_line(&line("Renta de salón", 0)));
    }

    #[test]
    fn test_plan_create_and_delete() {
        let cfg = config(&[BarOption::Beer], Climate::Cool);
        let est = estimate(&cfg, EmptyCatalog).unwrap();

        let action = plan(None, Some(&est), describe(&cfg));
        assert_eq!(
            action,
            BarLineAction::Create {
                description: describe(&cfg),
                unit_price: est.suggested_price,
            }
        );

        let existing = line(&describe(&cfg), est.suggested_price.cents());
        assert_eq!(
            plan(Some(&existing), None, String::new()),
            BarLineAction::Delete {
                id: "line-1".to_string()
            }
        );
        assert_eq!(plan(None, None, String::new()), BarLineAction::Unchanged);
    }

    #[test]
    fn test_plan_price_tolerance() {
        let cfg = config(&[BarOption::Beer], Climate::Cool);
        let est = estimate(&cfg, EmptyCatalog).unwrap();
        let price = est.suggested_price.cents();

        let close = line(&describe(&cfg), price + 50);
        let action = plan(Some(&close), Some(&est), describe(&cfg));
        assert!(!action.is_write());

        let drifted = line(&describe(&cfg), price - 51);
        assert!(matches!(
            plan(Some(&drifted), Some(&est), describe(&cfg)),
            BarLineAction::Update { .. }
        ));
    }

    #[test]
    fn test_plan_description_change_updates() {
        let cfg = config(&[BarOption::Beer], Climate::Cool);
        let est = estimate(&cfg, EmptyCatalog).unwrap();
        let stale = line(
            "Servicio de Barra [Cerveza]  | 60 Pax - 4 Hrs",
            est.suggested_price.cents(),
        );

        match plan(Some(&stale), Some(&est), describe(&cfg)) {
            BarLineAction::Update { id, description, .. } => {
                assert_eq!(id, "line-1");
                assert_eq!(description, "Servicio de Barra [Cerveza]  | 80 Pax - 4 Hrs");
            }
            other => panic!("expected update, got {:?}", other),
        }
    }
}
