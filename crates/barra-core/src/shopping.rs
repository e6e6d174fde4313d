//! # Shopping List
//!
//! Turns an estimate's aggregate quantities into concrete purchases.
//!
//! The estimator only knows "19 national bottles" or "59 L of mixer". A
//! [`BarTemplate`] says how each group splits into products:
//!
//! ```text
//!   national bottles (19) ──► Tequila 0.40 → 8
//!                             Whisky  0.30 → 6
//!                             Ron     0.20 → 4
//!                             Vodka   0.10 → 2
//!
//!   quantity = ceil(group quantity × proportion)
//! ```
//!
//! Mixers are bought in 2 L bottles, so the mixer group quantity is
//! `ceil(mixer_liters / 2)`.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::estimator::BarCostEstimate;

/// Liters in one purchased mixer bottle.
pub const MIXER_BOTTLE_LITERS: u64 = 2;

// =============================================================================
// Template
// =============================================================================

/// A purchase group, sized by one quantity of the estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ShoppingGroup {
    Beer,
    NationalLiquor,
    PremiumLiquor,
    Mixer,
    Water,
    Ice,
}

impl ShoppingGroup {
    /// The estimate quantity that sizes this group.
    pub fn quantity(&self, estimate: &BarCostEstimate) -> u64 {
        match self {
            ShoppingGroup::Beer => estimate.beer_units,
            ShoppingGroup::NationalLiquor => estimate.national_bottles,
            ShoppingGroup::PremiumLiquor => estimate.premium_bottles,
            ShoppingGroup::Mixer => estimate.mixer_liters.div_ceil(MIXER_BOTTLE_LITERS),
            ShoppingGroup::Water => estimate.water_liters,
            ShoppingGroup::Ice => estimate.ice_bags,
        }
    }
}

/// One product in the template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TemplateEntry {
    /// Stable code (e.g. `TEQUILA_NAC`).
    pub code: String,
    pub group: ShoppingGroup,
    /// Product name shown on the list.
    pub name: String,
    /// Share of the group quantity.
    #[ts(as = "String")]
    pub proportion: Decimal,
}

impl TemplateEntry {
    fn new(code: &str, group: ShoppingGroup, name: &str, proportion: Decimal) -> Self {
        TemplateEntry {
            code: code.to_string(),
            group,
            name: name.to_string(),
            proportion,
        }
    }
}

/// Ordered list of products to buy for a bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarTemplate {
    pub entries: Vec<TemplateEntry>,
}

impl Default for BarTemplate {
    fn default() -> Self {
        use ShoppingGroup::*;
        let pct = |n: i64| Decimal::new(n, 2);
        BarTemplate {
            entries: vec![
                TemplateEntry::new("CERVEZA", Beer, "Cerveza Nacional Caguama", pct(100)),
                TemplateEntry::new("TEQUILA_NAC", NationalLiquor, "Tequila Nacional", pct(40)),
                TemplateEntry::new("WHISKY_NAC", NationalLiquor, "Whisky Nacional", pct(30)),
                TemplateEntry::new("RON_NAC", NationalLiquor, "Ron Nacional", pct(20)),
                TemplateEntry::new("VODKA_NAC", NationalLiquor, "Vodka Nacional", pct(10)),
                TemplateEntry::new("TEQUILA_PREM", PremiumLiquor, "Tequila Premium", pct(40)),
                TemplateEntry::new("WHISKY_PREM", PremiumLiquor, "Whisky Premium", pct(30)),
                TemplateEntry::new("GIN_PREM", PremiumLiquor, "Ginebra Premium", pct(30)),
                TemplateEntry::new("REFRESCO_COLA", Mixer, "Refresco de Cola", pct(60)),
                TemplateEntry::new("REFRESCO_TORONJA", Mixer, "Refresco de Toronja", pct(20)),
                TemplateEntry::new("AGUA_MINERAL", Mixer, "Agua Mineral", pct(20)),
                TemplateEntry::new("AGUA_NATURAL", Water, "Agua Natural", pct(100)),
                TemplateEntry::new("HIELO", Ice, "Hielo", pct(100)),
            ],
        }
    }
}

// =============================================================================
// Shopping List
// =============================================================================

/// One line of the shopping list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ShoppingLine {
    pub code: String,
    pub name: String,
    pub group: ShoppingGroup,
    pub quantity: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ShoppingList {
    pub lines: Vec<ShoppingLine>,
}

impl ShoppingList {
    /// Sizes every template entry against the estimate.
    ///
    /// Entries that come out at zero are left off the list.
    pub fn build(estimate: &BarCostEstimate, template: &BarTemplate) -> Self {
        let lines = template
            .entries
            .iter()
            .filter_map(|entry| {
                let group_quantity = Decimal::from(entry.group.quantity(estimate));
                let quantity = (group_quantity * entry.proportion)
                    .ceil()
                    .to_u64()
                    .unwrap_or(0);
                (quantity > 0).then(|| ShoppingLine {
                    code: entry.code.clone(),
                    name: entry.name.clone(),
                    group: entry.group,
                    quantity,
                })
            })
            .collect();
        ShoppingList { lines }
    }

    /// Quantity for a template code, 0 when absent.
    pub fn quantity_of(&self, code: &str) -> u64 {
        self.lines
            .iter()
            .find(|line| line.code == code)
            .map(|line| line.quantity)
            .unwrap_or(0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
