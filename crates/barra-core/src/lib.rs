//! # barra-core: Pure Bar-Costing Logic
//!
//! Everything needed to turn an event description into a bar quote,
//! as pure functions with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Barra Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    barra-cli (apps/barra-cli)                   │   │
//! │  │        estimate ──► sync --quotation ──► constants              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ barra-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   cost    │  │ estimator │  │allocation │  │ bar_line  │  │   │
//! │  │   │ CostKey   │─►│ BarCost-  │─►│ breakdown │  │  plan()   │  │   │
//! │  │   │ resolve() │  │ Estimator │  │ reconcile │  │ describe()│  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    barra-db (Database Layer)                    │   │
//! │  │      constants snapshot, quotations, bar line synchronizer      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Event configuration, options, breakdown buckets, line items
//! - [`money`] - Integer-cents money with half-up decimal conversion
//! - [`rates`] - The injectable rate table
//! - [`cost`] - Unit cost resolution (catalog item → constant → default)
//! - [`estimator`] - The bar cost estimate
//! - [`allocation`] - Per-bucket price breakdown
//! - [`bar_line`] - Planning changes to the quotation's bar line
//! - [`shopping`] - Shopping list from a bar template
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use barra_core::{BarCostEstimator, BarOption, BarRates, Climate, EmptyCatalog, EventBarConfiguration};
//! use rust_decimal::Decimal;
//!
//! let estimator = BarCostEstimator::new(BarRates::default(), EmptyCatalog);
//! let event = EventBarConfiguration::new(60, 4, Climate::Cool, Decimal::new(14, 1))
//!     .with_options(&[BarOption::SoftDrinks]);
//!
//! let quote = estimator.estimate(&event).unwrap();
//! assert!(quote.suggested_price > quote.total_cost);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod allocation;
pub mod bar_line;
pub mod cost;
pub mod error;
pub mod estimator;
pub mod money;
pub mod rates;
pub mod shopping;
pub mod types;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use bar_line::{BarLineAction, BAR_LINE_PREFIX};
pub use cost::{CostCatalog, CostKey, EmptyCatalog};
pub use error::{CoreError, CoreResult};
pub use estimator::{estimate, BarCostEstimate, BarCostEstimator};
pub use money::Money;
pub use rates::BarRates;
pub use shopping::{BarTemplate, ShoppingList};
pub use types::*;
