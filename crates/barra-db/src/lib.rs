//! # barra-db: Database Layer for Barra
//!
//! SQLite storage for fallback constants, catalog items and quotations, plus
//! the synchronizer that keeps each quotation's bar line current.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  barra-cli  (sync --quotation <id>)                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     barra-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ constants     │    │  (embedded)  │  │   │
//! │  │   │               │◄───│ catalog       │    │ 001_initial  │  │   │
//! │  │   │ SqlitePool    │    │ quotation     │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │            ▲                                                    │   │
//! │  │            └──── BarLineSynchronizer (bar_line.rs)              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  barra-core (pure estimator, no I/O)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use barra_core::BarRates;
//! use barra_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("barra.db")).await?;
//! let outcome = db.bar_lines(BarRates::default()).sync(&quotation_id).await?;
//! println!("{:?}", outcome.action);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod bar_line;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use bar_line::{BarLineSync, BarLineSynchronizer};
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::catalog::CatalogItemRepository;
pub use repository::constants::{ConstantSnapshot, SystemConstant, SystemConstantRepository};
pub use repository::quotation::{Quotation, QuotationRepository, SupplyItemIds};
