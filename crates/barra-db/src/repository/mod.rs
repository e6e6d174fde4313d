//! # Repository Module
//!
//! Database repository implementations for Barra.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CLI command                                                           │
//! │       │                                                                 │
//! │       │  db.quotations().load_bar_configuration(id)                    │
//! │       ▼                                                                 │
//! │  QuotationRepository                                                   │
//! │  ├── insert / get_by_id / update_bar_configuration                     │
//! │  ├── list_items / add_item / update_item / delete_item                 │
//! │  └── find_bar_line                                                     │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`SystemConstantRepository`](constants::SystemConstantRepository) - Fallback unit costs
//! - [`CatalogItemRepository`](catalog::CatalogItemRepository) - Purchasable supplies
//! - [`QuotationRepository`](quotation::QuotationRepository) - Quotations and line items

pub mod catalog;
pub mod constants;
pub mod quotation;
