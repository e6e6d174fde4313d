//! # Bar Line Synchronizer
//!
//! Keeps one "Servicio de Barra" line per quotation in step with the latest
//! estimate.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   SINGLE TRANSACTION                                    │
//! │                                                                         │
//! │  1. load quotation + pinned catalog items → EventBarConfiguration      │
//! │  2. load system_constants snapshot                                     │
//! │  3. BarCostEstimator::estimate()            (pure, no I/O)             │
//! │  4. find line whose description starts with "Servicio de Barra"        │
//! │  5. bar_line::plan() → Create / Update / Delete / Unchanged            │
//! │  6. apply the action                                                   │
//! │                                                                         │
//! │  COMMIT                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Running it twice with the same inputs writes nothing the second time.

use barra_core::bar_line::{describe, plan, BAR_LINE_PREFIX};
use barra_core::{BarCostEstimate, BarCostEstimator, BarLineAction, BarRates};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::constants::load_snapshot;
use crate::repository::quotation::{
    bar_configuration, delete_item, fetch_quotation, find_line_by_prefix, insert_item, update_item,
};

/// Result of one sync.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarLineSync {
    pub quotation_id: String,
    pub action: BarLineAction,
    /// The estimate the line was synced against, if the event is eligible.
    pub estimate: Option<BarCostEstimate>,
}

/// Applies bar estimates to quotation lines.
#[derive(Debug, Clone)]
pub struct BarLineSynchronizer {
    pool: SqlitePool,
    rates: BarRates,
}

impl BarLineSynchronizer {
    /// Creates a synchronizer. `rates` should already be validated.
    pub fn new(pool: SqlitePool, rates: BarRates) -> Self {
        BarLineSynchronizer { pool, rates }
    }

    /// Syncs the bar line of one quotation.
    ///
    /// ## Errors
    /// - `DbError::NotFound` if the quotation doesn't exist
    /// - Any database failure; the transaction is rolled back
    pub async fn sync(&self, quotation_id: &str) -> DbResult<BarLineSync> {
        let mut tx = self.pool.begin().await?;

        let quotation = fetch_quotation(&mut tx, quotation_id)
            .await?
            .ok_or_else(|| DbError::not_found("Quotation", quotation_id))?;
        let config = bar_configuration(&mut tx, &quotation).await?;
        let snapshot = load_snapshot(&mut tx).await?;

        let estimate = BarCostEstimator::new(self.rates.clone(), snapshot).estimate(&config);
        let existing = find_line_by_prefix(&mut tx, quotation_id, BAR_LINE_PREFIX).await?;

        let action = plan(existing.as_ref(), estimate.as_ref(), describe(&config));
        debug!(quotation_id = %quotation_id, action = ?action, "Planned bar line change");

        match &action {
            BarLineAction::Create {
                description,
                unit_price,
            } => {
                insert_item(&mut tx, quotation_id, description, 1, *unit_price).await?;
            }
            BarLineAction::Update {
                id,
                description,
                unit_price,
            } => {
                update_item(&mut tx, id, description, 1, *unit_price).await?;
            }
            BarLineAction::Delete { id } => {
                delete_item(&mut tx, id).await?;
            }
            BarLineAction::Unchanged => {}
        }

        tx.commit().await?;

        if action.is_write() {
            info!(
                quotation_id = %quotation_id,
                price = ?estimate.as_ref().map(|e| e.suggested_price.to_string()),
                "Bar line synced"
            );
        }

        Ok(BarLineSync {
            quotation_id: quotation_id.to_string(),
            action,
            estimate,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::quotation::Quotation;
    use crate::{Database, DbConfig};
    use barra_core::{BarOption, CategorySelection, Climate, Money};
    use rust_decimal::Decimal;

    async fn setup(options: &[BarOption]) -> (Database, Quotation) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut q = Quotation::new("Graduación", 100, 5, Climate::Hot, Decimal::new(13, 1));
        q.categories = CategorySelection::from_options(options);
        db.quotations().insert(&q).await.unwrap();
        (db, q)
    }

    #[tokio::test]
    async fn test_first_sync_creates_line() {
        let (db, q) = setup(&[BarOption::Beer, BarOption::NationalLiquor]).await;
        let result = db.bar_lines(BarRates::default()).sync(&q.id).await.unwrap();

        assert!(matches!(result.action, BarLineAction::Create { .. }));
        let line = db.quotations().find_bar_line(&q.id).await.unwrap().unwrap();
        assert_eq!(line.quantity, 1);
        assert_eq!(line.unit_price(), Money::from_cents(2_694_120));
        assert_eq!(
            line.description,
            "Servicio de Barra [Cerveza/Nacional] 🔥 | 100 Pax - 5 Hrs"
        );
    }

    #[tokio::test]
    async fn test_second_sync_writes_nothing() {
        let (db, q) = setup(&[BarOption::Beer]).await;
        let sync = db.bar_lines(BarRates::default());

        sync.sync(&q.id).await.unwrap();
        let before = db.quotations().find_bar_line(&q.id).await.unwrap().unwrap();

        let again = sync.sync(&q.id).await.unwrap();
        assert_eq!(again.action, BarLineAction::Unchanged);

        let after = db.quotations().find_bar_line(&q.id).await.unwrap().unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_disabling_everything_deletes_line() {
        let (db, mut q) = setup(&[BarOption::SoftDrinks]).await;
        let sync = db.bar_lines(BarRates::default());
        sync.sync(&q.id).await.unwrap();

        q.categories = CategorySelection::none();
        db.quotations().update_bar_configuration(&q).await.unwrap();

        let result = sync.sync(&q.id).await.unwrap();
        assert!(matches!(result.action, BarLineAction::Delete { .. }));
        assert!(result.estimate.is_none());
        assert!(db.quotations().find_bar_line(&q.id).await.unwrap().is_none());

        // Nothing left to delete
        let result = sync.sync(&q.id).await.unwrap();
        assert_eq!(result.action, BarLineAction::Unchanged);
    }

    #[tokio::test]
    async fn test_guest_change_updates_in_place() {
        let (db, mut q) = setup(&[BarOption::Beer]).await;
        let sync = db.bar_lines(BarRates::default());
        sync.sync(&q.id).await.unwrap();
        let original = db.quotations().find_bar_line(&q.id).await.unwrap().unwrap();

        q.guest_count = 150;
        db.quotations().update_bar_configuration(&q).await.unwrap();
        let result = sync.sync(&q.id).await.unwrap();
        assert!(matches!(result.action, BarLineAction::Update { .. }));

        let items = db.quotations().list_items(&q.id).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, original.id);
        assert!(items[0].description.contains("150 Pax"));
        assert!(items[0].unit_price() > original.unit_price());
    }

    #[tokio::test]
    async fn test_constant_change_moves_price() {
        let (db, q) = setup(&[BarOption::NationalLiquor]).await;
        let sync = db.bar_lines(BarRates::default());
        let first = sync.sync(&q.id).await.unwrap();

        db.constants()
            .upsert("PRECIO_ALC_NAC", Decimal::new(450, 0), None)
            .await
            .unwrap();
        let second = sync.sync(&q.id).await.unwrap();

        assert!(matches!(second.action, BarLineAction::Update { .. }));
        let (first, second) = (first.estimate.unwrap(), second.estimate.unwrap());
        assert!(second.suggested_price > first.suggested_price);
    }

    #[tokio::test]
    async fn test_unknown_quotation() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = db.bar_lines(BarRates::default()).sync("missing").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
