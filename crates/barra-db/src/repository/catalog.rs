//! # Catalog Item Repository
//!
//! Purchasable supplies (ice bags, bottles, staff shifts) that a quotation
//! can pin as the source of a unit cost.

use barra_core::money::parse_decimal;
use barra_core::{CatalogItem, Money};
use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};

#[derive(Debug, sqlx::FromRow)]
struct CatalogRow {
    id: String,
    name: String,
    unit: String,
    unit_cost_cents: i64,
    yield_factor: String,
}

impl TryFrom<CatalogRow> for CatalogItem {
    type Error = DbError;

    fn try_from(row: CatalogRow) -> DbResult<Self> {
        Ok(CatalogItem {
            yield_factor: parse_decimal("yield_factor", &row.yield_factor)?,
            id: row.id,
            name: row.name,
            unit: row.unit,
            unit_cost_cents: row.unit_cost_cents,
        })
    }
}

/// Repository for catalog items.
#[derive(Debug, Clone)]
pub struct CatalogItemRepository {
    pool: SqlitePool,
}

impl CatalogItemRepository {
    /// Creates a new CatalogItemRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogItemRepository { pool }
    }

    /// Creates and stores a new item with a fresh UUID.
    pub async fn create(
        &self,
        name: &str,
        unit: &str,
        unit_cost: Money,
        yield_factor: Decimal,
    ) -> DbResult<CatalogItem> {
        let item = CatalogItem {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            unit: unit.to_string(),
            unit_cost_cents: unit_cost.cents(),
            yield_factor,
        };
        self.insert(&item).await?;
        Ok(item)
    }

    /// Inserts an item.
    pub async fn insert(&self, item: &CatalogItem) -> DbResult<()> {
        debug!(id = %item.id, name = %item.name, "Inserting catalog item");
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO catalog_items (
                id, name, unit, unit_cost_cents, yield_factor, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
            "#,
        )
        .bind(&item.id)
        .bind(&item.name)
        .bind(&item.unit)
        .bind(item.unit_cost_cents)
        .bind(item.yield_factor.to_string())
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets an item by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<CatalogItem>> {
        let mut conn = self.pool.acquire().await?;
        get_by_id(&mut conn, id).await
    }

    /// Lists all items by name.
    pub async fn list(&self) -> DbResult<Vec<CatalogItem>> {
        let rows = sqlx::query_as::<_, CatalogRow>(
            r#"
            SELECT id, name, unit, unit_cost_cents, yield_factor
            FROM catalog_items
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(CatalogItem::try_from).collect()
    }

    /// Updates the purchase cost of an item.
    pub async fn update_cost(&self, id: &str, unit_cost: Money) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE catalog_items SET
                unit_cost_cents = ?2,
                updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(unit_cost.cents())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("CatalogItem", id));
        }
        Ok(())
    }

    /// Number of items.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM catalog_items")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

/// Gets an item on an existing connection (or transaction).
pub async fn get_by_id(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<CatalogItem>> {
    let row = sqlx::query_as::<_, CatalogRow>(
        r#"
        SELECT id, name, unit, unit_cost_cents, yield_factor
        FROM catalog_items
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    row.map(CatalogItem::try_from).transpose()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig, DbError};
    use barra_core::Money;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn test_create_and_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.catalog();

        let item = repo
            .create("Hielo 20kg", "bolsa", Money::from_units(95), Decimal::ONE)
            .await
            .unwrap();

        let loaded = repo.get_by_id(&item.id).await.unwrap().unwrap();
        assert_eq!(loaded, item);
        assert_eq!(repo.count().await.unwrap(), 1);
        assert!(repo.get_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_yield_factor_round_trips_as_text() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.catalog();

        let pack = repo
            .create("Refresco 2L (12 pack)", "paquete", Money::from_units(264), Decimal::new(12, 0))
            .await
            .unwrap();
        repo.update_cost(&pack.id, Money::from_units(288)).await.unwrap();

        let items = repo.list().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].yield_factor, Decimal::new(12, 0));
        assert_eq!(items[0].unit_cost(), Money::from_units(288));
    }

    #[tokio::test]
    async fn test_update_missing_item() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = db
            .catalog()
            .update_cost("nope", Money::zero())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
