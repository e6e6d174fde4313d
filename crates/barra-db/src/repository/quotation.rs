//! # Quotation Repository
//!
//! Quotations carry the event's bar configuration; their line items include
//! the single "Servicio de Barra" line kept in sync by
//! [`BarLineSynchronizer`](crate::bar_line::BarLineSynchronizer).
//!
//! ## Row → Domain
//! ```text
//! quotations row ──► Quotation ──► EventBarConfiguration
//!                      │                 ▲
//!                      └─ *_item_id ─────┘ (catalog_items looked up by id)
//! ```
//!
//! Functions that take a `&mut SqliteConnection` work on a pool connection
//! or inside a transaction; the repository methods wrap them for callers
//! that only hold the pool.

use barra_core::bar_line::BAR_LINE_PREFIX;
use barra_core::money::parse_decimal;
use barra_core::{
    CategorySelection, Climate, EventBarConfiguration, Money, QuotationLineItem, SupplySelection,
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::catalog;

// =============================================================================
// Records
// =============================================================================

/// Catalog item pinned per resource, by id.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SupplyItemIds {
    pub ice: Option<String>,
    pub soft_drink: Option<String>,
    pub water: Option<String>,
    pub national_liquor: Option<String>,
    pub premium_liquor: Option<String>,
    pub bartender: Option<String>,
    pub assistant: Option<String>,
}

/// A stored quotation (only the fields the bar cares about).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quotation {
    pub id: String,
    pub customer_name: String,
    pub event_date: Option<NaiveDate>,
    pub guest_count: i64,
    pub service_hours: i64,
    pub climate: Climate,
    pub profit_factor: Decimal,
    pub categories: CategorySelection,
    pub supply_items: SupplyItemIds,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Quotation {
    /// Creates a quotation with a fresh UUID and no bar options enabled.
    pub fn new(
        customer_name: impl Into<String>,
        guest_count: i64,
        service_hours: i64,
        climate: Climate,
        profit_factor: Decimal,
    ) -> Self {
        let now = Utc::now();
        Quotation {
            id: Uuid::new_v4().to_string(),
            customer_name: customer_name.into(),
            event_date: None,
            guest_count,
            service_hours,
            climate,
            profit_factor,
            categories: CategorySelection::none(),
            supply_items: SupplyItemIds::default(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct QuotationRow {
    id: String,
    customer_name: String,
    event_date: Option<NaiveDate>,
    guest_count: i64,
    service_hours: i64,
    climate: Climate,
    profit_factor: String,
    includes_soft_drinks: bool,
    includes_beer: bool,
    includes_national_liquor: bool,
    includes_premium_liquor: bool,
    includes_basic_cocktails: bool,
    includes_premium_cocktails: bool,
    ice_item_id: Option<String>,
    soft_drink_item_id: Option<String>,
    water_item_id: Option<String>,
    national_liquor_item_id: Option<String>,
    premium_liquor_item_id: Option<String>,
    bartender_item_id: Option<String>,
    assistant_item_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<QuotationRow> for Quotation {
    type Error = DbError;

    fn try_from(row: QuotationRow) -> DbResult<Self> {
        Ok(Quotation {
            profit_factor: parse_decimal("profit_factor", &row.profit_factor)?,
            id: row.id,
            customer_name: row.customer_name,
            event_date: row.event_date,
            guest_count: row.guest_count,
            service_hours: row.service_hours,
            climate: row.climate,
            categories: CategorySelection {
                soft_drinks: row.includes_soft_drinks,
                beer: row.includes_beer,
                national_liquor: row.includes_national_liquor,
                premium_liquor: row.includes_premium_liquor,
                basic_cocktails: row.includes_basic_cocktails,
                premium_cocktails: row.includes_premium_cocktails,
            },
            supply_items: SupplyItemIds {
                ice: row.ice_item_id,
                soft_drink: row.soft_drink_item_id,
                water: row.water_item_id,
                national_liquor: row.national_liquor_item_id,
                premium_liquor: row.premium_liquor_item_id,
                bartender: row.bartender_item_id,
                assistant: row.assistant_item_id,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const SELECT_QUOTATION: &str = r#"
    SELECT
        id, customer_name, event_date,
        guest_count, service_hours, climate, profit_factor,
        includes_soft_drinks, includes_beer, includes_national_liquor,
        includes_premium_liquor, includes_basic_cocktails, includes_premium_cocktails,
        ice_item_id, soft_drink_item_id, water_item_id,
        national_liquor_item_id, premium_liquor_item_id,
        bartender_item_id, assistant_item_id,
        created_at, updated_at
    FROM quotations
    WHERE id = ?1
"#;

const SELECT_ITEM_COLUMNS: &str =
    "id, quotation_id, description, quantity, unit_price_cents, created_at, updated_at";

// =============================================================================
// Repository
// =============================================================================

/// Repository for quotations and their line items.
#[derive(Debug, Clone)]
pub struct QuotationRepository {
    pool: SqlitePool,
}

impl QuotationRepository {
    /// Creates a new QuotationRepository.
    pub fn new(pool: SqlitePool) -> Self {
        QuotationRepository { pool }
    }

    /// Inserts a quotation.
    pub async fn insert(&self, q: &Quotation) -> DbResult<()> {
        debug!(id = %q.id, customer = %q.customer_name, "Inserting quotation");

        sqlx::query(
            r#"
            INSERT INTO quotations (
                id, customer_name, event_date,
                guest_count, service_hours, climate, profit_factor,
                includes_soft_drinks, includes_beer, includes_national_liquor,
                includes_premium_liquor, includes_basic_cocktails, includes_premium_cocktails,
                ice_item_id, soft_drink_item_id, water_item_id,
                national_liquor_item_id, premium_liquor_item_id,
                bartender_item_id, assistant_item_id,
                created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3,
                ?4, ?5, ?6, ?7,
                ?8, ?9, ?10,
                ?11, ?12, ?13,
                ?14, ?15, ?16,
                ?17, ?18,
                ?19, ?20,
                ?21, ?22
            )
            "#,
        )
        .bind(&q.id)
        .bind(&q.customer_name)
        .bind(q.event_date)
        .bind(q.guest_count)
        .bind(q.service_hours)
        .bind(q.climate)
        .bind(q.profit_factor.to_string())
        .bind(q.categories.soft_drinks)
        .bind(q.categories.beer)
        .bind(q.categories.national_liquor)
        .bind(q.categories.premium_liquor)
        .bind(q.categories.basic_cocktails)
        .bind(q.categories.premium_cocktails)
        .bind(&q.supply_items.ice)
        .bind(&q.supply_items.soft_drink)
        .bind(&q.supply_items.water)
        .bind(&q.supply_items.national_liquor)
        .bind(&q.supply_items.premium_liquor)
        .bind(&q.supply_items.bartender)
        .bind(&q.supply_items.assistant)
        .bind(q.created_at)
        .bind(q.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a quotation by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Quotation>> {
        let mut conn = self.pool.acquire().await?;
        fetch_quotation(&mut conn, id).await
    }

    /// Rewrites the bar configuration of an existing quotation.
    pub async fn update_bar_configuration(&self, q: &Quotation) -> DbResult<()> {
        debug!(id = %q.id, guests = q.guest_count, "Updating bar configuration");

        let result = sqlx::query(
            r#"
            UPDATE quotations SET
                guest_count = ?2,
                service_hours = ?3,
                climate = ?4,
                profit_factor = ?5,
                includes_soft_drinks = ?6,
                includes_beer = ?7,
                includes_national_liquor = ?8,
                includes_premium_liquor = ?9,
                includes_basic_cocktails = ?10,
                includes_premium_cocktails = ?11,
                ice_item_id = ?12,
                soft_drink_item_id = ?13,
                water_item_id = ?14,
                national_liquor_item_id = ?15,
                premium_liquor_item_id = ?16,
                bartender_item_id = ?17,
                assistant_item_id = ?18,
                updated_at = ?19
            WHERE id = ?1
            "#,
        )
        .bind(&q.id)
        .bind(q.guest_count)
        .bind(q.service_hours)
        .bind(q.climate)
        .bind(q.profit_factor.to_string())
        .bind(q.categories.soft_drinks)
        .bind(q.categories.beer)
        .bind(q.categories.national_liquor)
        .bind(q.categories.premium_liquor)
        .bind(q.categories.basic_cocktails)
        .bind(q.categories.premium_cocktails)
        .bind(&q.supply_items.ice)
        .bind(&q.supply_items.soft_drink)
        .bind(&q.supply_items.water)
        .bind(&q.supply_items.national_liquor)
        .bind(&q.supply_items.premium_liquor)
        .bind(&q.supply_items.bartender)
        .bind(&q.supply_items.assistant)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Quotation", &q.id));
        }
        Ok(())
    }

    /// Loads the estimator input for a quotation.
    pub async fn load_bar_configuration(&self, id: &str) -> DbResult<EventBarConfiguration> {
        let mut conn = self.pool.acquire().await?;
        let quotation = fetch_quotation(&mut conn, id)
            .await?
            .ok_or_else(|| DbError::not_found("Quotation", id))?;
        bar_configuration(&mut conn, &quotation).await
    }

    /// Lists a quotation's line items, oldest first.
    pub async fn list_items(&self, quotation_id: &str) -> DbResult<Vec<QuotationLineItem>> {
        let items = sqlx::query_as::<_, QuotationLineItem>(&format!(
            "SELECT {} FROM quotation_items WHERE quotation_id = ?1 ORDER BY created_at ASC, id ASC",
            SELECT_ITEM_COLUMNS
        ))
        .bind(quotation_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Adds a line item.
    pub async fn add_item(
        &self,
        quotation_id: &str,
        description: &str,
        quantity: i64,
        unit_price: Money,
    ) -> DbResult<QuotationLineItem> {
        let mut conn = self.pool.acquire().await?;
        insert_item(&mut conn, quotation_id, description, quantity, unit_price).await
    }

    /// Finds the bar line of a quotation.
    pub async fn find_bar_line(&self, quotation_id: &str) -> DbResult<Option<QuotationLineItem>> {
        let mut conn = self.pool.acquire().await?;
        find_line_by_prefix(&mut conn, quotation_id, BAR_LINE_PREFIX).await
    }

    /// Updates a line item in place.
    pub async fn update_item(
        &self,
        id: &str,
        description: &str,
        quantity: i64,
        unit_price: Money,
    ) -> DbResult<()> {
        let mut conn = self.pool.acquire().await?;
        update_item(&mut conn, id, description, quantity, unit_price).await
    }

    /// Deletes a line item.
    pub async fn delete_item(&self, id: &str) -> DbResult<()> {
        let mut conn = self.pool.acquire().await?;
        delete_item(&mut conn, id).await
    }
}

// =============================================================================
// Connection-level operations
// =============================================================================

/// Fetches a quotation.
pub async fn fetch_quotation(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<Quotation>> {
    let row = sqlx::query_as::<_, QuotationRow>(SELECT_QUOTATION)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    row.map(Quotation::try_from).transpose()
}

/// Builds the estimator input, resolving pinned catalog items.
///
/// A pinned id that no longer exists is treated as not pinned.
pub async fn bar_configuration(
    conn: &mut SqliteConnection,
    quotation: &Quotation,
) -> DbResult<EventBarConfiguration> {
    let ids = &quotation.supply_items;
    let supplies = SupplySelection {
        ice: load_item(conn, ids.ice.as_deref()).await?,
        soft_drink: load_item(conn, ids.soft_drink.as_deref()).await?,
        water: load_item(conn, ids.water.as_deref()).await?,
        national_liquor: load_item(conn, ids.national_liquor.as_deref()).await?,
        premium_liquor: load_item(conn, ids.premium_liquor.as_deref()).await?,
        bartender: load_item(conn, ids.bartender.as_deref()).await?,
        assistant: load_item(conn, ids.assistant.as_deref()).await?,
    };

    Ok(EventBarConfiguration {
        guest_count: quotation.guest_count,
        service_hours: quotation.service_hours,
        climate: quotation.climate,
        profit_factor: quotation.profit_factor,
        categories: quotation.categories,
        supplies,
    })
}

async fn load_item(
    conn: &mut SqliteConnection,
    id: Option<&str>,
) -> DbResult<Option<barra_core::CatalogItem>> {
    match id {
        Some(id) => catalog::get_by_id(conn, id).await,
        None => Ok(None),
    }
}

/// First line item (oldest) whose description starts with `prefix`.
pub async fn find_line_by_prefix(
    conn: &mut SqliteConnection,
    quotation_id: &str,
    prefix: &str,
) -> DbResult<Option<QuotationLineItem>> {
    // substr() keeps the match case-sensitive, unlike LIKE
    let item = sqlx::query_as::<_, QuotationLineItem>(&format!(
        r#"
        SELECT {}
        FROM quotation_items
        WHERE quotation_id = ?1
          AND substr(description, 1, length(?2)) = ?2
        ORDER BY created_at ASC, id ASC
        LIMIT 1
        "#,
        SELECT_ITEM_COLUMNS
    ))
    .bind(quotation_id)
    .bind(prefix)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(item)
}

/// Inserts a line item with a fresh UUID.
pub async fn insert_item(
    conn: &mut SqliteConnection,
    quotation_id: &str,
    description: &str,
    quantity: i64,
    unit_price: Money,
) -> DbResult<QuotationLineItem> {
    let now = Utc::now();
    let item = QuotationLineItem {
        id: Uuid::new_v4().to_string(),
        quotation_id: quotation_id.to_string(),
        description: description.to_string(),
        quantity,
        unit_price_cents: unit_price.cents(),
        created_at: now,
        updated_at: now,
    };

    sqlx::query(
        r#"
        INSERT INTO quotation_items (
            id, quotation_id, description, quantity, unit_price_cents, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(&item.id)
    .bind(&item.quotation_id)
    .bind(&item.description)
    .bind(item.quantity)
    .bind(item.unit_price_cents)
    .bind(item.created_at)
    .bind(item.updated_at)
    .execute(&mut *conn)
    .await?;

    Ok(item)
}

/// Rewrites a line item's description, quantity and price.
pub async fn update_item(
    conn: &mut SqliteConnection,
    id: &str,
    description: &str,
    quantity: i64,
    unit_price: Money,
) -> DbResult<()> {
    let result = sqlx::query(
        r#"
        UPDATE quotation_items SET
            description = ?2,
            quantity = ?3,
            unit_price_cents = ?4,
            updated_at = ?5
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .bind(description)
    .bind(quantity)
    .bind(unit_price.cents())
    .bind(Utc::now())
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found("QuotationLineItem", id));
    }
    Ok(())
}

/// Deletes a line item.
pub async fn delete_item(conn: &mut SqliteConnection, id: &str) -> DbResult<()> {
    let result = sqlx::query("DELETE FROM quotation_items WHERE id = ?1")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found("QuotationLineItem", id));
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
