//! # System Constant Repository
//!
//! Fallback unit costs (`PRECIO_HIELO_20KG`, `COSTO_BARMAN`, ...) stored as
//! key/value rows. The estimator never queries this table directly: a
//! [`ConstantSnapshot`] is loaded once and handed over.

use barra_core::money::parse_decimal;
use barra_core::CostKey;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{SqliteConnection, SqlitePool};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::error::DbResult;

/// In-memory copy of the constant table. Implements `CostCatalog`.
pub type ConstantSnapshot = BTreeMap<String, Decimal>;

/// A stored constant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemConstant {
    pub key: String,
    pub value: Decimal,
    pub description: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct ConstantRow {
    key: String,
    value: String,
    description: Option<String>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ConstantRow> for SystemConstant {
    type Error = crate::error::DbError;

    fn try_from(row: ConstantRow) -> DbResult<Self> {
        Ok(SystemConstant {
            value: parse_decimal(&row.key, &row.value)?,
            key: row.key,
            description: row.description,
            updated_at: row.updated_at,
        })
    }
}

/// Human-readable description for the well-known keys.
pub fn describe_key(key: CostKey) -> &'static str {
    match key {
        CostKey::Ice => "Bolsa de hielo 20kg",
        CostKey::Mixer => "Refresco 2L",
        CostKey::Water => "Agua natural",
        CostKey::NationalLiquor => "Botella licor nacional",
        CostKey::PremiumLiquor => "Botella licor premium",
        CostKey::Bartender => "Barman por evento",
        CostKey::Assistant => "Auxiliar de barra por evento",
    }
}

/// Repository for fallback constants.
#[derive(Debug, Clone)]
pub struct SystemConstantRepository {
    pool: SqlitePool,
}

impl SystemConstantRepository {
    /// Creates a new SystemConstantRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SystemConstantRepository { pool }
    }

    /// Gets a constant by key.
    pub async fn get(&self, key: &str) -> DbResult<Option<SystemConstant>> {
        let row = sqlx::query_as::<_, ConstantRow>(
            r#"
            SELECT key, value, description, updated_at
            FROM system_constants
            WHERE key = ?1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        row.map(SystemConstant::try_from).transpose()
    }

    /// Lists every constant, ordered by key.
    pub async fn list(&self) -> DbResult<Vec<SystemConstant>> {
        let rows = sqlx::query_as::<_, ConstantRow>(
            r#"
            SELECT key, value, description, updated_at
            FROM system_constants
            ORDER BY key ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(SystemConstant::try_from).collect()
    }

    /// Inserts or replaces a constant.
    pub async fn upsert(&self, key: &str, value: Decimal, description: Option<&str>) -> DbResult<()> {
        debug!(key = %key, value = %value, "Upserting system constant");

        sqlx::query(
            r#"
            INSERT INTO system_constants (key, value, description, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT (key) DO UPDATE SET
                value = excluded.value,
                description = COALESCE(excluded.description, system_constants.description),
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value.to_string())
        .bind(description)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Inserts a constant only when the key is not present.
    ///
    /// ## Returns
    /// `true` when a row was written.
    pub async fn insert_if_absent(
        &self,
        key: &str,
        value: Decimal,
        description: Option<&str>,
    ) -> DbResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO system_constants (key, value, description, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT (key) DO NOTHING
            "#,
        )
        .bind(key)
        .bind(value.to_string())
        .bind(description)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Loads the whole table into memory.
    pub async fn load_snapshot(&self) -> DbResult<ConstantSnapshot> {
        let mut conn = self.pool.acquire().await?;
        load_snapshot(&mut conn).await
    }
}

/// Loads the constant table on an existing connection (or transaction).
///
/// Rows whose value does not parse are skipped with a warning, so the
/// estimator falls back to the hardcoded default for that key.
pub async fn load_snapshot(conn: &mut SqliteConnection) -> DbResult<ConstantSnapshot> {
    let rows = sqlx::query_as::<_, ConstantRow>(
        "SELECT key, value, description, updated_at FROM system_constants",
    )
    .fetch_all(&mut *conn)
    .await?;

    let mut snapshot = ConstantSnapshot::new();
    for row in rows {
        match parse_decimal(&row.key, &row.value) {
            Ok(value) => {
                snapshot.insert(row.key, value);
            }
            Err(e) => warn!(key = %row.key, error = %e, "Ignoring unparseable constant"),
        }
    }

    debug!(count = snapshot.len(), "Loaded constant snapshot");
    Ok(snapshot)
}

// =============================================================================
// Unit Tests
// =============================================================================
