//! Measurement unit data access

use rust_decimal::Decimal;
use shared::{Unit, UnitResolver, UnitType};
use sqlx::{FromRow, PgPool};

use crate::error::AppResult;

/// Unit service for the static unit reference table
#[derive(Clone)]
pub struct UnitService {
    db: PgPool,
}

/// Row of the `unit` table
#[derive(Debug, FromRow)]
struct UnitRow {
    unit_id: i64,
    unit_label: String,
    unit_multiplier: Decimal,
    unit: Option<i64>,
    unit_type: Option<String>,
}

impl From<UnitRow> for Unit {
    fn from(row: UnitRow) -> Self {
        Unit {
            id: row.unit_id,
            label: row.unit_label,
            multiplier: row.unit_multiplier,
            reference_unit_id: row.unit,
            unit_type: row.unit_type.and_then(|t| t.parse().ok()),
        }
    }
}

impl UnitService {
    /// Create a new UnitService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List units, optionally restricted to one unit type
    pub async fn list_units(&self, unit_type: Option<UnitType>) -> AppResult<Vec<Unit>> {
        let rows = sqlx::query_as::<_, UnitRow>(
            r#"
            SELECT unit_id, unit_label, unit_multiplier, unit, unit_type
            FROM unit
            WHERE $1::text IS NULL OR unit_type = $1
            ORDER BY unit_type, unit_id
            "#,
        )
        .bind(unit_type.map(|t| t.as_str()))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Unit::from).collect())
    }

    /// Build a resolver over the whole unit table
    pub async fn resolver(&self) -> AppResult<UnitResolver> {
        let units = self.list_units(None).await?;
        Ok(UnitResolver::new(units)?)
    }

    /// Reference units ordered by id
    pub async fn list_reference_units(&self) -> AppResult<Vec<Unit>> {
        let resolver = self.resolver().await?;
        Ok(resolver.reference_units().into_iter().cloned().collect())
    }
}
