//! Product stock service
//!
//! Loads the visible part of the location forest and the product's storages
//! once per request, then runs the stock aggregator over that snapshot.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shared::{
    compute_stock_for_product, stock_figures, EntityId, ProductId, Stock, StockLocation,
    StockSnapshot, StockUnit, Storage, StoreLocation, Unit, UnitScope,
};
use sqlx::{FromRow, PgPool};

use crate::error::{AppError, AppResult};
use crate::services::{StoreLocationService, UnitService};

/// Stock service computing per-location stock figures for a product
#[derive(Clone)]
pub struct StockService {
    db: PgPool,
}

/// Row of the `storage` table
#[derive(Debug, FromRow)]
struct StorageRow {
    storage_id: i64,
    product: i64,
    storelocation: i64,
    storage_quantity: Option<Decimal>,
    unit_quantity: Option<i64>,
    storage_archive: bool,
    storage: Option<i64>,
    storage_creationdate: DateTime<Utc>,
    storage_modificationdate: DateTime<Utc>,
}

impl From<StorageRow> for Storage {
    fn from(row: StorageRow) -> Self {
        Storage {
            id: row.storage_id,
            product_id: row.product,
            store_location_id: row.storelocation,
            quantity: row.storage_quantity,
            unit_id: row.unit_quantity,
            archived: row.storage_archive,
            history_of: row.storage,
            created_at: Some(row.storage_creationdate),
            modified_at: Some(row.storage_modificationdate),
        }
    }
}

impl StockService {
    /// Create a new StockService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn product_exists(&self, product_id: ProductId) -> AppResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM product WHERE product_id = $1)",
        )
        .bind(product_id)
        .fetch_one(&self.db)
        .await?;

        Ok(exists)
    }

    /// Load the locations of `entity_ids`, the active storages of the product
    /// held there, and the unit table
    pub async fn load_snapshot(
        &self,
        product_id: ProductId,
        entity_ids: &[EntityId],
    ) -> AppResult<StockSnapshot> {
        let resolver = UnitService::new(self.db.clone()).resolver().await?;
        let locations = StoreLocationService::new(self.db.clone())
            .list_for_entities(entity_ids)
            .await?;

        let storages = sqlx::query_as::<_, StorageRow>(
            r#"
            SELECT s.storage_id, s.product, s.storelocation, s.storage_quantity, s.unit_quantity,
                   s.storage_archive, s.storage, s.storage_creationdate, s.storage_modificationdate
            FROM storage s
            JOIN storelocation sl ON sl.storelocation_id = s.storelocation
            WHERE s.product = $1
              AND sl.entity = ANY($2)
              AND s.storage IS NULL
              AND s.storage_quantity IS NOT NULL
              AND s.storage_archive = false
            "#,
        )
        .bind(product_id)
        .bind(entity_ids.to_vec())
        .fetch_all(&self.db)
        .await?;

        Ok(StockSnapshot::new(
            locations,
            storages.into_iter().map(Storage::from),
            resolver,
        ))
    }

    /// Annotate the caller's root store locations with the stock of a product
    pub async fn compute_for_product(
        &self,
        product_id: ProductId,
        entity_ids: &[EntityId],
    ) -> AppResult<Vec<StockLocation>> {
        if !self.product_exists(product_id).await? {
            return Err(AppError::NotFound("Product".to_string()));
        }

        let roots = StoreLocationService::new(self.db.clone())
            .roots_for_entities(entity_ids)
            .await?;
        let snapshot = self.load_snapshot(product_id, entity_ids).await?;
        let reference_units: Vec<Unit> = snapshot
            .resolver()
            .reference_units()
            .into_iter()
            .cloned()
            .collect();

        let forest = compute_stock_for_product(&snapshot, product_id, roots, &reference_units)?;

        tracing::debug!(
            product_id,
            roots = forest.len(),
            units = reference_units.len(),
            "Computed product stock"
        );

        Ok(forest)
    }

    /// Stock figures of a product for one location subtree, one entry per
    /// reference unit followed by the unit-less entry
    pub async fn figures_at(
        &self,
        product_id: ProductId,
        location: &StoreLocation,
    ) -> AppResult<Vec<Stock>> {
        if !self.product_exists(product_id).await? {
            return Err(AppError::NotFound("Product".to_string()));
        }

        let snapshot = self
            .load_snapshot(product_id, &[location.entity_id])
            .await?;

        let mut stocks = Vec::new();
        for unit in snapshot.resolver().reference_units() {
            let figures = stock_figures(
                &snapshot,
                product_id,
                location.id,
                UnitScope::Reference(unit.id),
            )?;
            stocks.push(Stock {
                unit: Some(StockUnit::from(unit)),
                current: figures.current,
                total: figures.total,
            });
        }

        let figures = stock_figures(&snapshot, product_id, location.id, UnitScope::NoUnit)?;
        stocks.push(Stock {
            unit: None,
            current: figures.current,
            total: figures.total,
        });

        Ok(stocks)
    }
}
