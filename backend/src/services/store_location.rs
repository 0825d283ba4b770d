//! Store location data access

use std::collections::HashMap;

use shared::{build_full_path, EntityId, StoreLocation, StoreLocationId};
use sqlx::{FromRow, PgPool};

use crate::error::{AppError, AppResult};

/// Store location service for read access to location trees
#[derive(Clone)]
pub struct StoreLocationService {
    db: PgPool,
}

/// Row of the `storelocation` table
#[derive(Debug, FromRow)]
struct StoreLocationRow {
    storelocation_id: i64,
    storelocation_name: String,
    storelocation_color: Option<String>,
    storelocation_canstore: bool,
    storelocation_fullpath: Option<String>,
    entity: i64,
    storelocation: Option<i64>,
}

impl From<StoreLocationRow> for StoreLocation {
    fn from(row: StoreLocationRow) -> Self {
        StoreLocation {
            id: row.storelocation_id,
            name: row.storelocation_name,
            color: row.storelocation_color,
            can_store: row.storelocation_canstore,
            full_path: row.storelocation_fullpath,
            entity_id: row.entity,
            parent_id: row.storelocation,
        }
    }
}

impl StoreLocationService {
    /// Create a new StoreLocationService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Get a store location, computing its full path when none is stored
    pub async fn get(&self, id: StoreLocationId) -> AppResult<StoreLocation> {
        let mut location: StoreLocation = sqlx::query_as::<_, StoreLocationRow>(
            r#"
            SELECT storelocation_id, storelocation_name, storelocation_color,
                   storelocation_canstore, storelocation_fullpath, entity, storelocation
            FROM storelocation
            WHERE storelocation_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Store location".to_string()))?
        .into();

        if location.full_path.is_none() {
            let siblings: HashMap<StoreLocationId, StoreLocation> = self
                .list_for_entities(&[location.entity_id])
                .await?
                .into_iter()
                .map(|l| (l.id, l))
                .collect();
            location.full_path = Some(build_full_path(&location, &siblings)?);
        }

        Ok(location)
    }

    /// Direct children of a store location
    pub async fn children(&self, id: StoreLocationId) -> AppResult<Vec<StoreLocation>> {
        let rows = sqlx::query_as::<_, StoreLocationRow>(
            r#"
            SELECT storelocation_id, storelocation_name, storelocation_color,
                   storelocation_canstore, storelocation_fullpath, entity, storelocation
            FROM storelocation
            WHERE storelocation = $1
            ORDER BY storelocation_id
            "#,
        )
        .bind(id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(StoreLocation::from).collect())
    }

    /// All store locations of the given entities
    pub async fn list_for_entities(&self, entity_ids: &[EntityId]) -> AppResult<Vec<StoreLocation>> {
        let rows = sqlx::query_as::<_, StoreLocationRow>(
            r#"
            SELECT storelocation_id, storelocation_name, storelocation_color,
                   storelocation_canstore, storelocation_fullpath, entity, storelocation
            FROM storelocation
            WHERE entity = ANY($1)
            ORDER BY storelocation_id
            "#,
        )
        .bind(entity_ids.to_vec())
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(StoreLocation::from).collect())
    }

    /// Parentless store locations of the given entities
    pub async fn roots_for_entities(&self, entity_ids: &[EntityId]) -> AppResult<Vec<StoreLocation>> {
        let rows = sqlx::query_as::<_, StoreLocationRow>(
            r#"
            SELECT storelocation_id, storelocation_name, storelocation_color,
                   storelocation_canstore, storelocation_fullpath, entity, storelocation
            FROM storelocation
            WHERE storelocation IS NULL AND entity = ANY($1)
            ORDER BY storelocation_id
            "#,
        )
        .bind(entity_ids.to_vec())
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(StoreLocation::from).collect())
    }

    /// Whether no storage references the store location
    pub async fn is_empty(&self, id: StoreLocationId) -> AppResult<bool> {
        let empty = sqlx::query_scalar::<_, bool>(
            "SELECT NOT EXISTS(SELECT 1 FROM storage WHERE storelocation = $1)",
        )
        .bind(id)
        .fetch_one(&self.db)
        .await?;

        Ok(empty)
    }
}
