use async_trait::async_trait;
use sqlx::PgPool;

use super::{ChangeTracker, VillaFilter, VillaRepository, VillaStore};
use crate::core::error::{AppError, Result};
use crate::features::villas::models::{NewVilla, Villa};

const VILLA_COLUMNS: &str = "id, name, details, rate, occupancy, square_footage, image_url, amenity, created_at, updated_at";

/// PostgreSQL-backed store sharing one connection pool across scopes
#[derive(Debug, Clone)]
pub struct PgVillaStore {
    pool: PgPool,
}

impl PgVillaStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl VillaStore for PgVillaStore {
    fn scope(&self) -> Box<dyn VillaRepository> {
        Box::new(PgVillaRepository {
            pool: self.pool.clone(),
            tracker: ChangeTracker::default(),
        })
    }
}

pub struct PgVillaRepository {
    pool: PgPool,
    tracker: ChangeTracker,
}

#[async_trait]
impl VillaRepository for PgVillaRepository {
    async fn get_all(&mut self) -> Result<Vec<Villa>> {
        let query = format!("SELECT {} FROM villas ORDER BY id", VILLA_COLUMNS);
        sqlx::query_as::<_, Villa>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list villas: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn get(&mut self, filter: &VillaFilter, tracked: bool) -> Result<Option<Villa>> {
        let villa = match filter {
            VillaFilter::Id(id) => {
                let query = format!("SELECT {} FROM villas WHERE id = $1", VILLA_COLUMNS);
                sqlx::query_as::<_, Villa>(&query)
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await
            }
            VillaFilter::NameIgnoreCase(name) => {
                let query = format!(
                    "SELECT {} FROM villas WHERE LOWER(name) = LOWER($1) ORDER BY id LIMIT 1",
                    VILLA_COLUMNS
                );
                sqlx::query_as::<_, Villa>(&query)
                    .bind(name)
                    .fetch_optional(&self.pool)
                    .await
            }
        }
        .map_err(|e| {
            tracing::error!("Failed to get villa by {:?}: {:?}", filter, e);
            AppError::Database(e)
        })?;

        if tracked {
            if let Some(ref v) = villa {
                self.tracker.attach(v);
            }
        }
        Ok(villa)
    }

    async fn create(&mut self, villa: NewVilla) -> Result<Villa> {
        let query = format!(
            r#"
            INSERT INTO villas (name, details, rate, occupancy, square_footage, image_url, amenity)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            VILLA_COLUMNS
        );

        let created = sqlx::query_as::<_, Villa>(&query)
            .bind(&villa.name)
            .bind(&villa.details)
            .bind(villa.rate)
            .bind(villa.occupancy)
            .bind(villa.square_footage)
            .bind(&villa.image_url)
            .bind(&villa.amenity)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create villa: {:?}", e);
                AppError::Database(e)
            })?;

        tracing::info!("Villa created: id={}, name={}", created.id, created.name);
        Ok(created)
    }

    async fn update(&mut self, villa: Villa) -> Result<()> {
        self.tracker.stage_update(villa)
    }

    async fn remove(&mut self, villa: Villa) -> Result<()> {
        sqlx::query("DELETE FROM villas WHERE id = $1")
            .bind(villa.id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete villa {}: {:?}", villa.id, e);
                AppError::Database(e)
            })?;

        self.tracker.detach(villa.id);
        Ok(())
    }

    async fn save(&mut self) -> Result<()> {
        let pending = self.tracker.take_pending();
        if pending.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        for villa in pending {
            let result = sqlx::query(
                r#"
                UPDATE villas
                SET name = $1,
                    details = $2,
                    rate = $3,
                    occupancy = $4,
                    square_footage = $5,
                    image_url = $6,
                    amenity = $7,
                    updated_at = NOW()
                WHERE id = $8
                "#,
            )
            .bind(&villa.name)
            .bind(&villa.details)
            .bind(villa.rate)
            .bind(villa.occupancy)
            .bind(villa.square_footage)
            .bind(&villa.image_url)
            .bind(&villa.amenity)
            .bind(villa.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update villa {}: {:?}", villa.id, e);
                AppError::Database(e)
            })?;

            if result.rows_affected() == 0 {
                tracing::warn!("Update skipped, villa {} does not exist", villa.id);
            }
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }
}
