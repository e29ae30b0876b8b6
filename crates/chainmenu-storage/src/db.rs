//! Postgres persistence behind the `MenuStore` boundary.
//!
//! The schema carries no unique constraint on `(brand_id, name)`; the
//! reconciliation driver is the sole enforcer of that identity invariant,
//! so every write here is a primitive the driver composes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool};
use thiserror::Error;
use uuid::Uuid;

use chainmenu_core::{
    Brand, IngestLog, IngestStatus, MenuItem, MenuItemPatch, NewIngestLog, NewMenuItem,
    NutritionFacts,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("{0}")]
    Backend(String),
}

/// Persistence boundary for reconciliation runs. Backed by Postgres in
/// production and by an in-memory map in driver tests.
#[async_trait]
pub trait MenuStore: Send + Sync {
    async fn brand_by_slug(&self, slug: &str) -> Result<Option<Brand>, StoreError>;

    async fn all_brands(&self) -> Result<Vec<Brand>, StoreError>;

    /// Look up the upsert identity `(brand_id, name)`.
    async fn menu_item_by_name(
        &self,
        brand_id: Uuid,
        name: &str,
    ) -> Result<Option<MenuItem>, StoreError>;

    async fn insert_menu_item(&self, item: &NewMenuItem) -> Result<MenuItem, StoreError>;

    /// Apply a non-destructive patch; `None` fields keep the stored value.
    async fn update_menu_item(&self, id: Uuid, patch: &MenuItemPatch) -> Result<(), StoreError>;

    async fn nutrition_for(&self, menu_item_id: Uuid)
        -> Result<Option<NutritionFacts>, StoreError>;

    /// Write the full (already merged) nutrition row for a menu item.
    async fn put_nutrition(
        &self,
        menu_item_id: Uuid,
        facts: &NutritionFacts,
    ) -> Result<(), StoreError>;

    async fn append_ingest_log(&self, log: &NewIngestLog) -> Result<(), StoreError>;

    async fn recent_ingest_logs(
        &self,
        brand_id: Uuid,
        limit: i64,
    ) -> Result<Vec<IngestLog>, StoreError>;
}

#[derive(Debug, FromRow)]
struct BrandRow {
    id: Uuid,
    slug: String,
    name: String,
    logo_url: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<BrandRow> for Brand {
    fn from(row: BrandRow) -> Self {
        Brand {
            id: row.id,
            slug: row.slug,
            name: row.name,
            logo_url: row.logo_url,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct MenuItemRow {
    id: Uuid,
    brand_id: Uuid,
    name: String,
    category: String,
    image_url: Option<String>,
    detail_url: Option<String>,
    description: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<MenuItemRow> for MenuItem {
    fn from(row: MenuItemRow) -> Self {
        MenuItem {
            id: row.id,
            brand_id: row.brand_id,
            name: row.name,
            category: row.category,
            image_url: row.image_url,
            detail_url: row.detail_url,
            description: row.description,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct NutritionRow {
    kcal: Option<f64>,
    protein: Option<f64>,
    saturated_fat: Option<f64>,
    sodium: Option<f64>,
    sugar: Option<f64>,
}

impl From<NutritionRow> for NutritionFacts {
    fn from(row: NutritionRow) -> Self {
        NutritionFacts {
            kcal: row.kcal,
            protein: row.protein,
            saturated_fat: row.saturated_fat,
            sodium: row.sodium,
            sugar: row.sugar,
        }
    }
}

#[derive(Debug, FromRow)]
struct IngestLogRow {
    id: Uuid,
    brand_id: Uuid,
    status: String,
    changed_count: i32,
    error: Option<String>,
    fetched_at: DateTime<Utc>,
}

impl IngestLogRow {
    fn into_log(self) -> IngestLog {
        let status = IngestStatus::parse(&self.status).unwrap_or(IngestStatus::Error);
        IngestLog {
            id: self.id,
            brand_id: self.brand_id,
            status,
            changed_count: self.changed_count,
            error: self.error,
            fetched_at: self.fetched_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PgMenuStore {
    pool: PgPool,
}

impl PgMenuStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn run_migrations(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(format!("running migrations: {e}")))?;
        Ok(())
    }
}

#[async_trait]
impl MenuStore for PgMenuStore {
    async fn brand_by_slug(&self, slug: &str) -> Result<Option<Brand>, StoreError> {
        let row = sqlx::query_as::<_, BrandRow>(
            r#"
            SELECT id, slug, name, logo_url, created_at
              FROM brands
             WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Brand::from))
    }

    async fn all_brands(&self) -> Result<Vec<Brand>, StoreError> {
        let rows = sqlx::query_as::<_, BrandRow>(
            r#"
            SELECT id, slug, name, logo_url, created_at
              FROM brands
             ORDER BY slug
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Brand::from).collect())
    }

    async fn menu_item_by_name(
        &self,
        brand_id: Uuid,
        name: &str,
    ) -> Result<Option<MenuItem>, StoreError> {
        let row = sqlx::query_as::<_, MenuItemRow>(
            r#"
            SELECT id, brand_id, name, category, image_url, detail_url,
                   description, is_active, created_at, updated_at
              FROM menu_items
             WHERE brand_id = $1 AND name = $2
             ORDER BY created_at
             LIMIT 1
            "#,
        )
        .bind(brand_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(MenuItem::from))
    }

    async fn insert_menu_item(&self, item: &NewMenuItem) -> Result<MenuItem, StoreError> {
        let row = sqlx::query_as::<_, MenuItemRow>(
            r#"
            INSERT INTO menu_items
                   (id, brand_id, name, category, image_url, detail_url,
                    description, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW(), NOW())
            RETURNING id, brand_id, name, category, image_url, detail_url,
                      description, is_active, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(item.brand_id)
        .bind(&item.name)
        .bind(&item.category)
        .bind(&item.image_url)
        .bind(&item.detail_url)
        .bind(&item.description)
        .bind(item.is_active)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn update_menu_item(&self, id: Uuid, patch: &MenuItemPatch) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE menu_items
               SET image_url   = COALESCE($2, image_url),
                   detail_url  = COALESCE($3, detail_url),
                   description = COALESCE($4, description),
                   updated_at  = NOW()
             WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&patch.image_url)
        .bind(&patch.detail_url)
        .bind(&patch.description)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn nutrition_for(
        &self,
        menu_item_id: Uuid,
    ) -> Result<Option<NutritionFacts>, StoreError> {
        let row = sqlx::query_as::<_, NutritionRow>(
            r#"
            SELECT kcal, protein, saturated_fat, sodium, sugar
              FROM nutrition
             WHERE menu_item_id = $1
            "#,
        )
        .bind(menu_item_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(NutritionFacts::from))
    }

    async fn put_nutrition(
        &self,
        menu_item_id: Uuid,
        facts: &NutritionFacts,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO nutrition
                   (id, menu_item_id, kcal, protein, saturated_fat, sodium, sugar, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, NOW())
            ON CONFLICT (menu_item_id) DO UPDATE
               SET kcal = $3,
                   protein = $4,
                   saturated_fat = $5,
                   sodium = $6,
                   sugar = $7,
                   updated_at = NOW()
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(menu_item_id)
        .bind(facts.kcal)
        .bind(facts.protein)
        .bind(facts.saturated_fat)
        .bind(facts.sodium)
        .bind(facts.sugar)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn append_ingest_log(&self, log: &NewIngestLog) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO ingest_logs (id, brand_id, status, changed_count, error, fetched_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(log.brand_id)
        .bind(log.status.as_str())
        .bind(log.changed_count)
        .bind(&log.error)
        .bind(log.fetched_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn recent_ingest_logs(
        &self,
        brand_id: Uuid,
        limit: i64,
    ) -> Result<Vec<IngestLog>, StoreError> {
        let rows = sqlx::query_as::<_, IngestLogRow>(
            r#"
            SELECT id, brand_id, status, changed_count, error, fetched_at
              FROM ingest_logs
             WHERE brand_id = $1
             ORDER BY fetched_at DESC
             LIMIT $2
            "#,
        )
        .bind(brand_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(IngestLogRow::into_log).collect())
    }
}
