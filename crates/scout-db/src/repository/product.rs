//! # Product Repository
//!
//! Database operations for products and the barcode index.
//!
//! ## Listable Filter
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              Every resolution-path query carries                        │
//! │                                                                         │
//! │     WHERE disabled = 0 AND track_stock = 1                              │
//! │     ORDER BY updated_at DESC                                            │
//! │                                                                         │
//! │  Disabled and non-stock-tracked products are invisible to barcode,     │
//! │  code, and name resolution alike - the filter lives in SQL so no       │
//! │  caller can forget it. `get` is the one exception: detail views need   │
//! │  to see disabled rows to report them as gone.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, QueryBuilder, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use scout_core::{Catalog, CatalogResult, Product};

/// Column list shared by every product SELECT.
const PRODUCT_COLUMNS: &str = "id, code, name, description, price_cents, image, category, \
     unit, disabled, track_stock, current_stock, created_at, updated_at";

/// The listable filter: what resolution is allowed to see.
const LISTABLE: &str = "disabled = 0 AND track_stock = 1";

/// Row mapping for the `products` table.
#[derive(Debug, FromRow)]
struct ProductRow {
    id: String,
    code: String,
    name: String,
    description: Option<String>,
    price_cents: i64,
    image: Option<String>,
    category: Option<String>,
    unit: String,
    disabled: bool,
    track_stock: bool,
    current_stock: Option<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            code: row.code,
            name: row.name,
            description: row.description,
            price_cents: row.price_cents,
            image: row.image,
            category: row.category,
            unit: row.unit,
            disabled: row.disabled,
            track_stock: row.track_stock,
            current_stock: row.current_stock,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for product database operations.
///
/// Implements [`scout_core::Catalog`], so a `Resolver` can run directly
/// over it.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
/// let hits = repo.by_code_like("ITM", 5).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Resolves a barcode to owning product ids via the barcode index.
    pub async fn barcode_owners(&self, barcode: &str, limit: u32) -> DbResult<Vec<String>> {
        debug!(barcode = %barcode, "Looking up barcode owners");

        let owners: Vec<String> = sqlx::query_scalar(
            "SELECT product_id FROM product_barcodes WHERE barcode = ?1 LIMIT ?2",
        )
        .bind(barcode)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(owners)
    }

    /// Fetches listable products by id, most recently modified first.
    pub async fn by_ids(&self, ids: &[String], limit: u32) -> DbResult<Vec<Product>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb = QueryBuilder::new(format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE {LISTABLE} AND id IN ("
        ));
        let mut separated = qb.separated(", ");
        for id in ids {
            separated.push_bind(id);
        }
        qb.push(") ORDER BY updated_at DESC LIMIT ");
        qb.push_bind(limit as i64);

        let rows: Vec<ProductRow> = qb.build_query_as().fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Fetches listable products whose code equals `code` exactly.
    pub async fn by_code(&self, code: &str, limit: u32) -> DbResult<Vec<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE {LISTABLE} AND code = ?1 \
             ORDER BY updated_at DESC LIMIT ?2"
        );
        let rows: Vec<ProductRow> = sqlx::query_as(&sql)
            .bind(code)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Fetches listable products whose code contains `fragment`.
    pub async fn by_code_like(&self, fragment: &str, limit: u32) -> DbResult<Vec<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE {LISTABLE} AND code LIKE '%' || ?1 || '%' \
             ORDER BY updated_at DESC LIMIT ?2"
        );
        let rows: Vec<ProductRow> = sqlx::query_as(&sql)
            .bind(fragment)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Fetches listable products whose name contains `fragment`.
    pub async fn by_name_like(&self, fragment: &str, limit: u32) -> DbResult<Vec<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE {LISTABLE} AND name LIKE '%' || ?1 || '%' \
             ORDER BY updated_at DESC LIMIT ?2"
        );
        let rows: Vec<ProductRow> = sqlx::query_as(&sql)
            .bind(fragment)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Paged listing of listable products.
    pub async fn page(&self, limit: u32, offset: u32) -> DbResult<Vec<Product>> {
        debug!(limit = %limit, offset = %offset, "Listing products");

        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE {LISTABLE} \
             ORDER BY updated_at DESC LIMIT ?1 OFFSET ?2"
        );
        let rows: Vec<ProductRow> = sqlx::query_as(&sql)
            .bind(limit as i64)
            .bind(offset as i64)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Gets a product by its ID, listable or not.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found (possibly disabled)
    /// * `Ok(None)` - Product not found
    pub async fn fetch(&self, id: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");
        let row: Option<ProductRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Product::from))
    }

    /// Counts listable products (for diagnostics).
    pub async fn count_listable(&self) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM products WHERE {LISTABLE}"))
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// Listable products that carry a raw image reference, for the image
    /// diagnosis endpoint.
    pub async fn with_images(&self, limit: u32) -> DbResult<Vec<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE {LISTABLE} AND image IS NOT NULL AND image != '' \
             ORDER BY updated_at DESC LIMIT ?1"
        );
        let rows: Vec<ProductRow> = sqlx::query_as(&sql)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Ok(())` - Inserted
    /// * `Err(DbError::UniqueViolation)` - code already exists
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(code = %product.code, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, code, name, description, price_cents, image, category,
                unit, disabled, track_stock, current_stock, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
        )
        .bind(&product.id)
        .bind(&product.code)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(&product.image)
        .bind(&product.category)
        .bind(&product.unit)
        .bind(product.disabled)
        .bind(product.track_stock)
        .bind(product.current_stock)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Registers a barcode for a product.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - barcode already owned
    /// * `Err(DbError::ForeignKeyViolation)` - no such product
    pub async fn add_barcode(&self, barcode: &str, product_id: &str) -> DbResult<()> {
        debug!(barcode = %barcode, product_id = %product_id, "Registering barcode");

        sqlx::query("INSERT INTO product_barcodes (barcode, product_id) VALUES (?1, ?2)")
            .bind(barcode)
            .bind(product_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// =============================================================================
// Catalog Trait Implementation
// =============================================================================

/// The resolver sees this repository through the `Catalog` port; database
/// errors surface as `CatalogError` and get degraded inside the stage walk.
#[async_trait]
impl Catalog for ProductRepository {
    async fn owners_of_barcode(&self, barcode: &str, limit: u32) -> CatalogResult<Vec<String>> {
        Ok(self.barcode_owners(barcode, limit).await?)
    }

    async fn find_by_ids(&self, ids: &[String], limit: u32) -> CatalogResult<Vec<Product>> {
        Ok(self.by_ids(ids, limit).await?)
    }

    async fn find_by_code(&self, code: &str, limit: u32) -> CatalogResult<Vec<Product>> {
        Ok(self.by_code(code, limit).await?)
    }

    async fn find_by_code_fragment(
        &self,
        fragment: &str,
        limit: u32,
    ) -> CatalogResult<Vec<Product>> {
        Ok(self.by_code_like(fragment, limit).await?)
    }

    async fn find_by_name_fragment(
        &self,
        fragment: &str,
        limit: u32,
    ) -> CatalogResult<Vec<Product>> {
        Ok(self.by_name_like(fragment, limit).await?)
    }

    async fn list(&self, limit: u32, offset: u32) -> CatalogResult<Vec<Product>> {
        Ok(self.page(limit, offset).await?)
    }

    async fn get(&self, id: &str) -> CatalogResult<Option<Product>> {
        Ok(self.fetch(id).await?)
    }

    async fn count(&self) -> CatalogResult<i64> {
        Ok(self.count_listable().await?)
    }
}

/// Helper to generate a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
