//! # Product Repository
//!
//! Database operations for the inventory store.
//!
//! ## Key Operations
//! - CRUD on products
//! - Relative stock decrement used by order creation
//!
//! ## Stock Update Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ❌ WRONG: read-then-write (two staff lose one decrement)               │
//! │     SELECT stock → 5 ; UPDATE products SET stock = 4                    │
//! │     SELECT stock → 5 ; UPDATE products SET stock = 4                    │
//! │                                                                         │
//! │  ✅ CORRECT: relative update, evaluated by SQLite under the write lock  │
//! │     UPDATE products SET stock = stock - 1 WHERE id = ?                  │
//! │     UPDATE products SET stock = stock - 1 WHERE id = ?   → 3            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Manual restocks from the inventory screen are absolute and last write
//! wins. Stock is allowed to go negative.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use opsdesk_core::inventory::{ProductDraft, ProductPatch};
use opsdesk_core::order::ProductSnapshot;
use opsdesk_core::Product;

const PRODUCT_COLUMNS: &str =
    "id, name, buy_price_cents, sell_price_cents, stock, created_at, updated_at";

/// Decrements stock by `by` and returns the product snapshot, on the given
/// connection (usually an open transaction).
///
/// Returns `Ok(None)` if no product has this id. This is the single
/// statement that both mutates stock and reads the price snapshot, so an
/// order never prices against a product other than the one it consumed.
pub(crate) async fn decrement_stock_on(
    conn: &mut SqliteConnection,
    id: &str,
    by: i64,
    now: DateTime<Utc>,
) -> DbResult<Option<ProductSnapshot>> {
    let snapshot = sqlx::query_as::<_, ProductSnapshot>(
        r#"
        UPDATE products
        SET stock = stock - ?1,
            updated_at = ?2
        WHERE id = ?3
        RETURNING name, buy_price_cents, sell_price_cents
        "#,
    )
    .bind(by)
    .bind(now)
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(snapshot)
}

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
/// let product = repo.create(ProductDraft { name: "Push Chopper".into(), ..Default::default() }).await?;
/// repo.decrement_stock(&product.id, 1).await?;
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

    /// Lists all products by name.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY name COLLATE NOCASE, id");
        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Gets a product by ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Creates a product from the inventory form.
    pub async fn create(&self, draft: ProductDraft) -> DbResult<Product> {
        let product = draft.into_product(generate_product_id(), Utc::now())?;
        self.insert(&product).await?;

        info!(id = %product.id, name = %product.name, stock = product.stock, "Product created");
        Ok(product)
    }

    /// Inserts a fully built product.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - id already exists
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, buy_price_cents, sell_price_cents, stock,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.buy_price_cents)
        .bind(product.sell_price_cents)
        .bind(product.stock)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Overwrites the supplied fields of a product.
    ///
    /// Only the supplied columns are written, so a concurrent stock
    /// decrement is not undone by a price edit.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn update(&self, id: &str, patch: ProductPatch) -> DbResult<Product> {
        debug!(id = %id, ?patch, "Updating product");

        let now = Utc::now();
        let patch = patch.normalized()?;

        let sql = format!(
            r#"
            UPDATE products SET
                name = COALESCE(?2, name),
                buy_price_cents = COALESCE(?3, buy_price_cents),
                sell_price_cents = COALESCE(?4, sell_price_cents),
                stock = COALESCE(?5, stock),
                updated_at = ?6
            WHERE id = ?1
            RETURNING {PRODUCT_COLUMNS}
            "#
        );

        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .bind(patch.name)
            .bind(patch.buy_price_cents)
            .bind(patch.sell_price_cents)
            .bind(patch.stock)
            .bind(now)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))?;

        info!(id = %id, stock = product.stock, "Product updated");
        Ok(product)
    }

    /// Decrements stock atomically (`stock = stock - by`).
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn decrement_stock(&self, id: &str, by: i64) -> DbResult<ProductSnapshot> {
        debug!(id = %id, by = by, "Decrementing stock");

        let mut conn = self.pool.acquire().await?;
        decrement_stock_on(&mut *conn, id, by, Utc::now())
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Hard-deletes a product.
    ///
    /// Orders referencing it keep their name and price snapshot; nothing
    /// else is touched.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        info!(id = %id, "Product deleted");
        Ok(())
    }

    /// Counts products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig, DbError};
    use opsdesk_core::inventory::{ProductDraft, ProductPatch};

    async fn setup() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn cutter() -> ProductDraft {
        ProductDraft {
            name: "Vegetable Cutter".to_string(),
            buy_price_cents: 10000,
            sell_price_cents: 15000,
            stock: 5,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let db = setup().await;
        let created = db.products().create(cutter()).await.unwrap();

        let loaded = db.products().get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(loaded, created);
        assert_eq!(db.products().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let db = setup().await;
        let result = db
            .products()
            .create(ProductDraft {
                name: "  ".to_string(),
                ..cutter()
            })
            .await;
        assert!(matches!(result, Err(DbError::Validation(_))));
        assert_eq!(db.products().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_is_sorted_by_name() {
        let db = setup().await;
        for name in ["push chopper", "Coffee Mixer", "Vegetable Cutter"] {
            db.products()
                .create(ProductDraft {
                    name: name.to_string(),
                    ..cutter()
                })
                .await
                .unwrap();
        }

        let names: Vec<String> = db
            .products()
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Coffee Mixer", "push chopper", "Vegetable Cutter"]);
    }

    #[tokio::test]
    async fn test_decrement_stock_goes_negative() {
        let db = setup().await;
        let product = db
            .products()
            .create(ProductDraft {
                stock: 1,
                ..cutter()
            })
            .await
            .unwrap();

        let snapshot = db.products().decrement_stock(&product.id, 1).await.unwrap();
        assert_eq!(snapshot.buy_price_cents, 10000);
        db.products().decrement_stock(&product.id, 1).await.unwrap();

        let loaded = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(loaded.stock, -1);
    }

    #[tokio::test]
    async fn test_decrement_missing_product() {
        let db = setup().await;
        let result = db.products().decrement_stock("missing", 1).await;
        assert!(matches!(result, Err(DbError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_update_overwrites_only_supplied_fields() {
        let db = setup().await;
        let product = db.products().create(cutter()).await.unwrap();

        let updated = db
            .products()
            .update(
                &product.id,
                ProductPatch {
                    sell_price_cents: Some(16000),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.sell_price_cents, 16000);
        assert_eq!(updated.stock, 5);
        assert_eq!(updated.name, "Vegetable Cutter");

        let restocked = db
            .products()
            .update(
                &product.id,
                ProductPatch {
                    stock: Some(40),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(restocked.stock, 40);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing() {
        let db = setup().await;
        let result = db.products().update("nope", ProductPatch::default()).await;
        assert!(matches!(result, Err(DbError::NotFound { .. })));

        let result = db.products().delete("nope").await;
        assert!(matches!(result, Err(DbError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete() {
        let db = setup().await;
        let product = db.products().create(cutter()).await.unwrap();
        db.products().delete(&product.id).await.unwrap();
        assert!(db.products().get_by_id(&product.id).await.unwrap().is_none());
    }
}
