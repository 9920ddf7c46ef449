//! # Order Repository
//!
//! Database operations for the order ledger.
//!
//! ## Order Creation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     One order = one transaction                         │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │   │                                                                     │
//! │   ├── UPDATE products SET stock = stock - 1 WHERE id = ?                │
//! │   │     RETURNING name, buy_price_cents, sell_price_cents               │
//! │   │         │                                                           │
//! │   │         ├── no row?  → ROLLBACK, Err(NotFound)                      │
//! │   │         └── snapshot → price the draft                              │
//! │   │                                                                     │
//! │   ├── INSERT INTO orders (...)                                          │
//! │   │                                                                     │
//! │  COMMIT  ← stock and order become visible together                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The stock decrement is the first statement of every write transaction,
//! so the connection takes SQLite's write lock up front and concurrent
//! creators queue behind it instead of failing on a lock upgrade.
//!
//! Bulk entry runs all accepted rows through the same steps inside a single
//! transaction. Editing or deleting an order never touches stock.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::product::decrement_stock_on;
use opsdesk_core::order::{BulkEntry, BulkOutcome, OrderDraft, OrderPatch};
use opsdesk_core::{Calendar, Order, OrderStatus};

const ORDER_COLUMNS: &str = r#"
    id, customer_name, phone, address,
    product_id, product_name,
    sale_price_cents, delivery_charge_cents, packaging_cost_cents, purchase_price_cents,
    total_amount_cents, net_profit_cents,
    status, note, source, created_at, updated_at
"#;

/// Inserts a priced order on the given connection.
async fn insert_order_on(conn: &mut SqliteConnection, order: &Order) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO orders (
            id, customer_name, phone, address,
            product_id, product_name,
            sale_price_cents, delivery_charge_cents, packaging_cost_cents, purchase_price_cents,
            total_amount_cents, net_profit_cents,
            status, note, source, created_at, updated_at
        ) VALUES (
            ?1, ?2, ?3, ?4,
            ?5, ?6,
            ?7, ?8, ?9, ?10,
            ?11, ?12,
            ?13, ?14, ?15, ?16, ?17
        )
        "#,
    )
    .bind(&order.id)
    .bind(&order.customer_name)
    .bind(&order.phone)
    .bind(&order.address)
    .bind(&order.product_id)
    .bind(&order.product_name)
    .bind(order.sale_price_cents)
    .bind(order.delivery_charge_cents)
    .bind(order.packaging_cost_cents)
    .bind(order.purchase_price_cents)
    .bind(order.total_amount_cents)
    .bind(order.net_profit_cents)
    .bind(order.status)
    .bind(&order.note)
    .bind(order.source)
    .bind(order.created_at)
    .bind(order.updated_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Decrements stock (if the draft references a product) and inserts the
/// priced order, all on `conn`.
async fn place_order_on(conn: &mut SqliteConnection, draft: OrderDraft) -> DbResult<Order> {
    let now = Utc::now();

    let snapshot = match draft.product_ref() {
        Some(product_id) => {
            let snapshot = decrement_stock_on(&mut *conn, &product_id, 1, now).await?;
            if snapshot.is_none() {
                warn!(product_id = %product_id, "Order references a missing product");
                return Err(DbError::not_found("Product", product_id));
            }
            snapshot
        }
        None => None,
    };

    let order = draft.into_order(generate_order_id(), snapshot.as_ref(), now)?;
    insert_order_on(&mut *conn, &order).await?;
    Ok(order)
}

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
    calendar: Calendar,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool, calendar: Calendar) -> Self {
        OrderRepository { pool, calendar }
    }

    /// Lists all orders, newest first.
    pub async fn list(&self) -> DbResult<Vec<Order>> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC, id");
        let orders = sqlx::query_as::<_, Order>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(orders)
    }

    /// Gets an order by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?1");
        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(order)
    }

    /// Creates one order and decrements its product's stock by one, as a
    /// single transaction.
    ///
    /// ## Returns
    /// * `Err(DbError::Validation)` - bad form input; nothing was written
    /// * `Err(DbError::NotFound)` - the product id does not exist; nothing
    ///   was written
    pub async fn create(&self, draft: OrderDraft) -> DbResult<Order> {
        draft.validate()?;

        debug!(product_id = ?draft.product_ref(), customer = %draft.customer_name, "Creating order");

        let mut tx = self.pool.begin().await?;
        // dropping `tx` on error rolls back the decrement
        let order = place_order_on(&mut *tx, draft).await?;
        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            id = %order.id,
            product_id = ?order.product_id,
            total = order.total_amount_cents,
            "Order created"
        );
        Ok(order)
    }

    /// Creates every complete row of a bulk entry in one transaction.
    ///
    /// Rows missing a customer name, phone or product id are skipped and
    /// reported by index. Any other failure (bad phone format, a product id
    /// that no longer exists) aborts the whole batch.
    pub async fn create_bulk(&self, entry: BulkEntry) -> DbResult<BulkOutcome> {
        let plan = entry.partition(self.calendar);

        for draft in &plan.drafts {
            draft.validate()?;
        }

        debug!(
            accepted = plan.drafts.len(),
            skipped = plan.skipped.len(),
            "Creating bulk orders"
        );

        if plan.drafts.is_empty() {
            return Ok(BulkOutcome {
                orders: Vec::new(),
                skipped: plan.skipped,
            });
        }

        let mut tx = self.pool.begin().await?;
        let mut orders = Vec::with_capacity(plan.drafts.len());
        for draft in plan.drafts {
            orders.push(place_order_on(&mut *tx, draft).await?);
        }
        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            count = orders.len(),
            skipped = ?plan.skipped,
            "Bulk orders created"
        );
        Ok(BulkOutcome {
            orders,
            skipped: plan.skipped,
        })
    }

    /// Applies an edit to an order.
    ///
    /// The patch is applied under the write lock: the transaction touches
    /// the row first, then reads, patches and writes it back. Stock is
    /// never changed.
    pub async fn update(&self, id: &str, patch: OrderPatch) -> DbResult<Order> {
        patch.validate()?;

        debug!(id = %id, total = patch.touches_total(), profit = patch.touches_profit(), "Updating order");

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let touched = sqlx::query("UPDATE orders SET updated_at = ?1 WHERE id = ?2")
            .bind(now)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if touched.rows_affected() == 0 {
            return Err(DbError::not_found("Order", id));
        }

        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?1");
        let mut order = sqlx::query_as::<_, Order>(&sql)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        patch.apply(&mut order, now)?;

        sqlx::query(
            r#"
            UPDATE orders SET
                customer_name = ?2,
                phone = ?3,
                address = ?4,
                product_name = ?5,
                sale_price_cents = ?6,
                delivery_charge_cents = ?7,
                packaging_cost_cents = ?8,
                purchase_price_cents = ?9,
                total_amount_cents = ?10,
                net_profit_cents = ?11,
                status = ?12,
                note = ?13,
                created_at = ?14,
                updated_at = ?15
            WHERE id = ?1
            "#,
        )
        .bind(&order.id)
        .bind(&order.customer_name)
        .bind(&order.phone)
        .bind(&order.address)
        .bind(&order.product_name)
        .bind(order.sale_price_cents)
        .bind(order.delivery_charge_cents)
        .bind(order.packaging_cost_cents)
        .bind(order.purchase_price_cents)
        .bind(order.total_amount_cents)
        .bind(order.net_profit_cents)
        .bind(order.status)
        .bind(&order.note)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(id = %id, "Order updated");
        Ok(order)
    }

    /// Sets the status. Any status may follow any other.
    pub async fn set_status(&self, id: &str, status: OrderStatus) -> DbResult<()> {
        debug!(id = %id, status = %status, "Setting order status");

        let result = sqlx::query("UPDATE orders SET status = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(status)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", id));
        }

        info!(id = %id, status = %status, "Order status changed");
        Ok(())
    }

    /// Deletes an order. The product's stock is NOT restored.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting order");

        let result = sqlx::query("DELETE FROM orders WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", id));
        }

        info!(id = %id, "Order deleted");
        Ok(())
    }

    /// Counts orders (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new order ID.
pub fn generate_order_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
