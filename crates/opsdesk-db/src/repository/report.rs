//! # Report Repository
//!
//! Loads the ledgers for the dashboards. All statistics are recomputed from
//! a full scan on every call; the arithmetic lives in
//! [`opsdesk_core::report`].
//!
//! The four tables are read inside one transaction so a dashboard never
//! sees an order without the stock decrement that came with it.

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use opsdesk_core::report::{AdminDashboard, LedgerSnapshot, PeriodReport, StaffDashboard};
use opsdesk_core::{Calendar, CashTransaction, Expense, Order, Product, RECENT_ORDERS_LIMIT};

#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
    calendar: Calendar,
}

impl ReportRepository {
    pub fn new(pool: SqlitePool, calendar: Calendar) -> Self {
        ReportRepository { pool, calendar }
    }

    /// Reads every ledger from one consistent snapshot.
    pub async fn snapshot(&self) -> DbResult<LedgerSnapshot> {
        let mut tx = self.pool.begin().await?;

        let products = sqlx::query_as::<_, Product>(
            "SELECT id, name, buy_price_cents, sell_price_cents, stock, created_at, updated_at \
             FROM products ORDER BY name COLLATE NOCASE, id",
        )
        .fetch_all(&mut *tx)
        .await?;

        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, customer_name, phone, address,
                   product_id, product_name,
                   sale_price_cents, delivery_charge_cents, packaging_cost_cents, purchase_price_cents,
                   total_amount_cents, net_profit_cents,
                   status, note, source, created_at, updated_at
            FROM orders
            ORDER BY created_at DESC, id
            "#,
        )
        .fetch_all(&mut *tx)
        .await?;

        let expenses = sqlx::query_as::<_, Expense>(
            "SELECT id, title, amount_cents, kind, spent_on, source, created_at \
             FROM expenses ORDER BY spent_on DESC, created_at DESC, id",
        )
        .fetch_all(&mut *tx)
        .await?;

        let transactions = sqlx::query_as::<_, CashTransaction>(
            "SELECT id, amount_cents, direction, category, method, note, date, created_at \
             FROM cash_transactions ORDER BY date DESC, created_at DESC, id",
        )
        .fetch_all(&mut *tx)
        .await?;

        tx.rollback().await?;

        debug!(
            products = products.len(),
            orders = orders.len(),
            expenses = expenses.len(),
            transactions = transactions.len(),
            "Ledger snapshot loaded"
        );

        Ok(LedgerSnapshot {
            products,
            orders,
            expenses,
            transactions,
        })
    }

    pub async fn admin_dashboard(&self) -> DbResult<AdminDashboard> {
        Ok(AdminDashboard::compute(&self.snapshot().await?))
    }

    pub async fn staff_dashboard(&self, today: NaiveDate) -> DbResult<StaffDashboard> {
        let snapshot = self.snapshot().await?;
        Ok(StaffDashboard::compute(&snapshot.orders, today, self.calendar, RECENT_ORDERS_LIMIT))
    }

    pub async fn period_report(&self, today: NaiveDate) -> DbResult<PeriodReport> {
        let snapshot = self.snapshot().await?;
        Ok(PeriodReport::compute(&snapshot.orders, &snapshot.expenses, today, self.calendar))
    }
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig, DbError};
    use chrono::{NaiveDate, TimeZone, Utc};
    use opsdesk_core::cash::{CashEntry, ExpenseDraft};
    use opsdesk_core::inventory::ProductDraft;
    use opsdesk_core::order::OrderDraft;
    use opsdesk_core::{Calendar, CashCategory, CashDirection, OrderStatus, PaymentMethod};

    async fn setup() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_empty_ledgers() {
        let db = setup().await;
        let dashboard = db.reports().admin_dashboard().await.unwrap();

        assert_eq!(dashboard.net_profit_cents, 0);
        assert_eq!(dashboard.total_company_value_cents, 0);
        assert_eq!(dashboard.total_orders, 0);
    }

    #[tokio::test]
    async fn test_outsized_product_never_breaks_the_dashboard() {
        let db = setup().await;

        let rejected = db
            .products()
            .create(ProductDraft {
                name: "Vegetable Cutter".to_string(),
                buy_price_cents: i64::MAX / 2,
                stock: 3,
                ..Default::default()
            })
            .await;
        assert!(matches!(rejected, Err(DbError::Validation(_))));

        // A row written before the bound existed.
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO products (id, name, buy_price_cents, sell_price_cents, stock, created_at, updated_at) \
             VALUES ('p-legacy', 'Legacy Cutter', ?1, 0, 3, ?2, ?2)",
        )
        .bind(i64::MAX / 2)
        .bind(now)
        .execute(db.pool())
        .await
        .unwrap();

        let dashboard = db.reports().admin_dashboard().await.unwrap();
        assert_eq!(dashboard.inventory_value_cents, i64::MAX);
        assert_eq!(dashboard.total_company_value_cents, i64::MAX);
    }

    #[tokio::test]
    async fn test_reports_use_the_shop_calendar() {
        let dhaka = Calendar::from_offset_minutes(360).unwrap();
        let db = Database::new(DbConfig::in_memory().calendar(dhaka))
            .await
            .unwrap();

        // 00:30 on the 21st in Dhaka
        db.orders()
            .create(OrderDraft {
                customer_name: "Rahim".to_string(),
                phone: "01712345678".to_string(),
                product_name: Some("Garlic Press".to_string()),
                sale_price_cents: Some(15000),
                created_at: Some(Utc.with_ymd_and_hms(2024, 5, 20, 18, 30, 0).unwrap()),
                ..Default::default()
            })
            .await
            .unwrap();

        let local_day = NaiveDate::from_ymd_opt(2024, 5, 21).unwrap();
        let staff = db.reports().staff_dashboard(local_day).await.unwrap();
        assert_eq!(staff.today_orders, 1);

        let report = db.reports().period_report(local_day).await.unwrap();
        assert_eq!(report.today.orders, 1);

        let transaction = db
            .cash()
            .record(CashEntry {
                amount_cents: 1000,
                direction: CashDirection::CashIn,
                category: CashCategory::CourierPayment,
                method: PaymentMethod::Cash,
                note: String::new(),
            })
            .await
            .unwrap()
            .transaction;
        assert_eq!(transaction.date, db.today());
    }

    #[tokio::test]
    async fn test_dashboards_follow_the_ledgers() {
        let db = setup().await;
        let product = db
            .products()
            .create(ProductDraft {
                name: "Vegetable Cutter".to_string(),
                buy_price_cents: 10000,
                sell_price_cents: 15000,
                stock: 5,
            })
            .await
            .unwrap();

        let order = db
            .orders()
            .create(OrderDraft {
                customer_name: "Rahim".to_string(),
                phone: "01712345678".to_string(),
                product_id: Some(product.id.clone()),
                sale_price_cents: Some(15000),
                delivery_charge_cents: Some(6000),
                packaging_cost_cents: Some(1000),
                ..Default::default()
            })
            .await
            .unwrap();

        db.expenses()
            .add(ExpenseDraft {
                title: "Tape".to_string(),
                amount_cents: 500,
                ..Default::default()
            })
            .await
            .unwrap();
        db.cash()
            .record(CashEntry {
                amount_cents: 30000,
                direction: CashDirection::CashIn,
                category: CashCategory::CourierPayment,
                method: PaymentMethod::Bank,
                note: String::new(),
            })
            .await
            .unwrap();

        let snapshot = db.reports().snapshot().await.unwrap();
        assert_eq!(snapshot.products[0].stock, 4);
        assert_eq!(snapshot.orders.len(), 1);

        let admin = db.reports().admin_dashboard().await.unwrap();
        assert_eq!(admin.net_profit_cents, 3500);
        assert_eq!(admin.inventory_value_cents, 40000);
        assert_eq!(admin.courier_pending_cents, 21000);
        assert_eq!(admin.total_company_value_cents, 40000 + 21000 + 3500);
        assert_eq!(admin.wallet_balance_cents, 30000);
        assert_eq!(admin.active_customers, 1);

        let today = Utc::now().date_naive();
        let staff = db.reports().staff_dashboard(today).await.unwrap();
        assert_eq!(staff.today_orders, 1);
        assert_eq!(staff.pending_orders, 1);
        assert_eq!(staff.recent_orders[0].id, order.id);

        db.orders()
            .set_status(&order.id, OrderStatus::Cancelled)
            .await
            .unwrap();
        let admin = db.reports().admin_dashboard().await.unwrap();
        assert_eq!(admin.courier_pending_cents, 0);

        let report = db.reports().period_report(today).await.unwrap();
        assert_eq!(report.today.orders, 1);
        assert_eq!(report.all_time.profit_cents, 4000);
        assert_eq!(report.total_expenses_cents, 500);
        assert_eq!(report.net_cash_cents, 3500);
    }
}
