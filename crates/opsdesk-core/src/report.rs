//! # Report Module
//!
//! Read-side statistics over full ledger snapshots.
//!
//! ## Dashboard Formulas
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  net_profit          = Σ order.net_profit − Σ expense.amount            │
//! │  inventory_value     = Σ product.buy_price × product.stock              │
//! │  courier_pending     = Σ order.total_amount                             │
//! │                        where status ∈ {Pending, Processing,             │
//! │                                        InTransit, Delivered}            │
//! │  active_customers    = |distinct order.phone|                           │
//! │  total_company_value = inventory_value + courier_pending + net_profit   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every figure is a full rescan of the snapshot. Nothing is cached or
//! maintained incrementally, so a figure is only as fresh as the snapshot it
//! was computed from.

use std::collections::HashSet;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::calendar::Calendar;
use crate::cash::wallet_balance;
use crate::money::Money;
use crate::types::{CashTransaction, Expense, Order, OrderStatus, Product};

// =============================================================================
// Snapshot
// =============================================================================

/// Everything the dashboards read, loaded in one go.
#[derive(Debug, Clone, Default)]
pub struct LedgerSnapshot {
    pub products: Vec<Product>,
    pub orders: Vec<Order>,
    pub expenses: Vec<Expense>,
    pub transactions: Vec<CashTransaction>,
}

// =============================================================================
// Aggregates
// =============================================================================

/// Σ order profit − Σ expenses.
pub fn net_profit(orders: &[Order], expenses: &[Expense]) -> Money {
    let earned: Money = orders.iter().map(Order::net_profit).sum();
    let spent: Money = expenses.iter().map(Expense::amount).sum();
    earned - spent
}

/// Stock valued at cost. Negative stock lowers the value.
pub fn inventory_value(products: &[Product]) -> Money {
    products.iter().map(Product::stock_value).sum()
}

/// COD money still held by the courier or not yet collected.
pub fn courier_pending(orders: &[Order]) -> Money {
    orders
        .iter()
        .filter(|o| o.status.awaits_collection())
        .map(Order::total_amount)
        .sum()
}

/// Number of distinct customer phones.
pub fn active_customers(orders: &[Order]) -> usize {
    orders
        .iter()
        .map(|o| o.phone.trim())
        .collect::<HashSet<_>>()
        .len()
}

/// Σ sale price of delivered orders.
pub fn delivered_sales(orders: &[Order]) -> Money {
    orders
        .iter()
        .filter(|o| o.status == OrderStatus::Delivered)
        .map(Order::sale_price)
        .sum()
}

pub fn count_with_status(orders: &[Order], status: OrderStatus) -> usize {
    orders.iter().filter(|o| o.status == status).count()
}

// =============================================================================
// Admin Dashboard
// =============================================================================

/// Headline numbers for the owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AdminDashboard {
    pub net_profit_cents: i64,
    pub inventory_value_cents: i64,
    pub courier_pending_cents: i64,
    pub total_company_value_cents: i64,
    pub delivered_sales_cents: i64,
    /// Σ cash in − Σ cash out.
    pub wallet_balance_cents: i64,
    pub active_customers: usize,
    pub pending_orders: usize,
    pub total_orders: usize,
}

impl AdminDashboard {
    pub fn compute(snapshot: &LedgerSnapshot) -> Self {
        let profit = net_profit(&snapshot.orders, &snapshot.expenses);
        let inventory = inventory_value(&snapshot.products);
        let pending = courier_pending(&snapshot.orders);

        Self {
            net_profit_cents: profit.cents(),
            inventory_value_cents: inventory.cents(),
            courier_pending_cents: pending.cents(),
            total_company_value_cents: (inventory + pending + profit).cents(),
            delivered_sales_cents: delivered_sales(&snapshot.orders).cents(),
            wallet_balance_cents: wallet_balance(&snapshot.transactions).cents(),
            active_customers: active_customers(&snapshot.orders),
            pending_orders: count_with_status(&snapshot.orders, OrderStatus::Pending),
            total_orders: snapshot.orders.len(),
        }
    }
}

// =============================================================================
// Staff Dashboard
// =============================================================================

/// Order counts for staff, with no money figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StaffDashboard {
    pub today_orders: usize,
    pub pending_orders: usize,
    pub delivered_orders: usize,
    pub total_orders: usize,
    /// Newest first.
    pub recent_orders: Vec<Order>,
}

impl StaffDashboard {
    /// `today` and the order days are both on `calendar`.
    pub fn compute(
        orders: &[Order],
        today: NaiveDate,
        calendar: Calendar,
        recent_limit: usize,
    ) -> Self {
        let mut recent: Vec<Order> = orders.to_vec();
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent.truncate(recent_limit);

        Self {
            today_orders: orders
                .iter()
                .filter(|o| calendar.date_of(o.created_at) == today)
                .count(),
            pending_orders: count_with_status(orders, OrderStatus::Pending),
            delivered_orders: count_with_status(orders, OrderStatus::Delivered),
            total_orders: orders.len(),
            recent_orders: recent,
        }
    }
}

// =============================================================================
// Period Report
// =============================================================================

/// Sales figures for one period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PeriodStats {
    pub sales_cents: i64,
    /// Purchase price + packaging.
    pub cost_cents: i64,
    pub profit_cents: i64,
    pub orders: usize,
}

impl PeriodStats {
    fn add(&mut self, order: &Order) {
        self.sales_cents = (Money::from_cents(self.sales_cents) + order.sale_price()).cents();
        self.cost_cents = (Money::from_cents(self.cost_cents) + order.cost()).cents();
        self.profit_cents = (Money::from_cents(self.profit_cents) + order.net_profit()).cents();
        self.orders += 1;
    }
}

/// The reports screen: four period buckets plus expense totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PeriodReport {
    pub today: PeriodStats,
    /// From seven days before today onwards.
    pub last_7_days: PeriodStats,
    /// From the first of the current month onwards.
    pub this_month: PeriodStats,
    pub all_time: PeriodStats,
    pub total_expenses_cents: i64,
    /// All-time profit − expenses.
    pub net_cash_cents: i64,
}

impl PeriodReport {
    pub fn compute(
        orders: &[Order],
        expenses: &[Expense],
        today: NaiveDate,
        calendar: Calendar,
    ) -> Self {
        let week_start = today - Duration::days(7);
        let month_start = today.with_day(1).unwrap_or(today);

        let mut report = Self {
            today: PeriodStats::default(),
            last_7_days: PeriodStats::default(),
            this_month: PeriodStats::default(),
            all_time: PeriodStats::default(),
            total_expenses_cents: 0,
            net_cash_cents: 0,
        };

        for order in orders {
            let day = calendar.date_of(order.created_at);
            if day == today {
                report.today.add(order);
            }
            if day >= week_start {
                report.last_7_days.add(order);
            }
            if day >= month_start {
                report.this_month.add(order);
            }
            report.all_time.add(order);
        }

        let spent: Money = expenses.iter().map(Expense::amount).sum();
        report.total_expenses_cents = spent.cents();
        report.net_cash_cents = (Money::from_cents(report.all_time.profit_cents) - spent).cents();
        report
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ExpenseSource, OrderSource};
    use chrono::{DateTime, TimeZone, Utc};

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 10, 0, 0).unwrap()
    }

    fn order(phone: &str, status: OrderStatus, sale: i64, created: DateTime<Utc>) -> Order {
        Order {
            id: format!("o-{phone}-{sale}"),
            customer_name: "Customer".to_string(),
            phone: phone.to_string(),
            address: String::new(),
            product_id: Some("p-1".to_string()),
            product_name: "Vegetable Cutter".to_string(),
            sale_price_cents: sale,
            delivery_charge_cents: 6000,
            packaging_cost_cents: 1000,
            purchase_price_cents: 10000,
            total_amount_cents: sale.saturating_add(6000),
            net_profit_cents: sale.saturating_sub(11000),
            status,
            note: None,
            source: OrderSource::ManualEntry,
            created_at: created,
            updated_at: created,
        }
    }

    fn expense(amount: i64) -> Expense {
        Expense {
            id: format!("e-{amount}"),
            title: "Marketing Ad Cost".to_string(),
            amount_cents: amount,
            kind: "Marketing Ad Cost".to_string(),
            spent_on: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            source: ExpenseSource::Manual,
            created_at: at(2024, 5, 1),
        }
    }

    fn product(buy: i64, stock: i64) -> Product {
        Product {
            id: format!("p-{buy}-{stock}"),
            name: "Push Chopper".to_string(),
            buy_price_cents: buy,
            sell_price_cents: buy.saturating_mul(2),
            stock,
            created_at: at(2024, 1, 1),
            updated_at: at(2024, 1, 1),
        }
    }

    #[test]
    fn test_net_profit_subtracts_expenses() {
        let orders = vec![
            order("017", OrderStatus::Delivered, 15000, at(2024, 5, 1)),
            order("018", OrderStatus::Returned, 12000, at(2024, 5, 2)),
        ];
        let expenses = vec![expense(2000), expense(500)];
        // (4000 + 1000) − 2500
        assert_eq!(net_profit(&orders, &expenses).cents(), 2500);
    }

    #[test]
    fn test_courier_pending_statuses() {
        let orders = vec![
            order("1", OrderStatus::Pending, 15000, at(2024, 5, 1)),
            order("2", OrderStatus::Processing, 15000, at(2024, 5, 1)),
            order("3", OrderStatus::InTransit, 15000, at(2024, 5, 1)),
            order("4", OrderStatus::Delivered, 15000, at(2024, 5, 1)),
            order("5", OrderStatus::Returned, 15000, at(2024, 5, 1)),
            order("6", OrderStatus::Cancelled, 15000, at(2024, 5, 1)),
        ];
        assert_eq!(courier_pending(&orders).cents(), 4 * 21000);
    }

    #[test]
    fn test_admin_dashboard() {
        let snapshot = LedgerSnapshot {
            products: vec![product(10000, 4), product(5000, -1)],
            orders: vec![
                order("017", OrderStatus::Delivered, 15000, at(2024, 5, 1)),
                order("017", OrderStatus::Pending, 15000, at(2024, 5, 2)),
                order("018", OrderStatus::Cancelled, 15000, at(2024, 5, 3)),
            ],
            expenses: vec![expense(20000)],
            transactions: Vec::new(),
        };

        let dash = AdminDashboard::compute(&snapshot);
        assert_eq!(dash.inventory_value_cents, 35000);
        assert_eq!(dash.net_profit_cents, 3 * 4000 - 20000);
        assert_eq!(dash.courier_pending_cents, 42000);
        assert_eq!(dash.total_company_value_cents, 35000 + 42000 - 8000);
        assert_eq!(dash.delivered_sales_cents, 15000);
        assert_eq!(dash.wallet_balance_cents, 0);
        assert_eq!(dash.active_customers, 2);
        assert_eq!(dash.pending_orders, 1);
        assert_eq!(dash.total_orders, 3);
    }

    #[test]
    fn test_admin_dashboard_clamps_outsized_rows() {
        let snapshot = LedgerSnapshot {
            products: vec![product(i64::MAX / 2, 3), product(10000, 4)],
            orders: vec![order("017", OrderStatus::Pending, i64::MAX, at(2024, 5, 1))],
            expenses: vec![expense(20000)],
            transactions: Vec::new(),
        };

        let dash = AdminDashboard::compute(&snapshot);
        assert_eq!(dash.inventory_value_cents, i64::MAX);
        assert_eq!(dash.courier_pending_cents, i64::MAX);
        assert_eq!(dash.total_company_value_cents, i64::MAX);

        let report = PeriodReport::compute(
            &snapshot.orders,
            &snapshot.expenses,
            at(2024, 5, 1).date_naive(),
            Calendar::utc(),
        );
        assert_eq!(report.all_time.sales_cents, i64::MAX);
    }

    #[test]
    fn test_empty_snapshot_is_all_zero() {
        let dash = AdminDashboard::compute(&LedgerSnapshot::default());
        assert_eq!(dash.total_company_value_cents, 0);
        assert_eq!(dash.active_customers, 0);
    }

    #[test]
    fn test_staff_dashboard() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 20).unwrap();
        let orders = vec![
            order("1", OrderStatus::Pending, 15000, at(2024, 5, 20)),
            order("2", OrderStatus::Delivered, 16000, at(2024, 5, 19)),
            order("3", OrderStatus::Pending, 17000, at(2024, 5, 18)),
        ];
        let dash = StaffDashboard::compute(&orders, today, Calendar::utc(), 2);

        assert_eq!(dash.today_orders, 1);
        assert_eq!(dash.pending_orders, 2);
        assert_eq!(dash.delivered_orders, 1);
        assert_eq!(dash.total_orders, 3);
        assert_eq!(dash.recent_orders.len(), 2);
        assert_eq!(dash.recent_orders[0].phone, "1");
        assert_eq!(dash.recent_orders[1].phone, "2");
    }

    #[test]
    fn test_today_follows_the_shop_calendar() {
        let dhaka = Calendar::from_offset_minutes(360).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 5, 21).unwrap();
        // 00:30 local on the 21st, still the 20th in UTC
        let just_after_midnight = Utc.with_ymd_and_hms(2024, 5, 20, 18, 30, 0).unwrap();
        let orders = vec![order("1", OrderStatus::Pending, 15000, just_after_midnight)];

        let dash = StaffDashboard::compute(&orders, today, dhaka, 5);
        assert_eq!(dash.today_orders, 1);

        let report = PeriodReport::compute(&orders, &[], today, dhaka);
        assert_eq!(report.today.orders, 1);

        let utc_report = PeriodReport::compute(&orders, &[], today, Calendar::utc());
        assert_eq!(utc_report.today.orders, 0);
    }

    #[test]
    fn test_period_report_buckets() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 20).unwrap();
        let orders = vec![
            order("1", OrderStatus::Delivered, 15000, at(2024, 5, 20)),
            order("2", OrderStatus::Delivered, 15000, at(2024, 5, 14)),
            order("3", OrderStatus::Delivered, 15000, at(2024, 5, 2)),
            order("4", OrderStatus::Delivered, 15000, at(2024, 4, 30)),
        ];
        let report = PeriodReport::compute(&orders, &[expense(3000)], today, Calendar::utc());

        assert_eq!(report.today.orders, 1);
        assert_eq!(report.last_7_days.orders, 2);
        assert_eq!(report.this_month.orders, 3);
        assert_eq!(report.all_time.orders, 4);
        assert_eq!(report.today.cost_cents, 11000);
        assert_eq!(report.all_time.sales_cents, 60000);
        assert_eq!(report.all_time.profit_cents, 16000);
        assert_eq!(report.total_expenses_cents, 3000);
        assert_eq!(report.net_cash_cents, 13000);
    }
}
