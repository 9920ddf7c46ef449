//! # Domain Types
//!
//! The records stored in the four ledgers and the enums they use.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Ledger Records                                  │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────────┐   ┌─────────────────┐  │
//! │  │    Product      │   │        Order         │   │    Expense      │  │
//! │  │  ─────────────  │   │  ──────────────────  │   │  ─────────────  │  │
//! │  │  id             │◄ ─│  product_id (weak)   │   │  id             │  │
//! │  │  name           │   │  product_name (snap) │   │  title          │  │
//! │  │  buy_price      │   │  purchase_price(snap)│   │  amount         │  │
//! │  │  sell_price     │   │  sale_price          │   │  kind           │  │
//! │  │  stock          │   │  total / net_profit  │   │  spent_on       │  │
//! │  └─────────────────┘   └──────────────────────┘   └────────▲────────┘  │
//! │                                                            ┊ mirror    │
//! │                                                   ┌────────┴────────┐  │
//! │                                                   │ CashTransaction │  │
//! │                                                   │  direction      │  │
//! │                                                   │  category       │  │
//! │                                                   └─────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Weak References Only
//! No record owns another. `Order.product_id` may dangle after a product is
//! deleted, and a mirrored expense outlives the transaction that created it.
//! Orders therefore carry an immutable snapshot of the product's name and
//! buy price taken at creation time.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

fn not_allowed(field: &str, allowed: &[&str]) -> ValidationError {
    ValidationError::NotAllowed {
        field: field.to_string(),
        allowed: allowed.iter().map(|s| s.to_string()).collect(),
    }
}

/// Lower-cases and strips spaces, dashes and underscores so "In Transit",
/// "in_transit" and "IN-TRANSIT" compare equal.
fn normalize_label(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

// =============================================================================
// Product
// =============================================================================

/// An inventory item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    pub id: String,

    pub name: String,

    /// Unit cost in minor units.
    pub buy_price_cents: i64,

    /// Default sale price in minor units.
    pub sell_price_cents: i64,

    /// Units on hand. Negative after two staff sell the last unit at once.
    pub stock: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    #[inline]
    pub fn buy_price(&self) -> Money {
        Money::from_cents(self.buy_price_cents)
    }

    #[inline]
    pub fn sell_price(&self) -> Money {
        Money::from_cents(self.sell_price_cents)
    }

    /// Stock valued at cost (`buy_price × stock`).
    #[inline]
    pub fn stock_value(&self) -> Money {
        self.buy_price().times(self.stock)
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// Delivery state of an order.
///
/// Any status can be set from any other; the ledger enforces no transition
/// rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    InTransit,
    Delivered,
    Returned,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::InTransit,
        OrderStatus::Delivered,
        OrderStatus::Returned,
        OrderStatus::Cancelled,
    ];

    /// Human-readable label used by the console screens.
    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Processing => "Processing",
            OrderStatus::InTransit => "In Transit",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Returned => "Returned",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Whether the COD amount of an order in this status is still out in
    /// the market (not yet reconciled with the courier).
    ///
    /// Delivered counts: the courier has collected the cash but has not
    /// paid it out yet.
    pub fn awaits_collection(&self) -> bool {
        matches!(
            self,
            OrderStatus::Pending
                | OrderStatus::Processing
                | OrderStatus::InTransit
                | OrderStatus::Delivered
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for OrderStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "processing" => Ok(OrderStatus::Processing),
            "intransit" | "shipped" => Ok(OrderStatus::InTransit),
            "delivered" => Ok(OrderStatus::Delivered),
            "returned" => Ok(OrderStatus::Returned),
            "cancelled" | "canceled" => Ok(OrderStatus::Cancelled),
            _ => Err(not_allowed(
                "status",
                &["Pending", "Processing", "In Transit", "Delivered", "Returned", "Cancelled"],
            )),
        }
    }
}

// =============================================================================
// Order Source
// =============================================================================

/// Which entry flow produced an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderSource {
    #[default]
    ManualEntry,
    BulkEntry,
}

impl fmt::Display for OrderSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderSource::ManualEntry => f.write_str("Manual Entry"),
            OrderSource::BulkEntry => f.write_str("Bulk Entry"),
        }
    }
}

// =============================================================================
// Order
// =============================================================================

/// A customer order.
///
/// Price fields are captured when the order is created and are never
/// recomputed from the live product afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Order {
    pub id: String,
    pub customer_name: String,
    pub phone: String,
    pub address: String,

    /// Weak reference to the inventory item; `None` for custom products.
    pub product_id: Option<String>,

    /// Product name at time of sale (frozen).
    pub product_name: String,

    pub sale_price_cents: i64,
    pub delivery_charge_cents: i64,
    pub packaging_cost_cents: i64,

    /// Product buy price at time of sale (frozen).
    pub purchase_price_cents: i64,

    /// Cash collected on delivery: sale price + delivery charge.
    pub total_amount_cents: i64,

    pub net_profit_cents: i64,

    pub status: OrderStatus,
    pub note: Option<String>,
    pub source: OrderSource,

    /// Editable after creation (backdating).
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Order {
    #[inline]
    pub fn sale_price(&self) -> Money {
        Money::from_cents(self.sale_price_cents)
    }

    #[inline]
    pub fn delivery_charge(&self) -> Money {
        Money::from_cents(self.delivery_charge_cents)
    }

    #[inline]
    pub fn packaging_cost(&self) -> Money {
        Money::from_cents(self.packaging_cost_cents)
    }

    #[inline]
    pub fn purchase_price(&self) -> Money {
        Money::from_cents(self.purchase_price_cents)
    }

    #[inline]
    pub fn total_amount(&self) -> Money {
        Money::from_cents(self.total_amount_cents)
    }

    #[inline]
    pub fn net_profit(&self) -> Money {
        Money::from_cents(self.net_profit_cents)
    }

    /// Product cost borne by the shop: purchase price + packaging.
    #[inline]
    pub fn cost(&self) -> Money {
        self.purchase_price() + self.packaging_cost()
    }
}

// =============================================================================
// Expense
// =============================================================================

/// Where an expense record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseSource {
    /// Entered directly on the reports screen.
    #[default]
    Manual,
    /// Mirrored from a business cash-out on the accounts screen.
    CashLedger,
}

/// A business expense not tied to any order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Expense {
    pub id: String,
    pub title: String,
    pub amount_cents: i64,
    /// Category label ("Marketing Ad Cost", "General", ...).
    pub kind: String,
    #[ts(as = "String")]
    pub spent_on: NaiveDate,
    pub source: ExpenseSource,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Expense {
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// Cash Ledger
// =============================================================================

/// Direction of a cash movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CashDirection {
    CashIn,
    CashOut,
}

impl fmt::Display for CashDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CashDirection::CashIn => f.write_str("Cash In"),
            CashDirection::CashOut => f.write_str("Cash Out"),
        }
    }
}

impl FromStr for CashDirection {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "cashin" | "in" => Ok(CashDirection::CashIn),
            "cashout" | "out" => Ok(CashDirection::CashOut),
            _ => Err(not_allowed("direction", &["Cash In", "Cash Out"])),
        }
    }
}

/// What a cash movement was for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CashCategory {
    /// Courier remittance of collected COD cash.
    CourierPayment,
    DirectSales,
    Investment,
    MarketingAdCost,
    ProductPurchase,
    OperationalCost,
    PackagingCost,
    /// Owner taking money out; a cash-out but never a business expense.
    OwnerWithdrawal,
}

impl CashCategory {
    pub fn label(&self) -> &'static str {
        match self {
            CashCategory::CourierPayment => "Courier Payment",
            CashCategory::DirectSales => "Direct Sales",
            CashCategory::Investment => "Investment",
            CashCategory::MarketingAdCost => "Marketing Ad Cost",
            CashCategory::ProductPurchase => "Product Purchase",
            CashCategory::OperationalCost => "Operational Cost",
            CashCategory::PackagingCost => "Packaging Cost",
            CashCategory::OwnerWithdrawal => "Owner Withdrawal",
        }
    }
}

impl fmt::Display for CashCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CashCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "courierpayment" | "steadfastpayment" => Ok(CashCategory::CourierPayment),
            "directsales" => Ok(CashCategory::DirectSales),
            "investment" => Ok(CashCategory::Investment),
            "marketingadcost" | "marketing" => Ok(CashCategory::MarketingAdCost),
            "productpurchase" => Ok(CashCategory::ProductPurchase),
            "operationalcost" | "salary" => Ok(CashCategory::OperationalCost),
            "packagingcost" | "packaging" => Ok(CashCategory::PackagingCost),
            "ownerwithdrawal" => Ok(CashCategory::OwnerWithdrawal),
            _ => Err(not_allowed(
                "category",
                &[
                    "Courier Payment",
                    "Direct Sales",
                    "Investment",
                    "Marketing Ad Cost",
                    "Product Purchase",
                    "Operational Cost",
                    "Packaging Cost",
                    "Owner Withdrawal",
                ],
            )),
        }
    }
}

/// How the money moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Bank,
    Cash,
    /// bKash / Nagad style mobile wallets.
    MobileWallet,
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "bank" => Ok(PaymentMethod::Bank),
            "cash" => Ok(PaymentMethod::Cash),
            "mobilewallet" | "bkash" | "nagad" => Ok(PaymentMethod::MobileWallet),
            _ => Err(not_allowed("method", &["Bank", "Cash", "Mobile Wallet"])),
        }
    }
}

/// A manual cash-in / cash-out entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct CashTransaction {
    pub id: String,
    pub amount_cents: i64,
    pub direction: CashDirection,
    pub category: CashCategory,
    pub method: PaymentMethod,
    pub note: String,
    #[ts(as = "String")]
    pub date: NaiveDate,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl CashTransaction {
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }

    /// Amount with sign: positive for cash in, negative for cash out.
    pub fn signed_amount(&self) -> Money {
        match self.direction {
            CashDirection::CashIn => self.amount(),
            CashDirection::CashOut => -self.amount(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_default() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
    }

    #[test]
    fn test_order_status_parses_legacy_labels() {
        assert_eq!("In Transit".parse::<OrderStatus>().unwrap(), OrderStatus::InTransit);
        assert_eq!("shipped".parse::<OrderStatus>().unwrap(), OrderStatus::InTransit);
        assert_eq!("in_transit".parse::<OrderStatus>().unwrap(), OrderStatus::InTransit);
        assert_eq!("Canceled".parse::<OrderStatus>().unwrap(), OrderStatus::Cancelled);
        assert!("lost".parse::<OrderStatus>().is_err());

        for status in OrderStatus::ALL {
            assert_eq!(status.label().parse::<OrderStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_enums_serialize_snake_case() {
        assert_eq!(serde_json::to_string(&OrderStatus::InTransit).unwrap(), "\"in_transit\"");
        assert_eq!(
            serde_json::to_string(&CashCategory::OwnerWithdrawal).unwrap(),
            "\"owner_withdrawal\""
        );
        let method: PaymentMethod = serde_json::from_str("\"mobile_wallet\"").unwrap();
        assert_eq!(method, PaymentMethod::MobileWallet);
    }

    #[test]
    fn test_awaits_collection() {
        assert!(OrderStatus::Pending.awaits_collection());
        assert!(OrderStatus::InTransit.awaits_collection());
        assert!(OrderStatus::Delivered.awaits_collection());
        assert!(!OrderStatus::Returned.awaits_collection());
        assert!(!OrderStatus::Cancelled.awaits_collection());
    }

    #[test]
    fn test_cash_category_parsing() {
        assert_eq!(
            "Owner Withdrawal".parse::<CashCategory>().unwrap(),
            CashCategory::OwnerWithdrawal
        );
        assert_eq!(
            "Steadfast Payment".parse::<CashCategory>().unwrap(),
            CashCategory::CourierPayment
        );
        assert!("Lottery".parse::<CashCategory>().is_err());
    }

    #[test]
    fn test_direction_and_method_parsing() {
        assert_eq!("Cash Out".parse::<CashDirection>().unwrap(), CashDirection::CashOut);
        assert_eq!("cash_in".parse::<CashDirection>().unwrap(), CashDirection::CashIn);
        assert_eq!("Bkash".parse::<PaymentMethod>().unwrap(), PaymentMethod::MobileWallet);
        assert!("cheque".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn test_product_stock_value_handles_negative_stock() {
        let now = Utc::now();
        let product = Product {
            id: "p".to_string(),
            name: "Vegetable Cutter".to_string(),
            buy_price_cents: 10000,
            sell_price_cents: 15000,
            stock: -2,
            created_at: now,
            updated_at: now,
        };
        assert_eq!(product.stock_value().cents(), -20000);
    }
}
