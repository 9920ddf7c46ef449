//! # Order Module
//!
//! Turns order forms into [`Order`] records and applies edits to them.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  OrderDraft ──validate──► into_order(product snapshot) ──► Order        │
//! │      ▲                           │                           │          │
//! │      │                           │ product_id set:           │          │
//! │  BulkEntry::partition            │ stock − 1 in the SAME     │          │
//! │  (incomplete rows skipped)       │ store transaction         │          │
//! │                                                              ▼          │
//! │                        OrderPatch::apply ──► total / profit recomputed  │
//! │                                              only when inputs change    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Pricing Rules
//! - `total_amount = sale_price + delivery_charge` (cash the courier collects)
//! - `net_profit = sale_price − purchase_price − packaging_cost`
//!
//! The delivery charge is passed through to the courier, so it never enters
//! the profit. Single orders, bulk rows and edits all use these two
//! functions.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::calendar::Calendar;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{Order, OrderSource, OrderStatus};
use crate::validation::{
    validate_customer_name, validate_phone, validate_price_cents, validate_product_name,
    validate_text,
};
use crate::{DEFAULT_DELIVERY_CHARGE_CENTS, DEFAULT_PACKAGING_COST_CENTS};

// =============================================================================
// Pricing
// =============================================================================

/// Cash collected on delivery.
#[inline]
pub fn total_amount(sale_price: Money, delivery_charge: Money) -> Money {
    sale_price + delivery_charge
}

/// Profit on one order.
///
/// ## Example
/// ```rust
/// use opsdesk_core::money::Money;
/// use opsdesk_core::order::net_profit;
///
/// let profit = net_profit(Money::from_major(150), Money::from_major(100), Money::from_major(10));
/// assert_eq!(profit.cents(), 4000);
/// ```
#[inline]
pub fn net_profit(sale_price: Money, purchase_price: Money, packaging_cost: Money) -> Money {
    sale_price - purchase_price - packaging_cost
}

/// Bounds every supplied price field.
fn validate_prices(
    sale: Option<i64>,
    delivery: Option<i64>,
    packaging: Option<i64>,
    purchase: Option<i64>,
) -> Result<(), ValidationError> {
    let fields = [
        ("sale_price", sale),
        ("delivery_charge", delivery),
        ("packaging_cost", packaging),
        ("purchase_price", purchase),
    ];
    for (field, cents) in fields {
        if let Some(cents) = cents {
            validate_price_cents(field, cents)?;
        }
    }
    Ok(())
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

// =============================================================================
// Product Snapshot
// =============================================================================

/// The product fields an order freezes at creation time.
///
/// The store returns this from the same statement that decrements stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ProductSnapshot {
    pub name: String,
    pub buy_price_cents: i64,
    pub sell_price_cents: i64,
}

// =============================================================================
// Order Draft
// =============================================================================

/// An order as typed on the entry form.
///
/// Omitted prices fall back to the referenced product (sale, purchase) or
/// to the shop defaults (delivery 60.00, packaging 10.00).
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct OrderDraft {
    pub customer_name: String,
    pub phone: String,
    pub address: String,

    /// Inventory item to sell. `None` (or blank) means a custom product
    /// that is not tracked in stock.
    pub product_id: Option<String>,

    /// Required for custom products; ignored when `product_id` resolves.
    pub product_name: Option<String>,

    pub sale_price_cents: Option<i64>,
    pub delivery_charge_cents: Option<i64>,
    pub packaging_cost_cents: Option<i64>,

    /// Overrides the product's buy price snapshot.
    pub purchase_price_cents: Option<i64>,

    pub status: Option<OrderStatus>,
    pub note: Option<String>,
    pub source: OrderSource,

    /// Backdated creation time; defaults to now.
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,
}

impl OrderDraft {
    /// Trimmed product id, if the draft references the inventory.
    pub fn product_ref(&self) -> Option<String> {
        non_blank(self.product_id.as_deref())
    }

    /// Checks the customer fields without touching prices.
    ///
    /// Runs before any store call so a rejected form writes nothing.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_customer_name(&self.customer_name)?;
        validate_phone(&self.phone)?;
        validate_text("address", &self.address)?;
        if let Some(note) = &self.note {
            validate_text("note", note)?;
        }
        validate_prices(
            self.sale_price_cents,
            self.delivery_charge_cents,
            self.packaging_cost_cents,
            self.purchase_price_cents,
        )?;
        if self.product_ref().is_none() {
            validate_product_name(self.product_name.as_deref().unwrap_or_default())?;
            if self.sale_price_cents.is_none() {
                return Err(ValidationError::required("sale_price"));
            }
        }
        Ok(())
    }

    /// Prices the draft into an [`Order`].
    ///
    /// `product` is the snapshot read while decrementing stock; it must be
    /// `Some` whenever the draft references a product.
    ///
    /// ## Errors
    /// - [`CoreError::ProductNotFound`] if the draft references a product
    ///   but no snapshot was found
    /// - [`CoreError::Validation`] for bad customer fields
    pub fn into_order(
        self,
        id: String,
        product: Option<&ProductSnapshot>,
        now: DateTime<Utc>,
    ) -> CoreResult<Order> {
        self.validate()?;

        let product_id = self.product_ref();
        let (product_name, sale, purchase) = match (&product_id, product) {
            (Some(_), Some(snapshot)) => (
                snapshot.name.clone(),
                self.sale_price_cents.unwrap_or(snapshot.sell_price_cents),
                self.purchase_price_cents.unwrap_or(snapshot.buy_price_cents),
            ),
            (Some(missing), None) => return Err(CoreError::ProductNotFound(missing.clone())),
            (None, _) => (
                validate_product_name(self.product_name.as_deref().unwrap_or_default())?,
                self.sale_price_cents.unwrap_or_default(),
                self.purchase_price_cents.unwrap_or_default(),
            ),
        };

        let sale = Money::from_cents(sale);
        let purchase = Money::from_cents(purchase);
        let delivery =
            Money::from_cents(self.delivery_charge_cents.unwrap_or(DEFAULT_DELIVERY_CHARGE_CENTS));
        let packaging =
            Money::from_cents(self.packaging_cost_cents.unwrap_or(DEFAULT_PACKAGING_COST_CENTS));

        Ok(Order {
            id,
            customer_name: validate_customer_name(&self.customer_name)?,
            phone: validate_phone(&self.phone)?,
            address: validate_text("address", &self.address)?,
            product_id,
            product_name,
            sale_price_cents: sale.cents(),
            delivery_charge_cents: delivery.cents(),
            packaging_cost_cents: packaging.cents(),
            purchase_price_cents: purchase.cents(),
            total_amount_cents: total_amount(sale, delivery).cents(),
            net_profit_cents: net_profit(sale, purchase, packaging).cents(),
            status: self.status.unwrap_or_default(),
            note: non_blank(self.note.as_deref()),
            source: self.source,
            created_at: self.created_at.unwrap_or(now),
            updated_at: now,
        })
    }
}

// =============================================================================
// Bulk Entry
// =============================================================================

/// One row of the bulk entry grid.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct BulkRow {
    pub customer_name: String,
    pub phone: String,
    pub address: String,
    pub product_id: Option<String>,
    pub sale_price_cents: Option<i64>,
    pub delivery_charge_cents: Option<i64>,
    pub purchase_price_cents: Option<i64>,
    pub note: Option<String>,
}

impl BulkRow {
    /// A row is accepted only with a customer name, phone and product id.
    pub fn is_complete(&self) -> bool {
        !self.customer_name.trim().is_empty()
            && !self.phone.trim().is_empty()
            && non_blank(self.product_id.as_deref()).is_some()
    }
}

fn bulk_default_status() -> OrderStatus {
    OrderStatus::Delivered
}

/// A batch of past orders entered in one go.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BulkEntry {
    pub rows: Vec<BulkRow>,

    /// Status for every row; historical imports default to Delivered.
    #[serde(default = "bulk_default_status")]
    pub status: OrderStatus,

    /// Shared order date; rows are stamped at the shop's local midnight.
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub order_date: Option<NaiveDate>,

    #[serde(default)]
    pub packaging_cost_cents: Option<i64>,
}

impl BulkEntry {
    pub fn new(rows: Vec<BulkRow>) -> Self {
        Self {
            rows,
            status: bulk_default_status(),
            order_date: None,
            packaging_cost_cents: None,
        }
    }

    /// Splits the grid into drafts to create and row indices to skip.
    ///
    /// Incomplete rows are not errors; they are reported back by index.
    pub fn partition(self, calendar: Calendar) -> BulkPlan {
        let created_at = self.order_date.map(|day| calendar.start_of(day));

        let mut drafts = Vec::new();
        let mut skipped = Vec::new();

        for (index, row) in self.rows.into_iter().enumerate() {
            if !row.is_complete() {
                skipped.push(index);
                continue;
            }
            drafts.push(OrderDraft {
                customer_name: row.customer_name,
                phone: row.phone,
                address: row.address,
                product_id: row.product_id,
                product_name: None,
                sale_price_cents: row.sale_price_cents,
                delivery_charge_cents: row.delivery_charge_cents,
                packaging_cost_cents: self.packaging_cost_cents,
                purchase_price_cents: row.purchase_price_cents,
                status: Some(self.status),
                note: row.note,
                source: OrderSource::BulkEntry,
                created_at,
            });
        }

        BulkPlan { drafts, skipped }
    }
}

/// Result of [`BulkEntry::partition`].
#[derive(Debug, Clone, Default)]
pub struct BulkPlan {
    pub drafts: Vec<OrderDraft>,
    pub skipped: Vec<usize>,
}

/// What a committed bulk entry produced.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BulkOutcome {
    pub orders: Vec<Order>,
    /// Zero-based indices of rows left out for missing fields.
    pub skipped: Vec<usize>,
}

impl BulkOutcome {
    /// Number of orders created.
    pub fn count(&self) -> usize {
        self.orders.len()
    }
}

// =============================================================================
// Order Patch
// =============================================================================

/// A partial edit of an existing order.
///
/// Only supplied fields are written. The product reference cannot be
/// changed, and no edit ever touches stock.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct OrderPatch {
    pub customer_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub product_name: Option<String>,
    pub sale_price_cents: Option<i64>,
    pub delivery_charge_cents: Option<i64>,
    pub packaging_cost_cents: Option<i64>,
    pub purchase_price_cents: Option<i64>,
    pub status: Option<OrderStatus>,
    pub note: Option<String>,
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,
}

impl OrderPatch {
    pub fn is_empty(&self) -> bool {
        self.customer_name.is_none()
            && self.phone.is_none()
            && self.address.is_none()
            && self.product_name.is_none()
            && self.sale_price_cents.is_none()
            && self.delivery_charge_cents.is_none()
            && self.packaging_cost_cents.is_none()
            && self.purchase_price_cents.is_none()
            && self.status.is_none()
            && self.note.is_none()
            && self.created_at.is_none()
    }

    pub fn touches_total(&self) -> bool {
        self.sale_price_cents.is_some() || self.delivery_charge_cents.is_some()
    }

    pub fn touches_profit(&self) -> bool {
        self.sale_price_cents.is_some()
            || self.purchase_price_cents.is_some()
            || self.packaging_cost_cents.is_some()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.customer_name {
            validate_customer_name(name)?;
        }
        if let Some(phone) = &self.phone {
            validate_phone(phone)?;
        }
        if let Some(address) = &self.address {
            validate_text("address", address)?;
        }
        if let Some(name) = &self.product_name {
            validate_product_name(name)?;
        }
        if let Some(note) = &self.note {
            validate_text("note", note)?;
        }
        validate_prices(
            self.sale_price_cents,
            self.delivery_charge_cents,
            self.packaging_cost_cents,
            self.purchase_price_cents,
        )
    }

    /// Overwrites the supplied fields of `order`.
    ///
    /// `total_amount` is recomputed iff the sale price or delivery charge
    /// was supplied; `net_profit` iff the sale price, purchase price or
    /// packaging cost was supplied. Otherwise both stay as stored.
    pub fn apply(&self, order: &mut Order, now: DateTime<Utc>) -> Result<(), ValidationError> {
        self.validate()?;

        if let Some(name) = &self.customer_name {
            order.customer_name = validate_customer_name(name)?;
        }
        if let Some(phone) = &self.phone {
            order.phone = validate_phone(phone)?;
        }
        if let Some(address) = &self.address {
            order.address = validate_text("address", address)?;
        }
        if let Some(name) = &self.product_name {
            order.product_name = validate_product_name(name)?;
        }
        if let Some(sale) = self.sale_price_cents {
            order.sale_price_cents = sale;
        }
        if let Some(delivery) = self.delivery_charge_cents {
            order.delivery_charge_cents = delivery;
        }
        if let Some(packaging) = self.packaging_cost_cents {
            order.packaging_cost_cents = packaging;
        }
        if let Some(purchase) = self.purchase_price_cents {
            order.purchase_price_cents = purchase;
        }
        if let Some(status) = self.status {
            order.status = status;
        }
        if let Some(note) = &self.note {
            order.note = non_blank(Some(note.as_str()));
        }
        if let Some(created_at) = self.created_at {
            order.created_at = created_at;
        }

        if self.touches_total() {
            order.total_amount_cents =
                total_amount(order.sale_price(), order.delivery_charge()).cents();
        }
        if self.touches_profit() {
            order.net_profit_cents = net_profit(
                order.sale_price(),
                order.purchase_price(),
                order.packaging_cost(),
            )
            .cents();
        }

        order.updated_at = now;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
