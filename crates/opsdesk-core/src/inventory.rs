//! # Inventory Module
//!
//! Product forms for the inventory screen.
//!
//! Stock set here is absolute (a restock count typed by a person); sales
//! never go through this path, they decrement stock relatively in the
//! store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::Product;
use crate::validation::{validate_price_cents, validate_product_name, validate_stock};

/// A new inventory item.
///
/// Only the name is required. Prices may be zero or negative, within
/// [`MAX_AMOUNT_CENTS`](crate::validation::MAX_AMOUNT_CENTS).
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct ProductDraft {
    pub name: String,
    pub buy_price_cents: i64,
    pub sell_price_cents: i64,
    pub stock: i64,
}

impl ProductDraft {
    pub fn into_product(self, id: String, now: DateTime<Utc>) -> Result<Product, ValidationError> {
        Ok(Product {
            id,
            name: validate_product_name(&self.name)?,
            buy_price_cents: validate_price_cents("buy_price", self.buy_price_cents)?,
            sell_price_cents: validate_price_cents("sell_price", self.sell_price_cents)?,
            stock: validate_stock(self.stock)?,
            created_at: now,
            updated_at: now,
        })
    }
}

/// A manual product edit. Supplied fields overwrite; last write wins.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub buy_price_cents: Option<i64>,
    pub sell_price_cents: Option<i64>,
    /// Absolute stock count.
    pub stock: Option<i64>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.buy_price_cents.is_none()
            && self.sell_price_cents.is_none()
            && self.stock.is_none()
    }

    /// Validates the patch and trims the name.
    pub fn normalized(self) -> Result<Self, ValidationError> {
        let name = match self.name {
            Some(name) => Some(validate_product_name(&name)?),
            None => None,
        };
        if let Some(buy) = self.buy_price_cents {
            validate_price_cents("buy_price", buy)?;
        }
        if let Some(sell) = self.sell_price_cents {
            validate_price_cents("sell_price", sell)?;
        }
        if let Some(stock) = self.stock {
            validate_stock(stock)?;
        }
        Ok(Self { name, ..self })
    }
}
