//! # Messaging Module
//!
//! Confirmation texts and WhatsApp chat-compose links for an order.
//!
//! Two messages exist:
//! - the **office message**, pasted into the staff group for packing
//! - the **customer message**, sent to the buyer as confirmation
//!
//! Links use the public `https://wa.me/<phone>?text=<message>` form; the
//! office link has no phone so the user picks the group.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use url::Url;

use crate::error::ValidationError;
use crate::types::Order;

const CHAT_BASE: &str = "https://wa.me/";

/// Digits of `phone` with `prefix` in front unless already present.
///
/// ## Example
/// ```rust
/// use opsdesk_core::messaging::normalize_phone;
///
/// assert_eq!(normalize_phone("01712-345678", "88"), "8801712345678");
/// assert_eq!(normalize_phone("+880 1712 345678", "88"), "8801712345678");
/// ```
pub fn normalize_phone(phone: &str, prefix: &str) -> String {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    if digits.starts_with(prefix) {
        digits
    } else {
        format!("{prefix}{digits}")
    }
}

/// Packing slip text for the office group.
pub fn office_message(order: &Order) -> String {
    format!(
        "- Name: {}\n- Address: {}\n- Mobile number:\n     {}\n\n.    {}-{} /-\nThank you",
        order.customer_name,
        order.address,
        order.phone,
        order.product_name,
        order.total_amount(),
    )
}

/// Order confirmation for the customer.
pub fn customer_message(order: &Order, shop_name: &str) -> String {
    format!(
        "Assalamu Alaikum, {}!\n\
         Thank you for ordering from our shop.\n\n\
         Your order has been confirmed.\n\
         Product: {}\n\
         Total bill: {} Tk (including delivery charge)\n\n\
         Regards,\n{}",
        order.customer_name,
        order.product_name,
        order.total_amount(),
        shop_name,
    )
}

fn compose_url(path: &str, text: &str) -> Result<String, ValidationError> {
    let base = format!("{CHAT_BASE}{path}");
    Url::parse_with_params(&base, &[("text", text)])
        .map(String::from)
        .map_err(|e| ValidationError::InvalidFormat {
            field: "link".to_string(),
            reason: e.to_string(),
        })
}

/// Both share links for one order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderLinks {
    pub office_url: String,
    pub customer_url: String,
}

impl OrderLinks {
    /// ## Errors
    /// [`ValidationError::InvalidFormat`] if the order phone has no digits.
    pub fn build(order: &Order, shop_name: &str, phone_prefix: &str) -> Result<Self, ValidationError> {
        if !order.phone.chars().any(|c| c.is_ascii_digit()) {
            return Err(ValidationError::InvalidFormat {
                field: "phone".to_string(),
                reason: "must contain digits".to_string(),
            });
        }

        Ok(Self {
            office_url: compose_url("", &office_message(order))?,
            customer_url: compose_url(
                &normalize_phone(&order.phone, phone_prefix),
                &customer_message(order, shop_name),
            )?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{OrderSource, OrderStatus};
    use chrono::Utc;

    fn order() -> Order {
        let now = Utc::now();
        Order {
            id: "o-1".to_string(),
            customer_name: "Rahim".to_string(),
            phone: "01712-345678".to_string(),
            address: "Mirpur 10".to_string(),
            product_id: None,
            product_name: "Push Chopper".to_string(),
            sale_price_cents: 15000,
            delivery_charge_cents: 6000,
            packaging_cost_cents: 1000,
            purchase_price_cents: 10000,
            total_amount_cents: 21000,
            net_profit_cents: 4000,
            status: OrderStatus::Pending,
            note: None,
            source: OrderSource::ManualEntry,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_normalize_phone_keeps_existing_prefix() {
        assert_eq!(normalize_phone("8801712345678", "88"), "8801712345678");
        assert_eq!(normalize_phone("017 1234", "88"), "880171234");
    }

    #[test]
    fn test_messages_carry_total() {
        let o = order();
        assert!(office_message(&o).contains("Push Chopper-210.00 /-"));
        let text = customer_message(&o, "JOSS PRO");
        assert!(text.contains("Total bill: 210.00 Tk"));
        assert!(text.ends_with("JOSS PRO"));
    }

    #[test]
    fn test_links() {
        let links = OrderLinks::build(&order(), "JOSS PRO", "88").unwrap();
        assert!(links.customer_url.starts_with("https://wa.me/8801712345678?text="));
        assert!(links.office_url.starts_with("https://wa.me/?text="));
        assert!(!links.customer_url.contains(' '));
    }

    #[test]
    fn test_links_reject_phone_without_digits() {
        let mut o = order();
        o.phone = "n/a".to_string();
        assert!(OrderLinks::build(&o, "Shop", "88").is_err());
    }
}
