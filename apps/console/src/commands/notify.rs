//! # Notify Commands
//!
//! Chat-compose links for an order: one for the office group, one for the
//! customer. Nothing is sent; the console opens the links.

use tracing::debug;

use crate::commands::order::get_order;
use crate::error::ApiError;
use crate::state::{ConfigState, DbState, SessionState};
use opsdesk_core::messaging::OrderLinks;

pub async fn order_links(
    db: &DbState,
    session: &SessionState,
    config: &ConfigState,
    id: &str,
) -> Result<OrderLinks, ApiError> {
    let order = get_order(db, session, id).await?;
    debug!(id = %id, "order_links command");

    Ok(OrderLinks::build(&order, &config.shop_name, &config.phone_prefix)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::order::create_order;
    use crate::commands::testing;
    use opsdesk_core::order::OrderDraft;

    #[tokio::test]
    async fn test_links_use_configured_prefix() {
        let db = testing::db().await;
        let staff = testing::staff();
        let config = ConfigState::default();
        let product = testing::cutter(&db, 5).await;

        let order = create_order(
            &db,
            &staff,
            &config,
            OrderDraft {
                customer_name: "Rahim".to_string(),
                phone: "017-1234 5678".to_string(),
                product_id: Some(product.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let links = order_links(&db, &staff, &config, &order.id).await.unwrap();
        assert!(links.customer_url.starts_with("https://wa.me/8801712345678?text="));
        assert!(links.office_url.starts_with("https://wa.me/?text="));
    }
}
