//! # Order Commands
//!
//! Order entry, bulk entry and the order list.
//!
//! ## Order Entry Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Order form submitted                                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  delivery / packaging left blank? ── fill from ConfigState              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  db.orders().create(draft)                                              │
//! │       │   BEGIN; stock = stock - 1 RETURNING snapshot; INSERT; COMMIT   │
//! │       ▼                                                                 │
//! │  Order (total, profit and product snapshot filled in)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::{ConfigState, DbState, SessionState};
use opsdesk_core::order::{BulkEntry, BulkOutcome, OrderDraft, OrderPatch};
use opsdesk_core::{Order, OrderSource, OrderStatus, Screen};

/// Lists all orders, newest first.
pub async fn list_orders(db: &DbState, session: &SessionState) -> Result<Vec<Order>, ApiError> {
    session.require(Screen::Orders)?;
    Ok(db.inner().orders().list().await?)
}

pub async fn get_order(db: &DbState, session: &SessionState, id: &str) -> Result<Order, ApiError> {
    session.require(Screen::Orders)?;

    db.inner()
        .orders()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Order", id))
}

/// Creates one order and decrements its product's stock.
///
/// Blank delivery and packaging fields take the configured defaults.
pub async fn create_order(
    db: &DbState,
    session: &SessionState,
    config: &ConfigState,
    mut draft: OrderDraft,
) -> Result<Order, ApiError> {
    session.require(Screen::OrderEntry)?;
    debug!(customer = %draft.customer_name, "create_order command");

    draft
        .delivery_charge_cents
        .get_or_insert(config.default_delivery_charge_cents);
    draft
        .packaging_cost_cents
        .get_or_insert(config.default_packaging_cost_cents);
    draft.source = OrderSource::ManualEntry;

    let order = db.inner().orders().create(draft).await?;

    info!(
        id = %order.id,
        total = %config.format_currency(order.total_amount_cents),
        "create_order command complete"
    );
    Ok(order)
}

/// Creates every complete row of a bulk grid in one transaction.
pub async fn create_bulk_orders(
    db: &DbState,
    session: &SessionState,
    config: &ConfigState,
    mut entry: BulkEntry,
) -> Result<BulkOutcome, ApiError> {
    session.require(Screen::BulkEntry)?;
    debug!(rows = entry.rows.len(), "create_bulk_orders command");

    entry
        .packaging_cost_cents
        .get_or_insert(config.default_packaging_cost_cents);
    for row in &mut entry.rows {
        row.delivery_charge_cents
            .get_or_insert(config.default_delivery_charge_cents);
    }

    let outcome = db.inner().orders().create_bulk(entry).await?;

    info!(
        created = outcome.count(),
        skipped = outcome.skipped.len(),
        "create_bulk_orders command complete"
    );
    Ok(outcome)
}

/// Overwrites the supplied fields; stock is never touched.
pub async fn update_order(
    db: &DbState,
    session: &SessionState,
    id: &str,
    patch: OrderPatch,
) -> Result<Order, ApiError> {
    session.require(Screen::Orders)?;

    if patch.is_empty() {
        return get_order(db, session, id).await;
    }
    Ok(db.inner().orders().update(id, patch).await?)
}

pub async fn set_order_status(
    db: &DbState,
    session: &SessionState,
    id: &str,
    status: OrderStatus,
) -> Result<(), ApiError> {
    session.require(Screen::Orders)?;
    Ok(db.inner().orders().set_status(id, status).await?)
}

/// Deletes an order. Stock is not restored.
pub async fn delete_order(db: &DbState, session: &SessionState, id: &str) -> Result<(), ApiError> {
    session.require(Screen::Orders)?;
    Ok(db.inner().orders().delete(id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing;
    use crate::error::ErrorCode;
    use opsdesk_core::order::BulkRow;

    fn draft(product_id: &str) -> OrderDraft {
        OrderDraft {
            customer_name: "Rahim".to_string(),
            phone: "01712345678".to_string(),
            address: "Mirpur 10".to_string(),
            product_id: Some(product_id.to_string()),
            sale_price_cents: Some(15000),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_order_uses_configured_defaults() {
        let db = testing::db().await;
        let product = testing::cutter(&db, 5).await;
        let config = ConfigState {
            default_delivery_charge_cents: 12000,
            ..Default::default()
        };

        let order = create_order(&db, &testing::staff(), &config, draft(&product.id))
            .await
            .unwrap();

        assert_eq!(order.delivery_charge_cents, 12000);
        assert_eq!(order.packaging_cost_cents, 1000);
        assert_eq!(order.total_amount_cents, 27000);
        assert_eq!(order.net_profit_cents, 4000);
        assert_eq!(order.source, OrderSource::ManualEntry);

        let stock = db.inner().products().get_by_id(&product.id).await.unwrap().unwrap().stock;
        assert_eq!(stock, 4);
    }

    #[tokio::test]
    async fn test_staff_cannot_bulk_import() {
        let db = testing::db().await;
        let err = create_bulk_orders(
            &db,
            &testing::staff(),
            &ConfigState::default(),
            BulkEntry::new(Vec::new()),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn test_admin_bulk_import() {
        let db = testing::db().await;
        let product = testing::cutter(&db, 5).await;
        let row = |phone: &str| BulkRow {
            customer_name: "Salma".to_string(),
            phone: phone.to_string(),
            product_id: Some(product.id.clone()),
            ..Default::default()
        };

        let outcome = create_bulk_orders(
            &db,
            &testing::admin(),
            &ConfigState::default(),
            BulkEntry::new(vec![row("01711111111"), row(" "), row("01822222222")]),
        )
        .await
        .unwrap();

        assert_eq!(outcome.count(), 2);
        assert_eq!(outcome.skipped, vec![1]);
        // sale price defaults to the product's sell price
        assert!(outcome.orders.iter().all(|o| o.sale_price_cents == 15000));
        assert!(outcome.orders.iter().all(|o| o.delivery_charge_cents == 6000));
    }

    #[tokio::test]
    async fn test_edit_then_delete() {
        let db = testing::db().await;
        let staff = testing::staff();
        let product = testing::cutter(&db, 5).await;
        let order = create_order(&db, &staff, &ConfigState::default(), draft(&product.id))
            .await
            .unwrap();

        let edited = update_order(
            &db,
            &staff,
            &order.id,
            OrderPatch {
                delivery_charge_cents: Some(12000),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(edited.total_amount_cents, 27000);
        assert_eq!(edited.net_profit_cents, order.net_profit_cents);

        set_order_status(&db, &staff, &order.id, OrderStatus::Returned)
            .await
            .unwrap();
        assert_eq!(
            get_order(&db, &staff, &order.id).await.unwrap().status,
            OrderStatus::Returned
        );

        delete_order(&db, &staff, &order.id).await.unwrap();
        assert!(list_orders(&db, &staff).await.unwrap().is_empty());

        let err = get_order(&db, &staff, &order.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_missing_product_is_not_found() {
        let db = testing::db().await;
        let err = create_order(&db, &testing::staff(), &ConfigState::default(), draft("gone"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert!(err.message.contains("Product"));
    }
}
