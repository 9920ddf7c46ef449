//! # Inventory Commands
//!
//! Product CRUD for the inventory screen. Stock typed here is an absolute
//! restock count; orders decrement it relatively in the store.

use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::{DbState, SessionState};
use opsdesk_core::inventory::{ProductDraft, ProductPatch};
use opsdesk_core::{Product, Screen};

/// Lists all products by name.
pub async fn list_products(db: &DbState, session: &SessionState) -> Result<Vec<Product>, ApiError> {
    session.require(Screen::Inventory)?;
    Ok(db.inner().products().list().await?)
}

/// Gets a single product by its UUID.
pub async fn get_product(db: &DbState, session: &SessionState, id: &str) -> Result<Product, ApiError> {
    session.require(Screen::Inventory)?;
    debug!(id = %id, "get_product command");

    db.inner()
        .products()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", id))
}

pub async fn create_product(
    db: &DbState,
    session: &SessionState,
    draft: ProductDraft,
) -> Result<Product, ApiError> {
    session.require(Screen::Inventory)?;
    Ok(db.inner().products().create(draft).await?)
}

/// Overwrites the supplied fields. An empty patch is a no-op read.
pub async fn update_product(
    db: &DbState,
    session: &SessionState,
    id: &str,
    patch: ProductPatch,
) -> Result<Product, ApiError> {
    session.require(Screen::Inventory)?;

    if patch.is_empty() {
        return get_product(db, session, id).await;
    }
    Ok(db.inner().products().update(id, patch).await?)
}

/// Hard-deletes a product. Orders keep their snapshot.
pub async fn delete_product(db: &DbState, session: &SessionState, id: &str) -> Result<(), ApiError> {
    session.require(Screen::Inventory)?;
    db.inner().products().delete(id).await?;
    info!(id = %id, "delete_product command complete");
    Ok(())
}
