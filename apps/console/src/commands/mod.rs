//! # Console Commands Module
//!
//! Every operation the console exposes, one module per screen.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs        ◄─── You are here (exports)
//! ├── session.rs    ◄─── Login, logout, visible screens
//! ├── config.rs     ◄─── Configuration retrieval
//! ├── inventory.rs  ◄─── Product CRUD
//! ├── order.rs      ◄─── Order entry, bulk entry, edits
//! ├── notify.rs     ◄─── Chat-compose links for an order
//! ├── expense.rs    ◄─── Expense ledger
//! ├── accounts.rs   ◄─── Cash ledger and wallet
//! └── report.rs     ◄─── Dashboards and period report
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create_order(&db, &session, &config, draft)                            │
//! │         │                                                               │
//! │         ├── session.require(Screen::OrderEntry)?   ◄── role gate        │
//! │         ├── fill order defaults from config                             │
//! │         ├── db.orders().create(draft).await?       ◄── one transaction  │
//! │         ▼                                                               │
//! │  Result<Order, ApiError>  (serialized to JSON by the binary)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## State Injection
//! Each command takes only the state it needs:
//! ```rust,ignore
//! // Only needs config
//! fn get_config(config: &ConfigState) -> ConfigState
//!
//! // Needs database and session
//! async fn list_orders(db: &DbState, session: &SessionState)
//!
//! // Needs all three
//! async fn create_order(db: &DbState, session: &SessionState, config: &ConfigState, draft: OrderDraft)
//! ```

pub mod accounts;
pub mod config;
pub mod expense;
pub mod inventory;
pub mod notify;
pub mod order;
pub mod report;
pub mod session;

#[cfg(test)]
pub(crate) mod testing {
    use opsdesk_core::inventory::ProductDraft;
    use opsdesk_core::{Product, Role};
    use opsdesk_db::DbConfig;

    use crate::state::{DbState, SessionState};

    pub async fn db() -> DbState {
        DbState::open(DbConfig::in_memory()).await.unwrap()
    }

    pub fn admin() -> SessionState {
        SessionState::logged_in(Role::Admin)
    }

    pub fn staff() -> SessionState {
        SessionState::logged_in(Role::Staff)
    }

    pub async fn cutter(db: &DbState, stock: i64) -> Product {
        db.inner()
            .products()
            .create(ProductDraft {
                name: "Vegetable Cutter".to_string(),
                buy_price_cents: 10000,
                sell_price_cents: 15000,
                stock,
            })
            .await
            .unwrap()
    }
}
