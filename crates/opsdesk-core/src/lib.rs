//! # opsdesk-core: Pure Ledger Rules
//!
//! Order pricing, bulk-entry filtering, the cash/expense mirror rule and
//! every dashboard statistic, as pure functions with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        opsdesk Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Console Commands                             │   │
//! │  │    create_order, record_transaction, admin_dashboard, ...       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ opsdesk-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐  │   │
//! │  │   │  types  │ │  order  │ │  cash   │ │ report  │ │messaging│  │   │
//! │  │   │ records │ │ pricing │ │ mirror  │ │dashboard│ │ wa.me   │  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └─────────┘ └─────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    opsdesk-db (Database Layer)                  │   │
//! │  │        SQLite ledgers, atomic stock decrement, mirror writes    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Ledger records (Product, Order, Expense, CashTransaction)
//! - [`money`] - Money type with integer arithmetic
//! - [`inventory`] - Product forms and edits
//! - [`order`] - Order drafts, bulk rows and edit patches
//! - [`cash`] - Cash entries and the mirrored-expense rule
//! - [`report`] - Dashboard and period aggregation
//! - [`calendar`] - Shop-local calendar days
//! - [`messaging`] - Chat-compose texts and links
//! - [`access`] - Roles and the screens they may open
//! - [`error`] - Domain error types
//! - [`validation`] - Input checks
//!
//! ## Example Usage
//!
//! ```rust
//! use opsdesk_core::money::Money;
//! use opsdesk_core::order::net_profit;
//!
//! let profit = net_profit(
//!     Money::from_major(150), // sale
//!     Money::from_major(100), // purchase
//!     Money::from_major(10),  // packaging
//! );
//! assert_eq!(profit.cents(), 4000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod access;
pub mod calendar;
pub mod cash;
pub mod error;
pub mod inventory;
pub mod messaging;
pub mod money;
pub mod order;
pub mod report;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use access::{Role, Screen, Session};
pub use calendar::Calendar;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Courier delivery charge pre-filled on new orders (60.00).
pub const DEFAULT_DELIVERY_CHARGE_CENTS: i64 = 6_000;

/// Packaging cost pre-filled on new orders (10.00).
pub const DEFAULT_PACKAGING_COST_CENTS: i64 = 1_000;

/// Length of the "recent orders" list on the staff dashboard.
pub const RECENT_ORDERS_LIMIT: usize = 5;

/// Country prefix added to customer phones for chat links.
pub const DEFAULT_PHONE_PREFIX: &str = "88";

/// Expense category used when none is given.
pub const DEFAULT_EXPENSE_KIND: &str = "General";
