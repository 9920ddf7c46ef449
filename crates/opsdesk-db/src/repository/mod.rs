//! # Repository Module
//!
//! One repository per ledger, all sharing the same pool.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Console Command                                                        │
//! │       │                                                                 │
//! │       │  db.orders().create(draft)                                      │
//! │       ▼                                                                 │
//! │  OrderRepository ──────────► product::decrement_stock_on (same tx)      │
//! │  CashRepository  ──────────► expense::insert_expense_on  (same tx)      │
//! │  ReportRepository ─────────► reads all four tables, one snapshot        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Cross-ledger writes share a transaction through the crate-private
//! `*_on(&mut SqliteConnection, ..)` helpers; nothing outside this crate
//! can split them.
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Inventory store
//! - [`OrderRepository`](order::OrderRepository) - Order ledger and bulk entry
//! - [`ExpenseRepository`](expense::ExpenseRepository) - Expense ledger
//! - [`CashRepository`](cash::CashRepository) - Cash ledger with expense mirror
//! - [`ReportRepository`](report::ReportRepository) - Dashboard snapshots

pub mod cash;
pub mod expense;
pub mod order;
pub mod product;
pub mod report;
