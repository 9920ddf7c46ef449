//! # Cash Repository
//!
//! The manual cash ledger and its expense mirror.
//!
//! ## Mirror Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  record(entry)                                                          │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │   ├── INSERT INTO cash_transactions (...)                               │
//! │   ├── cash-out and not an owner withdrawal?                             │
//! │   │      └── INSERT INTO expenses (..., source = 'cash_ledger')         │
//! │  COMMIT  ← both rows or neither                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Deleting a transaction later leaves its mirrored expense in place.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::expense::{generate_expense_id, insert_expense_on};
use opsdesk_core::cash::{mirror_expense, wallet_balance, CashEntry, CashRecord};
use opsdesk_core::{Calendar, CashTransaction, Money};

const CASH_COLUMNS: &str = "id, amount_cents, direction, category, method, note, date, created_at";

/// Repository for the cash ledger.
#[derive(Debug, Clone)]
pub struct CashRepository {
    pool: SqlitePool,
    calendar: Calendar,
}

impl CashRepository {
    pub fn new(pool: SqlitePool, calendar: Calendar) -> Self {
        CashRepository { pool, calendar }
    }

    /// Lists cash movements, newest first.
    pub async fn list(&self) -> DbResult<Vec<CashTransaction>> {
        let sql = format!(
            "SELECT {CASH_COLUMNS} FROM cash_transactions ORDER BY date DESC, created_at DESC, id"
        );
        let transactions = sqlx::query_as::<_, CashTransaction>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(transactions)
    }

    /// Records a cash movement dated today (shop calendar), writing the mirrored expense in
    /// the same transaction when the rule calls for one.
    pub async fn record(&self, entry: CashEntry) -> DbResult<CashRecord> {
        let now = Utc::now();
        let today = self.calendar.date_of(now);
        let transaction = entry.into_transaction(generate_cash_id(), today, now)?;
        let mirrored_expense = mirror_expense(&transaction, generate_expense_id(), now);

        debug!(
            direction = %transaction.direction,
            category = %transaction.category,
            amount = transaction.amount_cents,
            mirrored = mirrored_expense.is_some(),
            "Recording cash transaction"
        );

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO cash_transactions (
                id, amount_cents, direction, category, method, note, date, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&transaction.id)
        .bind(transaction.amount_cents)
        .bind(transaction.direction)
        .bind(transaction.category)
        .bind(transaction.method)
        .bind(&transaction.note)
        .bind(transaction.date)
        .bind(transaction.created_at)
        .execute(&mut *tx)
        .await?;

        if let Some(expense) = &mirrored_expense {
            insert_expense_on(&mut *tx, expense).await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            id = %transaction.id,
            expense_id = ?mirrored_expense.as_ref().map(|e| e.id.as_str()),
            "Cash transaction recorded"
        );
        Ok(CashRecord {
            transaction,
            mirrored_expense,
        })
    }

    /// Deletes a cash movement. Its mirrored expense, if any, stays.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM cash_transactions WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Cash transaction", id));
        }

        info!(id = %id, "Cash transaction deleted");
        Ok(())
    }

    /// Σ cash in − Σ cash out over the whole ledger.
    pub async fn wallet_balance(&self) -> DbResult<Money> {
        Ok(wallet_balance(&self.list().await?))
    }
}

pub fn generate_cash_id() -> String {
    Uuid::new_v4().to_string()
}
