//! # Expense Repository
//!
//! Manual expenses from the reports screen, plus the rows mirrored from
//! the cash ledger (written by [`CashRepository`](super::cash::CashRepository)).

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use opsdesk_core::cash::ExpenseDraft;
use opsdesk_core::{Calendar, Expense};

const EXPENSE_COLUMNS: &str = "id, title, amount_cents, kind, spent_on, source, created_at";

pub(crate) async fn insert_expense_on(conn: &mut SqliteConnection, expense: &Expense) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO expenses (id, title, amount_cents, kind, spent_on, source, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(&expense.id)
    .bind(&expense.title)
    .bind(expense.amount_cents)
    .bind(&expense.kind)
    .bind(expense.spent_on)
    .bind(expense.source)
    .bind(expense.created_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Repository for expense database operations.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    pool: SqlitePool,
    calendar: Calendar,
}

impl ExpenseRepository {
    pub fn new(pool: SqlitePool, calendar: Calendar) -> Self {
        ExpenseRepository { pool, calendar }
    }

    /// Lists expenses, newest first.
    pub async fn list(&self) -> DbResult<Vec<Expense>> {
        let sql = format!(
            "SELECT {EXPENSE_COLUMNS} FROM expenses ORDER BY spent_on DESC, created_at DESC, id"
        );
        let expenses = sqlx::query_as::<_, Expense>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(expenses)
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Expense>> {
        let sql = format!("SELECT {EXPENSE_COLUMNS} FROM expenses WHERE id = ?1");
        let expense = sqlx::query_as::<_, Expense>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(expense)
    }

    /// Records a manual expense dated `spent_on` (or today).
    pub async fn add(&self, draft: ExpenseDraft) -> DbResult<Expense> {
        let now = Utc::now();
        let today = self.calendar.date_of(now);
        let expense = draft.into_expense(generate_expense_id(), today, now)?;

        debug!(title = %expense.title, amount = expense.amount_cents, "Adding expense");

        let mut conn = self.pool.acquire().await?;
        insert_expense_on(&mut *conn, &expense).await?;

        info!(id = %expense.id, kind = %expense.kind, "Expense added");
        Ok(expense)
    }

    /// Deletes an expense, mirrored or not. The cash ledger is untouched.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Expense", id));
        }

        info!(id = %id, "Expense deleted");
        Ok(())
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM expenses")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

pub fn generate_expense_id() -> String {
    Uuid::new_v4().to_string()
}
