//! # Expense Commands
//!
//! The expense ledger lives on the reports screen, which only admins open.

use tracing::debug;

use crate::error::ApiError;
use crate::state::{DbState, SessionState};
use opsdesk_core::cash::ExpenseDraft;
use opsdesk_core::{Expense, Screen};

/// Lists expenses, newest first. Mirrored cash-outs are included.
pub async fn list_expenses(db: &DbState, session: &SessionState) -> Result<Vec<Expense>, ApiError> {
    session.require(Screen::Reports)?;
    Ok(db.inner().expenses().list().await?)
}

pub async fn add_expense(
    db: &DbState,
    session: &SessionState,
    draft: ExpenseDraft,
) -> Result<Expense, ApiError> {
    session.require(Screen::Reports)?;
    debug!(title = %draft.title, "add_expense command");
    Ok(db.inner().expenses().add(draft).await?)
}

pub async fn delete_expense(db: &DbState, session: &SessionState, id: &str) -> Result<(), ApiError> {
    session.require(Screen::Reports)?;
    Ok(db.inner().expenses().delete(id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing;
    use crate::error::ErrorCode;

    #[tokio::test]
    async fn test_admin_only() {
        let db = testing::db().await;
        let draft = ExpenseDraft {
            title: "Office rent".to_string(),
            amount_cents: 500000,
            ..Default::default()
        };

        let err = add_expense(&db, &testing::staff(), draft.clone())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);

        let admin = testing::admin();
        let expense = add_expense(&db, &admin, draft).await.unwrap();
        assert_eq!(list_expenses(&db, &admin).await.unwrap(), vec![expense.clone()]);

        delete_expense(&db, &admin, &expense.id).await.unwrap();
        assert!(list_expenses(&db, &admin).await.unwrap().is_empty());
    }
}
