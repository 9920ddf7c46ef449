//! # Accounts Commands
//!
//! The manual cash ledger. Business cash-outs are mirrored into the
//! expense ledger by the store, in the same transaction.

use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::{DbState, SessionState};
use opsdesk_core::cash::{CashEntry, CashRecord};
use opsdesk_core::{CashTransaction, Money, Screen};

/// Lists cash movements, newest first.
pub async fn list_transactions(
    db: &DbState,
    session: &SessionState,
) -> Result<Vec<CashTransaction>, ApiError> {
    session.require(Screen::Accounts)?;
    Ok(db.inner().cash().list().await?)
}

pub async fn record_transaction(
    db: &DbState,
    session: &SessionState,
    entry: CashEntry,
) -> Result<CashRecord, ApiError> {
    session.require(Screen::Accounts)?;
    debug!(direction = %entry.direction, category = %entry.category, "record_transaction command");

    let record = db.inner().cash().record(entry).await?;

    info!(
        id = %record.transaction.id,
        mirrored = record.mirrored_expense.is_some(),
        "record_transaction command complete"
    );
    Ok(record)
}

/// Deletes a cash movement; its mirrored expense stays.
pub async fn delete_transaction(
    db: &DbState,
    session: &SessionState,
    id: &str,
) -> Result<(), ApiError> {
    session.require(Screen::Accounts)?;
    Ok(db.inner().cash().delete(id).await?)
}

pub async fn wallet_balance(db: &DbState, session: &SessionState) -> Result<Money, ApiError> {
    session.require(Screen::Accounts)?;
    Ok(db.inner().cash().wallet_balance().await?)
}
