//! # Cash & Expense Module
//!
//! Builds cash-ledger entries and expenses, and decides when a cash-out
//! must be mirrored into the expense ledger.
//!
//! ## Mirror Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  record_transaction(entry)                                              │
//! │                                                                         │
//! │   CashIn ─────────────────────────► CashTransaction only                │
//! │   CashOut + OwnerWithdrawal ──────► CashTransaction only                │
//! │   CashOut + any other category ───► CashTransaction + Expense           │
//! │                                     (same amount, same date,           │
//! │                                      committed together)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The two records are linked by nothing but content. Deleting the
//! transaction later leaves the expense in place.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{
    CashCategory, CashDirection, CashTransaction, Expense, ExpenseSource, PaymentMethod,
};
use crate::validation::{
    validate_amount_cents, validate_max_len, validate_required, validate_text, MAX_NAME_LEN,
};
use crate::DEFAULT_EXPENSE_KIND;

// =============================================================================
// Cash Entry
// =============================================================================

/// A cash movement as typed on the accounts screen.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CashEntry {
    pub amount_cents: i64,
    pub direction: CashDirection,
    pub category: CashCategory,
    pub method: PaymentMethod,
    #[serde(default)]
    pub note: String,
}

impl CashEntry {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_amount_cents("amount", self.amount_cents)?;
        validate_text("note", &self.note)?;
        Ok(())
    }

    /// Whether recording this entry also writes an expense.
    pub fn mirrors_expense(&self) -> bool {
        mirrors_expense(self.direction, self.category)
    }

    /// Builds the ledger row, dated `today`.
    pub fn into_transaction(
        self,
        id: String,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<CashTransaction, ValidationError> {
        self.validate()?;
        Ok(CashTransaction {
            id,
            amount_cents: self.amount_cents,
            direction: self.direction,
            category: self.category,
            method: self.method,
            note: self.note.trim().to_string(),
            date: today,
            created_at: now,
        })
    }
}

/// Business cash-outs are expenses; owner withdrawals and cash-ins are not.
pub fn mirrors_expense(direction: CashDirection, category: CashCategory) -> bool {
    direction == CashDirection::CashOut && category != CashCategory::OwnerWithdrawal
}

/// Title of a mirrored expense: `"<category> - <note>"`, or just the
/// category when the note is blank.
///
/// ## Example
/// ```rust
/// use opsdesk_core::cash::mirrored_expense_title;
/// use opsdesk_core::types::CashCategory;
///
/// assert_eq!(
///     mirrored_expense_title(CashCategory::MarketingAdCost, "Facebook boost"),
///     "Marketing Ad Cost - Facebook boost"
/// );
/// assert_eq!(mirrored_expense_title(CashCategory::PackagingCost, "  "), "Packaging Cost");
/// ```
pub fn mirrored_expense_title(category: CashCategory, note: &str) -> String {
    let note = note.trim();
    if note.is_empty() {
        category.label().to_string()
    } else {
        format!("{} - {}", category.label(), note)
    }
}

/// The expense mirroring `transaction`, if it needs one.
pub fn mirror_expense(
    transaction: &CashTransaction,
    id: String,
    now: DateTime<Utc>,
) -> Option<Expense> {
    if !mirrors_expense(transaction.direction, transaction.category) {
        return None;
    }
    Some(Expense {
        id,
        title: mirrored_expense_title(transaction.category, &transaction.note),
        amount_cents: transaction.amount_cents,
        kind: transaction.category.label().to_string(),
        spent_on: transaction.date,
        source: ExpenseSource::CashLedger,
        created_at: now,
    })
}

/// A recorded cash movement and the expense written with it.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CashRecord {
    pub transaction: CashTransaction,
    pub mirrored_expense: Option<Expense>,
}

/// Σ cash in − Σ cash out.
pub fn wallet_balance(transactions: &[CashTransaction]) -> Money {
    transactions.iter().map(CashTransaction::signed_amount).sum()
}

// =============================================================================
// Expense Draft
// =============================================================================

/// A manual expense from the reports screen.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct ExpenseDraft {
    pub title: String,
    pub amount_cents: i64,
    /// Category label; "General" when blank.
    pub kind: Option<String>,
    /// Defaults to today.
    #[ts(as = "Option<String>")]
    pub spent_on: Option<NaiveDate>,
}

impl ExpenseDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let title = validate_required("title", &self.title)?;
        validate_max_len("title", &title, MAX_NAME_LEN)?;
        validate_amount_cents("amount", self.amount_cents)?;
        if let Some(kind) = &self.kind {
            validate_max_len("kind", kind, MAX_NAME_LEN)?;
        }
        Ok(())
    }

    pub fn into_expense(
        self,
        id: String,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Expense, ValidationError> {
        self.validate()?;
        let kind = self
            .kind
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .unwrap_or(DEFAULT_EXPENSE_KIND)
            .to_string();

        Ok(Expense {
            id,
            title: self.title.trim().to_string(),
            amount_cents: self.amount_cents,
            kind,
            spent_on: self.spent_on.unwrap_or(today),
            source: ExpenseSource::Manual,
            created_at: now,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(direction: CashDirection, category: CashCategory) -> CashEntry {
        CashEntry {
            amount_cents: 50_000,
            direction,
            category,
            method: PaymentMethod::MobileWallet,
            note: "Facebook boost".to_string(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 20).unwrap()
    }

    #[test]
    fn test_business_cash_out_is_mirrored() {
        let now = Utc::now();
        let tx = entry(CashDirection::CashOut, CashCategory::MarketingAdCost)
            .into_transaction("t-1".to_string(), today(), now)
            .unwrap();
        let expense = mirror_expense(&tx, "e-1".to_string(), now).unwrap();

        assert_eq!(expense.amount_cents, tx.amount_cents);
        assert_eq!(expense.spent_on, tx.date);
        assert_eq!(expense.kind, "Marketing Ad Cost");
        assert_eq!(expense.title, "Marketing Ad Cost - Facebook boost");
        assert_eq!(expense.source, ExpenseSource::CashLedger);
    }

    #[test]
    fn test_withdrawal_and_cash_in_are_not_mirrored() {
        assert!(!entry(CashDirection::CashOut, CashCategory::OwnerWithdrawal).mirrors_expense());
        assert!(!entry(CashDirection::CashIn, CashCategory::Investment).mirrors_expense());
        assert!(!entry(CashDirection::CashIn, CashCategory::MarketingAdCost).mirrors_expense());

        for category in [
            CashCategory::CourierPayment,
            CashCategory::DirectSales,
            CashCategory::ProductPurchase,
            CashCategory::OperationalCost,
            CashCategory::PackagingCost,
        ] {
            assert!(entry(CashDirection::CashOut, category).mirrors_expense());
        }
    }

    #[test]
    fn test_cash_entry_rejects_non_positive_amount() {
        let mut e = entry(CashDirection::CashIn, CashCategory::Investment);
        e.amount_cents = 0;
        assert!(e.into_transaction("t".to_string(), today(), Utc::now()).is_err());
    }

    #[test]
    fn test_wallet_balance() {
        let now = Utc::now();
        let txs = vec![
            entry(CashDirection::CashIn, CashCategory::Investment)
                .into_transaction("a".to_string(), today(), now)
                .unwrap(),
            entry(CashDirection::CashOut, CashCategory::OwnerWithdrawal)
                .into_transaction("b".to_string(), today(), now)
                .unwrap(),
            CashEntry {
                amount_cents: 20_000,
                ..entry(CashDirection::CashIn, CashCategory::CourierPayment)
            }
            .into_transaction("c".to_string(), today(), now)
            .unwrap(),
        ];
        assert_eq!(wallet_balance(&txs).cents(), 20_000);
        assert!(wallet_balance(&[]).is_zero());
    }

    #[test]
    fn test_expense_draft_defaults() {
        let draft = ExpenseDraft {
            title: " Office rent ".to_string(),
            amount_cents: 800_000,
            kind: Some("".to_string()),
            spent_on: None,
        };
        let expense = draft
            .into_expense("e".to_string(), today(), Utc::now())
            .unwrap();
        assert_eq!(expense.title, "Office rent");
        assert_eq!(expense.kind, "General");
        assert_eq!(expense.spent_on, today());
        assert_eq!(expense.source, ExpenseSource::Manual);
    }

    #[test]
    fn test_expense_draft_requires_title_and_amount() {
        let draft = ExpenseDraft {
            title: "".to_string(),
            amount_cents: 100,
            ..Default::default()
        };
        assert!(draft.validate().is_err());

        let draft = ExpenseDraft {
            title: "Salary".to_string(),
            amount_cents: 0,
            ..Default::default()
        };
        assert!(draft.validate().is_err());
    }
}
