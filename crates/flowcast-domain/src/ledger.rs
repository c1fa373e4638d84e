//! Recorded ledger entries as handed over by the persistence layer.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single recorded income, expense or loan repayment.
///
/// `amount` is always a positive magnitude; the direction comes from `kind`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LedgerTransaction {
    pub id: Uuid,
    pub date: NaiveDate,
    pub amount: i64,
    pub kind: TransactionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_ref: Option<Uuid>,
    pub payment_source_ref: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    /// Loan account settled by a repayment, when the entry is linked to one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loan_ref: Option<Uuid>,
}

impl LedgerTransaction {
    pub fn new(
        date: NaiveDate,
        amount: i64,
        kind: TransactionKind,
        payment_source_ref: Uuid,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            amount: amount.abs(),
            kind,
            category_ref: None,
            payment_source_ref,
            memo: None,
            loan_ref: None,
        }
    }

    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }

    pub fn with_loan(mut self, loan_id: Uuid) -> Self {
        self.loan_ref = Some(loan_id);
        self
    }

    /// Amount with its cash-flow sign: income adds, everything else subtracts.
    pub fn signed_amount(&self) -> i64 {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense | TransactionKind::Repayment => -self.amount,
        }
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
/// Direction of a ledger entry.
pub enum TransactionKind {
    Expense,
    Income,
    Repayment,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionKind::Expense => "Expense",
            TransactionKind::Income => "Income",
            TransactionKind::Repayment => "Repayment",
        };
        f.write_str(label)
    }
}
