use std::collections::HashSet;

use chrono::NaiveDate;
use flowcast_domain::{LedgerTransaction, PaymentSource, RecurringDefinition, TransactionKind};

use crate::CoreError;

/// One consistent read of everything a projection needs.
#[derive(Debug, Clone, Default)]
pub struct ForecastSnapshot {
    pub transactions: Vec<LedgerTransaction>,
    pub sources: Vec<PaymentSource>,
    pub definitions: Vec<RecurringDefinition>,
    /// Records the backend dropped as malformed.
    pub skipped: usize,
}

/// Read-only access to a user's ledger, payment sources and recurring definitions.
///
/// `as_of` is passed when listing definitions because legacy day-of-month
/// anchors resolve against the current month during normalization.
pub trait SnapshotSource: Send + Sync {
    fn list_ledger_transactions(&self, user_id: &str) -> Result<Vec<LedgerTransaction>, CoreError>;
    fn list_payment_sources(&self, user_id: &str) -> Result<Vec<PaymentSource>, CoreError>;
    fn list_recurring_definitions(
        &self,
        user_id: &str,
        as_of: NaiveDate,
    ) -> Result<Vec<RecurringDefinition>, CoreError>;

    /// Fetches all three collections for one projection. Backends able to
    /// read them in a single operation should override this so a projection
    /// never mixes two states of the store.
    fn load_snapshot(&self, user_id: &str, as_of: NaiveDate) -> Result<ForecastSnapshot, CoreError> {
        Ok(ForecastSnapshot {
            transactions: self.list_ledger_transactions(user_id)?,
            sources: self.list_payment_sources(user_id)?,
            definitions: self.list_recurring_definitions(user_id, as_of)?,
            skipped: 0,
        })
    }
}

/// An in-memory snapshot serves itself for any user.
impl SnapshotSource for ForecastSnapshot {
    fn list_ledger_transactions(&self, _user_id: &str) -> Result<Vec<LedgerTransaction>, CoreError> {
        Ok(self.transactions.clone())
    }

    fn list_payment_sources(&self, _user_id: &str) -> Result<Vec<PaymentSource>, CoreError> {
        Ok(self.sources.clone())
    }

    fn list_recurring_definitions(
        &self,
        _user_id: &str,
        _as_of: NaiveDate,
    ) -> Result<Vec<RecurringDefinition>, CoreError> {
        Ok(self.definitions.clone())
    }

    fn load_snapshot(&self, _user_id: &str, _as_of: NaiveDate) -> Result<ForecastSnapshot, CoreError> {
        Ok(self.clone())
    }
}

/// Detects dangling references and records the engine will silently ignore.
pub fn snapshot_warnings(snapshot: &ForecastSnapshot) -> Vec<String> {
    let source_ids: HashSet<_> = snapshot.sources.iter().map(|s| s.id).collect();
    let loan_ids: HashSet<_> = snapshot
        .definitions
        .iter()
        .filter_map(RecurringDefinition::as_loan)
        .map(|loan| loan.id)
        .collect();
    let mut warnings = Vec::new();

    for source in snapshot.sources.iter().filter(|s| s.is_card()) {
        if source.billing_cycle().is_none() {
            warnings.push(format!(
                "card `{}` has no complete billing cycle; its purchases are not forecast",
                source.name
            ));
        }
    }

    for txn in &snapshot.transactions {
        if !source_ids.contains(&txn.payment_source_ref) {
            warnings.push(format!(
                "transaction {} references unknown payment source {}",
                txn.id, txn.payment_source_ref
            ));
        }
        if let Some(loan) = txn.loan_ref {
            if txn.kind != TransactionKind::Repayment {
                warnings.push(format!(
                    "transaction {} links loan {} but is not a repayment",
                    txn.id, loan
                ));
            } else if !loan_ids.contains(&loan) {
                warnings.push(format!(
                    "repayment {} references unknown loan {}",
                    txn.id, loan
                ));
            }
        }
    }
    warnings
}
