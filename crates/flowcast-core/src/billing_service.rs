use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

use flowcast_domain::{CardBill, ForecastWindow, LedgerTransaction, PaymentSource};

/// Groups card purchases into the debits that settle them.
pub struct BillingService;

impl BillingService {
    /// Sums every expense charged to a fully configured card into one bill
    /// per `(card, payment_date)`, ordered by payment date and then by the
    /// card's position in `sources`.
    pub fn aggregate(sources: &[PaymentSource], transactions: &[LedgerTransaction]) -> Vec<CardBill> {
        let mut bills: BTreeMap<(NaiveDate, usize), CardBill> = BTreeMap::new();

        for (index, card) in sources.iter().enumerate().filter(|(_, s)| s.is_card()) {
            let Some(cycle) = card.billing_cycle() else {
                debug!(card = %card.id, "card without billing cycle excluded from aggregation");
                continue;
            };
            for txn in transactions
                .iter()
                .filter(|txn| txn.payment_source_ref == card.id && txn.is_expense())
            {
                let payment_date = cycle.payment_date_for(txn.date);
                let bill = bills.entry((payment_date, index)).or_insert_with(|| CardBill {
                    card_id: card.id,
                    card_name: card.name.clone(),
                    payment_date,
                    amount: 0,
                    transaction_count: 0,
                });
                bill.amount += txn.amount.abs();
                bill.transaction_count += 1;
            }
        }
        bills.into_values().collect()
    }

    /// Bills whose payment date falls inside `window`.
    pub fn bills_in_window(
        sources: &[PaymentSource],
        transactions: &[LedgerTransaction],
        window: ForecastWindow,
    ) -> Vec<CardBill> {
        Self::aggregate(sources, transactions)
            .into_iter()
            .filter(|bill| window.contains(bill.payment_date))
            .collect()
    }

    /// Bills due in the calendar month of `as_of` or the one after it.
    pub fn upcoming_bills(
        sources: &[PaymentSource],
        transactions: &[LedgerTransaction],
        as_of: NaiveDate,
    ) -> Vec<CardBill> {
        Self::bills_in_window(sources, transactions, ForecastWindow::this_and_next_month(as_of))
    }
}
