//! Merges ledger, card and recurring events into one balance-annotated
//! timeline.

use std::collections::HashSet;

use chrono::NaiveDate;
use uuid::Uuid;

use flowcast_domain::{
    BalancePoint, EventSource, EventStatus, ForecastEvent, ForecastWindow, LedgerTransaction,
    PaymentSource,
};

use crate::{
    billing_service::BillingService, recurrence_service::RecurrenceService,
    storage::ForecastSnapshot,
};

/// Ordered events with the running balance after each one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline {
    pub as_of: NaiveDate,
    pub window: ForecastWindow,
    pub start_balance: i64,
    pub events: Vec<ForecastEvent>,
    /// One point per event, in the same order.
    pub balances: Vec<BalancePoint>,
}

impl Timeline {
    /// Balance at the last point dated on or before `date`, or the start
    /// balance when no event precedes it.
    pub fn balance_on(&self, date: NaiveDate) -> i64 {
        self.balances
            .iter()
            .take_while(|point| point.date <= date)
            .last()
            .map_or(self.start_balance, |point| point.balance)
    }

    pub fn balance_today(&self) -> i64 {
        self.balance_on(self.as_of)
    }

    /// Earliest point of [`Self::risk_series`] holding the minimum balance.
    pub fn lowest_point(&self) -> Option<BalancePoint> {
        self.risk_series()
            .into_iter()
            .reduce(|low, point| if point.balance < low.balance { point } else { low })
    }

    /// Balance points to classify; a timeline without events is judged on its
    /// start balance alone.
    pub fn risk_series(&self) -> Vec<BalancePoint> {
        if self.balances.is_empty() {
            vec![BalancePoint {
                date: self.as_of,
                balance: self.start_balance,
            }]
        } else {
            self.balances.clone()
        }
    }
}

pub struct TimelineService;

impl TimelineService {
    /// Sum of asset balance seeds plus every asset transaction dated on or
    /// before `as_of`. Card activity only reaches cash through card bills.
    pub fn start_balance(
        sources: &[PaymentSource],
        transactions: &[LedgerTransaction],
        as_of: NaiveDate,
    ) -> i64 {
        let assets = asset_ids(sources);
        let seeds: i64 = sources
            .iter()
            .filter(|source| source.is_asset())
            .map(|source| source.balance)
            .sum();
        let replayed: i64 = transactions
            .iter()
            .filter(|txn| txn.date <= as_of && assets.contains(&txn.payment_source_ref))
            .map(LedgerTransaction::signed_amount)
            .sum();
        seeds + replayed
    }

    /// Asset transactions dated after `as_of` and within the window. These
    /// are recorded, so they are confirmed rather than forecast.
    pub fn ledger_events(
        sources: &[PaymentSource],
        transactions: &[LedgerTransaction],
        window: ForecastWindow,
    ) -> Vec<ForecastEvent> {
        let assets = asset_ids(sources);
        transactions
            .iter()
            .filter(|txn| txn.date > window.start && txn.date <= window.end)
            .filter(|txn| assets.contains(&txn.payment_source_ref))
            .map(|txn| ForecastEvent {
                id: txn.id,
                date: txn.date,
                amount: txn.signed_amount(),
                label: txn.memo.clone().unwrap_or_else(|| txn.kind.to_string()),
                source: EventSource::Ledger,
                status: EventStatus::Confirmed,
            })
            .collect()
    }

    /// Builds the timeline for `horizon_months` months from `as_of`.
    pub fn build(snapshot: &ForecastSnapshot, as_of: NaiveDate, horizon_months: u32) -> Timeline {
        let window = ForecastWindow::horizon(as_of, horizon_months);
        let start_balance = Self::start_balance(&snapshot.sources, &snapshot.transactions, as_of);

        let mut events = Self::ledger_events(&snapshot.sources, &snapshot.transactions, window);
        events.extend(
            BillingService::bills_in_window(&snapshot.sources, &snapshot.transactions, window)
                .iter()
                .map(|bill| bill.to_event()),
        );
        events.extend(RecurrenceService::expand(
            &snapshot.definitions,
            &snapshot.transactions,
            window,
        ));
        // Vec::sort_by_key is stable: same-day events keep arrival order.
        events.sort_by_key(|event| event.date);

        let balances = Self::project_balances(start_balance, &events);
        Timeline {
            as_of,
            window,
            start_balance,
            events,
            balances,
        }
    }

    /// Running balance after each event.
    pub fn project_balances(start_balance: i64, events: &[ForecastEvent]) -> Vec<BalancePoint> {
        events
            .iter()
            .scan(start_balance, |balance, event| {
                *balance += event.amount;
                Some(BalancePoint {
                    date: event.date,
                    balance: *balance,
                })
            })
            .collect()
    }
}

fn asset_ids(sources: &[PaymentSource]) -> HashSet<Uuid> {
    sources
        .iter()
        .filter(|source| source.is_asset())
        .map(|source| source.id)
        .collect()
}
