//! Projection outputs: dated cash events, running balances, card bills and
//! loan schedules. None of these are persisted; each projection builds them
//! fresh.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{common::*, risk::RiskAssessment};

/// Namespace for deterministic event identifiers.
const EVENT_NAMESPACE: Uuid = Uuid::from_u128(0x6f3c_2a1e_9b4d_4c7a_8e21_5d90_b3f6_a104);

/// Derives a stable event id from its source, owning definition and date.
///
/// The same inputs always produce the same id, so repeated projections over
/// unchanged data yield identical event sets.
pub fn event_id(source: EventSource, owner: Uuid, date: NaiveDate) -> Uuid {
    let name = format!("{}:{}:{}", source.key(), owner, date);
    Uuid::new_v5(&EVENT_NAMESPACE, name.as_bytes())
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// Inclusive date range used for horizons and billing lists.
pub struct ForecastWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ForecastWindow {
    /// Window from `as_of` through the same day `months` months later.
    pub fn horizon(as_of: NaiveDate, months: u32) -> Self {
        Self {
            start: as_of,
            end: add_months(as_of, months),
        }
    }

    /// The calendar month containing `as_of` and the one after it.
    pub fn this_and_next_month(as_of: NaiveDate) -> Self {
        Self {
            start: first_of_month(as_of),
            end: last_of_month(add_months(first_of_month(as_of), 1)),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EventSource {
    Ledger,
    Salary,
    Subscription,
    Loan,
    CardBill,
}

impl EventSource {
    fn key(self) -> &'static str {
        match self {
            EventSource::Ledger => "ledger",
            EventSource::Salary => "salary",
            EventSource::Subscription => "subscription",
            EventSource::Loan => "loan",
            EventSource::CardBill => "card_bill",
        }
    }
}

impl fmt::Display for EventSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EventSource::Ledger => "Ledger",
            EventSource::Salary => "Salary",
            EventSource::Subscription => "Subscription",
            EventSource::Loan => "Loan",
            EventSource::CardBill => "Card bill",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    /// Backed by recorded transactions.
    Confirmed,
    /// Generated from a recurring definition.
    Forecast,
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EventStatus::Confirmed => "Confirmed",
            EventStatus::Forecast => "Forecast",
        };
        f.write_str(label)
    }
}

/// A dated cash movement on the projected timeline.
///
/// `amount` is signed: positive for income, negative for outflow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ForecastEvent {
    pub id: Uuid,
    pub date: NaiveDate,
    pub amount: i64,
    pub label: String,
    pub source: EventSource,
    pub status: EventStatus,
}

impl ForecastEvent {
    pub fn forecast(
        source: EventSource,
        owner: Uuid,
        date: NaiveDate,
        amount: i64,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: event_id(source, owner, date),
            date,
            amount,
            label: label.into(),
            source,
            status: EventStatus::Forecast,
        }
    }

    pub fn is_inflow(&self) -> bool {
        self.amount > 0
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// Balance immediately after the event at the same timeline position.
pub struct BalancePoint {
    pub date: NaiveDate,
    pub balance: i64,
}

/// Card purchases summed into one debit for a billing cycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CardBill {
    pub card_id: Uuid,
    pub card_name: String,
    pub payment_date: NaiveDate,
    /// Sum of purchase magnitudes; positive.
    pub amount: i64,
    pub transaction_count: usize,
}

impl CardBill {
    pub fn to_event(&self) -> ForecastEvent {
        ForecastEvent {
            id: event_id(EventSource::CardBill, self.card_id, self.payment_date),
            date: self.payment_date,
            amount: -self.amount,
            label: format!("{} bill", self.card_name),
            source: EventSource::CardBill,
            status: EventStatus::Confirmed,
        }
    }
}

/// Derived schedule for a loan.
///
/// A settled loan has no dates and zero installments; an indeterminate one
/// has every field empty.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct LoanProjection {
    pub next_due_date: Option<NaiveDate>,
    pub payoff_date: Option<NaiveDate>,
    pub remaining_installments: Option<u32>,
}

impl LoanProjection {
    pub fn settled() -> Self {
        Self {
            next_due_date: None,
            payoff_date: None,
            remaining_installments: Some(0),
        }
    }

    pub fn indeterminate() -> Self {
        Self::default()
    }

    pub fn is_settled(&self) -> bool {
        self.remaining_installments == Some(0)
    }
}

/// Per-loan status handed to the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoanStatusReport {
    pub loan_id: Uuid,
    pub name: String,
    /// Principal for amortizing loans; total scheduled amount for fixed plans.
    pub principal: i64,
    pub repaid: i64,
    pub remaining_balance: i64,
    pub projection: LoanProjection,
}

/// Everything one projection produces.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ForecastReport {
    pub as_of: NaiveDate,
    pub window: ForecastWindow,
    pub start_balance: i64,
    pub balance_today: i64,
    pub events: Vec<ForecastEvent>,
    pub balances: Vec<BalancePoint>,
    pub risk: RiskAssessment,
    pub loans: Vec<LoanStatusReport>,
    pub upcoming_bills: Vec<CardBill>,
    /// Subscription cost per month, yearly charges spread over twelve months.
    pub monthly_subscription_cost: i64,
    /// Records dropped as malformed while loading the snapshot.
    pub skipped_records: usize,
}

impl ForecastReport {
    /// Balance after the last event, or the start balance when there is none.
    pub fn end_balance(&self) -> i64 {
        self.balances
            .last()
            .map_or(self.start_balance, |point| point.balance)
    }
}
