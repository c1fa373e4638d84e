#![allow(dead_code)]

use std::path::Path;

use chrono::NaiveDate;
use uuid::Uuid;

use flowcast_core::ForecastSnapshot;
use flowcast_domain::{
    AmortizingPlan, LedgerTransaction, Loan, LoanPlan, LoanStatus, PaymentSource,
    RecurringDefinition, RepaymentRule, Salary, SourceKind, Subscription, SubscriptionFrequency,
    TransactionKind,
};
use flowcast_storage_json::JsonSnapshotStorage;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Checking account, one card, salary, a subscription and a car loan with
/// one repayment made.
pub fn household() -> ForecastSnapshot {
    let bank = PaymentSource::asset("Checking", SourceKind::Bank, 80_000);
    let card = PaymentSource::card("Visa", Some(15), Some(10));
    let car = Loan {
        id: Uuid::new_v4(),
        name: "Car loan".into(),
        amount_per_payment: 20_000,
        payment_day: Some(27),
        status: LoanStatus::Active,
        plan: LoanPlan::Amortizing(AmortizingPlan {
            principal: 200_000,
            repayment_rule: RepaymentRule::Monthly,
            bonus_months: Vec::new(),
            bonus_amount: 0,
            interest_rate: None,
        }),
    };
    ForecastSnapshot {
        transactions: vec![
            LedgerTransaction::new(date(2025, 2, 27), 20_000, TransactionKind::Repayment, bank.id)
                .with_loan(car.id),
            LedgerTransaction::new(date(2025, 3, 2), 12_000, TransactionKind::Expense, card.id),
            LedgerTransaction::new(date(2025, 3, 5), 4_000, TransactionKind::Expense, bank.id),
        ],
        sources: vec![bank, card],
        definitions: vec![
            RecurringDefinition::Salary(Salary {
                id: Uuid::new_v4(),
                name: "Salary".into(),
                amount: 250_000,
                pay_day: 25,
                start_date: None,
            }),
            RecurringDefinition::Subscription(Subscription {
                id: Uuid::new_v4(),
                name: "Streaming".into(),
                amount: 1_500,
                frequency: SubscriptionFrequency::Monthly,
                first_payment_date: date(2024, 6, 1),
                payment_day: 1,
            }),
            RecurringDefinition::Loan(car),
        ],
        skipped: 0,
    }
}

/// Writes `snapshot` for `user` where a CLI rooted at `home` will look.
pub fn seed_user(home: &Path, user: &str, snapshot: &ForecastSnapshot) {
    let storage = JsonSnapshotStorage::new(home.join("users")).expect("storage");
    storage.save_snapshot(user, snapshot).expect("seed snapshot");
}
