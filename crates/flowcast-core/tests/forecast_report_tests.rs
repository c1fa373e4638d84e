use chrono::NaiveDate;
use uuid::Uuid;

use flowcast_core::{ForecastOptions, ForecastService, ForecastSnapshot};
use flowcast_domain::{
    FixedPlan, ForecastReport, LedgerTransaction, Loan, LoanFrequency, LoanPlan, LoanStatus,
    PaymentSource, RecurringDefinition, SourceKind, TransactionKind,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn snapshot() -> ForecastSnapshot {
    let bank = PaymentSource::asset("Checking", SourceKind::Bank, 150_000);
    let card = PaymentSource::card("Visa", Some(20), Some(5));
    ForecastSnapshot {
        transactions: vec![
            LedgerTransaction::new(date(2025, 7, 22), 6_000, TransactionKind::Expense, card.id),
            LedgerTransaction::new(date(2025, 8, 3), 9_000, TransactionKind::Expense, bank.id)
                .with_memo("Insurance"),
        ],
        sources: vec![bank, card],
        definitions: vec![RecurringDefinition::Loan(Loan {
            id: Uuid::new_v4(),
            name: "Phone".into(),
            amount_per_payment: 4_000,
            payment_day: Some(28),
            status: LoanStatus::Active,
            plan: LoanPlan::Fixed(FixedPlan {
                start_date: date(2025, 5, 1),
                frequency: LoanFrequency::Monthly,
                number_of_payments: 6,
            }),
        })],
        skipped: 2,
    }
}

#[test]
fn report_round_trips_through_json() {
    let report =
        ForecastService::project_snapshot(&snapshot(), date(2025, 8, 1), ForecastOptions::default())
            .expect("projection");
    let json = serde_json::to_string_pretty(&report).expect("serialize");
    let restored: ForecastReport = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(restored, report);
}

#[test]
fn report_serializes_snake_case_tags() {
    let report =
        ForecastService::project_snapshot(&snapshot(), date(2025, 8, 1), ForecastOptions::default())
            .expect("projection");
    let value = serde_json::to_value(&report).expect("serialize");

    assert_eq!(value["skipped_records"], 2);
    let sources: Vec<_> = value["events"]
        .as_array()
        .expect("events")
        .iter()
        .map(|event| event["source"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(sources, vec!["ledger", "loan", "card_bill", "loan", "loan"]);
    assert_eq!(value["risk"]["level"], "safe");
}

#[test]
fn fixed_loan_reports_remaining_payments() {
    let report =
        ForecastService::project_snapshot(&snapshot(), date(2025, 8, 1), ForecastOptions::default())
            .expect("projection");
    let loan = &report.loans[0];
    assert_eq!(loan.principal, 24_000);
    assert_eq!(loan.remaining_balance, 12_000);
    assert_eq!(loan.projection.remaining_installments, Some(3));
    assert_eq!(loan.projection.next_due_date, Some(date(2025, 8, 28)));
    assert_eq!(loan.projection.payoff_date, Some(date(2025, 10, 28)));
}
