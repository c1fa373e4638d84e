use std::fs;

use chrono::NaiveDate;
use serde_json::json;
use tempfile::tempdir;
use uuid::Uuid;

use flowcast_core::{CoreError, ForecastOptions, ForecastService, ForecastSnapshot, SnapshotSource};
use flowcast_domain::{
    AmortizingPlan, LedgerTransaction, Loan, LoanPlan, LoanStatus, PaymentSource,
    RecurringDefinition, RepaymentRule, Salary, SourceKind, TransactionKind,
};
use flowcast_storage_json::JsonSnapshotStorage;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn sample_snapshot() -> ForecastSnapshot {
    let bank = PaymentSource::asset("Checking", SourceKind::Bank, 40_000);
    let loan = Loan {
        id: Uuid::new_v4(),
        name: "Student loan".into(),
        amount_per_payment: 15_000,
        payment_day: Some(20),
        status: LoanStatus::Active,
        plan: LoanPlan::Amortizing(AmortizingPlan {
            principal: 300_000,
            repayment_rule: RepaymentRule::Monthly,
            bonus_months: Vec::new(),
            bonus_amount: 0,
            interest_rate: Some(1.5),
        }),
    };
    ForecastSnapshot {
        transactions: vec![
            LedgerTransaction::new(date(2025, 4, 20), 15_000, TransactionKind::Repayment, bank.id)
                .with_loan(loan.id),
        ],
        sources: vec![bank],
        definitions: vec![
            RecurringDefinition::Salary(Salary {
                id: Uuid::new_v4(),
                name: "Salary".into(),
                amount: 210_000,
                pay_day: 25,
                start_date: None,
            }),
            RecurringDefinition::Loan(loan),
        ],
        skipped: 0,
    }
}

#[test]
fn saved_snapshot_loads_back() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonSnapshotStorage::new(dir.path().to_path_buf()).expect("storage");
    let snapshot = sample_snapshot();

    storage.save_snapshot("alice", &snapshot).expect("save");
    let loaded = storage.load_snapshot("alice", date(2025, 5, 1)).expect("load");

    assert_eq!(loaded.transactions, snapshot.transactions);
    assert_eq!(loaded.sources, snapshot.sources);
    assert_eq!(loaded.definitions, snapshot.definitions);
    assert_eq!(loaded.skipped, 0);
    assert_eq!(storage.list_users().expect("users"), vec!["alice".to_string()]);
    assert!(!dir.path().join("alice.json.tmp").exists());
}

#[test]
fn individual_listings_read_the_same_file() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonSnapshotStorage::new(dir.path().to_path_buf()).expect("storage");
    storage.save_snapshot("bob", &sample_snapshot()).expect("save");

    assert_eq!(storage.list_ledger_transactions("bob").expect("txns").len(), 1);
    assert_eq!(storage.list_payment_sources("bob").expect("sources").len(), 1);
    assert_eq!(
        storage
            .list_recurring_definitions("bob", date(2025, 5, 1))
            .expect("definitions")
            .len(),
        2
    );
}

#[test]
fn missing_user_is_reported() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonSnapshotStorage::new(dir.path().to_path_buf()).expect("storage");

    let err = storage
        .load_snapshot("nobody", date(2025, 1, 1))
        .expect_err("missing user");
    assert!(matches!(err, CoreError::UserNotFound(name) if name == "nobody"));
}

#[test]
fn unreadable_file_is_a_storage_error() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonSnapshotStorage::new(dir.path().to_path_buf()).expect("storage");
    fs::write(dir.path().join("carol.json"), "[1, 2").expect("write");

    let err = storage
        .load_snapshot("carol", date(2025, 1, 1))
        .expect_err("corrupt file");
    assert!(matches!(err, CoreError::Storage(_)));
}

#[test]
fn legacy_file_projects_with_skipped_count() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonSnapshotStorage::new(dir.path().to_path_buf()).expect("storage");
    let bank = Uuid::new_v4();
    let card = Uuid::new_v4();
    let legacy = json!({
        "paymentSources": [
            {"id": bank, "name": "Bank", "kind": "bank", "balance": 20000},
            {"id": card, "name": "Visa", "kind": "card", "closing_day": 15, "payment_day": 10}
        ],
        "transactions": [
            {"id": Uuid::new_v4(), "date": "2025-06-02", "amount": 3000, "kind": "expense",
             "payment_source_ref": card},
            {"id": Uuid::new_v4(), "date": "2025-06-03", "amount": "lots", "kind": "expense",
             "payment_source_ref": bank}
        ],
        "subscriptions": [
            {"id": Uuid::new_v4(), "name": "Music", "amount": 1000, "paymentDay": 1}
        ],
        "loans": [
            {"id": Uuid::new_v4(), "name": "TV", "amountPerPayment": 5000,
             "startDate": "2025-05-01", "paymentDay": 28, "frequency": "monthly",
             "numberOfPayments": 3}
        ]
    });
    fs::write(
        dir.path().join("dave.json"),
        serde_json::to_string(&legacy).expect("json"),
    )
    .expect("write");

    let report = ForecastService::project(
        &storage,
        "dave",
        date(2025, 6, 10),
        ForecastOptions::default(),
    )
    .expect("projection");

    assert_eq!(report.skipped_records, 1);
    assert_eq!(report.start_balance, 20_000);
    let amounts: Vec<_> = report
        .events
        .iter()
        .map(|event| (event.date, event.amount))
        .collect();
    assert_eq!(
        amounts,
        vec![
            (date(2025, 6, 28), -5_000),
            (date(2025, 7, 1), -1_000),
            (date(2025, 7, 10), -3_000),
            (date(2025, 7, 28), -5_000),
            (date(2025, 8, 1), -1_000),
            (date(2025, 9, 1), -1_000),
            (date(2025, 10, 1), -1_000),
            (date(2025, 11, 1), -1_000),
            (date(2025, 12, 1), -1_000),
        ]
    );
}

#[test]
fn negative_expense_does_not_raise_balance() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonSnapshotStorage::new(dir.path().to_path_buf()).expect("storage");
    let bank = Uuid::new_v4();
    let stored = json!({
        "paymentSources": [
            {"id": bank, "name": "Bank", "kind": "bank", "balance": 20000}
        ],
        "transactions": [
            {"id": Uuid::new_v4(), "date": "2025-06-02", "amount": -500, "kind": "expense",
             "payment_source_ref": bank},
            {"id": Uuid::new_v4(), "date": "2025-06-03", "amount": 300, "kind": "expense",
             "payment_source_ref": bank}
        ]
    });
    fs::write(
        dir.path().join("erin.json"),
        serde_json::to_string(&stored).expect("json"),
    )
    .expect("write");

    let report = ForecastService::project(
        &storage,
        "erin",
        date(2025, 6, 10),
        ForecastOptions::default(),
    )
    .expect("projection");

    assert_eq!(report.skipped_records, 1);
    assert_eq!(report.start_balance, 19_700);
}

#[test]
fn invalid_user_ids_are_rejected() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonSnapshotStorage::new(dir.path().to_path_buf()).expect("storage");

    let err = storage
        .save_snapshot("../escape", &ForecastSnapshot::default())
        .expect_err("invalid id");
    assert!(matches!(err, CoreError::Validation(_)));
}
