use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tempfile::tempdir;
use uuid::Uuid;

use flowcast_core::{ForecastOptions, ForecastService, ForecastSnapshot, SnapshotSource};
use flowcast_domain::{
    AmortizingPlan, LedgerTransaction, Loan, LoanPlan, LoanStatus, PaymentSource,
    RecurringDefinition, RepaymentRule, Salary, SourceKind, Subscription, SubscriptionFrequency,
    TransactionKind,
};
use flowcast_storage_json::JsonSnapshotStorage;

fn build_sample_snapshot(txn_count: usize) -> ForecastSnapshot {
    let bank = PaymentSource::asset("Checking", SourceKind::Bank, 500_000);
    let card = PaymentSource::card("Visa", Some(15), Some(10));
    let start_date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

    let transactions = (0..txn_count)
        .map(|idx| {
            let day = start_date + Duration::days((idx % 540) as i64);
            let source = if idx % 2 == 0 { bank.id } else { card.id };
            LedgerTransaction::new(day, 500 + (idx % 100) as i64, TransactionKind::Expense, source)
        })
        .collect();

    let mut definitions = vec![RecurringDefinition::Salary(Salary {
        id: Uuid::new_v4(),
        name: "Salary".into(),
        amount: 300_000,
        pay_day: 25,
        start_date: None,
    })];
    for idx in 0..20 {
        definitions.push(RecurringDefinition::Subscription(Subscription {
            id: Uuid::new_v4(),
            name: format!("Subscription {idx}"),
            amount: 1_000 + idx,
            frequency: if idx % 4 == 0 {
                SubscriptionFrequency::Yearly
            } else {
                SubscriptionFrequency::Monthly
            },
            first_payment_date: start_date,
            payment_day: (idx % 28 + 1) as u32,
        }));
    }
    definitions.push(RecurringDefinition::Loan(Loan {
        id: Uuid::new_v4(),
        name: "Mortgage".into(),
        amount_per_payment: 90_000,
        payment_day: Some(31),
        status: LoanStatus::Active,
        plan: LoanPlan::Amortizing(AmortizingPlan {
            principal: 30_000_000,
            repayment_rule: RepaymentRule::Semiannual,
            bonus_months: vec![6, 12],
            bonus_amount: 200_000,
            interest_rate: Some(0.9),
        }),
    }));

    ForecastSnapshot {
        transactions,
        sources: vec![bank, card],
        definitions,
        skipped: 0,
    }
}

fn bench_projection(c: &mut Criterion) {
    let snapshot = build_sample_snapshot(black_box(10_000));
    let as_of = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();

    c.bench_function("project_10k_six_months", |b| {
        b.iter(|| {
            let report =
                ForecastService::project_snapshot(&snapshot, as_of, ForecastOptions::default())
                    .expect("projection");
            black_box(report);
        })
    });

    let long = ForecastOptions {
        horizon_months: 120,
        ..ForecastOptions::default()
    };
    c.bench_function("project_10k_ten_years", |b| {
        b.iter(|| {
            let report =
                ForecastService::project_snapshot(&snapshot, as_of, long).expect("projection");
            black_box(report);
        })
    });
}

fn bench_snapshot_io(c: &mut Criterion) {
    let snapshot = build_sample_snapshot(black_box(10_000));
    let dir = tempdir().expect("tempdir");
    let storage = JsonSnapshotStorage::new(dir.path().to_path_buf()).expect("storage");
    let as_of = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();

    c.bench_function("snapshot_save_10k", |b| {
        b.iter(|| {
            storage.save_snapshot("bench", &snapshot).expect("save");
        })
    });

    storage.save_snapshot("bench", &snapshot).expect("seed");

    c.bench_function("snapshot_load_10k", |b| {
        b.iter(|| {
            let loaded = storage.load_snapshot("bench", as_of).expect("load");
            black_box(loaded);
        })
    });
}

criterion_group!(benches, bench_projection, bench_snapshot_io);
criterion_main!(benches);
