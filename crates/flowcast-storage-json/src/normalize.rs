//! Stored record shapes and their conversion to canonical definitions.
//!
//! Subscriptions were stored either with an explicit `next_payment_date` or
//! with a bare `payment_day`; loans either as a flat payment schedule or as
//! a ledger-linked account. Both generations are accepted here and mapped
//! onto [`RecurringDefinition`] so the engine only sees one shape.

use chrono::{Datelike, NaiveDate};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use flowcast_domain::{
    next_day_of_month_on_or_after, AmortizingPlan, FixedPlan, LedgerTransaction, Loan,
    LoanFrequency, LoanPlan, LoanStatus, PaymentSource, RecurringDefinition, RepaymentRule,
    Salary, Subscription, SubscriptionFrequency,
};

/// On-disk layout of `<user>.json`. Records stay untyped until each one is
/// parsed on its own, so a single bad entry cannot hide the rest.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StoredSnapshot {
    #[serde(default)]
    pub transactions: Vec<Value>,
    #[serde(default, alias = "paymentSources")]
    pub payment_sources: Vec<Value>,
    #[serde(default)]
    pub salaries: Vec<Value>,
    #[serde(default)]
    pub subscriptions: Vec<Value>,
    #[serde(default)]
    pub loans: Vec<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalaryRecord {
    pub id: Uuid,
    pub name: String,
    pub amount: i64,
    #[serde(alias = "payDay")]
    pub pay_day: u32,
    #[serde(default, alias = "startDate", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionRecord {
    pub id: Uuid,
    pub name: String,
    pub amount: i64,
    #[serde(default)]
    pub frequency: SubscriptionFrequency,
    #[serde(default, alias = "nextPaymentDate", skip_serializing_if = "Option::is_none")]
    pub next_payment_date: Option<NaiveDate>,
    /// Older records only kept the day of month.
    #[serde(
        default,
        alias = "paymentDay",
        alias = "legacyPaymentDay",
        skip_serializing_if = "Option::is_none"
    )]
    pub payment_day: Option<u32>,
}

/// Ledger-linked loan with a principal paid down by repayments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanAccountRecord {
    pub id: Uuid,
    pub name: String,
    pub principal: i64,
    #[serde(alias = "monthlyAmount")]
    pub monthly_amount: i64,
    #[serde(default, alias = "paymentDay", skip_serializing_if = "Option::is_none")]
    pub payment_day: Option<u32>,
    #[serde(alias = "repaymentRule")]
    pub repayment_rule: RepaymentRule,
    #[serde(default, alias = "bonusMonths")]
    pub bonus_months: Vec<u32>,
    #[serde(default, alias = "bonusAmount")]
    pub bonus_amount: i64,
    #[serde(default, alias = "interestRate", skip_serializing_if = "Option::is_none")]
    pub interest_rate: Option<f64>,
    #[serde(default)]
    pub status: LoanStatus,
}

/// Loan entered as a flat run of equal payments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledLoanRecord {
    pub id: Uuid,
    pub name: String,
    #[serde(alias = "amountPerPayment")]
    pub amount_per_payment: i64,
    #[serde(alias = "startDate")]
    pub start_date: NaiveDate,
    #[serde(default, alias = "paymentDay", skip_serializing_if = "Option::is_none")]
    pub payment_day: Option<u32>,
    pub frequency: LoanFrequency,
    #[serde(alias = "numberOfPayments")]
    pub number_of_payments: u32,
    #[serde(default)]
    pub status: LoanStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LoanRecord {
    Account(LoanAccountRecord),
    Scheduled(ScheduledLoanRecord),
}

/// Canonical collections plus the number of records dropped on the way.
#[derive(Debug, Default)]
pub struct Normalized {
    pub transactions: Vec<LedgerTransaction>,
    pub sources: Vec<PaymentSource>,
    pub definitions: Vec<RecurringDefinition>,
    pub skipped: usize,
}

/// Parses every stored record, dropping malformed ones with a warning.
/// `as_of` anchors subscriptions that only recorded a day of month.
pub fn normalize(stored: StoredSnapshot, as_of: NaiveDate) -> Normalized {
    let mut out = Normalized::default();

    out.transactions = parse_all::<LedgerTransaction>(stored.transactions, "transaction", &mut out.skipped)
        .into_iter()
        .filter_map(|transaction| keep_valid(transaction, validate_transaction, &mut out.skipped))
        .collect();
    out.sources = parse_all::<PaymentSource>(stored.payment_sources, "payment source", &mut out.skipped)
        .into_iter()
        .filter_map(|source| keep_valid(source, validate_source, &mut out.skipped))
        .collect();

    for record in parse_all::<SalaryRecord>(stored.salaries, "salary", &mut out.skipped) {
        if let Some(salary) = keep_valid(record, salary_from_record, &mut out.skipped) {
            out.definitions.push(RecurringDefinition::Salary(salary));
        }
    }
    for record in parse_all::<SubscriptionRecord>(stored.subscriptions, "subscription", &mut out.skipped) {
        let convert = |record| subscription_from_record(record, as_of);
        if let Some(subscription) = keep_valid(record, convert, &mut out.skipped) {
            out.definitions.push(RecurringDefinition::Subscription(subscription));
        }
    }
    for record in parse_all::<LoanRecord>(stored.loans, "loan", &mut out.skipped) {
        if let Some(loan) = keep_valid(record, loan_from_record, &mut out.skipped) {
            out.definitions.push(RecurringDefinition::Loan(loan));
        }
    }
    out
}

fn parse_all<T: DeserializeOwned>(values: Vec<Value>, kind: &str, skipped: &mut usize) -> Vec<T> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(kind, index, error = %err, "skipping malformed record");
                *skipped += 1;
                None
            }
        })
        .collect()
}

fn keep_valid<R, T>(
    record: R,
    convert: impl FnOnce(R) -> Result<T, String>,
    skipped: &mut usize,
) -> Option<T> {
    match convert(record) {
        Ok(value) => Some(value),
        Err(reason) => {
            warn!(%reason, "skipping invalid record");
            *skipped += 1;
            None
        }
    }
}

fn check_day(field: &str, id: Uuid, day: u32) -> Result<u32, String> {
    if (1..=31).contains(&day) {
        Ok(day)
    } else {
        Err(format!("{field} {day} out of range on {id}"))
    }
}

/// Amounts are magnitudes; the kind carries the direction.
fn validate_transaction(transaction: LedgerTransaction) -> Result<LedgerTransaction, String> {
    if transaction.amount < 0 {
        return Err(format!(
            "negative amount {} on transaction {}",
            transaction.amount, transaction.id
        ));
    }
    Ok(transaction)
}

fn validate_source(source: PaymentSource) -> Result<PaymentSource, String> {
    if let Some(day) = source.closing_day {
        check_day("closing day", source.id, day)?;
    }
    if let Some(day) = source.payment_day {
        check_day("payment day", source.id, day)?;
    }
    Ok(source)
}

fn salary_from_record(record: SalaryRecord) -> Result<Salary, String> {
    Ok(Salary {
        pay_day: check_day("pay day", record.id, record.pay_day)?,
        id: record.id,
        name: record.name,
        amount: record.amount,
        start_date: record.start_date,
    })
}

fn subscription_from_record(record: SubscriptionRecord, as_of: NaiveDate) -> Result<Subscription, String> {
    let (first_payment_date, payment_day) = match (record.next_payment_date, record.payment_day) {
        (Some(date), day) => {
            let day = match day {
                Some(day) => check_day("payment day", record.id, day)?,
                None => date.day(),
            };
            (date, day)
        }
        (None, Some(day)) => {
            let day = check_day("payment day", record.id, day)?;
            (next_day_of_month_on_or_after(as_of, day), day)
        }
        (None, None) => return Err(format!("subscription {} has no payment anchor", record.id)),
    };
    Ok(Subscription {
        id: record.id,
        name: record.name,
        amount: record.amount,
        frequency: record.frequency,
        first_payment_date,
        payment_day,
    })
}

fn loan_from_record(record: LoanRecord) -> Result<Loan, String> {
    match record {
        LoanRecord::Account(account) => {
            let payment_day = account
                .payment_day
                .map(|day| check_day("payment day", account.id, day))
                .transpose()?;
            if let Some(month) = account.bonus_months.iter().find(|m| !(1..=12).contains(*m)) {
                return Err(format!("bonus month {month} out of range on {}", account.id));
            }
            Ok(Loan {
                id: account.id,
                name: account.name,
                amount_per_payment: account.monthly_amount,
                payment_day,
                status: account.status,
                plan: LoanPlan::Amortizing(AmortizingPlan {
                    principal: account.principal,
                    repayment_rule: account.repayment_rule,
                    bonus_months: account.bonus_months,
                    bonus_amount: account.bonus_amount,
                    interest_rate: account.interest_rate,
                }),
            })
        }
        LoanRecord::Scheduled(scheduled) => {
            let payment_day = scheduled
                .payment_day
                .map(|day| check_day("payment day", scheduled.id, day))
                .transpose()?;
            Ok(Loan {
                id: scheduled.id,
                name: scheduled.name,
                amount_per_payment: scheduled.amount_per_payment,
                payment_day,
                status: scheduled.status,
                plan: LoanPlan::Fixed(FixedPlan {
                    start_date: scheduled.start_date,
                    frequency: scheduled.frequency,
                    number_of_payments: scheduled.number_of_payments,
                }),
            })
        }
    }
}

/// Stored form of a canonical definition, in the current record layout.
pub enum DefinitionRecord {
    Salary(SalaryRecord),
    Subscription(SubscriptionRecord),
    Loan(LoanRecord),
}

impl From<&RecurringDefinition> for DefinitionRecord {
    fn from(definition: &RecurringDefinition) -> Self {
        match definition {
            RecurringDefinition::Salary(salary) => DefinitionRecord::Salary(SalaryRecord {
                id: salary.id,
                name: salary.name.clone(),
                amount: salary.amount,
                pay_day: salary.pay_day,
                start_date: salary.start_date,
            }),
            RecurringDefinition::Subscription(subscription) => {
                DefinitionRecord::Subscription(SubscriptionRecord {
                    id: subscription.id,
                    name: subscription.name.clone(),
                    amount: subscription.amount,
                    frequency: subscription.frequency,
                    next_payment_date: Some(subscription.first_payment_date),
                    payment_day: Some(subscription.payment_day),
                })
            }
            RecurringDefinition::Loan(loan) => DefinitionRecord::Loan(match &loan.plan {
                LoanPlan::Amortizing(plan) => LoanRecord::Account(LoanAccountRecord {
                    id: loan.id,
                    name: loan.name.clone(),
                    principal: plan.principal,
                    monthly_amount: loan.amount_per_payment,
                    payment_day: loan.payment_day,
                    repayment_rule: plan.repayment_rule,
                    bonus_months: plan.bonus_months.clone(),
                    bonus_amount: plan.bonus_amount,
                    interest_rate: plan.interest_rate,
                    status: loan.status,
                }),
                LoanPlan::Fixed(plan) => LoanRecord::Scheduled(ScheduledLoanRecord {
                    id: loan.id,
                    name: loan.name.clone(),
                    amount_per_payment: loan.amount_per_payment,
                    start_date: plan.start_date,
                    payment_day: loan.payment_day,
                    frequency: plan.frequency,
                    number_of_payments: plan.number_of_payments,
                    status: loan.status,
                }),
            }),
        }
    }
}
