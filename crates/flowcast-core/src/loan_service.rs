//! Loan balances and amortization schedules.

use chrono::{Datelike, NaiveDate};
use tracing::warn;

use flowcast_domain::{
    monthly_occurrence, next_day_of_month_on_or_after, AmortizingPlan, FixedPlan,
    LedgerTransaction, Loan, LoanPlan, LoanProjection, LoanStatusReport, RepaymentRule,
    TransactionKind,
};

/// Upper bound on simulated installments (100 years of monthly payments).
pub const MAX_SIMULATED_INSTALLMENTS: u32 = 1200;

/// One simulated installment of an amortizing loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Installment {
    /// 1-based position in the remaining schedule.
    pub number: u32,
    pub date: NaiveDate,
    pub amount: i64,
    pub balance_after: i64,
}

/// Walks an amortizing loan's remaining installments month by month.
///
/// Each step charges the monthly amount, plus the bonus amount in bonus
/// months for semiannual loans, and stops once the balance is cleared or
/// [`MAX_SIMULATED_INSTALLMENTS`] steps have been produced. The final
/// installment is capped at the outstanding balance.
#[derive(Debug, Clone)]
pub struct AmortizationSchedule<'a> {
    plan: &'a AmortizingPlan,
    monthly_amount: i64,
    payment_day: u32,
    first_due: NaiveDate,
    balance: i64,
    produced: u32,
}

impl<'a> AmortizationSchedule<'a> {
    pub fn new(
        plan: &'a AmortizingPlan,
        monthly_amount: i64,
        payment_day: u32,
        first_due: NaiveDate,
        balance: i64,
    ) -> Self {
        Self {
            plan,
            monthly_amount: monthly_amount.max(0),
            payment_day,
            first_due,
            balance,
            produced: 0,
        }
    }

    pub fn outstanding(&self) -> i64 {
        self.balance
    }
}

impl Iterator for AmortizationSchedule<'_> {
    type Item = Installment;

    fn next(&mut self) -> Option<Installment> {
        if self.balance <= 0 || self.produced >= MAX_SIMULATED_INSTALLMENTS {
            return None;
        }
        let date = monthly_occurrence(self.first_due, 1, self.produced, self.payment_day);
        let mut due = self.monthly_amount;
        if self.plan.is_bonus_month(date.month()) {
            due += self.plan.bonus_amount.max(0);
        }
        let amount = due.min(self.balance);
        self.balance -= due;
        self.produced += 1;
        Some(Installment {
            number: self.produced,
            date,
            amount,
            balance_after: self.balance,
        })
    }
}

pub struct LoanService;

impl LoanService {
    /// Sum of recorded repayments linked to `loan`.
    pub fn repaid(loan: &Loan, transactions: &[LedgerTransaction]) -> i64 {
        transactions
            .iter()
            .filter(|txn| txn.kind == TransactionKind::Repayment && txn.loan_ref == Some(loan.id))
            .map(|txn| txn.amount)
            .sum()
    }

    /// Outstanding balance of an amortizing loan: principal less recorded
    /// repayments. Fixed plans report their unpaid scheduled total as of
    /// `as_of`.
    pub fn remaining_balance(
        loan: &Loan,
        transactions: &[LedgerTransaction],
        as_of: NaiveDate,
    ) -> i64 {
        match &loan.plan {
            LoanPlan::Amortizing(plan) => plan.principal - Self::repaid(loan, transactions),
            LoanPlan::Fixed(plan) => {
                let remaining = fixed_occurrences(loan, plan)
                    .filter(|date| *date >= as_of)
                    .count() as i64;
                remaining * loan.amount_per_payment
            }
        }
    }

    /// Derives next due date, payoff date and remaining installment count.
    pub fn project(loan: &Loan, remaining_balance: i64, as_of: NaiveDate) -> LoanProjection {
        match &loan.plan {
            LoanPlan::Amortizing(plan) => Self::project_amortizing(
                plan,
                AmortizationTerms {
                    active: loan.is_active(),
                    payment_day: loan.payment_day,
                    monthly_amount: loan.amount_per_payment,
                },
                remaining_balance,
                as_of,
            ),
            LoanPlan::Fixed(plan) => Self::project_fixed(loan, plan, as_of),
        }
    }

    /// Amortization simulation for a ledger-linked loan.
    pub fn project_amortizing(
        plan: &AmortizingPlan,
        terms: AmortizationTerms,
        remaining_balance: i64,
        as_of: NaiveDate,
    ) -> LoanProjection {
        if !terms.active || remaining_balance <= 0 {
            return LoanProjection::settled();
        }
        let Some(payment_day) = terms.payment_day else {
            return LoanProjection::indeterminate();
        };
        if plan.repayment_rule == RepaymentRule::Custom {
            return LoanProjection::indeterminate();
        }

        let next_due = next_day_of_month_on_or_after(as_of, payment_day);
        let due_only = LoanProjection {
            next_due_date: Some(next_due),
            ..LoanProjection::indeterminate()
        };
        if terms.monthly_amount <= 0 && !plan.has_bonus_schedule() {
            return due_only;
        }

        let mut schedule = AmortizationSchedule::new(
            plan,
            terms.monthly_amount,
            payment_day,
            next_due,
            remaining_balance,
        );
        let last = schedule.by_ref().last();
        match last {
            Some(installment) if installment.balance_after <= 0 => LoanProjection {
                next_due_date: Some(next_due),
                payoff_date: Some(installment.date),
                remaining_installments: Some(installment.number),
            },
            _ => {
                warn!(
                    remaining_balance,
                    outstanding = schedule.outstanding(),
                    "loan schedule did not close within {MAX_SIMULATED_INSTALLMENTS} installments"
                );
                due_only
            }
        }
    }

    fn project_fixed(loan: &Loan, plan: &FixedPlan, as_of: NaiveDate) -> LoanProjection {
        if !loan.is_active() {
            return LoanProjection::settled();
        }
        let mut upcoming = fixed_occurrences(loan, plan).filter(|date| *date >= as_of);
        let Some(next_due) = upcoming.next() else {
            return LoanProjection::settled();
        };
        let (count, payoff) = upcoming.fold((1u32, next_due), |(count, _), date| (count + 1, date));
        LoanProjection {
            next_due_date: Some(next_due),
            payoff_date: Some(payoff),
            remaining_installments: Some(count),
        }
    }

    /// Builds the presentation-layer status for a loan.
    pub fn status_report(
        loan: &Loan,
        transactions: &[LedgerTransaction],
        as_of: NaiveDate,
    ) -> LoanStatusReport {
        let remaining_balance = Self::remaining_balance(loan, transactions, as_of);
        let (principal, repaid) = match &loan.plan {
            LoanPlan::Amortizing(plan) => (plan.principal, Self::repaid(loan, transactions)),
            LoanPlan::Fixed(plan) => {
                let total = loan.amount_per_payment * i64::from(plan.number_of_payments);
                (total, total - remaining_balance)
            }
        };
        LoanStatusReport {
            loan_id: loan.id,
            name: loan.name.clone(),
            principal,
            repaid,
            remaining_balance,
            projection: Self::project(loan, remaining_balance, as_of),
        }
    }
}

/// Payment terms the amortization simulation reads from a loan.
#[derive(Debug, Clone, Copy)]
pub struct AmortizationTerms {
    pub active: bool,
    pub payment_day: Option<u32>,
    pub monthly_amount: i64,
}

/// Payment dates of a fixed plan, in order. The first payment lands on the
/// payment day of the start month; the start date's own day is used when no
/// payment day is set.
pub fn fixed_occurrences<'a>(
    loan: &'a Loan,
    plan: &'a FixedPlan,
) -> impl Iterator<Item = NaiveDate> + 'a {
    let day = loan.payment_day.unwrap_or_else(|| plan.start_date.day());
    let step = plan.frequency.months();
    (0..plan.number_of_payments).map(move |index| monthly_occurrence(plan.start_date, step, index, day))
}
