//! Expansion of recurring definitions into dated forecast events.

use tracing::{debug, warn};

use flowcast_domain::{
    monthly_occurrence, months_between, next_day_of_month_on_or_after, AmortizingPlan,
    EventSource, FixedPlan, ForecastEvent, ForecastWindow, LedgerTransaction, Loan, LoanPlan,
    RecurringDefinition, RepaymentRule, Salary, Subscription,
};

use crate::loan_service::{fixed_occurrences, AmortizationSchedule, LoanService};

/// Expands salary, subscription and loan definitions over a forecast window.
pub struct RecurrenceService;

impl RecurrenceService {
    /// Generates events for every definition whose occurrences fall inside
    /// `window`. The window start is treated as today: earlier occurrences are
    /// assumed to be reflected in the ledger already.
    ///
    /// Output order is salaries, then subscriptions, then loans, each in
    /// definition order and chronologically within a definition.
    pub fn expand(
        definitions: &[RecurringDefinition],
        transactions: &[LedgerTransaction],
        window: ForecastWindow,
    ) -> Vec<ForecastEvent> {
        let mut events = Vec::new();
        for definition in definitions {
            if let RecurringDefinition::Salary(salary) = definition {
                events.extend(Self::salary_events(salary, window));
            }
        }
        for definition in definitions {
            if let RecurringDefinition::Subscription(subscription) = definition {
                events.extend(Self::subscription_events(subscription, window));
            }
        }
        for definition in definitions {
            if let RecurringDefinition::Loan(loan) = definition {
                events.extend(Self::loan_events(loan, transactions, window));
            }
        }
        debug!(
            definitions = definitions.len(),
            events = events.len(),
            "expanded recurring definitions"
        );
        events
    }

    /// Monthly income from the first pay day on or after the later of the
    /// start date and the window start.
    pub fn salary_events(salary: &Salary, window: ForecastWindow) -> Vec<ForecastEvent> {
        if !is_valid_day(salary.pay_day) {
            warn!(salary = %salary.id, pay_day = salary.pay_day, "skipping salary with invalid pay day");
            return Vec::new();
        }
        let from = salary
            .start_date
            .map_or(window.start, |start| start.max(window.start));
        let first = next_day_of_month_on_or_after(from, salary.pay_day);
        let amount = salary.amount.abs();

        (0..occurrence_bound(window))
            .map(|index| monthly_occurrence(first, 1, index, salary.pay_day))
            .take_while(|date| *date <= window.end)
            .map(|date| {
                ForecastEvent::forecast(EventSource::Salary, salary.id, date, amount, &salary.name)
            })
            .collect()
    }

    /// Charges stepping monthly or yearly from the first payment date;
    /// occurrences before the window are rolled past.
    pub fn subscription_events(
        subscription: &Subscription,
        window: ForecastWindow,
    ) -> Vec<ForecastEvent> {
        if !is_valid_day(subscription.payment_day) {
            warn!(
                subscription = %subscription.id,
                payment_day = subscription.payment_day,
                "skipping subscription with invalid payment day"
            );
            return Vec::new();
        }
        let step = subscription.frequency.months();
        let first = subscription.first_payment_date;
        let elapsed = months_between(first, window.start).max(0) as u32;
        let skip = (elapsed / step).saturating_sub(1);
        let amount = -subscription.amount.abs();

        (skip..skip.saturating_add(occurrence_bound(window)))
            .map(|index| monthly_occurrence(first, step, index, subscription.payment_day))
            .take_while(|date| *date <= window.end)
            .filter(|date| *date >= window.start && *date >= first)
            .map(|date| {
                ForecastEvent::forecast(
                    EventSource::Subscription,
                    subscription.id,
                    date,
                    amount,
                    &subscription.name,
                )
            })
            .collect()
    }

    pub fn loan_events(
        loan: &Loan,
        transactions: &[LedgerTransaction],
        window: ForecastWindow,
    ) -> Vec<ForecastEvent> {
        if !loan.is_active() {
            return Vec::new();
        }
        match &loan.plan {
            LoanPlan::Fixed(plan) => Self::fixed_loan_events(loan, plan, window),
            LoanPlan::Amortizing(plan) => {
                let remaining = LoanService::remaining_balance(loan, transactions, window.start);
                Self::amortizing_loan_events(loan, plan, remaining, window)
            }
        }
    }

    /// Flat schedule: `number_of_payments` equal payments from the start
    /// month, stopping at the window end.
    pub fn fixed_loan_events(
        loan: &Loan,
        plan: &FixedPlan,
        window: ForecastWindow,
    ) -> Vec<ForecastEvent> {
        let amount = -loan.amount_per_payment.abs();
        fixed_occurrences(loan, plan)
            .take_while(|date| *date <= window.end)
            .filter(|date| *date >= window.start)
            .map(|date| ForecastEvent::forecast(EventSource::Loan, loan.id, date, amount, &loan.name))
            .collect()
    }

    /// Upcoming installments of a ledger-linked loan until it is paid off or
    /// the window ends. Loans without a determinate schedule produce nothing.
    pub fn amortizing_loan_events(
        loan: &Loan,
        plan: &AmortizingPlan,
        remaining_balance: i64,
        window: ForecastWindow,
    ) -> Vec<ForecastEvent> {
        if plan.repayment_rule == RepaymentRule::Custom || remaining_balance <= 0 {
            return Vec::new();
        }
        let Some(payment_day) = loan.payment_day.filter(|day| is_valid_day(*day)) else {
            return Vec::new();
        };
        let first_due = next_day_of_month_on_or_after(window.start, payment_day);
        AmortizationSchedule::new(
            plan,
            loan.amount_per_payment,
            payment_day,
            first_due,
            remaining_balance,
        )
        .take_while(|installment| installment.date <= window.end)
        .filter(|installment| installment.amount > 0)
        .map(|installment| {
            ForecastEvent::forecast(
                EventSource::Loan,
                loan.id,
                installment.date,
                -installment.amount,
                &loan.name,
            )
        })
        .collect()
    }
}

fn is_valid_day(day: u32) -> bool {
    (1..=31).contains(&day)
}

/// Most occurrences a schedule stepping at least monthly can have in
/// `window`, counted from the month before it opens.
fn occurrence_bound(window: ForecastWindow) -> u32 {
    months_between(window.start, window.end).max(0) as u32 + 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDate};
    use flowcast_domain::{LoanFrequency, LoanStatus, SubscriptionFrequency};
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dates(events: &[ForecastEvent]) -> Vec<NaiveDate> {
        events.iter().map(|event| event.date).collect()
    }

    fn salary(pay_day: u32, start_date: Option<NaiveDate>) -> Salary {
        Salary {
            id: Uuid::new_v4(),
            name: "Salary".into(),
            amount: 300_000,
            pay_day,
            start_date,
        }
    }

    fn subscription(frequency: SubscriptionFrequency, first: NaiveDate) -> Subscription {
        Subscription {
            id: Uuid::new_v4(),
            name: "Video".into(),
            amount: 1_490,
            frequency,
            first_payment_date: first,
            payment_day: first.day(),
        }
    }

    #[test]
    fn salary_starts_at_next_pay_day_and_steps_monthly() {
        let window = ForecastWindow::horizon(date(2025, 1, 26), 3);
        let events = RecurrenceService::salary_events(&salary(25, None), window);
        assert_eq!(
            dates(&events),
            vec![date(2025, 2, 25), date(2025, 3, 25), date(2025, 4, 25)]
        );
        assert!(events.iter().all(|event| event.amount == 300_000));
    }

    #[test]
    fn salary_pay_day_clamps_without_drifting() {
        let window = ForecastWindow::horizon(date(2025, 1, 1), 3);
        let events = RecurrenceService::salary_events(&salary(31, None), window);
        assert_eq!(
            dates(&events),
            vec![date(2025, 1, 31), date(2025, 2, 28), date(2025, 3, 31)]
        );
    }

    #[test]
    fn salary_waits_for_future_start_date() {
        let window = ForecastWindow::horizon(date(2025, 1, 1), 6);
        let events =
            RecurrenceService::salary_events(&salary(10, Some(date(2025, 4, 15))), window);
        assert_eq!(dates(&events), vec![date(2025, 5, 10), date(2025, 6, 10)]);
    }

    #[test]
    fn subscription_rolls_forward_from_stale_date() {
        let window = ForecastWindow::horizon(date(2025, 6, 20), 3);
        let events = RecurrenceService::subscription_events(
            &subscription(SubscriptionFrequency::Monthly, date(2024, 11, 5)),
            window,
        );
        assert_eq!(
            dates(&events),
            vec![date(2025, 7, 5), date(2025, 8, 5), date(2025, 9, 5)]
        );
        assert!(events.iter().all(|event| event.amount == -1_490));
    }

    #[test]
    fn yearly_subscription_steps_twelve_months() {
        let window = ForecastWindow::horizon(date(2025, 1, 1), 24);
        let events = RecurrenceService::subscription_events(
            &subscription(SubscriptionFrequency::Yearly, date(2023, 3, 1)),
            window,
        );
        assert_eq!(dates(&events), vec![date(2025, 3, 1), date(2026, 3, 1)]);
    }

    #[test]
    fn subscription_due_today_is_included() {
        let today = date(2025, 6, 5);
        let window = ForecastWindow::horizon(today, 1);
        let events = RecurrenceService::subscription_events(
            &subscription(SubscriptionFrequency::Monthly, date(2025, 1, 5)),
            window,
        );
        assert_eq!(dates(&events), vec![today, date(2025, 7, 5)]);
    }

    #[test]
    fn fixed_loan_emits_only_future_payments_within_count() {
        let loan = Loan {
            id: Uuid::new_v4(),
            name: "Laptop".into(),
            amount_per_payment: 8_000,
            payment_day: Some(10),
            status: LoanStatus::Active,
            plan: LoanPlan::Fixed(FixedPlan {
                start_date: date(2025, 1, 3),
                frequency: LoanFrequency::Monthly,
                number_of_payments: 5,
            }),
        };
        let window = ForecastWindow::horizon(date(2025, 3, 1), 6);
        let events = RecurrenceService::loan_events(&loan, &[], window);
        assert_eq!(
            dates(&events),
            vec![date(2025, 3, 10), date(2025, 4, 10), date(2025, 5, 10)]
        );
        assert!(events.iter().all(|event| event.amount == -8_000));
    }

    #[test]
    fn half_year_loan_steps_six_months_and_stops_at_horizon() {
        let loan = Loan {
            id: Uuid::new_v4(),
            name: "Tuition".into(),
            amount_per_payment: 250_000,
            payment_day: Some(30),
            status: LoanStatus::Active,
            plan: LoanPlan::Fixed(FixedPlan {
                start_date: date(2024, 8, 1),
                frequency: LoanFrequency::HalfYear,
                number_of_payments: 10,
            }),
        };
        let window = ForecastWindow::horizon(date(2025, 1, 1), 12);
        let events = RecurrenceService::loan_events(&loan, &[], window);
        assert_eq!(dates(&events), vec![date(2025, 2, 28), date(2025, 8, 30)]);
    }

    #[test]
    fn amortizing_loan_stops_at_payoff() {
        let loan = Loan {
            id: Uuid::new_v4(),
            name: "Car".into(),
            amount_per_payment: 10_000,
            payment_day: Some(27),
            status: LoanStatus::Active,
            plan: LoanPlan::Amortizing(AmortizingPlan {
                principal: 25_000,
                repayment_rule: RepaymentRule::Monthly,
                bonus_months: Vec::new(),
                bonus_amount: 0,
                interest_rate: Some(1.5),
            }),
        };
        let window = ForecastWindow::horizon(date(2025, 1, 1), 6);
        let events = RecurrenceService::loan_events(&loan, &[], window);
        let amounts: Vec<_> = events.iter().map(|event| event.amount).collect();
        assert_eq!(amounts, vec![-10_000, -10_000, -5_000]);
        assert_eq!(events[2].date, date(2025, 3, 27));
    }

    #[test]
    fn inactive_or_custom_loans_generate_nothing() {
        let mut loan = Loan {
            id: Uuid::new_v4(),
            name: "Family".into(),
            amount_per_payment: 10_000,
            payment_day: Some(1),
            status: LoanStatus::Active,
            plan: LoanPlan::Amortizing(AmortizingPlan {
                principal: 100_000,
                repayment_rule: RepaymentRule::Custom,
                bonus_months: Vec::new(),
                bonus_amount: 0,
                interest_rate: None,
            }),
        };
        let window = ForecastWindow::horizon(date(2025, 1, 1), 6);
        assert!(RecurrenceService::loan_events(&loan, &[], window).is_empty());
        loan.status = LoanStatus::Completed;
        assert!(RecurrenceService::loan_events(&loan, &[], window).is_empty());
    }

    #[test]
    fn expand_orders_by_definition_kind() {
        let today = date(2025, 1, 1);
        let definitions = vec![
            RecurringDefinition::Subscription(subscription(
                SubscriptionFrequency::Monthly,
                date(2025, 1, 20),
            )),
            RecurringDefinition::Salary(salary(20, None)),
        ];
        let events = RecurrenceService::expand(&definitions, &[], ForecastWindow::horizon(today, 0));
        assert!(events.is_empty());

        let events = RecurrenceService::expand(&definitions, &[], ForecastWindow::horizon(today, 1));
        let sources: Vec<_> = events.iter().map(|event| event.source).collect();
        assert_eq!(sources, vec![EventSource::Salary, EventSource::Subscription]);
    }

    #[test]
    fn longest_horizon_keeps_every_monthly_occurrence() {
        let window = ForecastWindow::horizon(date(2025, 1, 1), 1200);
        let salaries = RecurrenceService::salary_events(&salary(25, None), window);
        assert_eq!(salaries.len(), 1200);
        assert_eq!(salaries.last().map(|event| event.date), Some(date(2124, 12, 25)));

        let charges = RecurrenceService::subscription_events(
            &subscription(SubscriptionFrequency::Monthly, date(2024, 6, 1)),
            window,
        );
        assert_eq!(charges.len(), 1201);
        assert_eq!(charges.last().map(|event| event.date), Some(date(2125, 1, 1)));
    }
}
