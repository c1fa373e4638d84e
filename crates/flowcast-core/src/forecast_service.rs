//! Orchestrates one projection: snapshot, timeline, risk, loans and bills.

use chrono::NaiveDate;
use tracing::{debug, warn};

use flowcast_domain::{ForecastReport, LoanStatusReport, RecurringDefinition};

use crate::{
    billing_service::BillingService,
    loan_service::{LoanService, MAX_SIMULATED_INSTALLMENTS},
    risk_service::{RiskService, DEFAULT_CAUTION_THRESHOLD},
    storage::{snapshot_warnings, ForecastSnapshot, SnapshotSource},
    timeline_service::{Timeline, TimelineService},
    CoreError,
};

pub const DEFAULT_HORIZON_MONTHS: u32 = 6;

/// Tunables for a projection run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastOptions {
    pub horizon_months: u32,
    pub caution_threshold: i64,
}

impl Default for ForecastOptions {
    fn default() -> Self {
        Self {
            horizon_months: DEFAULT_HORIZON_MONTHS,
            caution_threshold: DEFAULT_CAUTION_THRESHOLD,
        }
    }
}

impl ForecastOptions {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.horizon_months > MAX_SIMULATED_INSTALLMENTS {
            return Err(CoreError::Validation(format!(
                "horizon of {} months exceeds the {} month limit",
                self.horizon_months, MAX_SIMULATED_INSTALLMENTS
            )));
        }
        Ok(())
    }
}

pub struct ForecastService;

impl ForecastService {
    /// Reads one snapshot for `user_id` and projects it from `as_of`.
    /// Storage failures are returned as-is; no partial report is produced.
    pub fn project(
        source: &dyn SnapshotSource,
        user_id: &str,
        as_of: NaiveDate,
        options: ForecastOptions,
    ) -> Result<ForecastReport, CoreError> {
        options.validate()?;
        let snapshot = source.load_snapshot(user_id, as_of)?;
        Self::project_snapshot(&snapshot, as_of, options)
    }

    pub fn project_snapshot(
        snapshot: &ForecastSnapshot,
        as_of: NaiveDate,
        options: ForecastOptions,
    ) -> Result<ForecastReport, CoreError> {
        options.validate()?;
        for warning in snapshot_warnings(snapshot) {
            warn!("{warning}");
        }

        let timeline = TimelineService::build(snapshot, as_of, options.horizon_months);
        let risk = RiskService::assess(&timeline, options.caution_threshold);
        let loans = Self::loan_reports(snapshot, as_of);
        let upcoming_bills =
            BillingService::upcoming_bills(&snapshot.sources, &snapshot.transactions, as_of);

        debug!(
            %as_of,
            events = timeline.events.len(),
            level = %risk.level,
            loans = loans.len(),
            bills = upcoming_bills.len(),
            "forecast projected"
        );

        let balance_today = timeline.balance_today();
        let Timeline {
            window,
            start_balance,
            events,
            balances,
            ..
        } = timeline;
        Ok(ForecastReport {
            as_of,
            window,
            start_balance,
            balance_today,
            events,
            balances,
            risk,
            loans,
            upcoming_bills,
            monthly_subscription_cost: Self::monthly_subscription_cost(snapshot),
            skipped_records: snapshot.skipped,
        })
    }

    /// Sum of every subscription's monthly equivalent.
    pub fn monthly_subscription_cost(snapshot: &ForecastSnapshot) -> i64 {
        snapshot
            .definitions
            .iter()
            .filter_map(|definition| match definition {
                RecurringDefinition::Subscription(subscription) => {
                    Some(subscription.monthly_equivalent())
                }
                _ => None,
            })
            .sum()
    }

    /// Status of every loan definition, in definition order.
    pub fn loan_reports(snapshot: &ForecastSnapshot, as_of: NaiveDate) -> Vec<LoanStatusReport> {
        snapshot
            .definitions
            .iter()
            .filter_map(RecurringDefinition::as_loan)
            .map(|loan| LoanService::status_report(loan, &snapshot.transactions, as_of))
            .collect()
    }
}
