use chrono::NaiveDate;

use flowcast_domain::{
    BalancePoint, EventSource, Evidence, ForecastEvent, RecommendedAction, RiskAssessment,
    RiskLevel,
};

use crate::timeline_service::Timeline;

/// Lowest balance, in minor units, still considered comfortable.
pub const DEFAULT_CAUTION_THRESHOLD: i64 = 10_000;

pub struct RiskService;

impl RiskService {
    /// Danger at the first negative point; otherwise caution when the
    /// minimum dips below `caution_threshold`; otherwise safe.
    pub fn classify(balances: &[BalancePoint], caution_threshold: i64) -> (RiskLevel, Option<NaiveDate>) {
        if let Some(point) = balances.iter().find(|point| point.balance < 0) {
            return (RiskLevel::Danger, Some(point.date));
        }
        let below_threshold = balances
            .iter()
            .map(|point| point.balance)
            .min()
            .is_some_and(|lowest| lowest < caution_threshold);
        if below_threshold {
            (RiskLevel::Caution, None)
        } else {
            (RiskLevel::Safe, None)
        }
    }

    pub fn evidence(events: &[ForecastEvent], lowest_balance: Option<BalancePoint>) -> Evidence {
        let mut evidence = Evidence {
            lowest_balance,
            ..Evidence::default()
        };
        for event in events {
            let magnitude = event.amount.abs();
            match event.source {
                EventSource::Salary => evidence.income.record(magnitude),
                EventSource::Subscription | EventSource::Loan => evidence.fixed.record(magnitude),
                EventSource::CardBill => evidence.card.record(magnitude),
                EventSource::Ledger if event.is_inflow() => evidence.income.record(magnitude),
                EventSource::Ledger => evidence.other.record(magnitude),
            }
        }
        evidence
    }

    pub fn recommend(level: RiskLevel, evidence: &Evidence) -> RecommendedAction {
        let income = evidence.income.total;
        if income > 0 && evidence.card.total * 2 > income {
            RecommendedAction::ReviewCardUsage
        } else if income > 0 && evidence.fixed.total * 2 > income {
            RecommendedAction::ReviewFixedCosts
        } else if level == RiskLevel::Danger && income == 0 {
            RecommendedAction::RegisterIncome
        } else {
            RecommendedAction::LogExpense
        }
    }

    pub fn summarize(level: RiskLevel, danger_date: Option<NaiveDate>) -> String {
        match (level, danger_date) {
            (RiskLevel::Danger, Some(date)) => format!(
                "Your balance is projected to go negative in {}.",
                date.format("%B %Y")
            ),
            (RiskLevel::Danger, None) => "Your balance is projected to go negative.".to_string(),
            (RiskLevel::Caution, _) => {
                "Your balance stays positive but runs low at some point.".to_string()
            }
            (RiskLevel::Safe, _) => "Your balance stays healthy over the forecast.".to_string(),
        }
    }

    pub fn assess(timeline: &Timeline, caution_threshold: i64) -> RiskAssessment {
        let (level, danger_date) = Self::classify(&timeline.risk_series(), caution_threshold);
        let evidence = Self::evidence(&timeline.events, timeline.lowest_point());
        RiskAssessment {
            level,
            summary: Self::summarize(level, danger_date),
            danger_date,
            recommended_action: Self::recommend(level, &evidence),
            evidence,
        }
    }
}
