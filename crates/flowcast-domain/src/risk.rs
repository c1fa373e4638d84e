//! Risk classification results derived from a projected balance series.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::forecast::BalancePoint;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Safe,
    Caution,
    Danger,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskLevel::Safe => "Safe",
            RiskLevel::Caution => "Caution",
            RiskLevel::Danger => "Danger",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
/// Count and total magnitude of events in one evidence bucket.
pub struct EvidenceBucket {
    pub count: usize,
    pub total: i64,
}

impl EvidenceBucket {
    pub fn record(&mut self, magnitude: i64) {
        self.count += 1;
        self.total += magnitude;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
/// Event totals backing the assessment.
pub struct Evidence {
    pub income: EvidenceBucket,
    /// Subscriptions and loan installments.
    pub fixed: EvidenceBucket,
    pub card: EvidenceBucket,
    /// Forward-dated ledger outflows.
    pub other: EvidenceBucket,
    pub lowest_balance: Option<BalancePoint>,
}

impl Evidence {
    pub fn total_outflow(&self) -> i64 {
        self.fixed.total + self.card.total + self.other.total
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RecommendedAction {
    ReviewCardUsage,
    ReviewFixedCosts,
    RegisterIncome,
    LogExpense,
}

impl RecommendedAction {
    pub fn title(self) -> &'static str {
        match self {
            RecommendedAction::ReviewCardUsage => "Review card usage",
            RecommendedAction::ReviewFixedCosts => "Review fixed costs",
            RecommendedAction::RegisterIncome => "Register your income",
            RecommendedAction::LogExpense => "Log an expense",
        }
    }

    pub fn detail(self) -> &'static str {
        match self {
            RecommendedAction::ReviewCardUsage => {
                "Card bills take more than half of your projected income."
            }
            RecommendedAction::ReviewFixedCosts => {
                "Subscriptions and loan payments take more than half of your projected income."
            }
            RecommendedAction::RegisterIncome => {
                "No income is scheduled; add your salary so the forecast can account for it."
            }
            RecommendedAction::LogExpense => {
                "Keep recording expenses so the forecast stays accurate."
            }
        }
    }
}

impl fmt::Display for RecommendedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RiskAssessment {
    pub level: RiskLevel,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub danger_date: Option<NaiveDate>,
    pub evidence: Evidence,
    pub recommended_action: RecommendedAction,
}
