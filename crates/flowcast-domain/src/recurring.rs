//! Canonical recurring-obligation definitions.
//!
//! Storage backends may hold several historical shapes for the same concept;
//! they normalize into [`RecurringDefinition`] before the engine sees them.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecurringDefinition {
    Salary(Salary),
    Subscription(Subscription),
    Loan(Loan),
}

impl RecurringDefinition {
    pub fn as_loan(&self) -> Option<&Loan> {
        match self {
            RecurringDefinition::Loan(loan) => Some(loan),
            _ => None,
        }
    }
}

/// Monthly income paid on `pay_day`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Salary {
    pub id: Uuid,
    pub name: String,
    pub amount: i64,
    pub pay_day: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
}

/// A recurring charge such as a streaming service or an annual membership.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Subscription {
    pub id: Uuid,
    pub name: String,
    pub amount: i64,
    pub frequency: SubscriptionFrequency,
    /// First known charge date; occurrences step from this month.
    pub first_payment_date: NaiveDate,
    /// Day-of-month the charge lands on, re-clamped for every occurrence.
    pub payment_day: u32,
}

impl Subscription {
    /// Cost spread over a month, rounded to the nearest unit.
    pub fn monthly_equivalent(&self) -> i64 {
        match self.frequency {
            SubscriptionFrequency::Monthly => self.amount,
            SubscriptionFrequency::Yearly => (self.amount + 6).div_euclid(12),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionFrequency {
    #[default]
    Monthly,
    Yearly,
}

impl SubscriptionFrequency {
    pub fn months(self) -> u32 {
        match self {
            SubscriptionFrequency::Monthly => 1,
            SubscriptionFrequency::Yearly => 12,
        }
    }
}

impl fmt::Display for SubscriptionFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SubscriptionFrequency::Monthly => "Monthly",
            SubscriptionFrequency::Yearly => "Yearly",
        };
        f.write_str(label)
    }
}

/// A loan, either on a flat payment plan or amortized against a principal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Loan {
    pub id: Uuid,
    pub name: String,
    pub amount_per_payment: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_day: Option<u32>,
    #[serde(default)]
    pub status: LoanStatus,
    pub plan: LoanPlan,
}

impl Loan {
    pub fn is_active(&self) -> bool {
        self.status == LoanStatus::Active
    }

    pub fn amortizing(&self) -> Option<&AmortizingPlan> {
        match &self.plan {
            LoanPlan::Amortizing(plan) => Some(plan),
            LoanPlan::Fixed(_) => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LoanPlan {
    /// A known number of equal payments from a start date.
    Fixed(FixedPlan),
    /// Payments run until the principal, less recorded repayments, is cleared.
    Amortizing(AmortizingPlan),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FixedPlan {
    pub start_date: NaiveDate,
    pub frequency: LoanFrequency,
    pub number_of_payments: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AmortizingPlan {
    pub principal: i64,
    pub repayment_rule: RepaymentRule,
    #[serde(default)]
    pub bonus_months: Vec<u32>,
    #[serde(default)]
    pub bonus_amount: i64,
    /// Informational annual rate; never applied to balances.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_rate: Option<f64>,
}

impl AmortizingPlan {
    /// Whether bonus payments contribute to the schedule.
    pub fn has_bonus_schedule(&self) -> bool {
        self.repayment_rule == RepaymentRule::Semiannual
            && self.bonus_amount > 0
            && !self.bonus_months.is_empty()
    }

    pub fn is_bonus_month(&self, month: u32) -> bool {
        self.repayment_rule == RepaymentRule::Semiannual && self.bonus_months.contains(&month)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LoanFrequency {
    Monthly,
    #[serde(alias = "halfYear")]
    HalfYear,
    Yearly,
}

impl LoanFrequency {
    pub fn months(self) -> u32 {
        match self {
            LoanFrequency::Monthly => 1,
            LoanFrequency::HalfYear => 6,
            LoanFrequency::Yearly => 12,
        }
    }
}

impl fmt::Display for LoanFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LoanFrequency::Monthly => "Monthly",
            LoanFrequency::HalfYear => "Every 6 months",
            LoanFrequency::Yearly => "Yearly",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RepaymentRule {
    Monthly,
    /// Monthly installments plus bonus payments in `bonus_months`.
    Semiannual,
    /// Irregular repayments; no schedule can be derived.
    Custom,
}

impl fmt::Display for RepaymentRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RepaymentRule::Monthly => "Monthly",
            RepaymentRule::Semiannual => "Monthly + bonus",
            RepaymentRule::Custom => "Custom",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    #[default]
    Active,
    Completed,
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LoanStatus::Active => "Active",
            LoanStatus::Completed => "Completed",
        };
        f.write_str(label)
    }
}
