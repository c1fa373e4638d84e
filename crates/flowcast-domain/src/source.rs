//! Payment sources: asset accounts holding money and cards settled later.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentSource {
    pub id: Uuid,
    pub name: String,
    pub kind: SourceKind,
    /// Opening balance seed; only meaningful for asset sources.
    #[serde(default)]
    pub balance: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closing_day: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_day: Option<u32>,
}

impl PaymentSource {
    pub fn asset(name: impl Into<String>, kind: SourceKind, balance: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            balance,
            closing_day: None,
            payment_day: None,
        }
    }

    pub fn card(name: impl Into<String>, closing_day: Option<u32>, payment_day: Option<u32>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind: SourceKind::Card,
            balance: 0,
            closing_day,
            payment_day,
        }
    }

    pub fn is_asset(&self) -> bool {
        self.kind.is_asset()
    }

    pub fn is_card(&self) -> bool {
        self.kind == SourceKind::Card
    }

    /// Billing cycle of a card, present only when both cycle days are set.
    pub fn billing_cycle(&self) -> Option<BillingCycle> {
        if !self.is_card() {
            return None;
        }
        Some(BillingCycle {
            closing_day: self.closing_day?,
            payment_day: self.payment_day?,
        })
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Bank,
    Wallet,
    WalletQr,
    Card,
}

impl SourceKind {
    /// Assets hold money on hand; cards are liabilities settled on bill day.
    pub fn is_asset(self) -> bool {
        !matches!(self, SourceKind::Card)
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SourceKind::Bank => "Bank",
            SourceKind::Wallet => "Wallet",
            SourceKind::WalletQr => "QR Wallet",
            SourceKind::Card => "Card",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Closing and payment days of a fully configured card.
pub struct BillingCycle {
    pub closing_day: u32,
    pub payment_day: u32,
}

impl BillingCycle {
    /// Date on which a purchase made on `purchase` is debited.
    ///
    /// Purchases up to and including the closing day are billed next month;
    /// later purchases fall into the following cycle and are billed the month
    /// after next.
    pub fn payment_date_for(&self, purchase: NaiveDate) -> NaiveDate {
        let offset = if purchase.day() <= self.closing_day { 1 } else { 2 };
        safe_date(
            purchase.year(),
            purchase.month() as i32 + offset,
            self.payment_day,
        )
    }
}
