use std::sync::{Arc, RwLock};

use chrono::NaiveDate;
use flowcast_config::Config;
use flowcast_core::{CurrencyFormatter, DateFormatter};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Formatter implementations backed by the active CLI configuration.
#[derive(Clone)]
pub struct CliFormatters {
    config: Arc<RwLock<Config>>,
}

impl CliFormatters {
    pub fn new(config: Arc<RwLock<Config>>) -> Self {
        Self { config }
    }

    /// Amount in the configured currency.
    pub fn amount(&self, amount: i64) -> String {
        self.format_amount(amount, "")
    }

    /// Amount without the currency code, for table cells.
    pub fn number(&self, amount: i64) -> String {
        let precision = self.read_config(|config| config.currency_precision);
        format_minor_units(amount, u32::from(precision))
    }

    fn read_config<T>(&self, read: impl FnOnce(&Config) -> T) -> T {
        match self.config.read() {
            Ok(guard) => read(&guard),
            Err(poisoned) => read(&poisoned.into_inner()),
        }
    }
}

impl CurrencyFormatter for CliFormatters {
    fn format_amount(&self, amount: i64, currency: &str) -> String {
        let (precision, configured) =
            self.read_config(|config| (config.currency_precision, config.currency.clone()));
        let code = if currency.is_empty() {
            configured.as_str()
        } else {
            currency
        };
        format!("{} {code}", format_minor_units(amount, u32::from(precision)))
    }
}

impl DateFormatter for CliFormatters {
    fn format_date(&self, date: NaiveDate) -> String {
        date.format(DATE_FORMAT).to_string()
    }
}

/// Renders an amount held in minor units with `precision` decimals and
/// comma-grouped thousands.
pub fn format_minor_units(amount: i64, precision: u32) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let magnitude = amount.unsigned_abs();
    let scale = 10u64.pow(precision);
    let whole = group_thousands(magnitude / scale);
    if precision == 0 {
        format!("{sign}{whole}")
    } else {
        format!(
            "{sign}{whole}.{:0width$}",
            magnitude % scale,
            width = precision as usize
        )
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
