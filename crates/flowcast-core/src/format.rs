use chrono::NaiveDate;

/// Formats currency amounts (smallest unit) for presentation.
pub trait CurrencyFormatter: Send + Sync {
    fn format_amount(&self, amount: i64, currency: &str) -> String;
}

/// Formats dates for presentation.
pub trait DateFormatter: Send + Sync {
    fn format_date(&self, date: NaiveDate) -> String;
}
