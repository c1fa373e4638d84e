use serde::{Deserialize, Serialize};
use std::{env, path::PathBuf};

use crate::ConfigError;

/// Environment variable overriding the home directory.
pub const HOME_ENV: &str = "FLOWCAST_HOME";

/// Keys accepted by [`Config::set_value`], in display order.
pub const CONFIG_KEYS: &[&str] = &[
    "currency",
    "locale",
    "horizon_months",
    "caution_threshold",
    "currency_precision",
    "ui_color_enabled",
    "data_root",
    "default_user",
];

/// Stores forecast preferences and CLI defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    #[serde(default = "Config::default_horizon_months")]
    pub horizon_months: u32,
    /// Balances below this (in minor units) are reported as caution.
    #[serde(default = "Config::default_caution_threshold")]
    pub caution_threshold: i64,
    /// Digits after the decimal point when rendering minor units.
    #[serde(default)]
    pub currency_precision: u8,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom directory for user snapshots. Defaults to `<home>/users`.
    pub data_root: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_user: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            currency: "USD".into(),
            horizon_months: Self::default_horizon_months(),
            caution_threshold: Self::default_caution_threshold(),
            currency_precision: 0,
            ui_color_enabled: Self::default_ui_color_enabled(),
            data_root: None,
            default_user: None,
        }
    }
}

impl Config {
    pub fn default_horizon_months() -> u32 {
        6
    }

    pub fn default_caution_threshold() -> i64 {
        10_000
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    /// Directory holding `<user>.json` snapshots.
    pub fn resolve_data_root(&self) -> PathBuf {
        match &self.data_root {
            Some(path) => path.clone(),
            None => resolve_home().join("users"),
        }
    }

    /// Current value of `key` rendered for display.
    pub fn value(&self, key: &str) -> Result<String, ConfigError> {
        let value = match key {
            "currency" => self.currency.clone(),
            "locale" => self.locale.clone(),
            "horizon_months" => self.horizon_months.to_string(),
            "caution_threshold" => self.caution_threshold.to_string(),
            "currency_precision" => self.currency_precision.to_string(),
            "ui_color_enabled" => self.ui_color_enabled.to_string(),
            "data_root" => self.resolve_data_root().display().to_string(),
            "default_user" => self.default_user.clone().unwrap_or_default(),
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        };
        Ok(value)
    }

    /// Parses `value` into the field named `key`. Empty values clear the
    /// optional fields.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        let invalid = || ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };
        match key {
            "currency" if !value.is_empty() => self.currency = value.to_ascii_uppercase(),
            "locale" if !value.is_empty() => self.locale = value.to_string(),
            "horizon_months" => {
                self.horizon_months = value
                    .parse::<u32>()
                    .ok()
                    .filter(|months| (1..=1200).contains(months))
                    .ok_or_else(invalid)?
            }
            "caution_threshold" => self.caution_threshold = value.parse::<i64>().map_err(|_| invalid())?,
            "currency_precision" => {
                self.currency_precision = value
                    .parse::<u8>()
                    .ok()
                    .filter(|digits| *digits <= 4)
                    .ok_or_else(invalid)?
            }
            "ui_color_enabled" => self.ui_color_enabled = parse_flag(value).ok_or_else(invalid)?,
            "data_root" => self.data_root = (!value.is_empty()).then(|| PathBuf::from(value)),
            "default_user" => self.default_user = (!value.is_empty()).then(|| value.to_string()),
            "currency" | "locale" => return Err(invalid()),
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }
}

/// Home directory for config and data: `$FLOWCAST_HOME` when set, otherwise
/// `~/.flowcast`.
pub fn resolve_home() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV).filter(|value| !value.is_empty()) {
        return PathBuf::from(custom);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".flowcast")
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Some(true),
        "false" | "off" | "no" | "0" => Some(false),
        _ => None,
    }
}
