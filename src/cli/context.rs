use std::{
    path::Path,
    sync::{Arc, RwLock},
};

use chrono::NaiveDate;
use tracing::debug;

use flowcast_config::{resolve_home, Config, ConfigManager};
use flowcast_core::{Clock, ForecastOptions};
use flowcast_storage_json::JsonSnapshotStorage;

use crate::cli::{
    commands, formatters::CliFormatters, help, output, registry::CommandRegistry,
    system_clock::SystemClock, ui::UiStyle, CommandResult,
};
use crate::errors::CliError;

const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";

/// State shared by every command of one CLI invocation.
pub struct CliContext {
    pub registry: CommandRegistry,
    pub config_manager: ConfigManager,
    pub config: Arc<RwLock<Config>>,
    pub formatters: CliFormatters,
    pub style: UiStyle,
    clock: Box<dyn Clock>,
}

impl CliContext {
    /// Context rooted at `$FLOWCAST_HOME` (or `~/.flowcast`) on the system clock.
    pub fn from_env() -> Result<Self, CliError> {
        Self::new(&resolve_home(), Box::new(SystemClock))
    }

    pub fn new(home: &Path, clock: Box<dyn Clock>) -> Result<Self, CliError> {
        let config_manager = ConfigManager::with_base_dir(home)?;
        let loaded = config_manager.load()?;
        let style = UiStyle::detect(loaded.ui_color_enabled);
        let config = Arc::new(RwLock::new(loaded));

        let mut registry = CommandRegistry::new();
        for entry in commands::all_definitions() {
            registry.register(entry);
        }
        debug!(home = %home.display(), "cli context ready");

        Ok(Self {
            registry,
            config_manager,
            formatters: CliFormatters::new(Arc::clone(&config)),
            config,
            style,
            clock,
        })
    }

    /// Snapshot of the active configuration.
    pub fn config(&self) -> Config {
        match self.config.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn replace_config(&mut self, config: Config) {
        self.style = UiStyle::detect(config.ui_color_enabled);
        match self.config.write() {
            Ok(mut guard) => *guard = config,
            Err(poisoned) => *poisoned.into_inner() = config,
        }
    }

    pub fn storage(&self) -> Result<JsonSnapshotStorage, CliError> {
        Ok(JsonSnapshotStorage::new(self.config().resolve_data_root())?)
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// `--user`, falling back to the configured default user.
    pub fn resolve_user(&self, requested: Option<&str>) -> Result<String, CliError> {
        requested
            .map(str::to_string)
            .or_else(|| self.config().default_user)
            .ok_or_else(|| {
                CliError::Input("no user given; pass `--user` or set `default_user`".into())
            })
    }

    /// `--as-of` in `YYYY-MM-DD`, falling back to today.
    pub fn resolve_as_of(&self, requested: Option<&str>) -> Result<NaiveDate, CliError> {
        match requested {
            Some(raw) => NaiveDate::parse_from_str(raw, DATE_INPUT_FORMAT).map_err(|_| {
                CliError::Input(format!("invalid date `{raw}`; expected YYYY-MM-DD"))
            }),
            None => Ok(self.today()),
        }
    }

    /// Forecast options from the configuration with an optional horizon
    /// override.
    pub fn forecast_options(&self, horizon: Option<&str>) -> Result<ForecastOptions, CliError> {
        let config = self.config();
        let horizon_months = match horizon {
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|months| *months > 0)
                .ok_or_else(|| CliError::Input(format!("invalid horizon `{raw}`")))?,
            None => config.horizon_months,
        };
        Ok(ForecastOptions {
            horizon_months,
            caution_threshold: config.caution_threshold,
        })
    }

    /// Runs one command line; no arguments prints the overview.
    pub fn dispatch(&mut self, args: &[String]) -> CommandResult {
        let Some((raw, rest)) = args.split_first() else {
            help::print_overview(&self.registry, &self.style);
            return Ok(());
        };
        let command = raw.to_lowercase();
        let rest: Vec<&str> = rest.iter().map(String::as_str).collect();
        match self.registry.handler(&command) {
            Some(handler) => handler(self, &rest),
            None => Err(self.unknown_command(raw)),
        }
    }

    pub fn unknown_command(&self, input: &str) -> CliError {
        output::warning(
            &self.style,
            format!("Unknown command `{input}`. Run `flowcast help` to see available commands."),
        );
        if let Some(best) = self.registry.suggest(input) {
            output::info(format!("Suggestion: `{best}`?"));
        }
        CliError::Command(format!("unknown command `{input}`"))
    }
}
