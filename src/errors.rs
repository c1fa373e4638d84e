use std::result::Result as StdResult;

use flowcast_config::ConfigError;
use flowcast_core::CoreError;
use thiserror::Error;

/// Unified error for everything below the command layer.
#[derive(Debug, Error)]
pub enum FlowcastError {
    #[error("User not found: {0}")]
    UserNotFound(String),
    #[error("Forecast error: {0}")]
    Forecast(#[source] CoreError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = StdResult<T, FlowcastError>;

impl From<CoreError> for FlowcastError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::UserNotFound(user) => FlowcastError::UserNotFound(user),
            CoreError::Validation(message) => FlowcastError::InvalidInput(message),
            other => FlowcastError::Forecast(other),
        }
    }
}

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] FlowcastError),
    #[error("{0}")]
    Input(String),
    #[error("{0}")]
    Command(String),
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        CliError::Core(err.into())
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::Core(err.into())
    }
}
