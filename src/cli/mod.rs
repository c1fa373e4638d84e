pub mod args;
pub mod commands;
pub mod context;
pub mod formatters;
pub mod help;
pub mod output;
pub mod registry;
pub mod system_clock;
pub mod ui;

use crate::errors::CliError;

pub use context::CliContext;

pub type CommandResult = Result<(), CliError>;

/// Entry point used by the `flowcast` binary.
pub fn run_cli() -> CommandResult {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut context = CliContext::from_env()?;
    context.dispatch(&args)
}
