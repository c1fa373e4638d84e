pub mod config;
pub mod forecast;
pub mod system;

use crate::cli::registry::CommandEntry;

/// Every command the CLI registers, in help order.
pub(crate) fn all_definitions() -> Vec<CommandEntry> {
    let mut entries = forecast::definitions();
    entries.extend(config::definitions());
    entries.extend(system::definitions());
    entries
}
