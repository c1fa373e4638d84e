use flowcast_config::CONFIG_KEYS;
use tracing::info;

use crate::cli::{
    context::CliContext,
    output,
    registry::CommandEntry,
    ui::{Table, TableColumn, TableRenderer},
    CommandResult,
};
use crate::errors::CliError;

const USAGE: &str = "config show | config set KEY VALUE | config backups | config restore NAME";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "Inspect or change forecast preferences",
        USAGE,
        cmd_config,
    )]
}

fn cmd_config(context: &mut CliContext, args: &[&str]) -> CommandResult {
    match args {
        [] | ["show"] => show(context),
        ["set", key, value @ ..] => set(context, key, &value.join(" ")),
        ["backups"] => list_backups(context),
        ["restore", name] => restore(context, name),
        _ => Err(CliError::Input(format!("usage: flowcast {USAGE}"))),
    }
}

fn show(context: &CliContext) -> CommandResult {
    let config = context.config();
    let mut table = Table::new(
        Some("Configuration"),
        vec![TableColumn::new("Key", 18), TableColumn::new("Value", 40)],
    );
    for key in CONFIG_KEYS {
        table.add_row(vec![key.to_string(), config.value(key)?]);
    }
    TableRenderer::render(&table, &context.style);
    output::info(format!("File: {}", context.config_manager.config_path().display()));
    Ok(())
}

/// Backs up the current file before writing the new value.
fn set(context: &mut CliContext, key: &str, value: &str) -> CommandResult {
    let current = context.config();
    let mut updated = current.clone();
    updated.set_value(key, value)?;

    if context.config_manager.config_path().exists() {
        let backup = context.config_manager.backup(&current)?;
        info!(backup = %backup, "configuration backed up");
    }
    context.config_manager.save(&updated)?;
    let shown = updated.value(key)?;
    context.replace_config(updated);
    output::success(&context.style, format!("{key} = {shown}"));
    Ok(())
}

fn list_backups(context: &CliContext) -> CommandResult {
    let backups = context.config_manager.list_backups()?;
    if backups.is_empty() {
        output::info("No configuration backups yet.");
        return Ok(());
    }
    for name in backups {
        output::info(name);
    }
    Ok(())
}

fn restore(context: &mut CliContext, name: &str) -> CommandResult {
    let restored = context.config_manager.restore(name)?;
    context.config_manager.save(&restored)?;
    context.replace_config(restored);
    output::success(&context.style, format!("Restored configuration from {name}"));
    Ok(())
}
