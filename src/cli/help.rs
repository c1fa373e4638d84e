use crate::cli::output;
use crate::cli::registry::{CommandEntry, CommandRegistry};
use crate::cli::ui::{Table, TableColumn, TableRenderer, UiStyle};

pub fn print_overview(registry: &CommandRegistry, style: &UiStyle) {
    let mut table = Table::new(
        Some("Available commands"),
        vec![TableColumn::new("Command", 10), TableColumn::new("Description", 50)],
    );
    for entry in registry.list() {
        table.add_row(vec![entry.name, entry.description]);
    }
    TableRenderer::render(&table, style);
    output::info("Use `help <command>` for details.");
}

pub fn print_command(entry: &CommandEntry, style: &UiStyle) {
    output::header(style, format!("Help: {}", entry.name));
    output::two_column(&[
        ("description", entry.description.to_string()),
        ("usage", format!("flowcast {}", entry.usage)),
    ]);
}
