use crate::cli::{
    context::CliContext, help, output, registry::CommandEntry, CommandResult,
};
use crate::utils::build_info;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("version", "Show build metadata", "version", cmd_version),
        CommandEntry::new("help", "Show available commands", "help [command]", cmd_help),
    ]
}

fn cmd_version(context: &mut CliContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output::header(&context.style, format!("Flowcast {}", meta.version));
    output::two_column(&meta.rows());
    Ok(())
}

fn cmd_help(context: &mut CliContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        return match context.registry.get(&name.to_lowercase()) {
            Some(entry) => {
                help::print_command(entry, &context.style);
                Ok(())
            }
            None => Err(context.unknown_command(name)),
        };
    }

    help::print_overview(&context.registry, &context.style);
    Ok(())
}
