use std::collections::{HashMap, HashSet};

use crate::errors::CliError;

/// `--name value`, `--name=value` and bare `--flag` arguments plus
/// positionals, validated against the options a command accepts.
#[derive(Debug, Default)]
pub struct ParsedArgs {
    positionals: Vec<String>,
    values: HashMap<String, String>,
    flags: HashSet<String>,
}

impl ParsedArgs {
    pub fn parse(
        args: &[&str],
        value_options: &[&str],
        flag_options: &[&str],
    ) -> Result<Self, CliError> {
        let mut parsed = Self::default();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            let Some(option) = arg.strip_prefix("--") else {
                parsed.positionals.push(arg.to_string());
                continue;
            };
            let (name, inline) = match option.split_once('=') {
                Some((name, value)) => (name, Some(value)),
                None => (option, None),
            };
            if value_options.contains(&name) {
                let value = match inline {
                    Some(value) => value,
                    None => iter
                        .next()
                        .copied()
                        .ok_or_else(|| CliError::Input(format!("`--{name}` expects a value")))?,
                };
                parsed.values.insert(name.to_string(), value.to_string());
            } else if flag_options.contains(&name) && inline.is_none() {
                parsed.flags.insert(name.to_string());
            } else {
                return Err(CliError::Input(format!("unknown option `{arg}`")));
            }
        }
        Ok(parsed)
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn flag(&self, name: &str) -> bool {
        self.flags.contains(name)
    }

    pub fn positionals(&self) -> &[String] {
        &self.positionals
    }
}
