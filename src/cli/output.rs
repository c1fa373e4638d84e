use std::fmt;

use crate::cli::ui::UiStyle;

pub fn header(style: &UiStyle, title: impl fmt::Display) {
    println!("{}", style.format_header(&title.to_string()));
}

pub fn info(message: impl fmt::Display) {
    println!("{message}");
}

pub fn warning(style: &UiStyle, message: impl fmt::Display) {
    println!("{}", style.apply_warning_style(&format!("Warning: {message}")));
}

pub fn success(style: &UiStyle, message: impl fmt::Display) {
    println!("{}", style.apply_success_style(&message.to_string()));
}

/// `label: value` lines with labels padded to a common width.
pub fn two_column(rows: &[(&str, String)]) {
    for line in two_column_lines(rows) {
        println!("{line}");
    }
}

pub fn two_column_lines(rows: &[(&str, String)]) -> Vec<String> {
    let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    rows.iter()
        .map(|(label, value)| format!("  {:<width$}  {value}", format!("{label}:"), width = width + 1))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_column_pads_labels() {
        let lines = two_column_lines(&[("Risk", "Safe".into()), ("End balance", "10".into())]);
        assert_eq!(lines[0], "  Risk:         Safe");
        assert_eq!(lines[1], "  End balance:  10");
    }
}
