use std::io::IsTerminal;

use colored::{Color, Colorize};
use flowcast_domain::RiskLevel;

#[derive(Debug, Clone)]
pub struct UiStyle {
    pub header_prefix: String,
    pub horizontal: char,
    pub use_color: bool,
    pub color_header: Option<Color>,
    pub color_highlight: Option<Color>,
}

impl UiStyle {
    /// Colour only when stdout is a terminal, `NO_COLOR` is unset and the
    /// configuration allows it.
    pub fn detect(color_enabled: bool) -> Self {
        let stdout_tty = std::io::stdout().is_terminal();
        let no_color = std::env::var_os("NO_COLOR").is_some();
        Self::with_color(color_enabled && stdout_tty && !no_color)
    }

    pub fn plain() -> Self {
        Self::with_color(false)
    }

    fn with_color(use_color: bool) -> Self {
        Self {
            header_prefix: "> ".into(),
            horizontal: '-',
            use_color,
            color_header: use_color.then_some(Color::BrightBlue),
            color_highlight: use_color.then_some(Color::Cyan),
        }
    }

    pub fn horizontal_line(&self, width: usize) -> String {
        self.horizontal.to_string().repeat(width.max(40))
    }

    pub fn apply_header_style(&self, text: &str) -> String {
        self.paint(text, self.color_header)
    }

    pub fn apply_highlight_style(&self, text: &str) -> String {
        self.paint(text, self.color_highlight)
    }

    pub fn apply_warning_style(&self, text: &str) -> String {
        self.paint(text, Some(Color::Yellow))
    }

    pub fn apply_success_style(&self, text: &str) -> String {
        self.paint(text, Some(Color::Green))
    }

    /// Green, yellow or red depending on the risk level.
    pub fn apply_risk_style(&self, level: RiskLevel, text: &str) -> String {
        let color = match level {
            RiskLevel::Safe => Color::Green,
            RiskLevel::Caution => Color::Yellow,
            RiskLevel::Danger => Color::Red,
        };
        self.paint(text, Some(color))
    }

    /// Negative amounts render red.
    pub fn apply_amount_style(&self, amount: i64, text: &str) -> String {
        if amount < 0 {
            self.paint(text, Some(Color::Red))
        } else {
            text.to_string()
        }
    }

    pub fn format_header(&self, title: &str) -> String {
        let prefixed = format!("{}{}", self.header_prefix, title);
        self.apply_header_style(&prefixed)
    }

    fn paint(&self, text: &str, color: Option<Color>) -> String {
        if !self.use_color {
            return text.to_string();
        }
        match color {
            Some(color) => text.color(color).bold().to_string(),
            None => text.bold().to_string(),
        }
    }
}
