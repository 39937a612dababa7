use std::io::{self, IsTerminal};

/// Status line categories, each with its own ANSI color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Error,
    Warning,
    Success,
    Info,
}

impl Style {
    fn code(self) -> &'static str {
        match self {
            Style::Error => "\x1b[31m",
            Style::Warning => "\x1b[33m",
            Style::Success => "\x1b[32m",
            Style::Info => "\x1b[36m",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Colors {
    enabled: bool,
}

impl Colors {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Wrap `text` in the escape codes for `style`, or return it unchanged
    /// when colors are off.
    pub fn paint(&self, style: Style, text: &str) -> String {
        if self.enabled {
            format!("{}{text}\x1b[0m", style.code())
        } else {
            text.to_string()
        }
    }
}

pub fn should_use_colors(force_color: bool, no_color: bool) -> bool {
    // Priority: --no-color > --color > NO_COLOR env > TTY detection
    if no_color {
        return false;
    }
    if force_color {
        return true;
    }
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    io::stdout().is_terminal()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paint_disabled_is_plain() {
        let colors = Colors::new(false);
        assert_eq!(colors.paint(Style::Error, "Error:"), "Error:");
    }

    #[test]
    fn test_paint_enabled_wraps_text() {
        let colors = Colors::new(true);
        assert_eq!(colors.paint(Style::Success, "ok"), "\x1b[32mok\x1b[0m");
    }

    #[test]
    fn test_flags_take_priority() {
        assert!(!should_use_colors(true, true));
        assert!(should_use_colors(true, false));
    }
}
