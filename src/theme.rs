// Copyright (c) 2025 Dmitry Kalashnikov
// Dual Licensed: Open-Source (see LICENSE) / Commercial (proprietary use)
// Commercial use requires a Commercial License. See LICENSE file.

pub const STATUS_PREFIX: &str = "[*]";
pub const ERROR_PREFIX: &str = "[-]";

pub struct Theme {
    pub status_color: &'static str,
    pub error_color: &'static str,
    pub heading_color: &'static str,
}

impl Theme {
    pub const fn default() -> Self {
        Self {
            status_color: "\x1b[1;34m",
            error_color: "\x1b[1;31m",
            heading_color: "\x1b[1m",
        }
    }

    pub const fn reset() -> &'static str {
        "\x1b[0m"
    }

    pub fn status(&self, msg: &str, color: bool) -> String {
        Self::prefixed(self.status_color, STATUS_PREFIX, msg, color)
    }

    pub fn error(&self, msg: &str, color: bool) -> String {
        Self::prefixed(self.error_color, ERROR_PREFIX, msg, color)
    }

    pub fn heading(&self, text: &str, color: bool) -> String {
        if color {
            format!("{}{}{}", self.heading_color, text, Self::reset())
        } else {
            text.to_string()
        }
    }

    fn prefixed(code: &str, prefix: &str, msg: &str, color: bool) -> String {
        if color {
            format!("{code}{prefix}{} {msg}", Self::reset())
        } else {
            format!("{prefix} {msg}")
        }
    }
}

pub const DEFAULT_THEME: Theme = Theme::default();
