// Copyright (c) 2025 Dmitry Kalashnikov
// Dual Licensed: Open-Source (see LICENSE) / Commercial (proprietary use)
// Commercial use requires a Commercial License. See LICENSE file.

// Shell configuration shared by the host binary and the built-in dispatchers
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_PROMPT: &str = "stackshell";
pub const DEFAULT_PROMPT_CHAR: &str = ">";
pub const DEFAULT_HISTORY_SIZE: usize = 1000;
const HISTORY_FILE_NAME: &str = ".stackshell_history";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    /// Resolve `Auto` against whether stdout is a terminal.
    pub fn enabled(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => atty::is(atty::Stream::Stdout),
        }
    }
}

impl FromStr for ColorChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Self::Auto),
            "always" => Ok(Self::Always),
            "never" => Ok(Self::Never),
            other => Err(format!("unknown color choice '{other}'")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ShellConfig {
    pub prompt: String,
    pub prompt_char: String,
    pub color: ColorChoice,
    /// `None` disables history persistence.
    pub history_file: Option<PathBuf>,
    pub history_size: usize,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            prompt_char: DEFAULT_PROMPT_CHAR.to_string(),
            color: ColorChoice::default(),
            history_file: Some(default_history_file()),
            history_size: DEFAULT_HISTORY_SIZE,
        }
    }
}

impl ShellConfig {
    pub fn full_prompt(&self) -> String {
        format!("{}{} ", self.prompt, self.prompt_char)
    }

    pub fn context_prompt(&self, context: &str) -> String {
        format!("{} ({}){} ", self.prompt, context, self.prompt_char)
    }
}

fn default_history_file() -> PathBuf {
    std::env::var_os("HOME")
        .map(|home| PathBuf::from(home).join(HISTORY_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(HISTORY_FILE_NAME))
}
