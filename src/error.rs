// Copyright (c) 2025 Dmitry Kalashnikov
// Dual Licensed: Open-Source (see LICENSE) / Commercial (proprietary use)
// Commercial use requires a Commercial License. See LICENSE file.

use thiserror::Error;

/// Failure raised by a command handler.
///
/// The dispatch engine never lets one of these escape `run_single`; it is
/// reported through the host's error sink and the line counts as handled.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("missing argument: {0}")]
    MissingArgument(&'static str),

    #[error("unexpected argument '{0}'")]
    UnexpectedArgument(String),

    #[error("invalid value '{value}' for {name}")]
    InvalidValue { name: &'static str, value: String },

    #[error("{0}")]
    Failed(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl CommandError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Result type returned by every command handler.
pub type CommandResult = Result<(), CommandError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            CommandError::MissingArgument("context").to_string(),
            "missing argument: context"
        );
        assert_eq!(
            CommandError::InvalidValue {
                name: "color",
                value: "pink".to_string()
            }
            .to_string(),
            "invalid value 'pink' for color"
        );
        assert_eq!(CommandError::failed("boom").to_string(), "boom");
    }

    #[test]
    fn test_io_is_transparent() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such thing");
        assert_eq!(CommandError::from(io).to_string(), "no such thing");
    }
}
