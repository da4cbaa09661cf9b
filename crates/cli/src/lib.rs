// lesart CLI - terminal reader for the Philosophical Investigations plus the
// offline explanation generator.

pub mod exit_codes;
pub mod generate;
pub mod tui;
pub mod util;

use exit_codes::{EXIT_IO, EXIT_MISSING_KEY, EXIT_PARSE, EXIT_USAGE};

use lesart_core::DataError;

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self { code: EXIT_PARSE, message: msg.into(), hint: None }
    }

    pub fn missing_key(msg: impl Into<String>) -> Self {
        Self { code: EXIT_MISSING_KEY, message: msg.into(), hint: None }
    }

    /// Map a data-file error to its exit code.
    pub fn from_data(err: DataError) -> Self {
        match err {
            DataError::Io(msg) => Self::io(msg),
            DataError::Parse(msg) => Self::parse(msg),
        }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
