//! Terminal host error handling

use bmi_calculator_shared::FormError;
use thiserror::Error;

/// Errors raised while driving a session
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error(transparent)]
    Form(#[from] FormError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Whether the session can carry on after this error
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, CliError::Io(_))
    }
}
