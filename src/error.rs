use miette::{Diagnostic, Result};
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Invalid input: {0}")]
    #[diagnostic(code(audit_scheduler::invalid_input))]
    InvalidInput(String),

    #[error("Authentication error: {0}")]
    #[diagnostic(code(audit_scheduler::auth))]
    Auth(String),

    #[error("Calendar provider error: {0}")]
    #[diagnostic(code(audit_scheduler::remote))]
    Remote(String),

    #[error("Environment error: {0}")]
    #[diagnostic(code(audit_scheduler::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(audit_scheduler::config))]
    Config(String),

    #[error(transparent)]
    #[diagnostic(code(audit_scheduler::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(audit_scheduler::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(audit_scheduler::other))]
    Other(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Remote(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type AppResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create invalid-input errors
pub fn invalid_input(message: &str) -> Error {
    Error::InvalidInput(message.to_string())
}

/// Helper to create authentication errors
pub fn auth_error(message: &str) -> Error {
    Error::Auth(message.to_string())
}

/// Helper to create calendar provider errors
pub fn remote_error(message: &str) -> Error {
    Error::Remote(message.to_string())
}

/// Helper to create other errors
pub fn other_error(message: &str) -> Error {
    Error::Other(message.to_string())
}
