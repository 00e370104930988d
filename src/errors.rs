// src/errors.rs

//! Crate-wide error type.
//!
//! Every failure of the conversion core is returned as an `UnconvError`
//! value; nothing is retried or swallowed internally. Callers (an HTTP layer,
//! the CLI) decide how to surface each variant.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum UnconvError {
    /// The staged file has a type with no registered conversion template.
    #[error("Impossible conversion: '{0}' cannot be converted to PDF")]
    UnsupportedOperation(String),

    /// A command template could not be parsed or rendered.
    #[error("Template error: {0}")]
    Template(String),

    /// The shell used to run the command could not be started.
    #[error("failed to launch command '{command}': {source}")]
    Launch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The command exceeded its timeout and was killed.
    #[error("The command '{command}' has reached the {timeout} second(s) timeout")]
    Timeout { command: String, timeout: u64 },

    /// The command exceeded its timeout and could not be killed. The process
    /// may still be running.
    #[error(
        "The command '{command}' has reached the {timeout} second(s) timeout and could not be killed (process may be leaked): {source}"
    )]
    Kill {
        command: String,
        timeout: u64,
        #[source]
        source: std::io::Error,
    },

    /// The command ran to completion but failed.
    #[error("command '{command}' failed: {detail}")]
    Execution { command: String, detail: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("no commands configuration loaded; call `load` before converting")]
    NotLoaded,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl UnconvError {
    /// `true` for a timeout, including one whose kill failed.
    pub fn is_timeout(&self) -> bool {
        matches!(self, UnconvError::Timeout { .. } | UnconvError::Kill { .. })
    }

    /// `true` when the request itself was unacceptable, as opposed to a
    /// failure while running it.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            UnconvError::UnsupportedOperation(_) | UnconvError::InvalidInput(_)
        )
    }

    /// `true` when an external process may have been left running.
    pub fn is_leak(&self) -> bool {
        matches!(self, UnconvError::Kill { .. })
    }
}

pub type Result<T> = std::result::Result<T, UnconvError>;
