use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for tilebake operations
#[derive(Error, Diagnostic, Debug)]
pub enum BakeError {
    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(tilebake::io))]
    Io { path: PathBuf, message: String },

    #[error("Failed to decode {path}: {message}")]
    #[diagnostic(code(tilebake::decode))]
    Decode { path: PathBuf, message: String },

    #[error("{path}: {message}")]
    #[diagnostic(code(tilebake::dimension))]
    Dimension {
        path: PathBuf,
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Capacity error: {message}")]
    #[diagnostic(code(tilebake::capacity))]
    Capacity {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(tilebake::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Validation failed: {message}")]
    #[diagnostic(code(tilebake::validate))]
    Validation {
        message: String,
        #[help]
        help: Option<String>,
    },
}

pub type Result<T> = std::result::Result<T, BakeError>;
