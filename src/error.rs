//! Error taxonomy for the analysis engine.
//!
//! Every variant is recoverable. Component boundaries convert these into
//! failed report sections; nothing here is meant to end the process.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Errors raised by the parser, rule engine and environment scanner.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The source text is not valid Python.
    #[error("SyntaxError: {message} (line {line}, column {column})")]
    Syntax {
        message: String,
        line: usize,
        column: usize,
    },

    /// The project path does not exist.
    #[error("NotFound: {}", path.display())]
    NotFound { path: PathBuf },

    /// The project path exists but could not be read as a directory.
    #[error("IOError: {}: {reason}", path.display())]
    Io { path: PathBuf, reason: String },

    /// The package manager could not be run, exited non-zero, timed out,
    /// or produced output we could not read.
    #[error("SubprocessFailure: {0}")]
    Subprocess(String),

    /// The caller cancelled the analysis between detector runs.
    #[error("Cancelled: analysis cancelled before completion")]
    Cancelled,

    /// The Python grammar could not be loaded into the parser.
    #[error("InternalError: {0}")]
    Language(#[from] tree_sitter::LanguageError),
}

impl AnalysisError {
    pub fn io(path: impl Into<PathBuf>, reason: impl fmt::Display) -> Self {
        AnalysisError::Io {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn subprocess(reason: impl Into<String>) -> Self {
        AnalysisError::Subprocess(reason.into())
    }

    /// The taxonomy bucket this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalysisError::Syntax { .. } => ErrorKind::SyntaxError,
            AnalysisError::NotFound { .. } => ErrorKind::NotFound,
            AnalysisError::Io { .. } => ErrorKind::IoError,
            AnalysisError::Subprocess(_) => ErrorKind::SubprocessFailure,
            AnalysisError::Cancelled => ErrorKind::Cancelled,
            AnalysisError::Language(_) => ErrorKind::Internal,
        }
    }
}

/// Coarse error classification used in reports and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    SyntaxError,
    NotFound,
    #[serde(rename = "IOError")]
    IoError,
    SubprocessFailure,
    Cancelled,
    #[serde(rename = "InternalError")]
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::SyntaxError => "SyntaxError",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::IoError => "IOError",
            ErrorKind::SubprocessFailure => "SubprocessFailure",
            ErrorKind::Cancelled => "Cancelled",
            ErrorKind::Internal => "InternalError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;
