use std::{error::Error, fmt::Display};

#[derive(Clone, Debug)]
pub struct SQLError {
    pub kind: ErrorKind,
    pub message: String,
}

#[allow(clippy::enum_variant_names)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    ParseError,
    GrammarError,
    /// Missing or malformed connection configuration.
    ConfigurationError,
    /// Namespace argument rejected before anything is sent to the server.
    InvalidNamespaceError,
    /// The server rejected a statement. Raised by executors only.
    StatementExecutionError,
    IoError,
    UnknownError,
}

impl Error for SQLError {}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::ParseError => write!(f, "Parse Error"),
            ErrorKind::GrammarError => write!(f, "Grammar Error"),
            ErrorKind::ConfigurationError => write!(f, "Configuration Error"),
            ErrorKind::InvalidNamespaceError => write!(f, "Invalid Namespace Error"),
            ErrorKind::StatementExecutionError => write!(f, "Statement Execution Error"),
            ErrorKind::IoError => write!(f, "IO Error"),
            ErrorKind::UnknownError => write!(f, "Unknown Error"),
        }
    }
}

impl Display for SQLError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl SQLError {
    pub fn new(kind: ErrorKind, message: impl AsRef<str>) -> Self {
        Self {
            kind,
            message: message.as_ref().to_string(),
        }
    }
}

impl From<std::io::Error> for SQLError {
    fn from(e: std::io::Error) -> Self {
        SQLError::new(ErrorKind::IoError, e.to_string())
    }
}
