use std::result;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// An IR construct reached a lowering site that cannot encode it.
    /// This is a rule-set completeness bug, never a user diagnostic:
    /// lowering stops immediately and the partially built output for the
    /// declaration in progress is discarded.
    #[error("Unsupported lowering case: {kind}")]
    Unsupported { kind: String },
    #[error("Unknown type: {0}")]
    UnknownType(String),
    #[error("Generic error: {0}")]
    Generic(String),
}

pub type Result<T> = result::Result<T, Error>;

impl Error {
    pub fn unsupported(kind: impl Into<String>) -> Self {
        Error::Unsupported { kind: kind.into() }
    }
}

// Convert from eyre::Report to our Error type
impl From<eyre::Report> for Error {
    fn from(err: eyre::Report) -> Self {
        Error::Generic(err.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Generic(s)
    }
}
impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Generic(s.to_string())
    }
}
impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Generic(e.to_string())
    }
}
