//! Error type shared by every pipeline stage.
//!
//! Nothing in the pipeline retries or recovers locally; each variant reaches the caller as-is.
//! [`Error::kind`] groups variants so the HTTP layer can choose a status code.

use thiserror::Error;

/// Coarse category of a pipeline failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Database or model API unreachable, or credentials rejected.
    Connectivity,
    /// The model answered but the answer is unusable.
    Generation,
    /// The SQL was rejected or failed to run.
    Execution,
}

#[derive(Debug, Error)]
pub enum Error {
    /// Could not obtain a working database connection (network, auth, pool).
    #[error("database connection failed: {0}")]
    Connect(String),

    /// Statement failed on the server. Carries the server's message.
    #[error("database error: {0}")]
    Database(String),

    /// SQL refused by the statement policy before reaching the database.
    #[error("statement rejected: {0}")]
    StatementRejected(String),

    /// Network failure talking to the model API.
    #[error("model request failed: {0}")]
    LlmTransport(String),

    /// Model API rejected the API key.
    #[error("model authentication failed (HTTP {status}): {body}")]
    LlmAuth { status: u16, body: String },

    /// Model API returned a non-success status other than an auth failure.
    #[error("model API error (HTTP {status}): {body}")]
    LlmStatus { status: u16, body: String },

    /// Model API answered 2xx but the body is not the expected shape.
    #[error("malformed model response: {0}")]
    LlmMalformed(String),

    /// Cleanup left nothing to execute.
    #[error("model returned no SQL")]
    EmptyGeneration,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Connect(_) | Error::LlmTransport(_) | Error::LlmAuth { .. } => {
                ErrorKind::Connectivity
            }
            Error::LlmStatus { .. } | Error::LlmMalformed(_) | Error::EmptyGeneration => {
                ErrorKind::Generation
            }
            Error::StatementRejected(_) | Error::Database(_) => ErrorKind::Execution,
        }
    }
}

impl From<mysql_async::Error> for Error {
    fn from(e: mysql_async::Error) -> Self {
        match e {
            mysql_async::Error::Io(_) | mysql_async::Error::Url(_) => Error::Connect(e.to_string()),
            _ => Error::Database(e.to_string()),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::LlmTransport(e.to_string())
    }
}
