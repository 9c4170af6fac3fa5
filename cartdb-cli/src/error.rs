use cartdb_db::ExecutionError;
use cartdb_query::{AssemblyError, FilterError};
use thiserror::Error;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Bad flag value or unknown column
    #[error("{0}")]
    Usage(String),

    /// Database could not be opened or read
    #[error("Database error: {0}")]
    Database(String),

    /// The engine failed to run the query
    #[error("{0}")]
    Query(#[from] ExecutionError),

    /// XML parse or import failure
    #[error("Import error: {0}")]
    Import(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Writing results failed
    #[error("Output error: {0}")]
    Output(String),
}

impl CliError {
    pub(crate) fn usage(msg: impl Into<String>) -> Self {
        Self::Usage(msg.into())
    }

    pub(crate) fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub(crate) fn import(msg: impl Into<String>) -> Self {
        Self::Import(msg.into())
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn output(msg: impl Into<String>) -> Self {
        Self::Output(msg.into())
    }

    /// Process exit status: 2 for usage errors, 1 otherwise.
    pub(crate) fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(_) => 2,
            _ => 1,
        }
    }
}

impl From<FilterError> for CliError {
    fn from(e: FilterError) -> Self {
        Self::usage(e.to_string())
    }
}

impl From<AssemblyError> for CliError {
    fn from(e: AssemblyError) -> Self {
        Self::usage(e.to_string())
    }
}
