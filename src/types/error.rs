use thiserror::Error;

/// salesboard error types
#[derive(Error, Debug)]
pub enum SalesboardError {
    /// Failed to parse a dataset or config file
    #[error("parse error: {0}")]
    Parse(String),

    /// File I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),

    /// Writing a spreadsheet export failed
    #[error("export error: {0}")]
    Export(String),
}

impl From<csv::Error> for SalesboardError {
    fn from(err: csv::Error) -> Self {
        Self::Export(err.to_string())
    }
}

/// Result type alias for salesboard
pub type Result<T> = std::result::Result<T, SalesboardError>;
