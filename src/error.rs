use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Log file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to print report: {0}")]
    Output(#[source] std::io::Error),

    #[error("Malformed timestamp {value:?}, expected YYYY-MM-DD HH:MM:SSUTC")]
    Format { value: String },

    #[error("Log header is missing required column(s): {}", missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("Row at line {line} has no value for column '{column}'")]
    MissingField { line: u64, column: String },

    #[error("Delimiter must be a single ASCII character, got {0:?}")]
    InvalidDelimiter(char),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;

impl ReportError {
    /// Maps an open failure to `NotFound` or `Io` depending on its kind.
    pub fn from_open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            ReportError::NotFound { path }
        } else {
            ReportError::Io { path, source }
        }
    }
}
