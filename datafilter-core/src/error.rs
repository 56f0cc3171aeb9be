use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataFilterError {
    #[error("Property {field} does not exist in {record}")]
    UnknownSortField { field: String, record: &'static str },

    #[error("Sort on property {field} not allowed in {record}")]
    ForbiddenSortField { field: String, record: &'static str },

    #[error("Invalid paging input: {0}")]
    InvalidPagingInput(String),

    #[error("Sorting not possible by {path}")]
    UnsupportedSortPath { path: String },

    #[error("Query source unavailable: {0:#}")]
    SourceUnavailable(anyhow::Error),

    #[error("Operation cancelled")]
    Cancelled,
}

impl DataFilterError {
    /// Whether the error describes a bad request rather than an execution
    /// failure. Rejected requests must never be retried.
    pub fn is_rejected_request(&self) -> bool {
        matches!(
            self,
            DataFilterError::UnknownSortField { .. }
                | DataFilterError::ForbiddenSortField { .. }
                | DataFilterError::InvalidPagingInput(_)
        )
    }

    pub fn source_unavailable(err: impl Into<anyhow::Error>) -> Self {
        DataFilterError::SourceUnavailable(err.into())
    }
}

pub type Result<T> = std::result::Result<T, DataFilterError>;
