use sea_orm::DbErr;

/// Failures surfaced by the pull and export operations.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(#[from] DbErr),

    #[error("Failed to fetch performance metrics: {0}")]
    FetchFailure(String),

    #[error("{0}")]
    IngestFailure(String),

    #[error("No records found for device {0}")]
    NotFound(String),
}

impl MetricsError {
    /// Classifies a database error raised while writing a batch. Lost
    /// connections stay `StorageUnavailable`; anything else fails the ingest.
    pub fn from_ingest(err: DbErr) -> Self {
        match err {
            DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => MetricsError::StorageUnavailable(err),
            other => MetricsError::IngestFailure(other.to_string()),
        }
    }
}
