use thiserror::Error;

/// Failures raised by the metrics store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatrixError {
    #[error("instance '{0}' already exists")]
    DuplicateInstance(String),

    #[error("metric '{0}' already exists")]
    DuplicateMetric(String),

    #[error("no matrix registered for root '{0}'")]
    UnknownRoot(String),

    #[error("instance handle {0} does not belong to this matrix")]
    UnknownInstance(usize),

    #[error("metric handle {0} does not belong to this matrix")]
    UnknownMetric(usize),
}
