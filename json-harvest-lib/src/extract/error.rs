use crate::matrix::MatrixError;
use thiserror::Error;

/// Failures that abort an extraction pass.
///
/// Whatever was written to the sink before the failure stays there.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// A nested field is missing or is not an array of objects
    #[error("could not decode nested collection '{field}': {source}")]
    NestedDecode { field: String, source: serde_json::Error },

    /// A metric field is missing or is not a 64-bit integer
    #[error("could not decode metric '{field}': {source}")]
    Decode { field: String, source: serde_json::Error },

    /// A key-less leaf was reached but the fixed instance was never created
    #[error("missing instance '{0}'")]
    MissingInstance(String),

    /// A metric element has no descriptor registered in the sink
    #[error("missing metric '{0}'")]
    MissingMetric(String),

    #[error(transparent)]
    Matrix(#[from] MatrixError),
}
