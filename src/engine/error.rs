use thiserror::Error;

use crate::store::StoreError;

/// The closed set of ways a validation call itself can fail. Business
/// conflicts are never errors; they come back as findings in the verdict.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Malformed input, a caller bug. Reported before any storage query.
    #[error("invalid request: {0}")]
    InvalidRequest(&'static str),

    /// The storage port failed; validity is indeterminate. Do not commit.
    #[error("validation unavailable: {0}")]
    Unavailable(#[from] StoreError),

    /// The caller's cancellation token fired. Do not commit.
    #[error("validation cancelled")]
    Cancelled,
}
