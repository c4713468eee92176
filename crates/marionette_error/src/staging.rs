//! Staging pipeline errors.

use crate::PlatformError;

/// Authentication of a scripted identity failed; staging stopped at this actor.
///
/// # Examples
///
/// ```
/// use marionette_error::{PlatformError, PlatformErrorKind, StagingError};
///
/// let cause = PlatformError::new(PlatformErrorKind::Auth("bad secret".to_string()));
/// let err = StagingError::new("van", cause);
/// assert_eq!(err.actor, "van");
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Staging Error: {} failed: {} at line {} in {}", actor, cause, line, file)]
pub struct StagingError {
    /// Script key of the actor that failed (`app` for the narrating identity)
    pub actor: String,
    /// Underlying platform failure
    #[error(source)]
    pub cause: PlatformError,
    /// Line number where error occurred
    pub line: u32,
    /// File where error occurred
    pub file: &'static str,
}

impl StagingError {
    /// Create a new StagingError with automatic location tracking.
    #[track_caller]
    pub fn new(actor: impl Into<String>, cause: PlatformError) -> Self {
        let location = std::panic::Location::caller();
        Self {
            actor: actor.into(),
            cause,
            line: location.line(),
            file: location.file(),
        }
    }
}
