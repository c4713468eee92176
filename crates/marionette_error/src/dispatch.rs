//! Per-line dispatch errors.

use crate::PlatformError;

/// Dispatch error kinds.
#[derive(Debug, Clone, derive_more::Display)]
pub enum DispatchErrorKind {
    /// The line has neither text nor a filename.
    #[display("Line {} has neither text nor filename", _0)]
    EmptyLine(usize),

    /// The line's space key is not in the script's space mapping.
    #[display("Unknown space: {}", _0)]
    UnknownSpace(String),

    /// No authenticated session exists for the speaking identity.
    #[display("No authenticated session for {}", _0)]
    Unauthenticated(String),

    /// The platform rejected the send.
    #[display("{}", _0)]
    Platform(PlatformError),
}

/// Dispatch error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Dispatch Error: {} at line {} in {}", kind, line, file)]
pub struct DispatchError {
    /// Error kind
    pub kind: DispatchErrorKind,
    /// Line number where error occurred
    pub line: u32,
    /// File where error occurred
    pub file: &'static str,
}

impl DispatchError {
    /// Create a new DispatchError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: DispatchErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Script authoring mistakes, as opposed to transient platform failures.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self.kind,
            DispatchErrorKind::EmptyLine(_) | DispatchErrorKind::UnknownSpace(_)
        )
    }
}

impl From<PlatformError> for DispatchError {
    #[track_caller]
    fn from(e: PlatformError) -> Self {
        Self::new(DispatchErrorKind::Platform(e))
    }
}

/// Result type for dispatch operations.
pub type DispatchResult<T> = Result<T, DispatchError>;
