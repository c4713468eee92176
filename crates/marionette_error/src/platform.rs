//! Chat-platform client errors.

/// Platform error kinds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum PlatformErrorKind {
    /// Credentials rejected by the platform.
    #[display("Authentication failed: {}", _0)]
    Auth(String),

    /// A text message could not be sent.
    #[display("Message send failed: {}", _0)]
    Send(String),

    /// A file attachment could not be sent.
    #[display("File send failed: {}", _0)]
    FileSend(String),

    /// A profile photo could not be uploaded.
    #[display("Photo upload failed: {}", _0)]
    Upload(String),

    /// A focus annotation could not be attached to a message.
    #[display("Message focus failed: {}", _0)]
    Focus(String),

    /// Transport-level HTTP failure.
    #[display("HTTP error: {}", _0)]
    Http(String),

    /// Platform responded with a body we could not decode.
    #[display("Unexpected response: {}", _0)]
    Decode(String),

    /// Local asset could not be read.
    #[display("Asset I/O error: {}", _0)]
    Io(String),
}

impl PlatformErrorKind {
    /// Whether a human retry of the same operation may succeed.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Auth(_))
    }
}

/// Platform error with location tracking.
///
/// # Examples
///
/// ```
/// use marionette_error::{PlatformError, PlatformErrorKind};
///
/// let err = PlatformError::new(PlatformErrorKind::Auth("401".to_string()));
/// assert!(!err.is_recoverable());
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Platform Error: {} at line {} in {}", kind, line, file)]
pub struct PlatformError {
    /// Error kind
    pub kind: PlatformErrorKind,
    /// Line number where error occurred
    pub line: u32,
    /// File where error occurred
    pub file: &'static str,
}

impl PlatformError {
    /// Create a new PlatformError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PlatformErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Check if error is recoverable.
    pub fn is_recoverable(&self) -> bool {
        self.kind.is_recoverable()
    }
}

/// Result type for platform operations.
pub type PlatformResult<T> = Result<T, PlatformError>;
