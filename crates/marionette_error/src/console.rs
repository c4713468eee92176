//! Director console (terminal) error types.

/// Console error kind variants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ConsoleErrorKind {
    /// Failed to put the terminal into raw mode
    #[display("Failed to set up terminal: {}", _0)]
    TerminalSetup(String),
    /// Failed to restore the terminal to its original state
    #[display("Failed to restore terminal: {}", _0)]
    TerminalRestore(String),
    /// Failed to poll for terminal events
    #[display("Failed to poll for events: {}", _0)]
    EventPoll(String),
    /// Failed to read a terminal event
    #[display("Failed to read event: {}", _0)]
    EventRead(String),
    /// Failed to write console output
    #[display("Failed to render: {}", _0)]
    Rendering(String),
}

/// Console error with source location tracking.
///
/// # Examples
///
/// ```
/// use marionette_error::{ConsoleError, ConsoleErrorKind};
///
/// let err = ConsoleError::new(ConsoleErrorKind::TerminalSetup("Raw mode failed".to_string()));
/// assert!(format!("{}", err).contains("terminal"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Console Error: {} at line {} in {}", kind, line, file)]
pub struct ConsoleError {
    /// Error kind
    pub kind: ConsoleErrorKind,
    /// Line number where error occurred
    pub line: u32,
    /// File where error occurred
    pub file: &'static str,
}

impl ConsoleError {
    /// Create a new ConsoleError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ConsoleErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

/// Result type for console operations.
pub type ConsoleResult<T> = Result<T, ConsoleError>;
