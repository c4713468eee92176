//! Top-level error wrapper types.

use crate::{
    ConfigError, ConsoleError, DispatchError, PlatformError, ScriptError, StagingError,
};

/// Every error marionette can surface to the binary.
///
/// # Examples
///
/// ```
/// use marionette_error::{ConfigError, MarionetteError};
///
/// let err: MarionetteError = ConfigError::invalid("log_level", "bad level").into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum MarionetteErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Script load error
    #[from(ScriptError)]
    Script(ScriptError),
    /// Chat platform error
    #[from(PlatformError)]
    Platform(PlatformError),
    /// Staging aborted
    #[from(StagingError)]
    Staging(StagingError),
    /// Line dispatch error
    #[from(DispatchError)]
    Dispatch(DispatchError),
    /// Terminal console error
    #[from(ConsoleError)]
    Console(ConsoleError),
}

/// Marionette error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Marionette Error: {}", _0)]
pub struct MarionetteError(Box<MarionetteErrorKind>);

impl MarionetteError {
    /// Create a new error from a kind.
    pub fn new(kind: MarionetteErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &MarionetteErrorKind {
        &self.0
    }
}

impl<T> From<T> for MarionetteError
where
    T: Into<MarionetteErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for marionette operations.
pub type MarionetteResult<T> = std::result::Result<T, MarionetteError>;
