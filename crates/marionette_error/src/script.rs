//! Script loading and validation errors.

use std::path::PathBuf;

/// Script error kinds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ScriptErrorKind {
    /// No script definition exists in the directory.
    #[display("No script.json or script.toml found in {}", _0.display())]
    MissingScript(PathBuf),

    /// Script file could not be read.
    #[display("Failed to read {}: {}", path.display(), message)]
    Io {
        /// Path that caused the error.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// JSON script could not be parsed.
    #[display("Invalid JSON script: {}", _0)]
    Json(String),

    /// TOML script could not be parsed.
    #[display("Invalid TOML script: {}", _0)]
    Toml(String),
}

/// Script error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Script Error: {} at line {} in {}", kind, line, file)]
pub struct ScriptError {
    /// Error kind
    pub kind: ScriptErrorKind,
    /// Line number where error occurred
    pub line: u32,
    /// File where error occurred
    pub file: &'static str,
}

impl ScriptError {
    /// Create a new ScriptError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ScriptErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

/// Result type for script operations.
pub type ScriptResult<T> = Result<T, ScriptError>;
