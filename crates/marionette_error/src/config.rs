//! Configuration and logging setup errors.

/// Configuration error kinds.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum ConfigErrorKind {
    /// A configuration source could not be read or merged.
    #[display("Failed to load configuration: {}", _0)]
    Load(String),

    /// The merged configuration does not deserialize into settings.
    #[display("Failed to parse configuration: {}", _0)]
    Parse(String),

    /// A setting parsed but holds a value playback cannot use.
    #[display("Invalid {}: {}", key, reason)]
    InvalidValue {
        /// Setting name as written in `marionette.toml`
        key: String,
        /// What is wrong with the value
        reason: String,
    },

    /// The log level is not a valid tracing filter directive.
    #[display("Invalid log level '{}': {}", level, reason)]
    LogLevel {
        /// Directive as configured
        level: String,
        /// Parser message
        reason: String,
    },

    /// A tracing subscriber could not be installed.
    #[display("Failed to initialize tracing: {}", _0)]
    Subscriber(String),
}

/// Configuration error with source location.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", kind, line, file)]
pub struct ConfigError {
    /// Error kind
    pub kind: ConfigErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Create a new ConfigError at the current location.
    #[track_caller]
    pub fn new(kind: ConfigErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Reject the value of one setting.
    ///
    /// # Examples
    ///
    /// ```
    /// use marionette_error::ConfigError;
    ///
    /// let err = ConfigError::invalid("api_url", "must not be empty");
    /// assert_eq!(err.key(), Some("api_url"));
    /// assert!(err.to_string().contains("Invalid api_url: must not be empty"));
    /// ```
    #[track_caller]
    pub fn invalid(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(ConfigErrorKind::InvalidValue {
            key: key.into(),
            reason: reason.into(),
        })
    }

    /// The offending setting, when one setting is to blame.
    pub fn key(&self) -> Option<&str> {
        match &self.kind {
            ConfigErrorKind::InvalidValue { key, .. } => Some(key),
            ConfigErrorKind::LogLevel { .. } => Some("log_level"),
            _ => None,
        }
    }
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_level_names_its_setting() {
        let err = ConfigError::new(ConfigErrorKind::LogLevel {
            level: "loud".to_string(),
            reason: "invalid filter directive".to_string(),
        });
        assert_eq!(err.key(), Some("log_level"));
        assert!(err.to_string().contains("Invalid log level 'loud'"));
    }

    #[test]
    fn load_failures_name_no_setting() {
        let err = ConfigError::new(ConfigErrorKind::Load("file not found".to_string()));
        assert_eq!(err.key(), None);
        assert!(err.file.ends_with("config.rs"));
    }
}
