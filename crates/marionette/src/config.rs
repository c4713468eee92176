//! Playback configuration.
//!
//! Sources, later ones winning:
//! - Bundled defaults (include_str! from marionette.toml)
//! - ~/.config/marionette/marionette.toml
//! - ./marionette.toml
//! - An explicit `--config` file
//! - `MARIONETTE_*` environment variables

use config::{Config, Environment, File, FileFormat};
use derive_getters::Getters;
use marionette_director::{PlaybackOptions, PlaybackOptionsBuilder};
use marionette_error::{ConfigError, ConfigErrorKind, MarionetteResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../../../marionette.toml");

/// Settings for a playback session.
///
/// # Example
///
/// ```toml
/// api_url = "https://api.watsonwork.ibm.com"
/// message_color = "#FFFFFF"
/// upload_photos = true
/// request_timeout_secs = 30
/// log_level = "info"
/// log_json = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Getters)]
pub struct PlaybackConfig {
    /// Chat platform base URL
    api_url: String,
    /// Color marker on every text message
    message_color: String,
    /// Upload profile photos once staging succeeds
    upload_photos: bool,
    /// Per-request timeout in seconds
    request_timeout_secs: u64,
    /// Log filter used when `RUST_LOG` is unset
    log_level: String,
    /// Emit JSON logs
    log_json: bool,
}

impl PlaybackConfig {
    /// Load configuration with the standard precedence.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if a source cannot be read or a value fails to
    /// parse or validate.
    #[instrument]
    pub fn load(explicit: Option<&Path>) -> MarionetteResult<Self> {
        debug!("Loading configuration with precedence: env > explicit > current dir > home dir > bundled defaults");
        let home = dirs::home_dir().map(|home| home.join(".config/marionette/marionette.toml"));
        Self::layered(
            home,
            PathBuf::from("marionette.toml"),
            explicit,
            Some(Environment::with_prefix("MARIONETTE").try_parsing(true)),
        )
    }

    /// Bundled defaults only.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the bundled file is malformed.
    pub fn defaults() -> MarionetteResult<Self> {
        Self::build(Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml)))
    }

    fn layered(
        home: Option<PathBuf>,
        local: PathBuf,
        explicit: Option<&Path>,
        environment: Option<Environment>,
    ) -> MarionetteResult<Self> {
        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = home {
            builder = builder.add_source(File::from(home).required(false));
        }
        builder = builder.add_source(File::from(local).required(false));

        if let Some(path) = explicit {
            debug!(path = %path.display(), "Using explicit configuration file");
            builder = builder.add_source(File::from(path).required(true));
        }
        if let Some(environment) = environment {
            builder = builder.add_source(environment);
        }

        Self::build(builder)
    }

    fn build(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> MarionetteResult<Self> {
        let config: Self = builder
            .build()
            .map_err(|e| ConfigError::new(ConfigErrorKind::Load(e.to_string())))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(ConfigErrorKind::Parse(e.to_string())))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.api_url.trim().is_empty() {
            return Err(ConfigError::invalid("api_url", "must not be empty"));
        }
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(ConfigError::invalid(
                "api_url",
                format!("must be an http(s) URL, got {}", self.api_url),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::invalid("request_timeout_secs", "must be positive"));
        }
        Ok(())
    }

    /// Per-request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Options handed to the playback driver.
    pub fn playback_options(&self) -> MarionetteResult<PlaybackOptions> {
        PlaybackOptionsBuilder::default()
            .color(self.message_color.clone())
            .upload_photos(self.upload_photos)
            .build()
            .map_err(|e| ConfigError::new(ConfigErrorKind::Parse(format!("playback options: {}", e))).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn bundled_defaults() {
        let config = PlaybackConfig::defaults().expect("bundled defaults parse");
        assert_eq!(config.api_url(), "https://api.watsonwork.ibm.com");
        assert_eq!(config.message_color(), "#FFFFFF");
        assert!(*config.upload_photos());
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(!*config.log_json());
    }

    #[test]
    fn later_files_win() {
        let dir = tempfile::tempdir().expect("tempdir");
        let home = dir.path().join("home.toml");
        let local = dir.path().join("local.toml");
        fs::write(&home, "message_color = \"#00FF00\"\nlog_level = \"debug\"\n").expect("write");
        fs::write(&local, "message_color = \"#0000FF\"\n").expect("write");

        let config = PlaybackConfig::layered(Some(home), local, None, None).expect("loads");
        assert_eq!(config.message_color(), "#0000FF");
        assert_eq!(config.log_level(), "debug");
        assert_eq!(config.api_url(), "https://api.watsonwork.ibm.com");
    }

    #[test]
    fn explicit_file_overrides_local() {
        let dir = tempfile::tempdir().expect("tempdir");
        let local = dir.path().join("local.toml");
        let explicit = dir.path().join("show.toml");
        fs::write(&local, "upload_photos = true\n").expect("write");
        fs::write(&explicit, "upload_photos = false\n").expect("write");

        let config =
            PlaybackConfig::layered(None, local, Some(&explicit), None).expect("loads");
        assert!(!*config.upload_photos());
        assert!(!*config.playback_options().expect("options").upload_photos());
    }

    #[test]
    fn missing_optional_files_are_fine() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = PlaybackConfig::layered(
            Some(dir.path().join("absent-home.toml")),
            dir.path().join("absent.toml"),
            None,
            None,
        )
        .expect("defaults apply");
        assert_eq!(config, PlaybackConfig::defaults().expect("defaults"));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("nope.toml");
        let result = PlaybackConfig::layered(None, dir.path().join("absent.toml"), Some(&missing), None);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_non_http_url() {
        let dir = tempfile::tempdir().expect("tempdir");
        let local = dir.path().join("local.toml");
        fs::write(&local, "api_url = \"ftp://example.com\"\n").expect("write");
        let err = PlaybackConfig::layered(None, local, None, None).expect_err("invalid url");
        assert!(err.to_string().contains("api_url"));
    }

    #[test]
    fn rejected_values_name_their_setting() {
        let mut config = PlaybackConfig::defaults().expect("bundled defaults parse");
        config.api_url = "  ".to_string();
        let err = config.validate().expect_err("blank url");
        assert_eq!(err.key(), Some("api_url"));

        let mut config = PlaybackConfig::defaults().expect("bundled defaults parse");
        config.request_timeout_secs = 0;
        let err = config.validate().expect_err("zero timeout");
        assert_eq!(err.key(), Some("request_timeout_secs"));
        assert!(matches!(err.kind, ConfigErrorKind::InvalidValue { .. }));
    }

    #[test]
    fn color_flows_into_playback_options() {
        let dir = tempfile::tempdir().expect("tempdir");
        let local = dir.path().join("local.toml");
        fs::write(&local, "message_color = \"#123456\"\n").expect("write");
        let config = PlaybackConfig::layered(None, local, None, None).expect("loads");
        let options = config.playback_options().expect("options");
        assert_eq!(options.color(), "#123456");
    }
}
