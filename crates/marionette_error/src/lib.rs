//! Error types for marionette.
//!
//! Every error follows the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum names the specific condition
//! - `*Error` struct wraps the kind together with the source location
//! - constructors use `#[track_caller]` so the location is captured automatically
//!
//! # Examples
//!
//! ```
//! use marionette_error::{ConfigError, MarionetteResult};
//!
//! fn load() -> MarionetteResult<()> {
//!     Err(ConfigError::invalid("api_url", "must not be empty"))?
//! }
//!
//! assert!(load().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod console;
mod dispatch;
mod error;
mod platform;
mod script;
mod staging;

pub use config::{ConfigError, ConfigErrorKind, ConfigResult};
pub use console::{ConsoleError, ConsoleErrorKind, ConsoleResult};
pub use dispatch::{DispatchError, DispatchErrorKind, DispatchResult};
pub use error::{MarionetteError, MarionetteErrorKind, MarionetteResult};
pub use platform::{PlatformError, PlatformErrorKind, PlatformResult};
pub use script::{ScriptError, ScriptErrorKind, ScriptResult};
pub use staging::StagingError;
