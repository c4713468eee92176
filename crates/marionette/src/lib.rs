//! Marionette - scripted chat playback.
//!
//! Marionette plays a prepared conversation into live chat spaces, one line at
//! a time, posting each line as the identity that speaks it. The director
//! steers playback from the terminal: send, skip, go back, or stop.
//!
//! This crate holds the pieces of the binary that are worth testing on their
//! own:
//!
//! - [`PlaybackConfig`]: layered configuration
//! - [`console`]: keypress mapping and colored rendering
//! - [`init_observability`]: tracing setup

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
pub mod console;
mod observability;

pub use config::PlaybackConfig;
pub use observability::{ObservabilityConfig, init_observability};

pub use marionette_core::Script;
pub use marionette_director::{Command, Playback, PlaybackOptions, PlaybackReport};
pub use marionette_error::{MarionetteError, MarionetteResult};
