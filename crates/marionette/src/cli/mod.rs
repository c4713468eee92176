//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the marionette binary.

mod commands;
mod play;
mod script;

pub use commands::{Cli, Commands};
pub use play::play;
pub use script::{check_script, print_transcript};
