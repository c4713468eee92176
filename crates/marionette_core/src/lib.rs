//! Script data model for marionette.
//!
//! A script is a directory holding `script.json` (or `script.toml`) plus the
//! assets it references. It declares the narrating app identity, a cast of
//! actors, a mapping of space keys to platform space ids, and the ordered
//! lines the director plays back.
//!
//! # Example
//!
//! ```no_run
//! use marionette_core::{Script, estimate};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let script = Script::from_dir("demo")?;
//! for line in script.lines() {
//!     println!("{:?}", estimate(line));
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod actor;
mod cast;
mod delay;
mod line;
mod script;

pub use actor::{Actor, ActorBuilder, Credentials};
pub use cast::Cast;
pub use delay::{READING_WORDS_PER_MINUTE, estimate, word_count};
pub use line::{Focus, FocusBuilder, Line, LineBuilder, LineText, Payload};
pub use script::{APP_KEY, Script, ScriptWarning};
