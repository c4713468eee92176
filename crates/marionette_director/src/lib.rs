//! Playback sequencer for marionette.
//!
//! The director stages every scripted identity, then walks the script one
//! line at a time. Lines advance on a manual trigger or, for auto lines, on a
//! timer computed from the text's reading time.
//!
//! # Architecture
//!
//! - **Actor directory**: roster of identities and their sessions
//! - **Stager**: authenticates identities in declaration order, fail-fast
//! - **Dispatcher**: sends one line through the speaking identity
//! - **Sequencer**: pure state machine owning the cursor
//! - **Playback**: async driver feeding triggers to the sequencer and carrying
//!   out its effects (timers, dispatches, rendering)
//!
//! # Example
//!
//! ```no_run
//! use marionette_core::Script;
//! use marionette_director::{Command, Playback, PlaybackOptions, PlainRenderer};
//! use marionette_platform::DryRunPlatform;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let script = Script::from_dir("demo")?;
//! let playback = Playback::new(
//!     script,
//!     Arc::new(DryRunPlatform::new()),
//!     PlaybackOptions::default(),
//!     Box::new(PlainRenderer::stdout()),
//! );
//! let handle = playback.handle();
//! handle.send(Command::BeginStaging);
//! let report = playback.run().await?;
//! println!("stopped at line {}", report.cursor());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod directory;
mod dispatch;
mod playback;
mod queue_card;
mod sequencer;
mod staging;

pub use directory::{ActorDirectory, RosterEntry};
pub use dispatch::{Dispatched, Dispatcher};
pub use playback::{
    Command, Playback, PlaybackHandle, PlaybackOptions, PlaybackOptionsBuilder, PlaybackReport,
    PlaybackStatus,
};
pub use queue_card::{CardBody, Notice, PlainRenderer, QueueCard, Renderer};
pub use sequencer::{Cue, Effect, Sequencer, SequencerState, Trigger};
pub use staging::{Stager, StagingReport};
