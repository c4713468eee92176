//! Chat platform abstraction for marionette.
//!
//! The director never talks to the network directly. Staging and dispatch go
//! through [`ChatPlatform`], which has two implementations:
//!
//! - [`WorkspacePlatform`]: the Watson Work REST and GraphQL API
//! - [`DryRunPlatform`]: logs every call, for rehearsing a script offline

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod platform;
pub mod platforms;
mod types;

pub use platform::ChatPlatform;
pub use platforms::{DryRunPlatform, WorkspacePlatform};
pub use types::{MessagePayload, MessageRef, Session};

pub use marionette_core::{Credentials, Focus};
