//! Sending one line through the speaking identity.

use crate::ActorDirectory;
use marionette_core::{APP_KEY, Line, Payload};
use marionette_error::{DispatchError, DispatchErrorKind, DispatchResult};
use marionette_platform::{ChatPlatform, MessagePayload, MessageRef};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Space key reported when a line names no space.
const NO_SPACE: &str = "<none>";

/// What a dispatch did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatched {
    /// Comment line; nothing was transmitted.
    Suppressed,
    /// Text message sent.
    Message(MessageRef),
    /// File attachment sent.
    File(MessageRef),
}

/// Sends lines on behalf of the sequencer.
pub struct Dispatcher {
    platform: Arc<dyn ChatPlatform>,
    color: String,
    assets: PathBuf,
}

impl Dispatcher {
    /// Create a dispatcher; `assets` is the directory file lines resolve against.
    pub fn new(
        platform: Arc<dyn ChatPlatform>,
        color: impl Into<String>,
        assets: impl Into<PathBuf>,
    ) -> Self {
        Self {
            platform,
            color: color.into(),
            assets: assets.into(),
        }
    }

    /// Transmit the line at `index`.
    ///
    /// Comment lines succeed without any platform call. A focus annotation is
    /// attached through the app's session after a successful text send; file
    /// sends never carry one. A focus failure is logged and does not fail the
    /// line.
    ///
    /// # Errors
    ///
    /// - `EmptyLine` if the line has neither text nor filename
    /// - `Unauthenticated` if neither the actor nor the app has a session
    /// - `UnknownSpace` if the space key is unmapped
    /// - `Platform` if the send itself fails
    #[instrument(skip(self, line, directory), fields(actor = line.actor().as_deref().unwrap_or(APP_KEY)))]
    pub async fn dispatch(
        &self,
        index: usize,
        line: &Line,
        directory: &ActorDirectory,
    ) -> DispatchResult<Dispatched> {
        let payload = line
            .payload()
            .ok_or_else(|| DispatchError::new(DispatchErrorKind::EmptyLine(index)))?;

        if *line.comment() {
            debug!(line = index, "Comment line, not sent");
            return Ok(Dispatched::Suppressed);
        }

        let (speaker, session) = directory.speaker(line.actor().as_deref())?;
        let space_id = directory.resolve_space(line.space().as_deref().unwrap_or(NO_SPACE))?;

        let dispatched = match payload {
            Payload::Text(text) => {
                let body = MessagePayload::generic(&self.color, text.joined());
                let message = self.platform.send_message(session, space_id, &body).await?;
                info!(line = index, speaker, message = %message, "Message sent");
                Dispatched::Message(message)
            }
            Payload::File(filename) => {
                let path = self.assets.join(filename);
                let message = self.platform.send_file(session, space_id, &path).await?;
                info!(line = index, speaker, file = filename, message = %message, "File sent");
                Dispatched::File(message)
            }
        };

        if let (Some(focus), Dispatched::Message(message)) = (line.focus(), &dispatched) {
            match directory.authenticated_session_for(APP_KEY) {
                Some(app) => {
                    if let Err(e) = self.platform.add_message_focus(app, message, focus).await {
                        warn!(line = index, error = %e, "Focus annotation failed");
                    }
                }
                None => warn!(line = index, "No app session, focus annotation skipped"),
            }
        }

        Ok(dispatched)
    }
}
