//! Chat platform trait.

use crate::{Credentials, Focus, MessagePayload, MessageRef, Session};
use async_trait::async_trait;
use marionette_error::PlatformResult;
use std::path::Path;

/// Operations marionette needs from a chat platform.
#[async_trait]
pub trait ChatPlatform: Send + Sync {
    /// Exchange credentials for a session.
    ///
    /// # Errors
    ///
    /// Returns an `Auth` error if the platform rejects the credentials.
    async fn authenticate(&self, credentials: &Credentials) -> PlatformResult<Session>;

    /// Post a styled text message to a space.
    ///
    /// # Errors
    ///
    /// Returns a `Send` error if the platform rejects the message.
    async fn send_message(
        &self,
        session: &Session,
        space_id: &str,
        payload: &MessagePayload,
    ) -> PlatformResult<MessageRef>;

    /// Post a file attachment to a space.
    ///
    /// # Errors
    ///
    /// Returns an `Io` error if the file cannot be read, `FileSend` if the
    /// platform rejects it.
    async fn send_file(
        &self,
        session: &Session,
        space_id: &str,
        path: &Path,
    ) -> PlatformResult<MessageRef>;

    /// Replace the identity's profile photo.
    async fn upload_photo(&self, session: &Session, path: &Path) -> PlatformResult<()>;

    /// Attach a focus annotation to a sent message.
    async fn add_message_focus(
        &self,
        session: &Session,
        message: &MessageRef,
        focus: &Focus,
    ) -> PlatformResult<()>;

    /// Platform name for logs.
    fn platform_name(&self) -> &str;
}
