//! Platform that transmits nothing.

use crate::{ChatPlatform, Credentials, Focus, MessagePayload, MessageRef, Session};
use async_trait::async_trait;
use marionette_error::PlatformResult;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

/// Platform that accepts every call and sends nothing.
///
/// Used to rehearse a script: staging, timing and navigation behave as in a
/// live run, but no traffic reaches any space.
#[derive(Debug, Default)]
pub struct DryRunPlatform {
    next_id: AtomicU64,
}

impl DryRunPlatform {
    /// Create a new dry-run platform.
    pub fn new() -> Self {
        Self::default()
    }

    fn message_ref(&self, space_id: &str) -> MessageRef {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        MessageRef::new(format!("dry-run-{}", id), space_id)
    }
}

#[async_trait]
impl ChatPlatform for DryRunPlatform {
    async fn authenticate(&self, credentials: &Credentials) -> PlatformResult<Session> {
        info!(identity = credentials.identifier(), "DryRunPlatform: authenticate()");
        Ok(Session::new(credentials.identifier(), "dry-run"))
    }

    async fn send_message(
        &self,
        session: &Session,
        space_id: &str,
        payload: &MessagePayload,
    ) -> PlatformResult<MessageRef> {
        info!(
            identity = %session.identity(),
            space = space_id,
            text_len = payload.text().len(),
            "DryRunPlatform: send_message()"
        );
        Ok(self.message_ref(space_id))
    }

    async fn send_file(
        &self,
        session: &Session,
        space_id: &str,
        path: &Path,
    ) -> PlatformResult<MessageRef> {
        info!(
            identity = %session.identity(),
            space = space_id,
            path = %path.display(),
            "DryRunPlatform: send_file()"
        );
        Ok(self.message_ref(space_id))
    }

    async fn upload_photo(&self, session: &Session, path: &Path) -> PlatformResult<()> {
        info!(identity = %session.identity(), path = %path.display(), "DryRunPlatform: upload_photo()");
        Ok(())
    }

    async fn add_message_focus(
        &self,
        _session: &Session,
        message: &MessageRef,
        focus: &Focus,
    ) -> PlatformResult<()> {
        info!(message = %message, lens = %focus.lens(), "DryRunPlatform: add_message_focus()");
        Ok(())
    }

    fn platform_name(&self) -> &str {
        "dry-run"
    }
}
