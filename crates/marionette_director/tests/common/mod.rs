//! Shared fixtures for director tests.

#![allow(dead_code)]

use async_trait::async_trait;
use marionette_director::{Notice, QueueCard, Renderer};
use marionette_error::{PlatformError, PlatformErrorKind, PlatformResult};
use marionette_platform::{ChatPlatform, Credentials, Focus, MessagePayload, MessageRef, Session};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

/// A platform call, as recorded by [`MockPlatform`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Authenticate(String),
    SendMessage {
        identity: String,
        space: String,
        text: String,
    },
    SendFile {
        identity: String,
        space: String,
        path: PathBuf,
    },
    UploadPhoto(String),
    Focus {
        identity: String,
        message: String,
    },
}

/// Mock platform recording every call.
#[derive(Default)]
pub struct MockPlatform {
    calls: Mutex<Vec<Call>>,
    next_id: AtomicU64,
    reject: Option<String>,
    send_failures: AtomicUsize,
    send_delay: Duration,
    gate: Option<Arc<Notify>>,
    fail_focus: bool,
    fail_photos: bool,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject authentication for one identity.
    pub fn rejecting(mut self, identity: &str) -> Self {
        self.reject = Some(identity.to_string());
        self
    }

    /// Fail the next `count` sends.
    pub fn failing_sends(self, count: usize) -> Self {
        self.send_failures.store(count, Ordering::SeqCst);
        self
    }

    /// Take this long to complete each send.
    pub fn with_send_delay(mut self, delay: Duration) -> Self {
        self.send_delay = delay;
        self
    }

    /// Hold each send until the gate is notified.
    pub fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn with_focus_failure(mut self) -> Self {
        self.fail_focus = true;
        self
    }

    pub fn with_photo_failure(mut self) -> Self {
        self.fail_photos = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn authenticated(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Authenticate(identity) => Some(identity),
                _ => None,
            })
            .collect()
    }

    pub fn sent_texts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::SendMessage { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().expect("calls lock").push(call);
    }

    async fn before_send(&self) -> PlatformResult<()> {
        if !self.send_delay.is_zero() {
            tokio::time::sleep(self.send_delay).await;
        }
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        let failing = self
            .send_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(PlatformError::new(PlatformErrorKind::Send(
                "mock send failure".to_string(),
            )));
        }
        Ok(())
    }

    fn message_ref(&self, space_id: &str) -> MessageRef {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        MessageRef::new(format!("msg-{}", id), space_id)
    }
}

#[async_trait]
impl ChatPlatform for MockPlatform {
    async fn authenticate(&self, credentials: &Credentials) -> PlatformResult<Session> {
        let identity = credentials.identifier().to_string();
        self.record(Call::Authenticate(identity.clone()));
        if self.reject.as_deref() == Some(identity.as_str()) {
            return Err(PlatformError::new(PlatformErrorKind::Auth(
                "invalid client secret".to_string(),
            )));
        }
        Ok(Session::new(&identity, format!("token-{}", identity)))
    }

    async fn send_message(
        &self,
        session: &Session,
        space_id: &str,
        payload: &MessagePayload,
    ) -> PlatformResult<MessageRef> {
        self.before_send().await?;
        self.record(Call::SendMessage {
            identity: session.identity().clone(),
            space: space_id.to_string(),
            text: payload.text().clone(),
        });
        Ok(self.message_ref(space_id))
    }

    async fn send_file(
        &self,
        session: &Session,
        space_id: &str,
        path: &Path,
    ) -> PlatformResult<MessageRef> {
        self.before_send().await?;
        self.record(Call::SendFile {
            identity: session.identity().clone(),
            space: space_id.to_string(),
            path: path.to_path_buf(),
        });
        Ok(self.message_ref(space_id))
    }

    async fn upload_photo(&self, session: &Session, _path: &Path) -> PlatformResult<()> {
        self.record(Call::UploadPhoto(session.identity().clone()));
        if self.fail_photos {
            return Err(PlatformError::new(PlatformErrorKind::Upload(
                "mock upload failure".to_string(),
            )));
        }
        Ok(())
    }

    async fn add_message_focus(
        &self,
        session: &Session,
        message: &MessageRef,
        _focus: &Focus,
    ) -> PlatformResult<()> {
        self.record(Call::Focus {
            identity: session.identity().clone(),
            message: message.id().clone(),
        });
        if self.fail_focus {
            return Err(PlatformError::new(PlatformErrorKind::Focus(
                "mock focus failure".to_string(),
            )));
        }
        Ok(())
    }

    fn platform_name(&self) -> &str {
        "mock"
    }
}

/// Renderer collecting output lines for assertions.
#[derive(Clone, Default)]
pub struct RecordingRenderer {
    lines: Arc<Mutex<Vec<String>>>,
}

impl RecordingRenderer {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().expect("renderer lock").clone()
    }
}

impl Renderer for RecordingRenderer {
    fn queue_card(&mut self, card: &QueueCard) {
        self.lines.lock().expect("renderer lock").push(card.to_string());
    }

    fn notice(&mut self, notice: &Notice) {
        self.lines.lock().expect("renderer lock").push(notice.to_string());
    }
}

/// Let every ready task run; with a paused clock, pending timers fire only
/// once nothing else can make progress.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}
