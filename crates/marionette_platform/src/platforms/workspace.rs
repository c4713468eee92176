//! Watson Work platform client.

use crate::{ChatPlatform, Credentials, Focus, MessagePayload, MessageRef, Session};
use async_trait::async_trait;
use marionette_error::{PlatformError, PlatformErrorKind, PlatformResult};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::{Value as JsonValue, json};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, error, instrument};

/// Default API endpoint.
pub const WORKSPACE_API_URL: &str = "https://api.watsonwork.ibm.com";

const ADD_MESSAGE_FOCUS: &str = "mutation AddMessageFocus($input: AddFocusInput!) { \
     addMessageFocus(input: $input) { message { id } } }";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreatedResponse {
    id: String,
}

/// Watson Work REST/GraphQL client.
#[derive(Debug, Clone)]
pub struct WorkspacePlatform {
    client: Client,
    base_url: String,
}

impl WorkspacePlatform {
    /// Create a client against the given API base URL.
    ///
    /// # Errors
    ///
    /// Returns an `Http` error if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> PlatformResult<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            PlatformError::new(PlatformErrorKind::Http(format!(
                "Failed to build HTTP client: {}",
                e
            )))
        })?;
        debug!(base_url = %base_url, "Created Watson Work client");
        Ok(Self { client, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn file_form(path: &Path) -> PlatformResult<Form> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            PlatformError::new(PlatformErrorKind::Io(format!(
                "{}: {}",
                path.display(),
                e
            )))
        })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Form::new().part("file", Part::bytes(bytes).file_name(file_name)))
    }
}

/// Request body for posting a generic annotation as an app message.
pub fn message_body(payload: &MessagePayload) -> JsonValue {
    json!({
        "type": "appMessage",
        "version": "1.0",
        "annotations": [payload],
    })
}

/// GraphQL request body attaching a focus to a message.
pub fn focus_body(message: &MessageRef, focus: &Focus) -> JsonValue {
    json!({
        "query": ADD_MESSAGE_FOCUS,
        "variables": {
            "input": {
                "messageId": message.id(),
                "messageFocus": {
                    "phrase": focus.phrase(),
                    "lens": focus.lens(),
                    "category": focus.category(),
                    "actions": focus.actions(),
                    "confidence": 0.99,
                    "version": 1,
                    "hidden": false,
                }
            }
        }
    })
}

fn http_error(e: reqwest::Error) -> PlatformError {
    error!(error = ?e, "Request to Watson Work failed");
    PlatformError::new(PlatformErrorKind::Http(e.to_string()))
}

/// Turn a non-success status into the given error kind, carrying the body.
async fn check(
    response: Response,
    kind: fn(String) -> PlatformErrorKind,
) -> PlatformResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    error!(status = %status, body = %body, "Watson Work returned error");
    Err(PlatformError::new(kind(format!("{}: {}", status, body))))
}

async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> PlatformResult<T> {
    response.json::<T>().await.map_err(|e| {
        PlatformError::new(PlatformErrorKind::Decode(format!(
            "Failed to parse response: {}",
            e
        )))
    })
}

#[async_trait]
impl ChatPlatform for WorkspacePlatform {
    #[instrument(skip(self, credentials), fields(identity = credentials.identifier()))]
    async fn authenticate(&self, credentials: &Credentials) -> PlatformResult<Session> {
        let (id, secret) = match credentials {
            Credentials::Token(token) => return Ok(Session::new("token", token.clone())),
            Credentials::ClientSecret { id, secret } => (id, secret),
        };

        debug!("Requesting OAuth token");
        let response = self
            .client
            .post(self.url("/oauth/token"))
            .basic_auth(id, Some(secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(http_error)?;

        if matches!(response.status(), StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Err(PlatformError::new(PlatformErrorKind::Auth(format!(
                "credentials for {} rejected ({})",
                id,
                response.status()
            ))));
        }
        let token: TokenResponse = decode(check(response, PlatformErrorKind::Auth).await?).await?;
        Ok(Session::new(
            token.id.unwrap_or_else(|| id.clone()),
            token.access_token,
        ))
    }

    #[instrument(skip(self, session, payload), fields(identity = %session.identity()))]
    async fn send_message(
        &self,
        session: &Session,
        space_id: &str,
        payload: &MessagePayload,
    ) -> PlatformResult<MessageRef> {
        let response = self
            .client
            .post(self.url(&format!("/v1/spaces/{}/messages", space_id)))
            .bearer_auth(session.token())
            .json(&message_body(payload))
            .send()
            .await
            .map_err(http_error)?;

        let created: CreatedResponse = decode(check(response, PlatformErrorKind::Send).await?).await?;
        debug!(message_id = %created.id, "Message sent");
        Ok(MessageRef::new(created.id, space_id))
    }

    #[instrument(skip(self, session), fields(identity = %session.identity(), path = %path.display()))]
    async fn send_file(
        &self,
        session: &Session,
        space_id: &str,
        path: &Path,
    ) -> PlatformResult<MessageRef> {
        let form = Self::file_form(path).await?;
        let response = self
            .client
            .post(self.url(&format!("/v1/spaces/{}/files", space_id)))
            .bearer_auth(session.token())
            .multipart(form)
            .send()
            .await
            .map_err(http_error)?;

        let created: CreatedResponse =
            decode(check(response, PlatformErrorKind::FileSend).await?).await?;
        debug!(message_id = %created.id, "File sent");
        Ok(MessageRef::new(created.id, space_id))
    }

    #[instrument(skip(self, session), fields(identity = %session.identity(), path = %path.display()))]
    async fn upload_photo(&self, session: &Session, path: &Path) -> PlatformResult<()> {
        let form = Self::file_form(path).await?;
        let response = self
            .client
            .post(self.url("/photos"))
            .bearer_auth(session.token())
            .multipart(form)
            .send()
            .await
            .map_err(http_error)?;

        check(response, PlatformErrorKind::Upload).await?;
        Ok(())
    }

    #[instrument(skip(self, session, focus), fields(message = %message))]
    async fn add_message_focus(
        &self,
        session: &Session,
        message: &MessageRef,
        focus: &Focus,
    ) -> PlatformResult<()> {
        let response = self
            .client
            .post(self.url("/graphql"))
            .bearer_auth(session.token())
            .header("x-graphql-view", "PUBLIC, BETA")
            .json(&focus_body(message, focus))
            .send()
            .await
            .map_err(http_error)?;

        let body: JsonValue = decode(check(response, PlatformErrorKind::Focus).await?).await?;
        if let Some(errors) = body.get("errors") {
            return Err(PlatformError::new(PlatformErrorKind::Focus(errors.to_string())));
        }
        Ok(())
    }

    fn platform_name(&self) -> &str {
        "watson-work"
    }
}
