//! Values exchanged with a chat platform.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// An authenticated identity.
///
/// Owned by the actor directory once staging succeeds; dispatch only borrows it.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Session {
    /// Platform identity (app id)
    identity: String,
    /// Bearer token
    token: String,
}

impl Session {
    /// Create a session from an identity and bearer token.
    pub fn new(identity: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            token: token.into(),
        }
    }
}

/// Reference to a message the platform accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters, derive_more::Display)]
#[display("{}/{}", space_id, id)]
pub struct MessageRef {
    /// Message id
    id: String,
    /// Space the message was posted in
    space_id: String,
}

impl MessageRef {
    /// Create a message reference.
    pub fn new(id: impl Into<String>, space_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            space_id: space_id.into(),
        }
    }
}

/// Styled text message body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct MessagePayload {
    /// Annotation type
    #[serde(rename = "type")]
    kind: String,
    /// Annotation version
    version: String,
    /// Color marker shown beside the message
    color: String,
    /// Message text
    text: String,
}

impl MessagePayload {
    /// A generic annotation with the given color marker.
    pub fn generic(color: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind: "generic".to_string(),
            version: "1".to_string(),
            color: color.into(),
            text: text.into(),
        }
    }
}
