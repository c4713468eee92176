//! Actor descriptors and credentials.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// How an identity proves itself to the chat platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// App id and secret exchanged for a session token.
    ClientSecret {
        /// App identifier
        id: String,
        /// App secret
        secret: String,
    },
    /// A bearer token that is already a session.
    Token(String),
}

impl Credentials {
    /// Identifier used in logs. Never includes secret material.
    pub fn identifier(&self) -> &str {
        match self {
            Self::ClientSecret { id, .. } => id,
            Self::Token(_) => "token",
        }
    }
}

/// A scripted identity: credentials, display name and optional photo.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters, Serialize, Deserialize, derive_builder::Builder)]
#[builder(default, setter(into))]
pub struct Actor {
    /// Platform app id
    #[serde(default)]
    #[builder(setter(into, strip_option))]
    id: Option<String>,
    /// Platform app secret
    #[serde(default, skip_serializing)]
    #[builder(setter(into, strip_option))]
    secret: Option<String>,
    /// Bearer token, used instead of id and secret
    #[serde(default, skip_serializing)]
    #[builder(setter(into, strip_option))]
    token: Option<String>,
    /// Display name substituted for `{{key}}` tokens
    #[serde(default)]
    #[builder(setter(into, strip_option))]
    name: Option<String>,
    /// Photo asset, relative to the script directory
    #[serde(default)]
    #[builder(setter(into, strip_option))]
    photo: Option<String>,
}

impl Actor {
    /// Credentials for staging, if the actor carries any.
    ///
    /// An id/secret pair wins over a token. Actors with neither speak through
    /// the app identity.
    pub fn credentials(&self) -> Option<Credentials> {
        match (&self.id, &self.secret, &self.token) {
            (Some(id), Some(secret), _) if !id.is_empty() && !secret.is_empty() => {
                Some(Credentials::ClientSecret {
                    id: id.clone(),
                    secret: secret.clone(),
                })
            }
            (_, _, Some(token)) if !token.is_empty() => Some(Credentials::Token(token.clone())),
            _ => None,
        }
    }

    /// Display name, falling back to the given default.
    pub fn display_name<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.name.as_deref().unwrap_or(fallback)
    }
}
