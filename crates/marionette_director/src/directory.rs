//! Roster of scripted identities and their sessions.

use derive_getters::Getters;
use marionette_core::{APP_KEY, Actor, Credentials, Script};
use marionette_error::{DispatchError, DispatchErrorKind, DispatchResult};
use marionette_platform::Session;
use std::collections::HashMap;
use std::path::PathBuf;

/// One identity in the roster.
#[derive(Debug, Clone, Getters)]
pub struct RosterEntry {
    /// Script key (`app` for the narrating identity)
    key: String,
    /// Display name
    name: String,
    /// Credentials, if the identity authenticates on its own
    credentials: Option<Credentials>,
    /// Photo asset, resolved against the script directory
    photo: Option<PathBuf>,
    /// Session attached by staging
    session: Option<Session>,
}

impl RosterEntry {
    fn from_actor(key: &str, fallback_name: &str, actor: &Actor, script: &Script) -> Self {
        Self {
            key: key.to_string(),
            name: actor.display_name(fallback_name).to_string(),
            credentials: actor.credentials(),
            photo: actor.photo().as_deref().map(|photo| script.asset_path(photo)),
            session: None,
        }
    }
}

/// Roster of identities, built once from the script.
///
/// Only staging attaches sessions; playback reads them.
#[derive(Debug, Clone)]
pub struct ActorDirectory {
    app: RosterEntry,
    actors: Vec<RosterEntry>,
    spaces: HashMap<String, String>,
}

impl ActorDirectory {
    /// One entry per declared actor, in declaration order, with no sessions.
    pub fn build(script: &Script) -> Self {
        Self {
            app: RosterEntry::from_actor(APP_KEY, "App", script.app(), script),
            actors: script
                .actors()
                .iter()
                .map(|(key, actor)| RosterEntry::from_actor(key, key, actor, script))
                .collect(),
            spaces: script.spaces().clone(),
        }
    }

    /// The narrating app identity.
    pub fn app(&self) -> &RosterEntry {
        &self.app
    }

    /// Actors in declaration order.
    pub fn actors(&self) -> &[RosterEntry] {
        &self.actors
    }

    /// Look up an entry by key; `app` names the narrating identity.
    pub fn entry(&self, key: &str) -> Option<&RosterEntry> {
        if key == APP_KEY {
            return Some(&self.app);
        }
        self.actors.iter().find(|entry| entry.key == key)
    }

    /// Session of a staged identity.
    pub fn authenticated_session_for(&self, key: &str) -> Option<&Session> {
        self.entry(key).and_then(|entry| entry.session.as_ref())
    }

    /// Identity that speaks a line: the actor's session when the actor is
    /// staged, otherwise the app's.
    ///
    /// # Errors
    ///
    /// Returns `Unauthenticated` when neither session exists.
    pub fn speaker(&self, actor: Option<&str>) -> DispatchResult<(&str, &Session)> {
        if let Some(key) = actor
            && let Some(entry) = self.entry(key)
            && let Some(session) = entry.session.as_ref()
        {
            return Ok((entry.key.as_str(), session));
        }
        self.app
            .session
            .as_ref()
            .map(|session| (APP_KEY, session))
            .ok_or_else(|| {
                DispatchError::new(DispatchErrorKind::Unauthenticated(
                    actor.unwrap_or(APP_KEY).to_string(),
                ))
            })
    }

    /// Platform id of a space key.
    ///
    /// # Errors
    ///
    /// Returns `UnknownSpace` if the key is not in the script's space mapping.
    pub fn resolve_space(&self, key: &str) -> DispatchResult<&str> {
        self.spaces
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| DispatchError::new(DispatchErrorKind::UnknownSpace(key.to_string())))
    }

    /// Entries in staging order: the app first, then actors as declared.
    pub(crate) fn staging_order(&self) -> impl Iterator<Item = &RosterEntry> {
        std::iter::once(&self.app).chain(self.actors.iter())
    }

    pub(crate) fn attach_session(&mut self, key: &str, session: Session) {
        let entry = if key == APP_KEY {
            Some(&mut self.app)
        } else {
            self.actors.iter_mut().find(|entry| entry.key == key)
        };
        if let Some(entry) = entry {
            entry.session = Some(session);
        }
    }
}
