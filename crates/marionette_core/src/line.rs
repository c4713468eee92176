//! Script lines.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Text of a line: a single string or an ordered list joined by newlines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_more::From)]
#[serde(untagged)]
pub enum LineText {
    /// One string
    Single(String),
    /// Several strings, one per rendered line
    Parts(Vec<String>),
}

impl LineText {
    /// The text as it is transmitted.
    pub fn joined(&self) -> String {
        match self {
            Self::Single(text) => text.clone(),
            Self::Parts(parts) => parts.join("\n"),
        }
    }

    /// Whether nothing would be transmitted.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(text) => text.is_empty(),
            Self::Parts(parts) => parts.iter().all(String::is_empty) && parts.len() <= 1,
        }
    }

    /// Replace every occurrence of `token` with `value`.
    pub(crate) fn replace_all(&mut self, token: &str, value: &str) {
        match self {
            Self::Single(text) => *text = text.replace(token, value),
            Self::Parts(parts) => {
                for part in parts.iter_mut() {
                    *part = part.replace(token, value);
                }
            }
        }
    }
}

impl From<&str> for LineText {
    fn from(text: &str) -> Self {
        Self::Single(text.to_string())
    }
}

/// Focus annotation attached to a sent message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters, Serialize, Deserialize, derive_builder::Builder)]
#[builder(default, setter(into))]
pub struct Focus {
    /// Phrase within the message the focus applies to
    phrase: String,
    /// Platform lens, e.g. `ActionRequest`
    lens: String,
    /// Focus category
    #[serde(default)]
    category: String,
    /// Extra actions offered on the focus
    #[serde(default)]
    actions: Vec<String>,
}

/// What a line transmits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload<'a> {
    /// A styled text message
    Text(&'a LineText),
    /// A file attachment, relative to the script directory
    File(&'a str),
}

/// One scripted event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters, Serialize, Deserialize, derive_builder::Builder)]
#[builder(default, setter(into))]
pub struct Line {
    /// Actor key; absent lines are spoken by the app
    #[serde(default)]
    #[builder(setter(into, strip_option))]
    actor: Option<String>,
    /// Space key, resolved through the script's space mapping
    #[serde(default)]
    #[builder(setter(into, strip_option))]
    space: Option<String>,
    /// Message text
    #[serde(default)]
    #[builder(setter(into, strip_option))]
    text: Option<LineText>,
    /// File attachment
    #[serde(default)]
    #[builder(setter(into, strip_option))]
    filename: Option<String>,
    /// Dispatch automatically after the delay
    #[serde(default)]
    auto: bool,
    /// Explicit delay in milliseconds, overriding the estimate
    #[serde(default)]
    #[builder(setter(into, strip_option))]
    delay: Option<u64>,
    /// Displayed to the director but never transmitted
    #[serde(default)]
    comment: bool,
    /// Focus annotation for the sent message
    #[serde(default)]
    #[builder(setter(into, strip_option))]
    focus: Option<Focus>,
}

impl Line {
    /// Payload to transmit. Text wins when a line carries both; empty text
    /// counts as no text.
    pub fn payload(&self) -> Option<Payload<'_>> {
        match (self.spoken_text(), &self.filename) {
            (Some(text), _) => Some(Payload::Text(text)),
            (None, Some(filename)) => Some(Payload::File(filename)),
            (None, None) => None,
        }
    }

    /// Joined text, if the line has any.
    pub fn joined_text(&self) -> Option<String> {
        self.spoken_text().map(LineText::joined)
    }

    fn spoken_text(&self) -> Option<&LineText> {
        self.text.as_ref().filter(|text| !text.is_empty())
    }

    /// Delay before an auto line dispatches: the explicit delay, else the estimate.
    pub fn effective_delay(&self) -> Duration {
        self.delay
            .map(Duration::from_millis)
            .unwrap_or_else(|| crate::estimate(self))
    }

    pub(crate) fn text_mut(&mut self) -> Option<&mut LineText> {
        self.text.as_mut()
    }
}
