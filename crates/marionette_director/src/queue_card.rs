//! Queue cards and the rendering seam.

use derive_getters::Getters;
use marionette_core::{Line, Payload, Script};
use std::fmt;
use std::io::{self, Write};
use std::time::Duration;

/// What the card previews.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardBody {
    /// Text to be sent; comments are displayed but never sent.
    Text {
        /// Joined text
        text: String,
        /// Whether the line is a comment
        comment: bool,
    },
    /// File to be sent.
    File(String),
    /// Misconfigured line with nothing to send.
    Empty,
}

/// Preview of the line about to be processed.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct QueueCard {
    /// Cursor position
    index: usize,
    /// Script length
    total: usize,
    /// Dispatches itself after `delay`
    auto: bool,
    /// Explicit or estimated delay
    delay: Duration,
    /// Speaker display name
    speaker: String,
    /// Preview
    body: CardBody,
}

impl QueueCard {
    /// Card for the line at `index`.
    pub fn new(script: &Script, index: usize, line: &Line) -> Self {
        let body = match line.payload() {
            Some(Payload::Text(text)) => CardBody::Text {
                text: text.joined(),
                comment: *line.comment(),
            },
            Some(Payload::File(filename)) => CardBody::File(filename.to_string()),
            None => CardBody::Empty,
        };
        Self {
            index,
            total: script.len(),
            auto: *line.auto(),
            delay: line.effective_delay(),
            speaker: script.speaker_name(line).to_string(),
            body,
        }
    }
}

impl fmt::Display for QueueCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.auto {
            write!(f, "auto {}s ", self.delay.as_secs_f64())?;
        } else {
            write!(f, "wait ")?;
        }
        write!(f, "{}", self.speaker.to_uppercase())?;
        match &self.body {
            CardBody::Text { text, comment: true } => write!(f, " [{}]", text),
            CardBody::Text { text, .. } => write!(f, " '{}'", text),
            CardBody::File(filename) => write!(f, " sending {}", filename),
            CardBody::Empty => write!(f, " (nothing to send)"),
        }
    }
}

/// Director-facing events other than queue cards.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum Notice {
    /// Staging began.
    #[display("Staging actors ...")]
    Staging,
    /// An identity authenticated.
    #[display("{} READY", _0)]
    ActorReady(String),
    /// An identity failed to authenticate; staging stopped.
    #[display("{} FAILED with {}", actor, cause)]
    ActorFailed {
        /// Script key
        actor: String,
        /// Failure description
        cause: String,
    },
    /// Every identity is staged; playback begins.
    #[display("Action!")]
    Action,
    /// A file attachment was sent.
    #[display("{} sent {}", actor, filename)]
    FileSent {
        /// Speaker key
        actor: String,
        /// Asset name
        filename: String,
    },
    /// A line failed to dispatch and stays current.
    #[display("line {} not sent: {}", line, reason)]
    LineFailed {
        /// Line index
        line: usize,
        /// Failure description
        reason: String,
    },
    /// Photo uploads were started.
    #[display("uploading {} photos", _0)]
    PhotosUploading(usize),
    /// The last line was processed.
    #[display("That's a wrap.")]
    Finished,
}

/// Where queue cards and notices go.
pub trait Renderer: Send {
    /// Show the card for the current line.
    fn queue_card(&mut self, card: &QueueCard);

    /// Show a notice.
    fn notice(&mut self, notice: &Notice);
}

/// Renders cards and notices as plain text lines.
pub struct PlainRenderer<W: Write + Send> {
    out: W,
}

impl PlainRenderer<io::Stdout> {
    /// Render to standard output.
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write + Send> PlainRenderer<W> {
    /// Render to any writer.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> Renderer for PlainRenderer<W> {
    fn queue_card(&mut self, card: &QueueCard) {
        if let Err(e) = writeln!(self.out, "{}", card) {
            tracing::warn!(error = %e, "Failed to render queue card");
        }
    }

    fn notice(&mut self, notice: &Notice) {
        if let Err(e) = writeln!(self.out, "{}", notice) {
            tracing::warn!(error = %e, "Failed to render notice");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marionette_core::LineBuilder;

    fn script() -> Script {
        Script::from_json_str(
            r#"{
              "actors": { "van": { "name": "Van" } },
              "lines": [
                { "actor": "van", "text": "hi there", "auto": true },
                { "filename": "a.png" },
                { "text": "note", "comment": true }
              ]
            }"#,
        )
        .expect("valid script")
    }

    #[test]
    fn auto_card_shows_estimated_delay() {
        let script = script();
        let card = QueueCard::new(&script, 0, &script.lines()[0]);
        assert_eq!(card.to_string(), "auto 0.6s VAN 'hi there'");
    }

    #[test]
    fn file_and_comment_cards() {
        let script = script();
        let file = QueueCard::new(&script, 1, &script.lines()[1]);
        assert_eq!(file.to_string(), "wait APP sending a.png");

        let comment = QueueCard::new(&script, 2, &script.lines()[2]);
        assert_eq!(comment.to_string(), "wait APP [note]");
        assert_eq!(comment.total(), &3);
    }

    #[test]
    fn empty_line_card() {
        let script = script();
        let line = LineBuilder::default().build().expect("valid line");
        assert_eq!(QueueCard::new(&script, 0, &line).body(), &CardBody::Empty);
    }

    #[test]
    fn plain_renderer_writes_lines() {
        let script = script();
        let mut renderer = PlainRenderer::new(Vec::new());
        renderer.notice(&Notice::Action);
        renderer.queue_card(&QueueCard::new(&script, 1, &script.lines()[1]));
        let out = String::from_utf8(renderer.into_inner()).expect("utf8");
        assert_eq!(out, "Action!\nwait APP sending a.png\n");
    }
}
