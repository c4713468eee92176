//! Director console: raw-mode keypresses in, colored queue cards out.

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::Stylize;
use crossterm::terminal;
use marionette_director::{
    CardBody, Command, Notice, PlaybackHandle, QueueCard, Renderer, SequencerState,
};
use marionette_error::{ConsoleError, ConsoleErrorKind, ConsoleResult};
use std::io::{self, Write};
use std::time::Duration;
use tracing::{debug, warn};

/// Key reference printed at startup and on `h`.
pub const HELP: &str = "\
space  send the current line
s      skip the current line
z      back one line
u      upload actor photos
p      print the transcript
h ?    this help
q ^C   quit";

/// What a keypress asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleAction {
    /// Forward a command to playback.
    Playback(Command),
    /// Print the script transcript.
    Transcript,
    /// Print the key reference.
    Help,
}

/// Map a keypress to an action. Unbound keys and key releases map to nothing.
pub fn action_for(key: &KeyEvent) -> Option<ConsoleAction> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(ConsoleAction::Playback(Command::Terminate)),
            _ => None,
        };
    }
    match key.code {
        KeyCode::Char(' ') => Some(ConsoleAction::Playback(Command::AdvanceManual)),
        KeyCode::Char('s') => Some(ConsoleAction::Playback(Command::Skip)),
        KeyCode::Char('z') => Some(ConsoleAction::Playback(Command::Back)),
        KeyCode::Char('u') => Some(ConsoleAction::Playback(Command::UploadPhotos)),
        KeyCode::Char('q') => Some(ConsoleAction::Playback(Command::Terminate)),
        KeyCode::Char('p') => Some(ConsoleAction::Transcript),
        KeyCode::Char('h') | KeyCode::Char('?') => Some(ConsoleAction::Help),
        _ => None,
    }
}

/// Polls the terminal for keypresses.
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    /// Create a handler that gives up waiting after `tick_rate_ms`.
    pub fn new(tick_rate_ms: u64) -> Self {
        Self {
            tick_rate: Duration::from_millis(tick_rate_ms),
        }
    }

    /// Next keypress, or `None` if the tick elapsed without one.
    #[tracing::instrument(skip(self), level = "trace")]
    pub fn next(&self) -> ConsoleResult<Option<KeyEvent>> {
        let ready = event::poll(self.tick_rate)
            .map_err(|e| ConsoleError::new(ConsoleErrorKind::EventPoll(e.to_string())))?;
        if !ready {
            return Ok(None);
        }
        match event::read()
            .map_err(|e| ConsoleError::new(ConsoleErrorKind::EventRead(e.to_string())))?
        {
            Event::Key(key) => Ok(Some(key)),
            _ => Ok(None),
        }
    }
}

/// Raw mode for as long as the guard lives.
pub struct TerminalGuard;

impl TerminalGuard {
    /// Switch the terminal to raw mode.
    ///
    /// # Errors
    ///
    /// Returns `TerminalSetup` if raw mode cannot be enabled.
    pub fn enter() -> ConsoleResult<Self> {
        terminal::enable_raw_mode()
            .map_err(|e| ConsoleError::new(ConsoleErrorKind::TerminalSetup(e.to_string())))?;
        Ok(Self)
    }

    /// Restore the terminal explicitly, reporting failure.
    ///
    /// # Errors
    ///
    /// Returns `TerminalRestore` if raw mode cannot be disabled.
    pub fn leave(self) -> ConsoleResult<()> {
        std::mem::forget(self);
        terminal::disable_raw_mode()
            .map_err(|e| ConsoleError::new(ConsoleErrorKind::TerminalRestore(e.to_string())))
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            warn!(error = %e, "Failed to restore terminal");
        }
    }
}

/// Reads keypresses and forwards them to playback until playback stops.
pub struct Console {
    handle: PlaybackHandle,
    transcript: Vec<String>,
    events: EventHandler,
}

impl Console {
    /// Console steering `handle`; `transcript` is printed on `p`.
    pub fn new(handle: PlaybackHandle, transcript: Vec<String>) -> Self {
        Self {
            handle,
            transcript,
            events: EventHandler::new(100),
        }
    }

    /// Blocking key loop. Run it on a blocking thread.
    ///
    /// # Errors
    ///
    /// Returns a `ConsoleError` if terminal events cannot be read.
    pub fn run(self) -> ConsoleResult<()> {
        let mut out = io::stdout();
        while self.handle.status().state != SequencerState::Terminal {
            let Some(key) = self.events.next()? else {
                continue;
            };
            match action_for(&key) {
                Some(ConsoleAction::Playback(command)) => {
                    debug!(%command, "Key command");
                    if !self.handle.send(command) {
                        break;
                    }
                }
                Some(ConsoleAction::Transcript) => {
                    write_lines(&mut out, self.transcript.iter().map(String::as_str))?
                }
                Some(ConsoleAction::Help) => write_lines(&mut out, HELP.lines())?,
                None => {}
            }
        }
        Ok(())
    }
}

/// Write lines with raw-mode line endings.
fn write_lines<'a>(out: &mut impl Write, lines: impl Iterator<Item = &'a str>) -> ConsoleResult<()> {
    for line in lines {
        write!(out, "{}\r\n", line)
            .map_err(|e| ConsoleError::new(ConsoleErrorKind::Rendering(e.to_string())))?;
    }
    out.flush()
        .map_err(|e| ConsoleError::new(ConsoleErrorKind::Rendering(e.to_string())))
}

/// Colored renderer for a raw-mode terminal.
pub struct ConsoleRenderer<W: Write + Send> {
    out: W,
}

impl ConsoleRenderer<io::Stdout> {
    /// Render to standard output.
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write + Send> ConsoleRenderer<W> {
    /// Render to any writer.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, line: &str) {
        if let Err(e) = write_lines(&mut self.out, std::iter::once(line)) {
            warn!(error = %e, "Console output failed");
        }
    }
}

fn styled_card(card: &QueueCard) -> String {
    let timing = if *card.auto() {
        format!("auto {}s", card.delay().as_secs_f64()).cyan().to_string()
    } else {
        "wait".yellow().to_string()
    };
    let speaker = card.speaker().to_uppercase().bold().to_string();
    let body = match card.body() {
        CardBody::Text {
            text,
            comment: true,
        } => format!("[{}]", text).dark_grey().to_string(),
        CardBody::Text { text, .. } => format!("'{}'", text),
        CardBody::File(filename) => format!("sending {}", filename).blue().to_string(),
        CardBody::Empty => "(nothing to send)".red().to_string(),
    };
    format!(
        "{} {} {} {}",
        format!("{}/{}", card.index() + 1, card.total()).dark_grey(),
        timing,
        speaker,
        body.replace('\n', "\r\n")
    )
}

fn styled_notice(notice: &Notice) -> String {
    let text = notice.to_string();
    match notice {
        Notice::ActorReady(_) | Notice::FileSent { .. } => text.green().to_string(),
        Notice::ActorFailed { .. } | Notice::LineFailed { .. } => text.red().to_string(),
        Notice::Action | Notice::Finished => text.bold().magenta().to_string(),
        Notice::Staging | Notice::PhotosUploading(_) => text.dark_grey().to_string(),
    }
}

impl<W: Write + Send> Renderer for ConsoleRenderer<W> {
    fn queue_card(&mut self, card: &QueueCard) {
        let line = styled_card(card);
        self.emit(&line);
    }

    fn notice(&mut self, notice: &Notice) {
        let line = styled_notice(notice);
        self.emit(&line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marionette_core::Script;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn key_map() {
        let cases = [
            (' ', ConsoleAction::Playback(Command::AdvanceManual)),
            ('s', ConsoleAction::Playback(Command::Skip)),
            ('z', ConsoleAction::Playback(Command::Back)),
            ('u', ConsoleAction::Playback(Command::UploadPhotos)),
            ('q', ConsoleAction::Playback(Command::Terminate)),
            ('p', ConsoleAction::Transcript),
            ('h', ConsoleAction::Help),
            ('?', ConsoleAction::Help),
        ];
        for (c, action) in cases {
            assert_eq!(action_for(&press(KeyCode::Char(c))), Some(action), "key {:?}", c);
        }
        assert_eq!(action_for(&press(KeyCode::Char('x'))), None);
        assert_eq!(action_for(&press(KeyCode::Enter)), None);
    }

    #[test]
    fn ctrl_c_terminates() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(
            action_for(&key),
            Some(ConsoleAction::Playback(Command::Terminate))
        );
        let ctrl_s = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert_eq!(action_for(&ctrl_s), None);
    }

    #[test]
    fn releases_are_ignored() {
        let mut key = press(KeyCode::Char(' '));
        key.kind = KeyEventKind::Release;
        assert_eq!(action_for(&key), None);
    }

    #[test]
    fn renderer_uses_raw_mode_line_endings() {
        let script = Script::from_json_str(
            r#"{
              "actors": { "van": { "name": "Van" } },
              "lines": [ { "actor": "van", "text": ["one", "two"] } ]
            }"#,
        )
        .expect("valid script");
        let mut renderer = ConsoleRenderer::new(Vec::new());
        renderer.notice(&Notice::Action);
        renderer.queue_card(&QueueCard::new(&script, 0, &script.lines()[0]));

        let out = String::from_utf8(renderer.into_inner()).expect("utf8");
        assert!(out.contains("Action!"));
        assert!(out.contains("VAN"));
        assert!(out.contains("'one\r\ntwo'"));
        assert!(out.ends_with("\r\n"));
        assert!(!out.replace("\r\n", "").contains('\n'));
    }
}
