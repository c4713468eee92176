//! Async driver around the sequencer.
//!
//! [`Playback::run`] owns the sequencer and is the only task that feeds it.
//! Director commands, timer expiries and dispatch completions all arrive as
//! messages, so the sequencer sees one trigger at a time in arrival order.

use crate::{
    ActorDirectory, Dispatched, Dispatcher, Effect, Notice, QueueCard, Renderer, Sequencer,
    SequencerState, Stager, StagingReport, Trigger,
};
use derive_builder::Builder;
use derive_getters::Getters;
use marionette_core::Script;
use marionette_error::{DispatchError, DispatchErrorKind, DispatchResult, StagingError};
use marionette_platform::ChatPlatform;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// Director commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum Command {
    /// Authenticate every identity, then start at the first line.
    BeginStaging,
    /// Send the current line now.
    AdvanceManual,
    /// Move past the current line without sending it.
    Skip,
    /// Return to the previous line without sending anything.
    Back,
    /// Upload profile photos for staged identities.
    UploadPhotos,
    /// Stop playback.
    Terminate,
}

/// Messages from timers and dispatch tasks back to the driver.
#[derive(Debug)]
enum Completion {
    TimerFired { line: usize, epoch: u64 },
    DispatchFinished {
        line: usize,
        result: DispatchResult<Dispatched>,
    },
}

/// Snapshot of the sequencer, published after every trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackStatus {
    /// Line index the cursor points at
    pub cursor: usize,
    /// Sequencer state
    pub state: SequencerState,
}

/// Cloneable handle for steering a running playback.
#[derive(Debug, Clone)]
pub struct PlaybackHandle {
    commands: mpsc::UnboundedSender<Command>,
    status: watch::Receiver<PlaybackStatus>,
}

impl PlaybackHandle {
    /// Queue a command. Returns `false` once playback has stopped.
    pub fn send(&self, command: Command) -> bool {
        self.commands.send(command).is_ok()
    }

    /// Latest published status.
    pub fn status(&self) -> PlaybackStatus {
        *self.status.borrow()
    }

    /// Wait until the status satisfies `predicate`.
    ///
    /// Returns the last published status if playback stops first.
    pub async fn wait_until(
        &self,
        mut predicate: impl FnMut(&PlaybackStatus) -> bool,
    ) -> PlaybackStatus {
        let mut status = self.status.clone();
        let matched = status.wait_for(|s| predicate(s)).await.map(|s| *s);
        matched.unwrap_or_else(|_| *status.borrow())
    }
}

/// Playback tuning.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Builder)]
#[builder(setter(into))]
pub struct PlaybackOptions {
    /// Color marker on every text message
    #[builder(default = "String::from(\"#FFFFFF\")")]
    color: String,
    /// Upload profile photos once staging succeeds
    #[builder(default = "true")]
    upload_photos: bool,
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self {
            color: "#FFFFFF".to_string(),
            upload_photos: true,
        }
    }
}

/// Where playback stopped.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct PlaybackReport {
    /// Final cursor; equals the line count when the script completed
    cursor: usize,
    /// Final state
    state: SequencerState,
    /// Lines transmitted
    sent: usize,
    /// Comment lines passed over
    suppressed: usize,
    /// Dispatch attempts that failed
    failed: usize,
    /// Staging outcome, if staging completed
    staging: Option<StagingReport>,
}

impl PlaybackReport {
    /// Whether every line was processed.
    pub fn completed(&self, total: usize) -> bool {
        self.cursor == total
    }
}

/// A script being played.
pub struct Playback {
    script: Arc<Script>,
    directory: Arc<ActorDirectory>,
    platform: Arc<dyn ChatPlatform>,
    dispatcher: Arc<Dispatcher>,
    options: PlaybackOptions,
    renderer: Box<dyn Renderer>,
    sequencer: Sequencer,
    command_tx: Option<mpsc::UnboundedSender<Command>>,
    commands: mpsc::UnboundedReceiver<Command>,
    completion_tx: mpsc::UnboundedSender<Completion>,
    completions: mpsc::UnboundedReceiver<Completion>,
    status_tx: watch::Sender<PlaybackStatus>,
    status_rx: watch::Receiver<PlaybackStatus>,
    timer: Option<JoinHandle<()>>,
    report: PlaybackReport,
}

impl Playback {
    /// Prepare playback of `script`; nothing happens until
    /// [`Command::BeginStaging`] arrives.
    pub fn new(
        script: Script,
        platform: Arc<dyn ChatPlatform>,
        options: PlaybackOptions,
        renderer: Box<dyn Renderer>,
    ) -> Self {
        let sequencer = Sequencer::for_script(&script);
        let directory = Arc::new(ActorDirectory::build(&script));
        let dispatcher = Arc::new(Dispatcher::new(
            Arc::clone(&platform),
            options.color.clone(),
            script.root(),
        ));
        let (command_tx, commands) = mpsc::unbounded_channel();
        let (completion_tx, completions) = mpsc::unbounded_channel();
        let (status_tx, status_rx) = watch::channel(PlaybackStatus {
            cursor: sequencer.cursor(),
            state: sequencer.state(),
        });
        let report = PlaybackReport {
            cursor: 0,
            state: sequencer.state(),
            sent: 0,
            suppressed: 0,
            failed: 0,
            staging: None,
        };

        Self {
            script: Arc::new(script),
            directory,
            platform,
            dispatcher,
            options,
            renderer,
            sequencer,
            command_tx: Some(command_tx),
            commands,
            completion_tx,
            completions,
            status_tx,
            status_rx,
            timer: None,
            report,
        }
    }

    /// Handle for sending commands and watching status.
    ///
    /// Take handles before calling [`Playback::run`]; playback terminates once
    /// every handle is dropped.
    pub fn handle(&self) -> PlaybackHandle {
        let (closed_tx, _) = mpsc::unbounded_channel();
        PlaybackHandle {
            commands: self.command_tx.clone().unwrap_or(closed_tx),
            status: self.status_rx.clone(),
        }
    }

    /// The script being played.
    pub fn script(&self) -> &Script {
        &self.script
    }

    /// Drive playback until the script completes, staging fails, or the
    /// director terminates.
    ///
    /// # Errors
    ///
    /// Returns the `StagingError` if an identity fails to authenticate.
    #[instrument(skip_all, fields(lines = self.script.len()))]
    pub async fn run(mut self) -> Result<PlaybackReport, StagingError> {
        self.command_tx = None;
        let mut staging_error = None;

        while self.sequencer.state() != SequencerState::Terminal {
            // Commands drain before completions so a key pressed during a
            // dispatch is judged against the state it was pressed in.
            let trigger = tokio::select! {
                biased;
                command = self.commands.recv() => match command {
                    Some(command) => match self.on_command(command) {
                        Some(trigger) => trigger,
                        None => continue,
                    },
                    None => {
                        debug!("All handles dropped");
                        Trigger::Terminate
                    }
                },
                Some(completion) = self.completions.recv() => self.on_completion(completion),
            };

            if let Err(e) = self.apply(trigger).await {
                staging_error = Some(e);
            }
        }

        self.disarm_timer();
        self.report.cursor = self.sequencer.cursor();
        self.report.state = self.sequencer.state();
        info!(
            cursor = self.report.cursor,
            sent = self.report.sent,
            failed = self.report.failed,
            "Playback stopped"
        );

        match staging_error {
            Some(e) => Err(e),
            None => Ok(self.report),
        }
    }

    fn on_command(&mut self, command: Command) -> Option<Trigger> {
        debug!(%command, state = %self.sequencer.state(), "Command");
        match command {
            Command::BeginStaging => Some(Trigger::BeginStaging),
            Command::AdvanceManual => Some(Trigger::Send),
            Command::Skip => Some(Trigger::Skip),
            Command::Back => Some(Trigger::Back),
            Command::Terminate => Some(Trigger::Terminate),
            Command::UploadPhotos => {
                if self.report.staging.is_some() {
                    let stager = Stager::new(Arc::clone(&self.platform), true);
                    let started = stager.upload_photos(&self.directory);
                    self.renderer.notice(&Notice::PhotosUploading(started));
                } else {
                    debug!("Photos can only be uploaded after staging");
                }
                None
            }
        }
    }

    fn on_completion(&mut self, completion: Completion) -> Trigger {
        match completion {
            Completion::TimerFired { line, epoch } => Trigger::TimerFired { line, epoch },
            Completion::DispatchFinished { line, result } => match result {
                Ok(dispatched) => {
                    match dispatched {
                        Dispatched::Suppressed => self.report.suppressed += 1,
                        Dispatched::Message(_) => self.report.sent += 1,
                        Dispatched::File(_) => {
                            self.report.sent += 1;
                            if let Some(script_line) = self.script.line(line) {
                                self.renderer.notice(&Notice::FileSent {
                                    actor: self.script.speaker_name(script_line).to_string(),
                                    filename: script_line.filename().clone().unwrap_or_default(),
                                });
                            }
                        }
                    }
                    Trigger::Dispatched { line }
                }
                Err(e) => {
                    warn!(line, error = %e, "Line not sent, cursor stays");
                    self.report.failed += 1;
                    self.renderer.notice(&Notice::LineFailed {
                        line,
                        reason: e.kind.to_string(),
                    });
                    Trigger::DispatchFailed { line }
                }
            },
        }
    }

    /// Feed a trigger to the sequencer and carry out its effects, including
    /// the triggers those effects produce synchronously.
    async fn apply(&mut self, trigger: Trigger) -> Result<(), StagingError> {
        let mut staging_error = None;
        let mut triggers = VecDeque::from([trigger]);

        while let Some(trigger) = triggers.pop_front() {
            for effect in self.sequencer.handle(trigger) {
                match effect {
                    Effect::Stage => match self.stage().await {
                        Some(Ok(report)) => {
                            self.report.staging = Some(report);
                            triggers.push_back(Trigger::Staged);
                        }
                        Some(Err(e)) => {
                            staging_error = Some(e);
                            triggers.push_back(Trigger::StagingFailed);
                        }
                        None => triggers.push_back(Trigger::Terminate),
                    },
                    Effect::Render { line } => self.render(line),
                    Effect::ArmTimer { line, epoch, delay } => {
                        self.disarm_timer();
                        let completions = self.completion_tx.clone();
                        self.timer = Some(tokio::spawn(async move {
                            tokio::time::sleep(delay).await;
                            if let Err(e) = completions.send(Completion::TimerFired { line, epoch }) {
                                debug!(line, error = %e, "Playback gone, timer dropped");
                            }
                        }));
                    }
                    Effect::DisarmTimer => self.disarm_timer(),
                    Effect::Dispatch { line } => self.spawn_dispatch(line),
                    Effect::Finish => {
                        if self.sequencer.cursor() == self.script.len()
                            && self.report.staging.is_some()
                        {
                            self.renderer.notice(&Notice::Finished);
                        }
                    }
                }
            }
        }

        self.status_tx.send_replace(PlaybackStatus {
            cursor: self.sequencer.cursor(),
            state: self.sequencer.state(),
        });

        match staging_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Run staging while still listening for `Terminate`.
    ///
    /// Returns `None` if the director terminated before staging finished.
    async fn stage(&mut self) -> Option<Result<StagingReport, StagingError>> {
        let stager = Stager::new(Arc::clone(&self.platform), self.options.upload_photos);
        let directory = Arc::make_mut(&mut self.directory);
        let renderer = self.renderer.as_mut();
        let commands = &mut self.commands;

        let staging = stager.stage(directory, renderer);
        tokio::pin!(staging);

        loop {
            tokio::select! {
                result = &mut staging => return Some(result),
                command = commands.recv() => match command {
                    Some(Command::Terminate) | None => {
                        info!("Terminated during staging");
                        return None;
                    }
                    Some(other) => debug!(command = %other, "Ignoring command while staging"),
                },
            }
        }
    }

    fn render(&mut self, index: usize) {
        if let Some(line) = self.script.line(index) {
            let card = QueueCard::new(&self.script, index, line);
            self.renderer.queue_card(&card);
        }
    }

    fn spawn_dispatch(&self, line: usize) {
        let script = Arc::clone(&self.script);
        let directory = Arc::clone(&self.directory);
        let dispatcher = Arc::clone(&self.dispatcher);
        let completions = self.completion_tx.clone();

        tokio::spawn(async move {
            let result = match script.line(line) {
                Some(script_line) => dispatcher.dispatch(line, script_line, &directory).await,
                None => Err(DispatchError::new(DispatchErrorKind::EmptyLine(line))),
            };
            if let Err(e) = completions.send(Completion::DispatchFinished { line, result }) {
                debug!(line, error = %e, "Playback gone, dispatch result dropped");
            }
        });
    }

    fn disarm_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}
