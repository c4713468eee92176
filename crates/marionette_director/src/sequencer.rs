//! The playback state machine.
//!
//! The sequencer owns the cursor and is the only code that moves it. It is
//! pure: [`Sequencer::handle`] consumes one [`Trigger`] and returns the
//! [`Effect`]s the driver must carry out. Triggers that arrive in a state that
//! does not accept them are dropped, never queued, which is what guarantees a
//! single dispatch per line no matter how keypresses and timers interleave.

use marionette_core::Script;
use std::time::Duration;
use tracing::debug;

/// Sequencer states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum SequencerState {
    /// Before staging has been requested.
    Idle,
    /// Identities are being authenticated.
    Staging,
    /// The line at the cursor waits for a trigger or its auto timer.
    AwaitingTrigger,
    /// A send for the line at the cursor is in flight.
    Dispatching,
    /// Playback is over; every trigger is ignored.
    Terminal,
}

/// Timing of one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cue {
    /// Dispatch without a manual trigger
    pub auto: bool,
    /// Delay before an auto dispatch
    pub delay: Duration,
}

/// Inputs to the sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Director asked to stage identities.
    BeginStaging,
    /// Every identity authenticated.
    Staged,
    /// An identity failed to authenticate.
    StagingFailed,
    /// Director asked to send the current line.
    Send,
    /// Director asked to advance without sending.
    Skip,
    /// Director asked to go back one line.
    Back,
    /// An auto timer elapsed.
    TimerFired {
        /// Line the timer was armed for
        line: usize,
        /// Arming generation
        epoch: u64,
    },
    /// The in-flight dispatch succeeded.
    Dispatched {
        /// Line that was sent
        line: usize,
    },
    /// The in-flight dispatch failed.
    DispatchFailed {
        /// Line that failed
        line: usize,
    },
    /// Director interrupted playback.
    Terminate,
}

/// Work the driver performs on the sequencer's behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Authenticate identities, then report `Staged` or `StagingFailed`.
    Stage,
    /// Show the queue card for a line.
    Render {
        /// Line index
        line: usize,
    },
    /// Start a one-shot timer that reports `TimerFired`.
    ArmTimer {
        /// Line index
        line: usize,
        /// Generation the timer belongs to
        epoch: u64,
        /// Time until it fires
        delay: Duration,
    },
    /// Cancel any pending timer.
    DisarmTimer,
    /// Send a line, then report `Dispatched` or `DispatchFailed`.
    Dispatch {
        /// Line index
        line: usize,
    },
    /// Playback is over.
    Finish,
}

/// Cursor-owning state machine.
#[derive(Debug, Clone)]
pub struct Sequencer {
    cues: Vec<Cue>,
    state: SequencerState,
    cursor: usize,
    epoch: u64,
}

impl Sequencer {
    /// Sequencer over the given line timings, in `Idle`.
    pub fn new(cues: Vec<Cue>) -> Self {
        Self {
            cues,
            state: SequencerState::Idle,
            cursor: 0,
            epoch: 0,
        }
    }

    /// Sequencer over a script's lines.
    pub fn for_script(script: &Script) -> Self {
        Self::new(
            script
                .lines()
                .iter()
                .map(|line| Cue {
                    auto: *line.auto(),
                    delay: line.effective_delay(),
                })
                .collect(),
        )
    }

    /// Current state.
    pub fn state(&self) -> SequencerState {
        self.state
    }

    /// Current cursor; equals the line count once playback is complete.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.cues.len()
    }

    /// Whether there are no lines.
    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    /// Apply one trigger.
    pub fn handle(&mut self, trigger: Trigger) -> Vec<Effect> {
        use SequencerState::*;

        match (self.state, trigger) {
            (Terminal, _) => self.ignore(trigger),
            (_, Trigger::Terminate) => {
                self.state = Terminal;
                vec![Effect::DisarmTimer, Effect::Finish]
            }
            (Idle, Trigger::BeginStaging) => {
                self.state = Staging;
                vec![Effect::Stage]
            }
            (Staging, Trigger::Staged) => {
                if self.cues.is_empty() {
                    self.state = Terminal;
                    return vec![Effect::Finish];
                }
                self.await_trigger(true)
            }
            (Staging, Trigger::StagingFailed) => {
                self.state = Terminal;
                vec![Effect::Finish]
            }
            (AwaitingTrigger, Trigger::Send) => self.dispatch(),
            (AwaitingTrigger, Trigger::TimerFired { line, epoch })
                if line == self.cursor && epoch == self.epoch =>
            {
                self.dispatch()
            }
            (AwaitingTrigger, Trigger::Skip) => self.advance(),
            (AwaitingTrigger, Trigger::Back) => {
                self.cursor = self.cursor.saturating_sub(1);
                // Navigation never re-runs side effects: the timer stays unarmed.
                self.await_trigger(false)
            }
            (Dispatching, Trigger::Dispatched { line }) if line == self.cursor => self.advance(),
            (Dispatching, Trigger::DispatchFailed { line }) if line == self.cursor => {
                self.await_trigger(false)
            }
            _ => self.ignore(trigger),
        }
    }

    fn ignore(&self, trigger: Trigger) -> Vec<Effect> {
        debug!(state = %self.state, cursor = self.cursor, ?trigger, "Ignoring trigger");
        Vec::new()
    }

    fn dispatch(&mut self) -> Vec<Effect> {
        self.state = SequencerState::Dispatching;
        self.epoch += 1;
        vec![Effect::DisarmTimer, Effect::Dispatch { line: self.cursor }]
    }

    fn advance(&mut self) -> Vec<Effect> {
        self.cursor += 1;
        if self.cursor >= self.cues.len() {
            self.cursor = self.cues.len();
            self.state = SequencerState::Terminal;
            return vec![Effect::DisarmTimer, Effect::Finish];
        }
        self.await_trigger(true)
    }

    fn await_trigger(&mut self, arm: bool) -> Vec<Effect> {
        self.state = SequencerState::AwaitingTrigger;
        self.epoch += 1;
        let mut effects = vec![Effect::DisarmTimer, Effect::Render { line: self.cursor }];
        let cue = self.cues[self.cursor];
        if arm && cue.auto {
            effects.push(Effect::ArmTimer {
                line: self.cursor,
                epoch: self.epoch,
                delay: cue.delay,
            });
        }
        effects
    }
}
