//! The synchronous context: one active state, its history, and at most one
//! pending auto-transition.

use crate::context::notifier::{Notice, Notifier};
use crate::core::{Behavior, Command, Outcome, State, StateHistory, StateTransition, Trigger};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

/// Result of dispatching one command.
#[derive(Clone, Debug, PartialEq)]
pub enum Response<S: State> {
    /// The active state was replaced
    Transitioned { from: S, to: S },

    /// The command was a no-op in the current state
    Ignored { reason: String },

    /// The command is not allowed in the current state
    Rejected { reason: String },
}

impl<S: State> Response<S> {
    pub fn is_transition(&self) -> bool {
        matches!(self, Self::Transitioned { .. })
    }

    /// Refusal message, if the command was refused.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Transitioned { .. } => None,
            Self::Ignored { reason } | Self::Rejected { reason } => Some(reason),
        }
    }
}

/// Timer token for a pending auto-transition.
///
/// The token carries the epoch it was armed in. Any later state change bumps
/// the machine's epoch, which makes the token stale.
#[derive(Clone, Debug, PartialEq)]
pub struct Scheduled<S: State> {
    epoch: u64,
    delay: Duration,
    message: String,
    next: S,
}

impl<S: State> Scheduled<S> {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn next(&self) -> &S {
        &self.next
    }
}

/// Context holding the single active state.
///
/// Every command is forwarded to the active state's handler. The machine
/// performs no validation of its own.
///
/// The history keeps every transition for the life of the machine, and
/// `StateHistory::record` copies it on each change, so a very long session
/// pays quadratic time in the number of transitions.
pub struct Machine<S: Behavior> {
    current: S,
    settings: S::Settings,
    history: StateHistory<S>,
    epoch: u64,
    pending: Option<Scheduled<S>>,
    notifier: Arc<dyn Notifier>,
}

impl<S: Behavior> Machine<S> {
    /// Create a machine in `initial`, arming its auto-transition if it has one.
    pub fn new(initial: S, settings: S::Settings, notifier: Arc<dyn Notifier>) -> Self {
        let mut machine = Self {
            current: initial,
            settings,
            history: StateHistory::new(),
            epoch: 0,
            pending: None,
            notifier,
        };
        machine.arm();
        machine
    }

    /// Forward `command` to the active state and apply its outcome.
    pub fn dispatch(&mut self, command: S::Command) -> Response<S> {
        match self.current.handle(command) {
            Outcome::Transition { message, next } => {
                if let Some(message) = message {
                    self.notify(Notice::Info(message));
                }
                let from = self.current.clone();
                self.transition(
                    next.clone(),
                    Trigger::Command {
                        name: command.name().to_string(),
                    },
                );
                Response::Transitioned { from, to: next }
            }
            Outcome::Ignore(reason) => {
                trace!(
                    state = self.current.name(),
                    command = command.name(),
                    %reason,
                    "command ignored"
                );
                self.notify(Notice::Ignored(reason.clone()));
                Response::Ignored { reason }
            }
            Outcome::Reject(reason) => {
                trace!(
                    state = self.current.name(),
                    command = command.name(),
                    %reason,
                    "command rejected"
                );
                self.notify(Notice::Rejected(reason.clone()));
                Response::Rejected { reason }
            }
        }
    }

    /// Replace the active state and announce it.
    ///
    /// This is the only place the state changes. Any pending auto-transition
    /// is dropped and the new state's own one, if any, is armed.
    pub fn set_state(&mut self, next: S) {
        self.transition(next, Trigger::Direct);
    }

    /// Apply the pending auto-transition armed in `epoch`.
    ///
    /// Returns `false` and changes nothing when the token is stale or
    /// nothing is pending.
    pub fn fire(&mut self, epoch: u64) -> bool {
        match self.pending.take() {
            Some(scheduled) if scheduled.epoch == epoch => {
                debug!(epoch, to = scheduled.next.name(), "auto-transition fired");
                self.notify(Notice::Info(scheduled.message));
                self.transition(scheduled.next, Trigger::Timer);
                true
            }
            other => {
                self.pending = other;
                trace!(epoch, current = self.epoch, "stale timer ignored");
                false
            }
        }
    }

    /// Fire whatever is pending right now, ignoring its delay.
    pub fn fire_pending(&mut self) -> bool {
        match self.pending.as_ref().map(Scheduled::epoch) {
            Some(epoch) => self.fire(epoch),
            None => false,
        }
    }

    pub fn current_state(&self) -> &S {
        &self.current
    }

    pub fn state_name(&self) -> &str {
        self.current.name()
    }

    pub fn history(&self) -> &StateHistory<S> {
        &self.history
    }

    /// Number of state changes so far.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn pending(&self) -> Option<&Scheduled<S>> {
        self.pending.as_ref()
    }

    pub fn settings(&self) -> &S::Settings {
        &self.settings
    }

    fn transition(&mut self, next: S, trigger: Trigger) {
        let from = std::mem::replace(&mut self.current, next);
        self.epoch += 1;
        debug!(
            from = from.name(),
            to = self.current.name(),
            ?trigger,
            epoch = self.epoch,
            "state transition"
        );

        self.history = self.history.record(StateTransition {
            from,
            to: self.current.clone(),
            timestamp: Utc::now(),
            trigger,
        });

        if let Some(stale) = self.pending.take() {
            debug!(epoch = stale.epoch, "pending auto-transition superseded");
        }

        self.notify(Notice::StateChanged(self.current.name().to_string()));
        self.arm();
    }

    fn arm(&mut self) {
        let Some(auto) = self.current.on_entry(&self.settings) else {
            return;
        };
        debug!(
            epoch = self.epoch,
            delay_ms = auto.delay.as_millis() as u64,
            to = auto.next.name(),
            "auto-transition armed"
        );
        self.pending = Some(Scheduled {
            epoch: self.epoch,
            delay: auto.delay,
            message: auto.message,
            next: auto.next,
        });
    }

    fn notify(&self, notice: Notice) {
        self.notifier.notify(&notice);
    }
}
