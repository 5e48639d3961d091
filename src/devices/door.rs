//! Automatic door with timed opening and closing.
//!
//! `Opening` and `Closing` arm an auto-transition on entry. Reopening a
//! closing door, or closing it by hand, supersedes the pending timer so it can
//! no longer land the door in the wrong state.

use crate::context::{Device, Machine, Notifier, Response};
use crate::core::{AutoTransition, Behavior, Command, Outcome, StateHistory};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

crate::state_enum! {
    /// Door states.
    pub enum DoorState {
        Closed => "Closed",
        Opening => "Opening...",
        Open => "Open",
        Closing => "Closing",
    }
}

/// Operations the door exposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DoorCommand {
    Open,
    Close,
}

impl DoorCommand {
    pub const ALL: &'static [Self] = &[Self::Open, Self::Close];
}

impl Command for DoorCommand {
    fn name(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Close => "close",
        }
    }
}

/// How long the door motors take.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DoorTimings {
    pub opening: Duration,
    pub closing: Duration,
}

impl Default for DoorTimings {
    fn default() -> Self {
        Self {
            opening: Duration::from_secs(3),
            closing: Duration::from_secs(3),
        }
    }
}

impl Behavior for DoorState {
    type Command = DoorCommand;
    type Settings = DoorTimings;

    fn handle(&self, command: DoorCommand) -> Outcome<Self> {
        match (self, command) {
            (Self::Closed, DoorCommand::Open) => {
                Outcome::announce("Opening the door...", Self::Opening)
            }
            (Self::Closed, DoorCommand::Close) => Outcome::ignore("The door is already closed."),

            (Self::Opening, DoorCommand::Open) => Outcome::ignore("The door is already opening."),
            (Self::Opening, DoorCommand::Close) => {
                Outcome::reject("The door cannot close while it is opening.")
            }

            (Self::Open, DoorCommand::Open) => Outcome::ignore("The door is already open."),
            (Self::Open, DoorCommand::Close) => {
                Outcome::announce("Closing the door...", Self::Closing)
            }

            (Self::Closing, DoorCommand::Open) => Outcome::announce(
                "Motion detected. Opening the door again...",
                Self::Opening,
            ),
            (Self::Closing, DoorCommand::Close) => {
                Outcome::announce("The door has closed.", Self::Closed)
            }
        }
    }

    fn on_entry(&self, timings: &DoorTimings) -> Option<AutoTransition<Self>> {
        match self {
            Self::Opening => Some(AutoTransition::after(
                timings.opening,
                "The door is open.",
                Self::Open,
            )),
            Self::Closing => Some(AutoTransition::after(
                timings.closing,
                "The door is closed.",
                Self::Closed,
            )),
            Self::Closed | Self::Open => None,
        }
    }
}

/// A door that starts closed. Timed transitions run on the tokio runtime.
#[derive(Clone)]
pub struct AutomaticDoor {
    device: Device<DoorState>,
}

impl AutomaticDoor {
    /// Must be called inside a tokio runtime.
    pub fn new(timings: DoorTimings, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            device: Device::new(Machine::new(DoorState::Closed, timings, notifier)),
        }
    }

    pub async fn open(&self) -> Response<DoorState> {
        self.device.dispatch(DoorCommand::Open).await
    }

    pub async fn close(&self) -> Response<DoorState> {
        self.device.dispatch(DoorCommand::Close).await
    }

    pub async fn state(&self) -> DoorState {
        self.device.state().await
    }

    pub async fn state_name(&self) -> String {
        self.device.state_name().await
    }

    pub async fn history(&self) -> StateHistory<DoorState> {
        self.device.history().await
    }

    pub fn device(&self) -> &Device<DoorState> {
        &self.device
    }
}
