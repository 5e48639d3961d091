//! Per-state handler table.
//!
//! A [`Behavior`] maps (current state, command) to an [`Outcome`]. Handlers
//! never touch the context. They return what should happen and the context
//! applies it, so states hold no back-reference to their owner.

use super::state::{Command, State};
use std::time::Duration;

/// What a state decided to do with a command.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome<S: State> {
    /// Move to `next`, printing `message` first when present.
    Transition { message: Option<String>, next: S },

    /// The command is a no-op in this state.
    Ignore(String),

    /// The command is not allowed in this state.
    Reject(String),
}

impl<S: State> Outcome<S> {
    /// Silent transition.
    pub fn to(next: S) -> Self {
        Self::Transition {
            message: None,
            next,
        }
    }

    /// Transition preceded by a message.
    pub fn announce(message: impl Into<String>, next: S) -> Self {
        Self::Transition {
            message: Some(message.into()),
            next,
        }
    }

    pub fn ignore(message: impl Into<String>) -> Self {
        Self::Ignore(message.into())
    }

    pub fn reject(message: impl Into<String>) -> Self {
        Self::Reject(message.into())
    }

    /// Target state, if this outcome moves the machine.
    pub fn next_state(&self) -> Option<&S> {
        match self {
            Self::Transition { next, .. } => Some(next),
            Self::Ignore(_) | Self::Reject(_) => None,
        }
    }
}

/// A delayed follow-up transition a state requests when it is entered.
#[derive(Clone, Debug, PartialEq)]
pub struct AutoTransition<S: State> {
    pub delay: Duration,
    pub message: String,
    pub next: S,
}

impl<S: State> AutoTransition<S> {
    pub fn after(delay: Duration, message: impl Into<String>, next: S) -> Self {
        Self {
            delay,
            message: message.into(),
            next,
        }
    }
}

/// Handler table for a closed set of states.
///
/// Every command must be handled by every state, possibly as a refusal.
///
/// # Example
///
/// ```rust
/// use stateful_device::core::{Behavior, Command, Outcome, State};
/// use stateful_device::state_enum;
///
/// state_enum! {
///     enum Turnstile {
///         Locked => "Locked",
///         Unlocked => "Unlocked",
///     }
/// }
///
/// #[derive(Clone, Copy, Debug)]
/// enum Action {
///     Coin,
///     Push,
/// }
///
/// impl Command for Action {
///     fn name(&self) -> &'static str {
///         match self {
///             Self::Coin => "coin",
///             Self::Push => "push",
///         }
///     }
/// }
///
/// impl Behavior for Turnstile {
///     type Command = Action;
///     type Settings = ();
///
///     fn handle(&self, command: Action) -> Outcome<Self> {
///         match (self, command) {
///             (Self::Locked, Action::Coin) => Outcome::to(Self::Unlocked),
///             (Self::Locked, Action::Push) => Outcome::reject("Insert a coin."),
///             (Self::Unlocked, Action::Coin) => Outcome::ignore("Already paid."),
///             (Self::Unlocked, Action::Push) => Outcome::to(Self::Locked),
///         }
///     }
/// }
///
/// assert_eq!(Turnstile::Locked.handle(Action::Coin).next_state(), Some(&Turnstile::Unlocked));
/// ```
pub trait Behavior: State {
    type Command: Command;

    /// Device-wide parameters handed to `on_entry`, such as motion delays.
    type Settings: Clone + Send + Sync + 'static;

    /// Decide what this state does with `command`.
    fn handle(&self, command: Self::Command) -> Outcome<Self>;

    /// Auto-transition to arm when this state becomes active.
    fn on_entry(&self, _settings: &Self::Settings) -> Option<AutoTransition<Self>> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::state_enum! {
        enum TestState {
            Idle => "Idle",
            Warming => "Warming",
        }
    }

    #[test]
    fn to_builds_silent_transition() {
        let outcome = Outcome::to(TestState::Warming);
        assert_eq!(
            outcome,
            Outcome::Transition {
                message: None,
                next: TestState::Warming
            }
        );
        assert_eq!(outcome.next_state(), Some(&TestState::Warming));
    }

    #[test]
    fn announce_keeps_message() {
        let outcome = Outcome::announce("heating", TestState::Warming);
        match outcome {
            Outcome::Transition { message, next } => {
                assert_eq!(message.as_deref(), Some("heating"));
                assert_eq!(next, TestState::Warming);
            }
            _ => panic!("Expected a transition"),
        }
    }

    #[test]
    fn refusals_have_no_next_state() {
        assert_eq!(Outcome::<TestState>::ignore("noop").next_state(), None);
        assert_eq!(Outcome::<TestState>::reject("nope").next_state(), None);
    }

    #[test]
    fn auto_transition_after_sets_fields() {
        let auto = AutoTransition::after(Duration::from_secs(2), "warm", TestState::Idle);
        assert_eq!(auto.delay, Duration::from_secs(2));
        assert_eq!(auto.message, "warm");
        assert_eq!(auto.next, TestState::Idle);
    }
}
