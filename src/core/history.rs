//! State transition history tracking.
//!
//! Provides immutable tracking of device transitions over time.

use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What caused a transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Trigger {
    /// A command handled by the previous state.
    Command { name: String },
    /// A scheduled auto-transition firing.
    Timer,
    /// An explicit `set_state` call.
    Direct,
}

/// Record of a single state transition.
///
/// # Example
///
/// ```rust
/// use stateful_device::core::{StateTransition, Trigger};
/// use stateful_device::state_enum;
/// use chrono::Utc;
///
/// state_enum! {
///     enum Gate {
///         Shut => "Shut",
///         Ajar => "Ajar",
///     }
/// }
///
/// let transition = StateTransition {
///     from: Gate::Shut,
///     to: Gate::Ajar,
///     timestamp: Utc::now(),
///     trigger: Trigger::Timer,
/// };
/// assert_eq!(transition.to, Gate::Ajar);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateTransition<S: State> {
    /// The state being transitioned from
    pub from: S,
    /// The state being transitioned to
    pub to: S,
    /// When the transition occurred
    pub timestamp: DateTime<Utc>,
    /// What caused it
    pub trigger: Trigger,
}

/// Ordered history of state transitions.
///
/// History is immutable - the `record` method returns a new history
/// with the transition added.
///
/// # Example
///
/// ```rust
/// use stateful_device::core::{StateHistory, StateTransition, Trigger};
/// use stateful_device::state_enum;
/// use chrono::Utc;
///
/// state_enum! {
///     enum Phase {
///         One => "One",
///         Two => "Two",
///         Three => "Three",
///     }
/// }
///
/// let history = StateHistory::new()
///     .record(StateTransition {
///         from: Phase::One,
///         to: Phase::Two,
///         timestamp: Utc::now(),
///         trigger: Trigger::Direct,
///     })
///     .record(StateTransition {
///         from: Phase::Two,
///         to: Phase::Three,
///         timestamp: Utc::now(),
///         trigger: Trigger::Timer,
///     });
///
/// assert_eq!(history.get_path(), vec![&Phase::One, &Phase::Two, &Phase::Three]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: State> {
    transitions: Vec<StateTransition<S>>,
}

impl<S: State> Default for StateHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> StateHistory<S> {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Record a transition, returning a new history.
    ///
    /// The existing history is left untouched.
    pub fn record(&self, transition: StateTransition<S>) -> Self {
        let mut transitions = self.transitions.clone();
        transitions.push(transition);
        Self { transitions }
    }

    /// Get the path of states traversed.
    ///
    /// Returns references to states in order: initial state, then
    /// the `to` state of each transition.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::new();
        if let Some(first) = self.transitions.first() {
            path.push(&first.from);
        }
        for transition in &self.transitions {
            path.push(&transition.to);
        }
        path
    }

    /// Calculate total duration from first to last transition.
    ///
    /// Returns `None` if there are no transitions.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.first(), self.transitions.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    /// Get all transitions.
    pub fn transitions(&self) -> &[StateTransition<S>] {
        &self.transitions
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Most recent transition, if any.
    pub fn last(&self) -> Option<&StateTransition<S>> {
        self.transitions.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::state_enum! {
        enum TestState {
            Initial => "Initial",
            Processing => "Processing",
            Complete => "Complete",
        }
    }

    fn transition(from: TestState, to: TestState, trigger: Trigger) -> StateTransition<TestState> {
        StateTransition {
            from,
            to,
            timestamp: Utc::now(),
            trigger,
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history: StateHistory<TestState> = StateHistory::new();
        assert!(history.is_empty());
        assert!(history.get_path().is_empty());
        assert!(history.duration().is_none());
        assert!(history.last().is_none());
    }

    #[test]
    fn record_is_immutable() {
        let history = StateHistory::new();

        let new_history = history.record(transition(
            TestState::Initial,
            TestState::Processing,
            Trigger::Direct,
        ));

        assert_eq!(history.len(), 0);
        assert_eq!(new_history.len(), 1);
    }

    #[test]
    fn get_path_returns_state_sequence() {
        let history = StateHistory::new()
            .record(transition(
                TestState::Initial,
                TestState::Processing,
                Trigger::Command {
                    name: "start".to_string(),
                },
            ))
            .record(transition(
                TestState::Processing,
                TestState::Complete,
                Trigger::Timer,
            ));

        let path = history.get_path();
        assert_eq!(path.len(), 3);
        assert_eq!(path[0], &TestState::Initial);
        assert_eq!(path[1], &TestState::Processing);
        assert_eq!(path[2], &TestState::Complete);
        assert_eq!(history.last().map(|t| &t.trigger), Some(&Trigger::Timer));
    }

    #[test]
    fn duration_calculates_elapsed_time() {
        let history = StateHistory::new().record(transition(
            TestState::Initial,
            TestState::Processing,
            Trigger::Direct,
        ));

        std::thread::sleep(std::time::Duration::from_millis(10));

        let history = history.record(transition(
            TestState::Processing,
            TestState::Complete,
            Trigger::Direct,
        ));

        let duration = history.duration();
        assert!(duration.is_some());
        assert!(duration.unwrap() >= std::time::Duration::from_millis(10));
    }

    #[test]
    fn single_transition_has_duration_zero() {
        let history = StateHistory::new().record(transition(
            TestState::Initial,
            TestState::Processing,
            Trigger::Timer,
        ));

        assert_eq!(history.duration(), Some(std::time::Duration::from_secs(0)));
    }

    #[test]
    fn history_serializes_with_tagged_trigger() {
        let history = StateHistory::new().record(transition(
            TestState::Initial,
            TestState::Processing,
            Trigger::Command {
                name: "start".to_string(),
            },
        ));

        let json = serde_json::to_value(&history).unwrap();
        assert_eq!(json["transitions"][0]["trigger"]["kind"], "command");
        assert_eq!(json["transitions"][0]["trigger"]["name"], "start");

        let text = serde_json::to_string(&history).unwrap();
        let deserialized: StateHistory<TestState> = serde_json::from_str(&text).unwrap();
        assert_eq!(deserialized.len(), 1);
        assert_eq!(deserialized.transitions()[0].to, TestState::Processing);
    }
}
