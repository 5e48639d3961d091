//! State and command traits shared by every device.
//!
//! States and commands are plain values. Inspecting them has no side effects.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for device states.
///
/// A state is one member of a closed set of named modes. Its display name is
/// what the device reports when it enters the state.
///
/// # Required Traits
///
/// - `Clone`: states are copied into the transition history
/// - `PartialEq`: states are compared by tests and by the history path
/// - `Debug`: for diagnostics
/// - `Serialize` + `Deserialize`: the history can be dumped as JSON
///
/// # Example
///
/// ```rust
/// use stateful_device::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum LampState {
///     Off,
///     On,
/// }
///
/// impl State for LampState {
///     fn name(&self) -> &str {
///         match self {
///             Self::Off => "Off",
///             Self::On => "On",
///         }
///     }
/// }
///
/// assert_eq!(LampState::On.name(), "On");
/// ```
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync + 'static
{
    /// Display name reported on transitions and in the menu header.
    fn name(&self) -> &str;
}

/// An external operation a device exposes.
///
/// The name is recorded in the transition history and in log fields.
pub trait Command: Copy + Debug + Send + Sync + 'static {
    fn name(&self) -> &'static str;
}
