//! Core state machine types.
//!
//! This module contains the side-effect-free part of every device:
//! - States and commands via the `State` and `Command` traits
//! - Per-state handler tables via the `Behavior` trait
//! - Immutable history tracking
//!
//! Nothing here prints, sleeps, or spawns.

#[macro_use]
mod macros;

mod behavior;
mod history;
mod state;

pub use behavior::{AutoTransition, Behavior, Outcome};
pub use history::{StateHistory, StateTransition, Trigger};
pub use state::{Command, State};
