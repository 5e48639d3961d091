//! Stateful devices: enum-driven state machines with timed transitions.
//!
//! A device is a context holding exactly one active state. Every command is
//! forwarded to that state's handler, which either moves the device to a new
//! state or refuses with a message. States that need a delayed follow-up
//! transition arm a timer token on entry; any later state change supersedes
//! it, so a stale timer can never fire.
//!
//! # Modules
//!
//! - [`core`]: `State`, `Behavior`, outcomes and transition history
//! - [`context`]: the `Machine` context, its async `Device` shell, notifiers
//! - [`devices`]: the vending machine and the automatic door
//! - [`config`]: TOML configuration with accumulated validation
//! - [`cli`]: menus and the interactive session
//!
//! # Example
//!
//! ```rust
//! use stateful_device::context::RecordingNotifier;
//! use stateful_device::devices::{VendingMachine, VendingState};
//! use std::sync::Arc;
//!
//! let notices = Arc::new(RecordingNotifier::new());
//! let mut machine = VendingMachine::new(notices.clone());
//!
//! machine.select_product();
//! assert_eq!(machine.state(), VendingState::WaitingForMoney);
//!
//! machine.insert_money();
//! machine.select_product();
//! machine.dispense_product();
//! assert_eq!(machine.state(), VendingState::WaitingForMoney);
//! assert_eq!(machine.machine().history().len(), 3);
//! ```

pub mod cli;
pub mod config;
pub mod context;
pub mod core;
pub mod devices;

pub use crate::context::{Device, Machine, Notice, Notifier, Response};
pub use crate::core::{Behavior, Command, Outcome, State, StateHistory, StateTransition};
