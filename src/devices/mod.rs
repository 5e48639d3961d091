//! Concrete devices built on the generic context.

pub mod door;
pub mod vending;

pub use door::{AutomaticDoor, DoorCommand, DoorState, DoorTimings};
pub use vending::{VendingCommand, VendingMachine, VendingState};
