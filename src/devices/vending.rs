//! Vending machine: money in, product selected, product out.

use crate::context::{Machine, Notifier, Response};
use crate::core::{Behavior, Command, Outcome};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

crate::state_enum! {
    /// Vending machine states.
    pub enum VendingState {
        WaitingForMoney => "Waiting for money",
        ProductSelected => "Selecting product",
        DispensingProduct => "Dispensing product",
    }
}

/// Operations the vending machine exposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VendingCommand {
    InsertMoney,
    SelectProduct,
    DispenseProduct,
}

impl VendingCommand {
    pub const ALL: &'static [Self] = &[
        Self::InsertMoney,
        Self::SelectProduct,
        Self::DispenseProduct,
    ];
}

impl Command for VendingCommand {
    fn name(&self) -> &'static str {
        match self {
            Self::InsertMoney => "insert_money",
            Self::SelectProduct => "select_product",
            Self::DispenseProduct => "dispense_product",
        }
    }
}

const INSERT_MONEY_FIRST: &str = "You must insert money first.";

impl Behavior for VendingState {
    type Command = VendingCommand;
    type Settings = ();

    fn handle(&self, command: VendingCommand) -> Outcome<Self> {
        use VendingCommand::*;

        match (self, command) {
            (Self::WaitingForMoney, InsertMoney) => Outcome::announce(
                "Money inserted: you can now select a product",
                Self::ProductSelected,
            ),
            (Self::WaitingForMoney, SelectProduct | DispenseProduct) => {
                Outcome::reject(INSERT_MONEY_FIRST)
            }

            (Self::ProductSelected, InsertMoney) => {
                Outcome::reject("Please select a product - money already inserted")
            }
            (Self::ProductSelected, SelectProduct) => Outcome::to(Self::DispensingProduct),
            (Self::ProductSelected, DispenseProduct) => {
                Outcome::reject("Please select a product before dispensing it")
            }

            (Self::DispensingProduct, InsertMoney) => {
                Outcome::reject("Please wait for the product to be dispensed")
            }
            (Self::DispensingProduct, SelectProduct) => {
                Outcome::reject("Product already selected and dispensing")
            }
            (Self::DispensingProduct, DispenseProduct) => Outcome::announce(
                "Product dispensed, returning to waiting for money",
                Self::WaitingForMoney,
            ),
        }
    }
}

/// A vending machine that starts out waiting for money.
pub struct VendingMachine {
    machine: Machine<VendingState>,
}

impl VendingMachine {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            machine: Machine::new(VendingState::WaitingForMoney, (), notifier),
        }
    }

    pub fn insert_money(&mut self) -> Response<VendingState> {
        self.machine.dispatch(VendingCommand::InsertMoney)
    }

    pub fn select_product(&mut self) -> Response<VendingState> {
        self.machine.dispatch(VendingCommand::SelectProduct)
    }

    pub fn dispense_product(&mut self) -> Response<VendingState> {
        self.machine.dispatch(VendingCommand::DispenseProduct)
    }

    pub fn state(&self) -> VendingState {
        *self.machine.current_state()
    }

    pub fn state_name(&self) -> &str {
        self.machine.state_name()
    }

    pub fn machine(&self) -> &Machine<VendingState> {
        &self.machine
    }
}
