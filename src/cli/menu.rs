//! Numbered menus for the interactive session.

use crate::core::Command;
use crate::devices::{DoorCommand, VendingCommand};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MenuError {
    #[error("Invalid option.")]
    InvalidOption(String),
}

/// A numbered menu whose entries map to device commands or to exit.
pub trait Menu: Copy + Sized {
    type Command: Command;

    /// Menu body printed under the state header.
    const TEXT: &'static str;

    /// Printed when the user leaves.
    const EXIT_MESSAGE: &'static str;

    fn parse(input: &str) -> Result<Self, MenuError>;

    /// Command for this entry, `None` for the exit entry.
    fn command(self) -> Option<Self::Command>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VendingOption {
    InsertMoney,
    SelectProduct,
    DispenseProduct,
    Exit,
}

impl Menu for VendingOption {
    type Command = VendingCommand;

    const TEXT: &'static str = "\
  1. Insert money
  2. Select product
  3. Dispense product
  4. Exit

option: ";

    const EXIT_MESSAGE: &'static str = "Exiting system";

    fn parse(input: &str) -> Result<Self, MenuError> {
        match input.trim() {
            "1" => Ok(Self::InsertMoney),
            "2" => Ok(Self::SelectProduct),
            "3" => Ok(Self::DispenseProduct),
            "4" => Ok(Self::Exit),
            other => Err(MenuError::InvalidOption(other.to_string())),
        }
    }

    fn command(self) -> Option<VendingCommand> {
        match self {
            Self::InsertMoney => Some(VendingCommand::InsertMoney),
            Self::SelectProduct => Some(VendingCommand::SelectProduct),
            Self::DispenseProduct => Some(VendingCommand::DispenseProduct),
            Self::Exit => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DoorOption {
    Open,
    Close,
    Exit,
}

impl Menu for DoorOption {
    type Command = DoorCommand;

    const TEXT: &'static str = "\
  1. Open door
  2. Close door
  3. Exit

Select an option: ";

    const EXIT_MESSAGE: &'static str = "Exiting simulator...";

    fn parse(input: &str) -> Result<Self, MenuError> {
        match input.trim() {
            "1" => Ok(Self::Open),
            "2" => Ok(Self::Close),
            "3" => Ok(Self::Exit),
            other => Err(MenuError::InvalidOption(other.to_string())),
        }
    }

    fn command(self) -> Option<DoorCommand> {
        match self {
            Self::Open => Some(DoorCommand::Open),
            Self::Close => Some(DoorCommand::Close),
            Self::Exit => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vending_options_map_to_commands() {
        assert_eq!(
            VendingOption::parse("1").unwrap().command(),
            Some(VendingCommand::InsertMoney)
        );
        assert_eq!(
            VendingOption::parse("2").unwrap().command(),
            Some(VendingCommand::SelectProduct)
        );
        assert_eq!(
            VendingOption::parse("3").unwrap().command(),
            Some(VendingCommand::DispenseProduct)
        );
        assert_eq!(VendingOption::parse("4").unwrap().command(), None);
    }

    #[test]
    fn door_options_map_to_commands() {
        assert_eq!(DoorOption::parse("1").unwrap().command(), Some(DoorCommand::Open));
        assert_eq!(DoorOption::parse("2").unwrap().command(), Some(DoorCommand::Close));
        assert_eq!(DoorOption::parse("3").unwrap(), DoorOption::Exit);
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(DoorOption::parse("  2 \r").unwrap(), DoorOption::Close);
    }

    #[test]
    fn unknown_input_is_invalid() {
        assert_eq!(
            DoorOption::parse("4"),
            Err(MenuError::InvalidOption("4".to_string()))
        );
        assert_eq!(
            VendingOption::parse("insert"),
            Err(MenuError::InvalidOption("insert".to_string()))
        );
        assert!(VendingOption::parse("").is_err());
    }

    #[test]
    fn invalid_option_message() {
        let err = MenuError::InvalidOption("9".to_string());
        assert_eq!(err.to_string(), "Invalid option.");
    }
}
