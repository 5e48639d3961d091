//! Command-line front end.

pub mod menu;
pub mod session;

pub use menu::{DoorOption, Menu, MenuError, VendingOption};
pub use session::{Operable, Session};

use crate::config::{Config, ConfigError};
use crate::context::{ConsoleNotifier, Notifier};
use crate::core::{State, StateHistory};
use crate::devices::{AutomaticDoor, VendingMachine};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::io::BufReader;
use tracing::info;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceKind {
    Vending,
    Door,
}

/// Drive a vending machine or an automatic door from the terminal.
#[derive(Parser, Debug)]
#[command(name = "stateful-device", version)]
pub struct Args {
    /// Which device to simulate
    #[arg(value_enum, default_value = "door")]
    pub device: DeviceKind,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Door opening delay in milliseconds
    #[arg(long)]
    pub opening_ms: Option<u64>,

    /// Door closing delay in milliseconds
    #[arg(long)]
    pub closing_ms: Option<u64>,

    /// Pause after each menu iteration, in milliseconds (both devices)
    #[arg(long)]
    pub pause_ms: Option<u64>,

    /// Keep the terminal instead of clearing it before each menu
    #[arg(long)]
    pub no_clear: bool,

    /// Print the transition history as JSON on exit
    #[arg(long)]
    pub history: bool,
}

impl Args {
    /// Load the config file (or defaults), apply flag overrides, validate.
    pub fn resolve_config(&self) -> Result<Config, ConfigError> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        if let Some(ms) = self.opening_ms {
            config.door.opening_ms = ms;
        }
        if let Some(ms) = self.closing_ms {
            config.door.closing_ms = ms;
        }
        if let Some(ms) = self.pause_ms {
            config.session.vending_pause_ms = ms;
            config.session.door_pause_ms = ms;
        }
        if self.no_clear {
            config.session.clear_screen = false;
        }

        config.validated()
    }
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Console I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode history: {0}")]
    History(#[from] serde_json::Error),
}

/// Run the interactive session on stdin/stdout.
pub async fn run(args: Args) -> Result<(), CliError> {
    let config = args.resolve_config()?;
    info!(device = ?args.device, ?config, "starting session");

    let notifier: Arc<dyn Notifier> = Arc::new(ConsoleNotifier);
    let pause = match args.device {
        DeviceKind::Vending => config.session.vending_pause(),
        DeviceKind::Door => config.session.door_pause(),
    };
    let mut session = Session::new(
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        pause,
        config.session.clear_screen,
    );

    match args.device {
        DeviceKind::Vending => {
            let mut machine = VendingMachine::new(notifier);
            session.run::<VendingOption, _>(&mut machine).await?;
            if args.history {
                print_history(machine.machine().history())?;
            }
        }
        DeviceKind::Door => {
            let mut door = AutomaticDoor::new(config.door_timings(), notifier);
            session.run::<DoorOption, _>(&mut door).await?;
            if args.history {
                print_history(&door.history().await)?;
            }
        }
    }

    Ok(())
}

fn print_history<S: State>(history: &StateHistory<S>) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(history)?);
    Ok(())
}
