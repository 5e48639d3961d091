//! Interactive menu loop.
//!
//! Each iteration prints the current state and the menu, reads one line, and
//! applies the chosen command. Reading is async so door timers keep firing
//! while the loop waits for input.
//!
//! Both devices share one header, `Current state: <name>`, and all text is
//! English.

use crate::cli::menu::Menu;
use crate::core::Command;
use crate::devices::{AutomaticDoor, DoorCommand, VendingCommand, VendingMachine};
use std::future::Future;
use std::io;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};
use tracing::{debug, warn};

const CLEAR_SCREEN: &str = "\x1B[2J\x1B[1;1H";

/// Something the session can drive.
pub trait Operable {
    type Command: Command;

    fn state_name(&self) -> impl Future<Output = String>;

    fn apply(&mut self, command: Self::Command) -> impl Future<Output = ()>;
}

impl Operable for VendingMachine {
    type Command = VendingCommand;

    async fn state_name(&self) -> String {
        VendingMachine::state_name(self).to_string()
    }

    async fn apply(&mut self, command: VendingCommand) {
        match command {
            VendingCommand::InsertMoney => self.insert_money(),
            VendingCommand::SelectProduct => self.select_product(),
            VendingCommand::DispenseProduct => self.dispense_product(),
        };
    }
}

impl Operable for AutomaticDoor {
    type Command = DoorCommand;

    async fn state_name(&self) -> String {
        AutomaticDoor::state_name(self).await
    }

    async fn apply(&mut self, command: DoorCommand) {
        match command {
            DoorCommand::Open => self.open().await,
            DoorCommand::Close => self.close().await,
        };
    }
}

pub struct Session<R, W> {
    input: Lines<R>,
    output: W,
    pause: Duration,
    clear_screen: bool,
}

impl<R, W> Session<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// `pause` is slept after every iteration, `clear_screen` wipes the
    /// terminal before each menu.
    pub fn new(input: R, output: W, pause: Duration, clear_screen: bool) -> Self {
        Self {
            input: input.lines(),
            output,
            pause,
            clear_screen,
        }
    }

    /// Run until the exit entry is chosen or input ends.
    pub async fn run<M, D>(&mut self, device: &mut D) -> io::Result<()>
    where
        M: Menu,
        D: Operable<Command = M::Command>,
    {
        loop {
            if self.clear_screen {
                self.output.write_all(CLEAR_SCREEN.as_bytes()).await?;
            }
            let header = format!("Current state: {}\n{}", device.state_name().await, M::TEXT);
            self.output.write_all(header.as_bytes()).await?;
            self.output.flush().await?;

            let Some(line) = self.input.next_line().await? else {
                debug!("input closed");
                return self.say(M::EXIT_MESSAGE).await;
            };

            match M::parse(&line) {
                Ok(option) => match option.command() {
                    Some(command) => {
                        debug!(command = command.name(), "menu command");
                        device.apply(command).await;
                    }
                    None => return self.say(M::EXIT_MESSAGE).await,
                },
                Err(err) => {
                    warn!(input = %line.trim(), "invalid menu option");
                    self.say(&err.to_string()).await?;
                }
            }

            if !self.pause.is_zero() {
                tokio::time::sleep(self.pause).await;
            }
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    async fn say(&mut self, line: &str) -> io::Result<()> {
        self.output.write_all(line.as_bytes()).await?;
        self.output.write_all(b"\n").await?;
        self.output.flush().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::menu::{DoorOption, VendingOption};
    use crate::context::RecordingNotifier;
    use crate::devices::{DoorState, DoorTimings, VendingState};
    use std::sync::Arc;

    fn session(script: &'static str) -> Session<&'static [u8], Vec<u8>> {
        Session::new(script.as_bytes(), Vec::new(), Duration::ZERO, false)
    }

    fn text(session: Session<&'static [u8], Vec<u8>>) -> String {
        String::from_utf8(session.into_output()).unwrap()
    }

    #[tokio::test]
    async fn vending_script_runs_full_cycle() {
        let recorder = Arc::new(RecordingNotifier::new());
        let mut machine = VendingMachine::new(recorder.clone());
        let mut session = session("1\n2\n3\n4\n");

        session.run::<VendingOption, _>(&mut machine).await.unwrap();

        assert_eq!(machine.state(), VendingState::WaitingForMoney);
        assert_eq!(machine.machine().history().len(), 3);
        let output = text(session);
        assert!(output.starts_with("Current state: Waiting for money\n"));
        assert!(output.contains("Current state: Selecting product\n"));
        assert!(output.contains("Current state: Dispensing product\n"));
        assert!(output.ends_with("Exiting system\n"));
    }

    #[tokio::test]
    async fn invalid_option_changes_nothing() {
        let recorder = Arc::new(RecordingNotifier::new());
        let mut machine = VendingMachine::new(recorder.clone());
        let mut session = session("9\n4\n");

        session.run::<VendingOption, _>(&mut machine).await.unwrap();

        assert_eq!(machine.state(), VendingState::WaitingForMoney);
        assert!(recorder.notices().is_empty());
        assert!(text(session).contains("Invalid option.\n"));
    }

    #[tokio::test]
    async fn end_of_input_exits() {
        let recorder = Arc::new(RecordingNotifier::new());
        let mut machine = VendingMachine::new(recorder);
        let mut session = session("1\n");

        session.run::<VendingOption, _>(&mut machine).await.unwrap();

        assert_eq!(machine.state(), VendingState::ProductSelected);
        assert!(text(session).ends_with("Exiting system\n"));
    }

    #[tokio::test(start_paused = true)]
    async fn door_script_reaches_opening() {
        let recorder = Arc::new(RecordingNotifier::new());
        let mut door = AutomaticDoor::new(DoorTimings::default(), recorder.clone());
        let mut session = session("1\n2\n3\n");

        session.run::<DoorOption, _>(&mut door).await.unwrap();

        assert_eq!(door.state().await, DoorState::Opening);
        assert!(recorder
            .lines()
            .contains(&"The door cannot close while it is opening.".to_string()));
        let output = text(session);
        assert!(output.contains("Current state: Opening...\n"));
        assert!(output.ends_with("Exiting simulator...\n"));
    }

    #[tokio::test(start_paused = true)]
    async fn pause_lets_door_timer_fire_between_commands() {
        let recorder = Arc::new(RecordingNotifier::new());
        let mut door = AutomaticDoor::new(DoorTimings::default(), recorder.clone());
        let mut session = Session::new(
            "1\n2\n3\n".as_bytes(),
            Vec::new(),
            Duration::from_millis(3_500),
            true,
        );

        session.run::<DoorOption, _>(&mut door).await.unwrap();

        // open, pause past the opening delay, close, pause past the closing delay
        assert_eq!(door.state().await, DoorState::Closed);
        let output = String::from_utf8(session.into_output()).unwrap();
        assert!(output.starts_with(CLEAR_SCREEN));
        assert!(output.contains("Current state: Open\n"));
    }
}
