//! Async shell around [`Machine`] that turns timer tokens into real timers.
//!
//! The machine only records which auto-transition is pending. This shell
//! keeps one tokio timer task in step with that token: a superseded timer is
//! cancelled, and a newly armed token gets its own task. A timer that wakes
//! after being superseded is still rejected by the machine's epoch check.

use crate::context::machine::{Machine, Response};
use crate::core::{Behavior, StateHistory};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::debug;

struct ArmedTimer {
    epoch: u64,
    token: CancellationToken,
}

struct Shared<S: Behavior> {
    machine: Machine<S>,
    timer: Option<ArmedTimer>,
}

type Handle<S> = Arc<Mutex<Shared<S>>>;

/// Cloneable handle to a machine whose timed transitions run on tokio.
///
/// Must be created inside a tokio runtime.
pub struct Device<S: Behavior> {
    shared: Handle<S>,
}

impl<S: Behavior> Clone for Device<S> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<S: Behavior> Device<S> {
    pub fn new(machine: Machine<S>) -> Self {
        let shared = Arc::new(Mutex::new(Shared {
            machine,
            timer: None,
        }));
        // Nobody else can hold the lock yet.
        if let Ok(mut guard) = shared.try_lock() {
            reconcile(&shared, &mut guard);
        }
        Self { shared }
    }

    /// Forward `command` to the active state.
    pub async fn dispatch(&self, command: S::Command) -> Response<S> {
        let mut guard = self.shared.lock().await;
        let response = guard.machine.dispatch(command);
        reconcile(&self.shared, &mut guard);
        response
    }

    /// Replace the active state directly.
    pub async fn set_state(&self, next: S) {
        let mut guard = self.shared.lock().await;
        guard.machine.set_state(next);
        reconcile(&self.shared, &mut guard);
    }

    pub async fn state(&self) -> S {
        self.shared.lock().await.machine.current_state().clone()
    }

    pub async fn state_name(&self) -> String {
        self.shared.lock().await.machine.state_name().to_string()
    }

    pub async fn history(&self) -> StateHistory<S> {
        self.shared.lock().await.machine.history().clone()
    }

    pub async fn epoch(&self) -> u64 {
        self.shared.lock().await.machine.epoch()
    }

    /// Whether a timer task is currently armed.
    pub async fn has_pending_timer(&self) -> bool {
        self.shared.lock().await.timer.is_some()
    }
}

impl<S: Behavior> Drop for Shared<S> {
    fn drop(&mut self) {
        if let Some(armed) = self.timer.take() {
            armed.token.cancel();
        }
    }
}

/// Bring the armed timer task in line with the machine's pending token.
fn reconcile<S: Behavior>(handle: &Handle<S>, shared: &mut Shared<S>) {
    let wanted = shared
        .machine
        .pending()
        .map(|scheduled| (scheduled.epoch(), scheduled.delay()));

    if let (Some(armed), Some((epoch, _))) = (&shared.timer, wanted) {
        if armed.epoch == epoch {
            return;
        }
    }

    if let Some(armed) = shared.timer.take() {
        debug!(epoch = armed.epoch, "timer cancelled");
        armed.token.cancel();
    }

    let Some((epoch, delay)) = wanted else {
        return;
    };

    let token = CancellationToken::new();
    let cancelled = token.clone();
    let weak = Arc::downgrade(handle);
    debug!(epoch, delay_ms = delay.as_millis() as u64, "timer started");

    tokio::spawn(async move {
        tokio::select! {
            _ = cancelled.cancelled() => {}
            _ = tokio::time::sleep(delay) => {
                let Some(handle) = weak.upgrade() else {
                    return;
                };
                let mut guard = handle.lock().await;
                let shared = &mut *guard;
                if shared.timer.as_ref().is_some_and(|armed| armed.epoch == epoch) {
                    shared.timer = None;
                }
                if !shared.machine.fire(epoch) {
                    debug!(epoch, "timer woke after being superseded");
                }
                reconcile(&handle, shared);
            }
        }
    });

    shared.timer = Some(ArmedTimer { epoch, token });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::notifier::{Notice, RecordingNotifier};
    use crate::core::{AutoTransition, Command, Outcome};
    use std::time::Duration;

    crate::state_enum! {
        enum Kettle {
            Cold => "Cold",
            Boiling => "Boiling",
            Done => "Done",
        }
    }

    #[derive(Clone, Copy, Debug)]
    enum Button {
        Boil,
        Cancel,
    }

    impl Command for Button {
        fn name(&self) -> &'static str {
            match self {
                Self::Boil => "boil",
                Self::Cancel => "cancel",
            }
        }
    }

    impl Behavior for Kettle {
        type Command = Button;
        type Settings = Duration;

        fn handle(&self, command: Button) -> Outcome<Self> {
            match (self, command) {
                (Self::Cold | Self::Done, Button::Boil) => Outcome::to(Self::Boiling),
                (Self::Boiling, Button::Boil) => Outcome::ignore("Already boiling."),
                (Self::Boiling, Button::Cancel) => Outcome::to(Self::Cold),
                (Self::Cold | Self::Done, Button::Cancel) => Outcome::ignore("Nothing to cancel."),
            }
        }

        fn on_entry(&self, boil_time: &Duration) -> Option<AutoTransition<Self>> {
            match self {
                Self::Boiling => Some(AutoTransition::after(*boil_time, "Click.", Self::Done)),
                Self::Cold | Self::Done => None,
            }
        }
    }

    fn kettle(initial: Kettle) -> (Device<Kettle>, Arc<RecordingNotifier>) {
        let recorder = Arc::new(RecordingNotifier::new());
        let machine = Machine::new(initial, Duration::from_secs(3), recorder.clone());
        (Device::new(machine), recorder)
    }

    async fn advance(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
        tokio::task::yield_now().await;
    }

    #[tokio::test(start_paused = true)]
    async fn timer_fires_after_delay() {
        let (device, recorder) = kettle(Kettle::Cold);

        device.dispatch(Button::Boil).await;
        assert!(device.has_pending_timer().await);

        advance(2_900).await;
        assert_eq!(device.state().await, Kettle::Boiling);

        advance(200).await;
        assert_eq!(device.state().await, Kettle::Done);
        assert!(!device.has_pending_timer().await);
        assert_eq!(
            recorder.lines(),
            vec![
                "State changed to: Boiling",
                "Click.",
                "State changed to: Done"
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn superseding_transition_cancels_timer() {
        let (device, recorder) = kettle(Kettle::Cold);

        device.dispatch(Button::Boil).await;
        advance(1_000).await;
        device.dispatch(Button::Cancel).await;
        assert!(!device.has_pending_timer().await);

        advance(5_000).await;
        assert_eq!(device.state().await, Kettle::Cold);
        assert!(!recorder.notices().contains(&Notice::Info("Click.".into())));
    }

    #[tokio::test(start_paused = true)]
    async fn rearmed_timer_counts_from_new_entry() {
        let (device, _) = kettle(Kettle::Cold);

        device.dispatch(Button::Boil).await;
        advance(2_000).await;
        device.dispatch(Button::Cancel).await;
        device.dispatch(Button::Boil).await;

        advance(2_000).await;
        assert_eq!(device.state().await, Kettle::Boiling);

        advance(1_100).await;
        assert_eq!(device.state().await, Kettle::Done);
    }

    #[tokio::test(start_paused = true)]
    async fn initial_timed_state_is_armed_on_creation() {
        let (device, _) = kettle(Kettle::Boiling);
        assert!(device.has_pending_timer().await);

        advance(3_100).await;
        assert_eq!(device.state_name().await, "Done");
        assert_eq!(device.epoch().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn set_state_rearms_through_shell() {
        let (device, _) = kettle(Kettle::Cold);

        device.set_state(Kettle::Boiling).await;
        assert!(device.has_pending_timer().await);

        advance(3_100).await;
        let history = device.history().await;
        assert_eq!(
            history.get_path(),
            vec![&Kettle::Cold, &Kettle::Boiling, &Kettle::Done]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn clones_share_one_machine() {
        let (device, _) = kettle(Kettle::Cold);
        let other = device.clone();

        other.dispatch(Button::Boil).await;
        assert_eq!(device.state().await, Kettle::Boiling);
    }
}
