//! The context that owns the active state.
//!
//! - [`Machine`]: synchronous context. Forwards commands, applies outcomes,
//!   records history, and holds the pending timer token.
//! - [`Device`]: async shell that runs pending tokens as cancellable tokio
//!   timers.
//! - [`Notifier`]: where user-facing notices go.

mod device;
mod machine;
mod notifier;

pub use device::Device;
pub use machine::{Machine, Response, Scheduled};
pub use notifier::{ConsoleNotifier, Notice, Notifier, RecordingNotifier};
