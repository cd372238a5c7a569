//! Port traits — the boundary between the controller logic and the OS.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ BlinkEngine / HoldRepeatController / EventDispatcher
//! ```
//!
//! GPIO lines are consumed through the `embedded-hal` digital traits
//! ([`InputPin`](embedded_hal::digital::InputPin) for buttons,
//! [`OutputPin`](embedded_hal::digital::OutputPin) for the LED).  Timers and
//! the readiness multiplexer have no `embedded-hal` counterpart, so they get
//! the traits below.  The domain core consumes all of them via generics and
//! never touches a file descriptor directly.

use core::time::Duration;

use crate::error::{MuxError, TimerError};
use crate::events::{EventSource, ReadySet};

// ───────────────────────────────────────────────────────────────
// Timer port
// ───────────────────────────────────────────────────────────────

/// A monotonic, re-armable countdown that signals readiness on expiry.
pub trait TimerPort {
    /// Arm the timer to fire after `initial`.  With `repeat = None` it fires
    /// once; otherwise it keeps firing every `repeat`.  Re-arming replaces
    /// any pending expiry.
    fn arm(&mut self, initial: Duration, repeat: Option<Duration>) -> Result<(), TimerError>;

    /// Stop the timer and discard any pending expiry.
    fn disarm(&mut self) -> Result<(), TimerError>;

    /// Number of expirations since the last call.  Must be called once per
    /// readiness notification to clear it; `0` means the wake was stale.
    fn consume_expirations(&mut self) -> Result<u64, TimerError>;
}

// ───────────────────────────────────────────────────────────────
// Readiness multiplexer ports
// ───────────────────────────────────────────────────────────────

/// Which kind of readiness a registered source reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interest {
    /// Ordinary input readiness (timers).
    Readable,
    /// Exceptional condition (sysfs GPIO edge notifications).
    Priority,
}

/// Registration half of the multiplexer, generic over the source type so a
/// single multiplexer can accept both timers and GPIO lines.
pub trait Register<S: ?Sized> {
    fn register(&mut self, source: &S, tag: EventSource, interest: Interest)
    -> Result<(), MuxError>;
}

/// Blocking half of the multiplexer.
pub trait Multiplexer {
    /// Block until at least one registered source is ready and replace the
    /// contents of `ready` with their tags.  Blocks indefinitely.
    ///
    /// The order of tags within one batch is unspecified.
    fn wait(&mut self, ready: &mut ReadySet) -> Result<(), MuxError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The controller emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (syslog, test
/// recorder, etc.).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
