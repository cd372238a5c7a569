//! Outbound application events.
//!
//! The blink engine and hold-repeat controller emit these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other side
//! decide what to do with them.

use core::time::Duration;

use crate::config::DutyCycle;
use crate::events::EventSource;

use super::hold_repeat::Direction;

/// Why the blink period changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeCause {
    /// The immediate step applied when a button becomes the driving button.
    Press,
    /// A repeat-timer step while the driving button stays held.
    Repeat,
    /// The reset button restored the default.
    Reset,
}

/// Structured events emitted by the controller core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The blink engine armed its first phase.
    Started { period: Duration, duty: DutyCycle },

    /// The blink period was adjusted.  Takes effect at the next toggle.
    PeriodChanged {
        from: Duration,
        to: Duration,
        cause: ChangeCause,
    },

    /// The acceleration direction changed.
    DirectionChanged { from: Direction, to: Direction },

    /// A timer fired more than once between two reads.
    TimerOverrun { source: EventSource, expirations: u64 },
}
