//! Readiness sources and button edges.
//!
//! Every file-like source registered with the multiplexer is tagged with an
//! [`EventSource`].  The multiplexer hands the tag back when the source is
//! ready, and the dispatcher matches on it exhaustively.
//!
//! ```text
//! ┌──────────────┐
//! │ blink timer  │──┐
//! │ repeat timer │──┤     ┌──────────────┐     ┌──────────────────┐
//! │ button K1    │──┼────▶│ Multiplexer  │────▶│ EventDispatcher  │
//! │ button K2    │──┤     │ (epoll)      │     │ (match on tag)   │
//! │ button K3    │──┘     └──────────────┘     └──────────────────┘
//! ```

use core::fmt;

/// Upper bound on sources ready in a single wait batch.
pub const MAX_READY: usize = 8;

/// Tags handed back by the multiplexer in one wait batch.
pub type ReadySet = heapless::Vec<EventSource, MAX_READY>;

/// The three board buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ButtonId {
    /// Accelerate while held.
    K1 = 0,
    /// Reset to the default period.
    K2 = 1,
    /// Decelerate while held.
    K3 = 2,
}

impl ButtonId {
    pub const ALL: [ButtonId; 3] = [ButtonId::K1, ButtonId::K2, ButtonId::K3];

    /// Index into per-button arrays.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// What pressing this button does.
    pub const fn role(self) -> ButtonRole {
        match self {
            Self::K1 => ButtonRole::Accelerate,
            Self::K2 => ButtonRole::Reset,
            Self::K3 => ButtonRole::Decelerate,
        }
    }
}

impl fmt::Display for ButtonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::K1 => write!(f, "K1"),
            Self::K2 => write!(f, "K2"),
            Self::K3 => write!(f, "K3"),
        }
    }
}

/// Function bound to a button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonRole {
    Accelerate,
    Reset,
    Decelerate,
}

/// Everything the dispatcher can be woken by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventSource {
    /// The blink timer expired: time to toggle the LED.
    BlinkTimer,
    /// The hold-repeat timer expired: time for another rate step.
    RepeatTimer,
    /// A button line reported an edge.
    Button(ButtonId),
}

impl EventSource {
    /// Every source, in registration order.
    pub const ALL: [EventSource; 5] = [
        EventSource::BlinkTimer,
        EventSource::RepeatTimer,
        EventSource::Button(ButtonId::K1),
        EventSource::Button(ButtonId::K2),
        EventSource::Button(ButtonId::K3),
    ];

    /// Opaque registration token (epoll `data.u64`).
    pub const fn to_token(self) -> u64 {
        match self {
            Self::BlinkTimer => 0,
            Self::RepeatTimer => 1,
            Self::Button(id) => 10 + id as u64,
        }
    }

    /// Inverse of [`to_token`](Self::to_token).  Unknown tokens yield `None`.
    pub const fn from_token(token: u64) -> Option<Self> {
        match token {
            0 => Some(Self::BlinkTimer),
            1 => Some(Self::RepeatTimer),
            10 => Some(Self::Button(ButtonId::K1)),
            11 => Some(Self::Button(ButtonId::K2)),
            12 => Some(Self::Button(ButtonId::K3)),
            _ => None,
        }
    }
}

impl fmt::Display for EventSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BlinkTimer => write!(f, "blink timer"),
            Self::RepeatTimer => write!(f, "repeat timer"),
            Self::Button(id) => write!(f, "button {id}"),
        }
    }
}

/// Direction of a confirmed level change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Pressed,
    Released,
}

/// A level change confirmed against the line, consumed immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonEdge {
    pub source: ButtonId,
    pub transition: Transition,
}

impl ButtonEdge {
    pub const fn pressed(source: ButtonId) -> Self {
        Self { source, transition: Transition::Pressed }
    }

    pub const fn released(source: ButtonId) -> Self {
        Self { source, transition: Transition::Released }
    }
}
