//! Unified error types for the status LED controller.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! dispatcher's error handling uniform.  All variants are `Copy` so they can
//! be passed through handlers and logged without allocation.  Adapters log
//! the underlying OS error where it happens and return the typed variant.

use core::fmt;

use crate::events::EventSource;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the controller funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A GPIO line could not be set up, read or written.
    Gpio(GpioError),
    /// A timer could not be created, armed, disarmed or read.
    Timer(TimerError),
    /// The readiness multiplexer failed.
    Mux(MuxError),
    /// Configuration is invalid or could not be loaded.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpio(e) => write!(f, "gpio: {e}"),
            Self::Timer(e) => write!(f, "timer: {e}"),
            Self::Mux(e) => write!(f, "multiplexer: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// GPIO errors
// ---------------------------------------------------------------------------

/// Errors from sysfs GPIO lines.  The payload is the GPIO line number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpioError {
    /// Writing the line number to `export` failed.
    ExportFailed(u32),
    /// Setting `direction` failed.
    DirectionFailed(u32),
    /// Setting `edge` failed.
    EdgeFailed(u32),
    /// Opening the `value` attribute failed.
    OpenFailed(u32),
    /// Reading `value` failed.
    ReadFailed(u32),
    /// Writing `value` failed.
    WriteFailed(u32),
    /// `value` contained something other than `0` or `1`.
    InvalidLevel(u32),
}

impl fmt::Display for GpioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExportFailed(n) => write!(f, "gpio{n} export failed"),
            Self::DirectionFailed(n) => write!(f, "gpio{n} direction setup failed"),
            Self::EdgeFailed(n) => write!(f, "gpio{n} edge setup failed"),
            Self::OpenFailed(n) => write!(f, "gpio{n} value open failed"),
            Self::ReadFailed(n) => write!(f, "gpio{n} read failed"),
            Self::WriteFailed(n) => write!(f, "gpio{n} write failed"),
            Self::InvalidLevel(n) => write!(f, "gpio{n} returned an invalid level"),
        }
    }
}

impl embedded_hal::digital::Error for GpioError {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}

impl From<GpioError> for Error {
    fn from(e: GpioError) -> Self {
        Self::Gpio(e)
    }
}

// ---------------------------------------------------------------------------
// Timer errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerError {
    /// The timer could not be created.
    CreateFailed,
    /// Arming (or re-arming) failed.
    ArmFailed,
    /// Disarming failed.
    DisarmFailed,
    /// Reading the expiration count failed.
    ReadFailed,
}

impl fmt::Display for TimerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateFailed => write!(f, "create failed"),
            Self::ArmFailed => write!(f, "arm failed"),
            Self::DisarmFailed => write!(f, "disarm failed"),
            Self::ReadFailed => write!(f, "expiration read failed"),
        }
    }
}

impl From<TimerError> for Error {
    fn from(e: TimerError) -> Self {
        Self::Timer(e)
    }
}

// ---------------------------------------------------------------------------
// Multiplexer errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MuxError {
    /// The multiplexer instance could not be created.
    CreateFailed,
    /// Registering a source failed.
    RegisterFailed(EventSource),
    /// The blocking wait itself failed.  Always fatal.
    WaitFailed,
}

impl fmt::Display for MuxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateFailed => write!(f, "create failed"),
            Self::RegisterFailed(source) => write!(f, "registering {source} failed"),
            Self::WaitFailed => write!(f, "wait failed"),
        }
    }
}

impl From<MuxError> for Error {
    fn from(e: MuxError) -> Self {
        Self::Mux(e)
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors from loading or validating a [`BlinkConfig`](crate::config::BlinkConfig).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The document is not valid JSON for the config schema.
    Malformed,
    /// A field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => write!(f, "malformed configuration document"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
