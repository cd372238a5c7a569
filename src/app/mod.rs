//! Application core — pure controller logic, zero I/O.
//!
//! The blink engine, the hold-repeat controller and the dispatcher that
//! routes readiness events between them.  All interaction with the OS goes
//! through the `embedded-hal` digital traits and the **port traits** in
//! [`ports`], so this layer runs unchanged against mock hardware.

pub mod blink;
pub mod dispatcher;
pub mod events;
pub mod hold_repeat;
pub mod ports;
