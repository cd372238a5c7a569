//! Line-level drivers for the status LED and the push buttons.

pub mod button;
pub mod status_led;
