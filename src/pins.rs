//! GPIO line assignments for the NanoPi NEO Plus2 extension board.
//!
//! Single source of truth for the default line numbers; the config layer
//! uses these as defaults and every driver receives its line from there.

/// sysfs GPIO class directory.
pub const SYSFS_GPIO_ROOT: &str = "/sys/class/gpio";

// ---------------------------------------------------------------------------
// Status LED
// ---------------------------------------------------------------------------

/// Status LED, gpioa.10.
pub const STATUS_LED_GPIO: u32 = 10;

// ---------------------------------------------------------------------------
// Push-buttons (read HIGH while pressed)
// ---------------------------------------------------------------------------

/// K1 (accelerate), gpioa.0.
pub const BUTTON_K1_GPIO: u32 = 0;
/// K2 (reset), gpioa.2.
pub const BUTTON_K2_GPIO: u32 = 2;
/// K3 (decelerate), gpioa.3.
pub const BUTTON_K3_GPIO: u32 = 3;
